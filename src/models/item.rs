//! 资源条目模型

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Item {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,
}

/// 写操作的响应: `{"status": "...", "item": {...}}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemStatusResponse {
    pub status: String,
    pub item: Item,
}

impl ItemStatusResponse {
    pub fn created(item: Item) -> Self {
        Self { status: "created".to_string(), item }
    }

    pub fn updated(item: Item) -> Self {
        Self { status: "updated".to_string(), item }
    }

    pub fn deleted(item: Item) -> Self {
        Self { status: "deleted".to_string(), item }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_validation() {
        let valid = Item {
            name: "widget".to_string(),
            description: None,
            price: 9.5,
        };
        assert!(valid.validate().is_ok());

        let empty_name = Item { name: String::new(), ..valid.clone() };
        assert!(empty_name.validate().is_err());

        let negative = Item { price: -1.0, ..valid };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_description_is_optional() {
        let item: Item = serde_json::from_str(r#"{"name":"widget","price":1.0}"#).unwrap();
        assert_eq!(item.description, None);
    }
}
