//! Item repository (内存条目存储)

use crate::models::item::Item;
use dashmap::{mapref::entry::Entry, DashMap};

/// 以条目 ID 为键的内存集合，进程退出即丢失
#[derive(Debug, Default)]
pub struct ItemRepository {
    items: DashMap<i64, Item>,
}

impl ItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 仅当 ID 不存在时插入，返回是否插入成功
    pub fn insert_if_absent(&self, id: i64, item: Item) -> bool {
        match self.items.entry(id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(item);
                true
            }
        }
    }

    /// 获取条目
    pub fn get(&self, id: i64) -> Option<Item> {
        self.items.get(&id).map(|entry| entry.value().clone())
    }

    /// 列出全部条目（按 ID 排序）
    pub fn list(&self) -> Vec<Item> {
        let mut entries: Vec<(i64, Item)> = self
            .items
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries.into_iter().map(|(_, item)| item).collect()
    }

    /// 替换已存在的条目，ID 不存在时返回 false
    pub fn replace(&self, id: i64, item: Item) -> bool {
        match self.items.get_mut(&id) {
            Some(mut existing) => {
                *existing = item;
                true
            }
            None => false,
        }
    }

    /// 删除条目并返回被删除的值
    pub fn remove(&self, id: i64) -> Option<Item> {
        self.items.remove(&id).map(|(_, item)| item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
