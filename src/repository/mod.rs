//! 存储层

pub mod item_repo;

pub use item_repo::ItemRepository;
