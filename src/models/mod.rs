//! 数据模型模块
//! 静态用户、登录表单与资源条目

pub mod auth;
pub mod item;
pub mod user;
