//! 条目服务库
//! 单用户认证（none / basic / token）保护的内存 CRUD 接口

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod telemetry;
