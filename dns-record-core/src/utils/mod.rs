//! 工具模块

pub mod dns_names;
pub mod item_log;
