//! 配置管理模块
//!
//! 提供通知上下文的数据结构和验证功能

pub mod types;

// 重新导出主要类型
pub use types::{validate_config, BuildInfo, NotificationConfig, NotificationContext, RepoRef};
