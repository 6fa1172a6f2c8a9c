//! Drone Slack - 构建通知插件
//!
//! 在CI流水线中运行，把一次构建的结果发送到Slack：
//! - 默认消息和状态颜色
//! - Handlebars自定义消息模板
//! - 多个webhook顺序投递，遇错即停
//! - `.Pipeline-Letter` 附信

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod notification;
pub mod plugin;

// 重新导出主要类型
pub use config::{BuildInfo, NotificationConfig, NotificationContext, RepoRef};
pub use error::PluginError;
pub use plugin::Plugin;

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
