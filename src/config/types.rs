//! 配置数据结构定义
//!
//! 定义构建通知的上下文结构体和验证逻辑

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// 代码仓库标识
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RepoRef {
    /// 仓库所有者
    pub owner: String,
    /// 仓库名称
    pub name: String,
}

/// 一次构建的元数据
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildInfo {
    /// 触发事件（push、pull_request、tag ...）
    #[serde(default = "default_event")]
    pub event: String,
    /// 构建编号
    #[serde(default)]
    pub number: i64,
    /// 提交哈希
    pub commit: String,
    /// 分支
    #[serde(default = "default_branch")]
    pub branch: String,
    /// 提交作者
    pub author: String,
    /// 构建状态
    #[serde(default = "default_status")]
    pub status: String,
    /// 构建详情链接
    pub link: String,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            event: default_event(),
            number: 0,
            commit: String::new(),
            branch: default_branch(),
            author: String::new(),
            status: default_status(),
            link: String::new(),
        }
    }
}

/// 通知配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationConfig {
    /// webhook地址列表，按顺序投递
    #[serde(default)]
    pub endpoints: Vec<String>,
    /// 目标频道
    #[serde(default)]
    pub channel: String,
    /// 目标用户，非空时优先于频道
    #[serde(default)]
    pub recipient: String,
    /// 发送者名称
    #[serde(default = "default_username")]
    pub username: String,
    /// 自定义消息模板
    pub template: Option<String>,
    /// 附件图片地址
    pub image_url: Option<String>,
    /// 头像图片地址
    pub icon_url: Option<String>,
    /// 头像emoji
    pub icon_emoji: Option<String>,
    /// 是否处理 `.Pipeline-Letter` 附信
    #[serde(default = "default_letter")]
    pub letter_enabled: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            endpoints: Vec::new(),
            channel: String::new(),
            recipient: String::new(),
            username: default_username(),
            template: None,
            image_url: None,
            icon_url: None,
            icon_emoji: None,
            letter_enabled: default_letter(),
        }
    }
}

/// 通知上下文，一次运行只构建一次，之后只读
///
/// 序列化后即模板可见的数据：`repo.*`、`build.*`、`config.*`。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NotificationContext {
    /// 仓库信息
    pub repo: RepoRef,
    /// 构建信息
    pub build: BuildInfo,
    /// 通知配置
    pub config: NotificationConfig,
}

// 默认值函数
fn default_event() -> String {
    "push".to_string()
}
fn default_branch() -> String {
    "master".to_string()
}
fn default_status() -> String {
    "success".to_string()
}
fn default_username() -> String {
    "drone".to_string()
}
fn default_letter() -> bool {
    true
}

/// 配置验证函数
///
/// # 参数
/// * `context` - 要验证的通知上下文
///
/// # 返回
/// * `Result<(), ConfigError>` - 验证结果
pub fn validate_config(context: &NotificationContext) -> Result<(), ConfigError> {
    let config = &context.config;

    for endpoint in &config.endpoints {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidWebhook {
                url: endpoint.clone(),
            });
        }
    }

    Ok(())
}
