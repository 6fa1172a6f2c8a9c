//! 命令行参数定义
//!
//! 使用clap定义插件的命令行接口，每个参数都可以通过环境变量提供

use crate::config::{BuildInfo, NotificationConfig, NotificationContext, RepoRef};
use crate::notification::sender::DEFAULT_TIMEOUT_SECS;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// webhook地址的备用环境变量
pub const PLUGIN_WEBHOOK_ENV: &str = "PLUGIN_WEBHOOK";

/// Drone Slack 插件 - 把构建结果发送到Slack
#[derive(Parser, Debug, Clone)]
#[command(
    name = "drone-slack",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// Slack webhook地址，可重复或以逗号分隔
    #[arg(long = "webhook", value_name = "URL", env = "SLACK_WEBHOOK", value_delimiter = ',')]
    pub webhook: Vec<String>,

    /// Slack频道
    #[arg(long, env = "PLUGIN_CHANNEL", default_value = "")]
    pub channel: String,

    /// Slack接收用户
    #[arg(long, env = "PLUGIN_RECIPIENT", default_value = "")]
    pub recipient: String,

    /// 发送者名称
    #[arg(long, env = "PLUGIN_USERNAME", default_value = "drone")]
    pub username: String,

    /// 消息模板
    #[arg(long, env = "PLUGIN_TEMPLATE")]
    pub template: Option<String>,

    /// 附件图片地址
    #[arg(long = "image", value_name = "URL", env = "PLUGIN_IMAGE_URL")]
    pub image_url: Option<String>,

    /// 头像图片地址
    #[arg(long = "icon.url", value_name = "URL", env = "PLUGIN_ICON_URL")]
    pub icon_url: Option<String>,

    /// 头像emoji
    #[arg(long = "icon.emoji", env = "PLUGIN_ICON_EMOJI")]
    pub icon_emoji: Option<String>,

    /// 仓库所有者
    #[arg(long = "repo.owner", env = "DRONE_REPO_OWNER", default_value = "")]
    pub repo_owner: String,

    /// 仓库名称
    #[arg(long = "repo.name", env = "DRONE_REPO_NAME", default_value = "")]
    pub repo_name: String,

    /// 提交哈希
    #[arg(long = "commit.sha", env = "DRONE_COMMIT_SHA", default_value = "")]
    pub commit_sha: String,

    /// 提交分支
    #[arg(long = "commit.branch", env = "DRONE_COMMIT_BRANCH", default_value = "master")]
    pub commit_branch: String,

    /// 提交作者
    #[arg(long = "commit.author", env = "DRONE_COMMIT_AUTHOR", default_value = "")]
    pub commit_author: String,

    /// 构建事件
    #[arg(long = "build.event", env = "DRONE_BUILD_EVENT", default_value = "push")]
    pub build_event: String,

    /// 构建编号
    #[arg(long = "build.number", env = "DRONE_BUILD_NUMBER", default_value_t = 0)]
    pub build_number: i64,

    /// 构建状态
    #[arg(long = "build.status", env = "DRONE_BUILD_STATUS", default_value = "success")]
    pub build_status: String,

    /// 构建链接
    #[arg(long = "build.link", env = "DRONE_BUILD_LINK", default_value = "")]
    pub build_link: String,

    /// 预先加载的env文件
    #[arg(long = "env-file", value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// 是否处理 .Pipeline-Letter 附信
    #[arg(
        long,
        env = "PLUGIN_LETTER",
        action = ArgAction::Set,
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub letter: bool,

    /// 日志级别
    #[arg(long, value_enum, env = "PLUGIN_LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// 输出JSON格式日志
    #[arg(long, env = "PLUGIN_LOG_JSON")]
    pub log_json: bool,

    /// 单次请求超时时间（秒）
    #[arg(
        long,
        value_name = "SECONDS",
        env = "PLUGIN_TIMEOUT",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub timeout: u64,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

/// 空字符串视为未设置
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Args {
    /// webhook地址列表
    ///
    /// `--webhook`/`SLACK_WEBHOOK` 未提供时回退到 `PLUGIN_WEBHOOK`。
    pub fn webhooks(&self) -> Vec<String> {
        let webhooks = if self.webhook.is_empty() {
            std::env::var(PLUGIN_WEBHOOK_ENV)
                .map(|value| value.split(',').map(str::to_string).collect())
                .unwrap_or_default()
        } else {
            self.webhook.clone()
        };

        webhooks
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect()
    }

    /// 转换为通知上下文
    pub fn into_context(self) -> NotificationContext {
        let endpoints = self.webhooks();

        NotificationContext {
            repo: RepoRef {
                owner: self.repo_owner,
                name: self.repo_name,
            },
            build: BuildInfo {
                event: self.build_event,
                number: self.build_number,
                commit: self.commit_sha,
                branch: self.commit_branch,
                author: self.commit_author,
                status: self.build_status,
                link: self.build_link,
            },
            config: NotificationConfig {
                endpoints,
                channel: self.channel,
                recipient: self.recipient,
                username: self.username,
                template: non_empty(self.template),
                image_url: non_empty(self.image_url),
                icon_url: non_empty(self.icon_url),
                icon_emoji: non_empty(self.icon_emoji),
                letter_enabled: self.letter,
            },
        }
    }
}
