//! 消息体构建模块
//!
//! 构建Slack webhook消息体：主消息，以及可选的 `.Pipeline-Letter` 附信

use crate::config::{NotificationConfig, NotificationContext};
use crate::error::TemplateError;
use crate::notification::formatter::{default_fallback, default_message, status_color, Color};
use crate::notification::template::TemplateRenderer;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 附信文件名
pub const LETTER_FILE: &str = ".Pipeline-Letter";

/// 消息附件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// 附件正文（mrkdwn）
    pub text: String,
    /// 纯文本回退内容
    pub fallback: String,
    /// 侧边颜色
    pub color: Color,
    /// 按mrkdwn渲染的字段
    pub mrkdwn_in: Vec<String>,
    /// 附件图片
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// webhook消息体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// 发送者名称
    pub username: String,
    /// 频道（`#channel`）或用户（`@user`）
    pub channel: String,
    /// 头像图片
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// 头像emoji
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
    /// 顶层文本，仅附信使用
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// 附件列表
    pub attachments: Vec<Attachment>,
}

/// 一次运行要投递的消息体
#[derive(Debug, Clone, PartialEq)]
pub struct Payloads {
    /// 主消息
    pub primary: Payload,
    /// 附信，存在时在主消息之前投递
    pub letter: Option<Payload>,
}

impl Payloads {
    /// 本次运行是否投递附信
    pub fn letter_active(&self) -> bool {
        self.letter.is_some()
    }
}

/// 附信内容来源
pub trait LetterSource: Send + Sync {
    /// 读取附信内容，不存在或不可读时返回 `None`
    fn read_letter(&self) -> Option<String>;
}

/// 从本地文件读取附信
#[derive(Debug, Clone)]
pub struct FileLetterSource {
    path: PathBuf,
}

impl FileLetterSource {
    /// 使用指定路径创建
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileLetterSource {
    fn default() -> Self {
        Self::new(LETTER_FILE)
    }
}

impl LetterSource for FileLetterSource {
    fn read_letter(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Some(content),
            Err(e) => {
                debug!("未读取到附信 {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

/// 不提供附信的来源
pub struct NoLetter;

impl LetterSource for NoLetter {
    fn read_letter(&self) -> Option<String> {
        None
    }
}

/// 给字符串加上前缀，已有前缀时不重复添加
pub fn prepend(prefix: &str, s: &str) -> String {
    if s.starts_with(prefix) {
        s.to_string()
    } else {
        format!("{prefix}{s}")
    }
}

/// 计算投递目标：recipient 非空时为 `@recipient`，否则为 `#channel`
pub fn addressing_target(config: &NotificationConfig) -> String {
    if config.recipient.is_empty() {
        prepend("#", &config.channel)
    } else {
        prepend("@", &config.recipient)
    }
}

/// 消息体构建器
pub struct PayloadBuilder<'a> {
    context: &'a NotificationContext,
}

impl<'a> PayloadBuilder<'a> {
    /// 创建构建器
    pub fn new(context: &'a NotificationContext) -> Self {
        Self { context }
    }

    /// 主消息正文：配置了模板时使用模板渲染结果，否则使用默认消息
    fn message_text(&self) -> Result<String, TemplateError> {
        match self.context.config.template.as_deref() {
            Some(template) => {
                debug!("使用自定义模板渲染消息");
                TemplateRenderer::new(template)?.render(self.context)
            }
            None => Ok(default_message(&self.context.repo, &self.context.build)),
        }
    }

    /// 构建主附件
    pub fn attachment(&self) -> Result<Attachment, TemplateError> {
        let NotificationContext { repo, build, config } = self.context;

        Ok(Attachment {
            text: self.message_text()?,
            fallback: default_fallback(repo, build),
            color: status_color(&build.status),
            mrkdwn_in: vec!["text".to_string(), "fallback".to_string()],
            image_url: config.image_url.clone(),
        })
    }

    /// 构建主消息
    pub fn primary(&self) -> Result<Payload, TemplateError> {
        let config = &self.context.config;
        // 只有一个头像位，同时配置时图片优先
        let (icon_url, icon_emoji) = match (&config.icon_url, &config.icon_emoji) {
            (Some(url), _) => (Some(url.clone()), None),
            (None, emoji) => (None, emoji.clone()),
        };

        Ok(Payload {
            username: config.username.clone(),
            channel: addressing_target(config),
            icon_url,
            icon_emoji,
            text: None,
            attachments: vec![self.attachment()?],
        })
    }

    /// 构建附信：沿用主消息的发送者、头像、目标和附件，顶层文本为附信内容
    pub fn letter(&self, primary: &Payload, source: &dyn LetterSource) -> Option<Payload> {
        if !self.context.config.letter_enabled {
            return None;
        }

        let content = source.read_letter()?;
        info!("检测到附信，将在主消息之前投递");

        Some(Payload {
            text: Some(content),
            ..primary.clone()
        })
    }

    /// 构建本次运行的全部消息体
    pub fn build(&self, source: &dyn LetterSource) -> Result<Payloads, TemplateError> {
        let primary = self.primary()?;
        let letter = self.letter(&primary, source);
        Ok(Payloads { primary, letter })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildInfo, RepoRef};
    use std::io::Write;
    use tempfile::NamedTempFile;

    struct StaticLetter(&'static str);

    impl LetterSource for StaticLetter {
        fn read_letter(&self) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn create_test_context() -> NotificationContext {
        NotificationContext {
            repo: RepoRef {
                owner: "acme".to_string(),
                name: "widgets".to_string(),
            },
            build: BuildInfo {
                status: "success".to_string(),
                commit: "abcdef1234".to_string(),
                branch: "main".to_string(),
                author: "jane".to_string(),
                link: "http://ci/42".to_string(),
                ..Default::default()
            },
            config: NotificationConfig {
                endpoints: vec!["http://hooks/a".to_string()],
                channel: "general".to_string(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_prepend_idempotent() {
        assert_eq!(prepend("#", "#general"), "#general");
        assert_eq!(prepend("#", "general"), "#general");
        assert_eq!(prepend("@", "jane"), "@jane");
    }

    #[test]
    fn test_recipient_takes_priority() {
        let mut config = NotificationConfig {
            channel: "general".to_string(),
            recipient: "jane".to_string(),
            ..Default::default()
        };
        assert_eq!(addressing_target(&config), "@jane");

        config.recipient.clear();
        assert_eq!(addressing_target(&config), "#general");

        config.channel.clear();
        assert_eq!(addressing_target(&config), "#");
    }

    #[test]
    fn test_empty_addressing_keeps_channel_field() {
        let context = NotificationContext::default();
        let payloads = PayloadBuilder::new(&context).build(&NoLetter).unwrap();

        let value = serde_json::to_value(&payloads.primary).unwrap();
        assert_eq!(value["channel"], "#");
    }

    #[test]
    fn test_primary_payload() {
        let context = create_test_context();
        let payload = PayloadBuilder::new(&context).primary().unwrap();

        assert_eq!(payload.username, "drone");
        assert_eq!(payload.channel, "#general");
        assert!(payload.text.is_none());
        assert_eq!(payload.attachments.len(), 1);

        let attachment = &payload.attachments[0];
        assert_eq!(
            attachment.text,
            "*success* <http://ci/42|acme/widgets#abcdef12> (main) by jane"
        );
        assert_eq!(attachment.fallback, "success acme/widgets#abcdef12 (main) by jane");
        assert_eq!(attachment.color, Color::Good);
        assert_eq!(attachment.mrkdwn_in, vec!["text", "fallback"]);
    }

    #[test]
    fn test_template_overrides_text_only() {
        let mut context = create_test_context();
        context.config.template = Some("\n build {{build.status}} \n".to_string());

        let attachment = PayloadBuilder::new(&context).attachment().unwrap();
        assert_eq!(attachment.text, "build success");
        assert_eq!(attachment.fallback, "success acme/widgets#abcdef12 (main) by jane");
    }

    #[test]
    fn test_template_error_propagates() {
        let mut context = create_test_context();
        context.config.template = Some("{{build.missing}}".to_string());

        let result = PayloadBuilder::new(&context).build(&NoLetter);
        assert!(result.is_err());
    }

    #[test]
    fn test_icon_url_takes_precedence() {
        let mut context = create_test_context();
        context.config.icon_url = Some("http://img/icon.png".to_string());
        context.config.icon_emoji = Some(":robot_face:".to_string());

        let payload = PayloadBuilder::new(&context).primary().unwrap();
        assert_eq!(payload.icon_url.as_deref(), Some("http://img/icon.png"));
        assert!(payload.icon_emoji.is_none());

        context.config.icon_url = None;
        let payload = PayloadBuilder::new(&context).primary().unwrap();
        assert_eq!(payload.icon_emoji.as_deref(), Some(":robot_face:"));
    }

    #[test]
    fn test_payload_wire_format() {
        let mut context = create_test_context();
        context.config.image_url = Some("http://img/build.png".to_string());

        let payload = PayloadBuilder::new(&context).primary().unwrap();
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["username"], "drone");
        assert_eq!(value["channel"], "#general");
        assert!(value.get("icon_url").is_none());
        assert!(value.get("text").is_none());
        assert_eq!(value["attachments"][0]["color"], "good");
        assert_eq!(
            value["attachments"][0]["mrkdwn_in"],
            serde_json::json!(["text", "fallback"])
        );
        assert_eq!(value["attachments"][0]["image_url"], "http://img/build.png");
    }

    #[test]
    fn test_letter_payload() {
        let context = create_test_context();
        let payloads = PayloadBuilder::new(&context)
            .build(&StaticLetter("hello"))
            .unwrap();

        assert!(payloads.letter_active());
        let letter = payloads.letter.unwrap();
        assert_eq!(letter.text.as_deref(), Some("hello"));
        assert_eq!(letter.username, payloads.primary.username);
        assert_eq!(letter.channel, payloads.primary.channel);
        assert_eq!(letter.attachments, payloads.primary.attachments);
    }

    #[test]
    fn test_letter_disabled() {
        let mut context = create_test_context();
        context.config.letter_enabled = false;

        let payloads = PayloadBuilder::new(&context)
            .build(&StaticLetter("hello"))
            .unwrap();
        assert!(!payloads.letter_active());
    }

    #[test]
    fn test_file_letter_source() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "release notes").unwrap();

        let source = FileLetterSource::new(file.path());
        assert_eq!(source.read_letter().as_deref(), Some("release notes"));
    }

    #[test]
    fn test_file_letter_source_missing() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileLetterSource::new(dir.path().join(LETTER_FILE));
        assert!(source.read_letter().is_none());
    }
}
