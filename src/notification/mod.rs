//! 通知模块
//!
//! 提供消息格式化、模板渲染、消息体构建和webhook分发功能

pub mod dispatcher;
pub mod formatter;
pub mod payload;
pub mod sender;
pub mod template;

// 重新导出主要类型
pub use dispatcher::{DispatchReport, Dispatcher};
pub use formatter::{default_fallback, default_message, status_color, Color};
pub use payload::{
    Attachment, FileLetterSource, LetterSource, NoLetter, Payload, PayloadBuilder, Payloads,
};
pub use sender::{SlackWebhookClient, WebhookClient};
pub use template::TemplateRenderer;
