//! 插件执行模块
//!
//! 串联配置验证、消息构建和webhook分发，一次构建事件执行一次

use crate::config::{validate_config, NotificationContext};
use crate::error::Result;
use crate::notification::{
    DispatchReport, Dispatcher, FileLetterSource, LetterSource, PayloadBuilder,
    SlackWebhookClient, WebhookClient,
};
use std::time::Duration;
use tracing::{info, warn};

/// Slack通知插件
pub struct Plugin {
    /// 通知上下文
    context: NotificationContext,
    /// webhook客户端
    client: Box<dyn WebhookClient>,
    /// 附信来源
    letters: Box<dyn LetterSource>,
}

impl Plugin {
    /// 使用自定义的客户端和附信来源创建插件
    pub fn new(
        context: NotificationContext,
        client: Box<dyn WebhookClient>,
        letters: Box<dyn LetterSource>,
    ) -> Self {
        Self {
            context,
            client,
            letters,
        }
    }

    /// 使用Slack webhook客户端和工作目录下的附信文件创建插件
    ///
    /// # 参数
    /// * `context` - 通知上下文
    /// * `timeout` - 单次请求超时时间
    pub fn from_context(context: NotificationContext, timeout: Duration) -> Result<Self> {
        let client = SlackWebhookClient::new(timeout)?;
        Ok(Self::new(
            context,
            Box::new(client),
            Box::new(FileLetterSource::default()),
        ))
    }

    /// 通知上下文
    pub fn context(&self) -> &NotificationContext {
        &self.context
    }

    /// 执行通知
    ///
    /// 模板错误在任何网络请求之前返回；投递遇到第一个错误即停止。
    pub async fn exec(&self) -> Result<DispatchReport> {
        validate_config(&self.context)?;

        let payloads = PayloadBuilder::new(&self.context).build(self.letters.as_ref())?;

        let endpoints = &self.context.config.endpoints;
        if endpoints.is_empty() {
            warn!("未配置webhook地址，不发送任何消息");
        } else {
            info!(
                "开始投递 {}/{} #{} 的构建通知到 {} 个webhook",
                self.context.repo.owner,
                self.context.repo.name,
                self.context.build.number,
                endpoints.len()
            );
        }

        let report = Dispatcher::new(self.client.as_ref())
            .dispatch(endpoints, &payloads)
            .await?;
        Ok(report)
    }
}
