//! 消息分发模块
//!
//! 按配置顺序把消息投递到每个webhook，遇到第一个失败立即停止

use crate::error::DeliveryError;
use crate::notification::payload::Payloads;
use crate::notification::sender::WebhookClient;
use tracing::{debug, info};

/// 分发结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// 投递成功的webhook数
    pub endpoints: usize,
    /// 投递成功的消息数
    pub sent: usize,
}

/// 消息分发器
///
/// 严格顺序执行：上一个webhook（含附信）完成后才开始下一个。不重试。
pub struct Dispatcher<'a> {
    client: &'a dyn WebhookClient,
}

impl<'a> Dispatcher<'a> {
    /// 创建分发器
    pub fn new(client: &'a dyn WebhookClient) -> Self {
        Self { client }
    }

    /// 投递到所有webhook
    ///
    /// # 参数
    /// * `endpoints` - webhook地址，按顺序投递
    /// * `payloads` - 已构建好的消息体
    ///
    /// # 返回
    /// * `Result<DispatchReport, DeliveryError>` - 第一个投递错误
    pub async fn dispatch(
        &self,
        endpoints: &[String],
        payloads: &Payloads,
    ) -> Result<DispatchReport, DeliveryError> {
        let mut report = DispatchReport::default();

        for (index, endpoint) in endpoints.iter().enumerate() {
            if let Some(letter) = &payloads.letter {
                debug!(endpoint = index, "投递附信");
                self.client.post(endpoint, letter).await?;
                report.sent += 1;
            }

            debug!(endpoint = index, "投递主消息");
            self.client.post(endpoint, &payloads.primary).await?;
            report.sent += 1;
            report.endpoints += 1;
        }

        info!(
            "消息投递完成: {} 个webhook, {} 条消息",
            report.endpoints, report.sent
        );
        Ok(report)
    }
}
