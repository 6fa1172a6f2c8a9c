//! Slack webhook发送器模块
//!
//! 定义webhook投递的trait和基于reqwest的实现

use crate::error::DeliveryError;
use crate::notification::payload::Payload;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

/// 默认请求超时时间（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// webhook客户端trait
#[async_trait]
pub trait WebhookClient: Send + Sync {
    /// 向webhook投递一条消息
    ///
    /// # 参数
    /// * `endpoint` - webhook地址
    /// * `payload` - 消息体
    ///
    /// # 返回
    /// * `Result<(), DeliveryError>` - 投递结果
    async fn post(&self, endpoint: &str, payload: &Payload) -> Result<(), DeliveryError>;
}

/// Slack incoming webhook客户端
pub struct SlackWebhookClient {
    /// HTTP客户端
    client: Client,
}

impl SlackWebhookClient {
    /// 创建新的webhook客户端
    ///
    /// # 参数
    /// * `timeout` - 单次请求超时时间
    pub fn new(timeout: Duration) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DeliveryError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl WebhookClient for SlackWebhookClient {
    async fn post(&self, endpoint: &str, payload: &Payload) -> Result<(), DeliveryError> {
        debug!("发送消息到Slack webhook: {}", endpoint);

        let response = self
            .client
            .post(endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|source| DeliveryError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            error!("Slack消息发送失败: {} - {}", status, body);
            Err(DeliveryError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            })
        }
    }
}
