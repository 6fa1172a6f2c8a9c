//! 错误处理模块
//!
//! 定义插件的统一错误类型

use thiserror::Error;

/// 插件运行的主要错误类型
#[derive(Error, Debug)]
pub enum PluginError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 模板渲染错误
    #[error("模板错误: {0}")]
    Template(#[from] TemplateError),

    /// 投递错误
    #[error("投递错误: {0}")]
    Delivery(#[from] DeliveryError),
}

/// 配置错误类型
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// webhook地址无效
    #[error("无效的webhook地址: {url}")]
    InvalidWebhook { url: String },
}

/// 格式化错误类型
#[derive(Error, Debug, PartialEq)]
pub enum FormatError {
    /// 提交哈希长度不足
    #[error("提交哈希过短: {commit:?} 少于 {expected} 个字符")]
    Truncation { commit: String, expected: usize },
}

/// 模板错误类型
#[derive(Error, Debug)]
pub enum TemplateError {
    /// 模板语法错误
    #[error("模板语法错误: {0}")]
    Syntax(#[from] Box<handlebars::TemplateError>),

    /// 模板渲染失败（字段未定义等）
    #[error("模板渲染失败: {0}")]
    Render(#[from] Box<handlebars::RenderError>),
}

/// 投递错误类型
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// HTTP请求错误
    #[error("请求 {endpoint} 失败: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 服务端返回非成功状态码
    #[error("{endpoint} 返回状态码 {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// HTTP客户端构建失败
    #[error("创建HTTP客户端失败: {0}")]
    Client(String),
}

impl DeliveryError {
    /// 获取出错的webhook地址
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            DeliveryError::Request { endpoint, .. } | DeliveryError::Status { endpoint, .. } => {
                Some(endpoint)
            }
            DeliveryError::Client(_) => None,
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, PluginError>;

#[cfg(test)]
mod tests {
    use super::*;

    /// 每个变体都对应一个运行阶段
    fn stage(error: &PluginError) -> &'static str {
        match error {
            PluginError::Config(_) => "config",
            PluginError::Template(_) => "template",
            PluginError::Delivery(_) => "delivery",
        }
    }

    #[test]
    fn test_plugin_error_variants() {
        let config: PluginError = ConfigError::InvalidWebhook {
            url: "ftp://x".to_string(),
        }
        .into();
        assert_eq!(stage(&config), "config");
        assert!(config.to_string().contains("ftp://x"));

        let delivery: PluginError = DeliveryError::Status {
            endpoint: "http://hooks/a".to_string(),
            status: 404,
            body: "no_service".to_string(),
        }
        .into();
        assert_eq!(stage(&delivery), "delivery");
        assert!(delivery.to_string().contains("404"));

        let render_error = handlebars::Handlebars::new()
            .render_template("{{build.status", &())
            .unwrap_err();
        let template: PluginError = TemplateError::Render(Box::new(render_error)).into();
        assert_eq!(stage(&template), "template");
    }

    #[test]
    fn test_delivery_error_endpoint() {
        let error = DeliveryError::Client("tls".to_string());
        assert!(error.endpoint().is_none());
    }
}
