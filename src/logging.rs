//! 日志系统模块
//!
//! 提供结构化日志配置和初始化功能

use log::LevelFilter;
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter, Layer};

/// 全局日志是否已初始化
static LOGGING_INITIALIZED: OnceLock<Mutex<bool>> = OnceLock::new();

/// 日志配置结构
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志级别，设置了 `RUST_LOG` 时以环境变量为准
    pub level: LevelFilter,
    /// 是否使用JSON格式
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            json_format: false,
        }
    }
}

/// 日志系统管理器
pub struct LoggingSystem;

impl LoggingSystem {
    /// 初始化日志系统
    ///
    /// 重复调用不会重复安装subscriber。
    ///
    /// # 参数
    /// * `config` - 日志配置
    pub fn setup_logging(config: LogConfig) -> anyhow::Result<()> {
        let state = LOGGING_INITIALIZED.get_or_init(|| Mutex::new(false));
        let mut initialized = state
            .lock()
            .map_err(|e| anyhow::anyhow!("日志状态锁获取失败: {}", e))?;

        if !*initialized {
            Self::init_log_tracer()?;
            Self::init_tracing_subscriber(&config)?;
            *initialized = true;
        }

        Ok(())
    }

    /// 初始化 LogTracer（log crate 到 tracing 的桥接）
    fn init_log_tracer() -> anyhow::Result<()> {
        use tracing_log::LogTracer;

        match LogTracer::init() {
            Ok(()) => Ok(()),
            // 测试中其他模块可能已安装全局logger
            Err(e) if e.to_string().contains("already") => Ok(()),
            Err(e) => Err(anyhow::anyhow!("LogTracer初始化失败: {}", e)),
        }
    }

    /// 构建过滤器：`RUST_LOG` 有效时优先，否则使用配置的级别
    fn build_env_filter(level: LevelFilter, rust_log: Option<&str>) -> EnvFilter {
        rust_log
            .filter(|directives| !directives.trim().is_empty())
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new(Self::level_to_string(level)))
    }

    /// 初始化 tracing subscriber
    fn init_tracing_subscriber(config: &LogConfig) -> anyhow::Result<()> {
        let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let env_filter = Self::build_env_filter(config.level, rust_log.as_deref());

        let fmt_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_timer(fmt::time::ChronoUtc::rfc_3339())
                .with_target(true)
                .boxed()
        } else {
            fmt::layer()
                .with_timer(fmt::time::ChronoUtc::rfc_3339())
                .with_ansi(true)
                .with_target(false)
                .boxed()
        };

        match registry().with(env_filter).with(fmt_layer).try_init() {
            Ok(()) => {
                tracing::debug!("日志配置: {:?}", config);
                Ok(())
            }
            Err(e) => {
                let error_msg = e.to_string();
                if error_msg.contains("already been set")
                    || error_msg.contains("already initialized")
                {
                    tracing::debug!("日志系统已经初始化过了");
                    Ok(())
                } else {
                    Err(anyhow::anyhow!(
                        "tracing subscriber初始化失败: {}",
                        error_msg
                    ))
                }
            }
        }
    }

    /// 将 log::LevelFilter 转换为字符串
    fn level_to_string(level: LevelFilter) -> &'static str {
        match level {
            LevelFilter::Off => "off",
            LevelFilter::Error => "error",
            LevelFilter::Warn => "warn",
            LevelFilter::Info => "info",
            LevelFilter::Debug => "debug",
            LevelFilter::Trace => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter as TracingLevel;

    #[test]
    fn test_logging_system_repeated_initialization() {
        assert!(LoggingSystem::setup_logging(LogConfig::default()).is_ok());

        // 第二次初始化不会重复安装subscriber，也不会报错
        let json_config = LogConfig {
            level: LevelFilter::Debug,
            json_format: true,
        };
        assert!(LoggingSystem::setup_logging(json_config).is_ok());
    }

    #[test]
    fn test_rust_log_overrides_configured_level() {
        let filter = LoggingSystem::build_env_filter(LevelFilter::Info, Some("debug"));
        assert_eq!(filter.max_level_hint(), Some(TracingLevel::DEBUG));
    }

    #[test]
    fn test_configured_level_without_rust_log() {
        let filter = LoggingSystem::build_env_filter(LevelFilter::Warn, None);
        assert_eq!(filter.max_level_hint(), Some(TracingLevel::WARN));

        let filter = LoggingSystem::build_env_filter(LevelFilter::Error, Some("  "));
        assert_eq!(filter.max_level_hint(), Some(TracingLevel::ERROR));
    }

    #[test]
    fn test_invalid_rust_log_falls_back_to_configured_level() {
        let filter = LoggingSystem::build_env_filter(LevelFilter::Warn, Some("drone_slack=loud"));
        assert_eq!(filter.max_level_hint(), Some(TracingLevel::WARN));
    }

    #[test]
    fn test_level_conversion() {
        assert_eq!(LoggingSystem::level_to_string(LevelFilter::Warn), "warn");
        assert_eq!(LoggingSystem::level_to_string(LevelFilter::Off), "off");
    }
}
