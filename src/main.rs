//! Drone Slack 主程序入口
//!
//! 每个构建事件由CI调用一次

use anyhow::{Context, Result};
use clap::Parser;
use drone_slack::cli::Args;
use drone_slack::logging::{LogConfig, LoggingSystem};
use drone_slack::Plugin;
use std::time::Duration;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let args = load_args();

    // 初始化日志系统
    let log_config = LogConfig {
        level: args.log_level.clone().into(),
        json_format: args.log_json,
    };
    LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    info!("{} v{} 启动", drone_slack::APP_NAME, drone_slack::VERSION);

    if let Err(e) = run(args).await {
        error!("通知发送失败: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// 解析命令行参数，指定了env文件时加载后重新解析
fn load_args() -> Args {
    let args = Args::parse();

    match &args.env_file {
        Some(path) => {
            if let Err(e) = dotenvy::from_path(path) {
                // 日志系统尚未初始化
                eprintln!("加载env文件 {} 失败: {}", path.display(), e);
                return args;
            }
            Args::parse()
        }
        None => args,
    }
}

/// 执行插件
async fn run(args: Args) -> Result<()> {
    let timeout = Duration::from_secs(args.timeout);
    let context = args.into_context();
    if context.build.commit.is_empty() {
        warn!("未提供提交哈希");
    }

    let plugin = Plugin::from_context(context, timeout).context("创建插件失败")?;
    let report = plugin.exec().await.context("执行通知失败")?;

    info!(
        "通知完成: {} 个webhook, {} 条消息",
        report.endpoints, report.sent
    );
    Ok(())
}
