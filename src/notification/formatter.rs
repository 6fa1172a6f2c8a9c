//! 默认消息格式化模块
//!
//! 根据仓库和构建信息生成默认消息、纯文本回退消息和状态颜色

use crate::config::{BuildInfo, RepoRef};
use crate::error::FormatError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// 短哈希长度
pub const SHORT_COMMIT_LEN: usize = 8;

/// 附件颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// 绿色
    Good,
    /// 黄色
    Warning,
    /// 红色
    Danger,
}

impl Color {
    /// 颜色的线上表示
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Good => "good",
            Color::Warning => "warning",
            Color::Danger => "danger",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 截取提交哈希的前8个字符
///
/// 不足8个字符时返回 `FormatError::Truncation`。
pub fn short_commit(commit: &str) -> Result<&str, FormatError> {
    match commit.char_indices().nth(SHORT_COMMIT_LEN) {
        Some((idx, _)) => Ok(&commit[..idx]),
        None if commit.chars().count() == SHORT_COMMIT_LEN => Ok(commit),
        None => Err(FormatError::Truncation {
            commit: commit.to_string(),
            expected: SHORT_COMMIT_LEN,
        }),
    }
}

/// 短哈希过短时原样使用，只记录警告
fn short_commit_or_whole(commit: &str) -> &str {
    short_commit(commit).unwrap_or_else(|e| {
        warn!("{}，使用完整哈希", e);
        commit
    })
}

/// 生成默认消息（Slack mrkdwn）
pub fn default_message(repo: &RepoRef, build: &BuildInfo) -> String {
    format!(
        "*{}* <{}|{}/{}#{}> ({}) by {}",
        build.status,
        build.link,
        repo.owner,
        repo.name,
        short_commit_or_whole(&build.commit),
        build.branch,
        build.author,
    )
}

/// 生成不含标记的回退消息
pub fn default_fallback(repo: &RepoRef, build: &BuildInfo) -> String {
    format!(
        "{} {}/{}#{} ({}) by {}",
        build.status,
        repo.owner,
        repo.name,
        short_commit_or_whole(&build.commit),
        build.branch,
        build.author,
    )
}

/// 构建状态到颜色的映射，未知状态一律为 warning
pub fn status_color(status: &str) -> Color {
    match status {
        "success" => Color::Good,
        "failure" | "error" | "killed" => Color::Danger,
        _ => Color::Warning,
    }
}
