//! URLチェッカー
//!
//! URLを1回チェックして稼働状況と所要時間を返す能力。
//!
//! - [`HttpChecker`]: 実際にHTTP GETを送信する本番実装
//! - [`MockChecker`]: 呼び出しを記録し、事前に設定した結果を返すテストダブル
//!
//! 接続失敗・タイムアウト・非200応答はエラーではなく `up = false` として返す。

pub mod http;
pub mod mock;

pub use http::HttpChecker;
pub use mock::{MockChecker, MockRequest, MockResponse};

use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// 1回のチェック結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CheckOutcome {
    /// URLが稼働しているか
    pub up: bool,
    /// チェックに要した時間
    pub duration: Duration,
}

impl CheckOutcome {
    /// 稼働中の結果
    pub fn up(duration: Duration) -> Self {
        Self { up: true, duration }
    }

    /// 停止中の結果
    pub fn down(duration: Duration) -> Self {
        Self {
            up: false,
            duration,
        }
    }
}

/// Whole milliseconds of `duration`, saturating at `u64::MAX`.
pub(crate) fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Something that can check a url, returning whether it is up or down and
/// how long it took.
///
/// Implementations must not panic on ordinary network failure, and must
/// return promptly once `cancel` is cancelled.
#[async_trait]
pub trait Checker: Send + Sync {
    /// URLをチェック
    async fn check(&self, cancel: &CancellationToken, url: &str) -> CheckOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturating_millis_keeps_small_values() {
        assert_eq!(saturating_millis(Duration::from_micros(12_900)), 12);
        assert_eq!(saturating_millis(Duration::ZERO), 0);
    }

    #[test]
    fn saturating_millis_does_not_wrap() {
        // Duration::MAX はu64ミリ秒に収まらない
        assert_eq!(saturating_millis(Duration::MAX), u64::MAX);
        let just_over = Duration::from_millis(u64::MAX) + Duration::from_millis(1);
        assert_eq!(saturating_millis(just_over), u64::MAX);
    }
}
