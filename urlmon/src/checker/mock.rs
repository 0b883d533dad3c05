//! テスト用チェッカー
//!
//! ネットワークに接続せず、URLごとに設定した結果を返す。
//! すべての呼び出しを記録するため、呼び出し回数の検証に使える。

use super::{CheckOutcome, Checker};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// URLごとの応答設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MockResponse {
    /// 返す稼働状況
    pub up: bool,
    /// 返す所要時間（`wait`有効時は実際に待機する）
    pub duration: Duration,
}

/// 記録された呼び出し
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRequest {
    /// 呼び出し時刻
    pub time: Instant,
    /// チェック対象URL
    pub url: String,
}

/// Checker test double that records invocations.
#[derive(Debug, Default)]
pub struct MockChecker {
    wait: bool,
    default_response: MockResponse,
    responses: HashMap<String, MockResponse>,
    requests: Mutex<Vec<MockRequest>>,
}

impl MockChecker {
    /// 常に`down`・所要時間0を返すチェッカーを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// `true`の場合、応答の`duration`だけ実際に待機する
    pub fn with_wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    /// 個別設定のないURLに返す応答
    pub fn with_default_response(mut self, response: MockResponse) -> Self {
        self.default_response = response;
        self
    }

    /// 特定URLの応答を設定
    pub fn with_response(mut self, url: impl Into<String>, response: MockResponse) -> Self {
        self.responses.insert(url.into(), response);
        self
    }

    /// これまでの呼び出し回数
    pub fn request_count(&self) -> usize {
        self.lock_requests().len()
    }

    /// これまでの呼び出し履歴
    pub fn requests(&self) -> Vec<MockRequest> {
        self.lock_requests().clone()
    }

    fn lock_requests(&self) -> MutexGuard<'_, Vec<MockRequest>> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Checker for MockChecker {
    async fn check(&self, cancel: &CancellationToken, url: &str) -> CheckOutcome {
        self.lock_requests().push(MockRequest {
            time: Instant::now(),
            url: url.to_string(),
        });
        debug!(url, "mock check");

        let response = self
            .responses
            .get(url)
            .copied()
            .unwrap_or(self.default_response);

        if self.wait {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return CheckOutcome::down(Duration::ZERO),
                _ = tokio::time::sleep(response.duration) => {}
            }
        }

        CheckOutcome {
            up: response.up,
            duration: response.duration,
        }
    }
}
