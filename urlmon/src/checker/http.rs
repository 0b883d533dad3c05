//! HTTPチェッカー
//!
//! GETリクエストを送信し、`200 OK` のときのみ稼働中と判定する。

use super::{CheckOutcome, Checker};
use crate::error::MonitorResult;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// デフォルトのリクエストタイムアウト
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// 実際にURLへ接続してチェックするチェッカー
#[derive(Debug, Clone)]
pub struct HttpChecker {
    client: Client,
}

impl HttpChecker {
    /// 新しいHTTPチェッカーを作成
    pub fn new(timeout: Duration) -> MonitorResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// 既存のクライアントを共有して作成
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn probe(&self, url: &str) -> Result<StatusCode, reqwest::Error> {
        let response = self.client.get(url).send().await?;
        Ok(response.status())
    }
}

#[async_trait]
impl Checker for HttpChecker {
    async fn check(&self, cancel: &CancellationToken, url: &str) -> CheckOutcome {
        let start = Instant::now();

        let up = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(url, "check cancelled");
                false
            }
            result = self.probe(url) => match result {
                Ok(status) => status == StatusCode::OK,
                Err(e) => {
                    debug!(url, error = %e, "check request failed");
                    false
                }
            },
        };

        let outcome = CheckOutcome {
            up,
            duration: start.elapsed(),
        };
        debug!(
            url,
            up = outcome.up,
            duration_ms = super::saturating_millis(outcome.duration),
            "checked url"
        );
        outcome
    }
}
