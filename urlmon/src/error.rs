//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! チェック対象URLのダウンやタイムアウトはエラーではなく、
//! `up = false` の結果として扱われる。ここに並ぶのは起動・設定・
//! 周辺コンポーネントの失敗のみ。

use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// urlmon error type
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Invalid engine configuration (worker count, check period)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The monitor is single-use and has already been started
    #[error("Monitor has already been started")]
    AlreadyStarted,

    /// Failed to bind the HTTP listener
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        /// Requested listen address
        addr: SocketAddr,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// HTTP server task error
    #[error("HTTP server error: {0}")]
    Server(#[from] std::io::Error),

    /// HTTP server did not finish graceful shutdown in time
    #[error("HTTP server shutdown timed out after {0:?}")]
    ShutdownTimeout(Duration),

    /// Metrics registration or encoding error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// urlmon result type
pub type MonitorResult<T> = Result<T, MonitorError>;
