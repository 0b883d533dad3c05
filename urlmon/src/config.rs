//! Configuration values
//!
//! Provides the immutable configuration objects handed to each component at
//! construction time, plus helper functions for reading environment variables
//! with fallback to deprecated variable names.

use std::net::SocketAddr;
use std::time::Duration;

/// デフォルトのチェック間隔
pub const DEFAULT_CHECK_PERIOD: Duration = Duration::from_secs(1);

/// デフォルトのワーカー数
pub const DEFAULT_WORKERS: usize = 1;

/// Value read by [`lookup_env_with_fallback`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvLookup {
    /// Variable value
    pub value: String,
    /// `(old, new)` names when only the deprecated name was set
    pub deprecated: Option<(String, String)>,
}

impl EnvLookup {
    /// Log a deprecation warning if the value came from the deprecated name.
    ///
    /// ロギング初期化前に呼ぶと警告は捨てられるため、呼び出し側が
    /// タイミングを決める。
    pub fn warn_if_deprecated(&self) {
        if let Some((old_name, new_name)) = &self.deprecated {
            tracing::warn!(
                "Environment variable '{}' is deprecated, use '{}' instead",
                old_name,
                new_name
            );
        }
    }
}

/// Get an environment variable with fallback to a deprecated name
///
/// If the new variable name is set, returns its value.
/// If only the old (deprecated) variable name is set, returns its value
/// marked as deprecated; see [`EnvLookup::warn_if_deprecated`].
///
/// # Example
/// ```
/// use urlmon::config::lookup_env_with_fallback;
///
/// let level = lookup_env_with_fallback("URLMON_LOG_LEVEL", "LOG_LEVEL");
/// ```
pub fn lookup_env_with_fallback(new_name: &str, old_name: &str) -> Option<EnvLookup> {
    if let Ok(value) = std::env::var(new_name) {
        return Some(EnvLookup {
            value,
            deprecated: None,
        });
    }
    if let Ok(value) = std::env::var(old_name) {
        return Some(EnvLookup {
            value,
            deprecated: Some((old_name.to_string(), new_name.to_string())),
        });
    }
    None
}

/// URL監視エンジンの設定
///
/// 一度組み立てたら変更しない値オブジェクト。検証は
/// [`Monitor::new`](crate::monitor::Monitor::new) で行う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    urls: Vec<String>,
    check_period: Duration,
    workers: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            check_period: DEFAULT_CHECK_PERIOD,
            workers: DEFAULT_WORKERS,
        }
    }
}

impl MonitorConfig {
    /// デフォルト設定を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// チェック対象URLを設定
    pub fn with_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.urls = urls.into_iter().map(Into::into).collect();
        self
    }

    /// チェック間隔を設定
    pub fn with_check_period(mut self, period: Duration) -> Self {
        self.check_period = period;
        self
    }

    /// ワーカー数を設定
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// チェック対象URL（設定順）
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// チェック間隔
    pub fn check_period(&self) -> Duration {
        self.check_period
    }

    /// ワーカー数
    pub fn workers(&self) -> usize {
        self.workers
    }
}

/// HTTPサーバー設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,
    /// Time allowed for existing connections to close when shutting down
    pub shutdown_duration: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            shutdown_duration: Duration::from_secs(5),
        }
    }
}

/// 終了シーケンス設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownConfig {
    /// Readiness is failed for this long before the listener and monitor stop
    pub ready_fail_duration: Duration,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            ready_fail_duration: Duration::from_secs(1),
        }
    }
}

/// アプリケーション全体の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 監視エンジン設定
    pub monitor: MonitorConfig,
    /// HTTPサーバー設定
    pub server: ServerConfig,
    /// 終了シーケンス設定
    pub shutdown: ShutdownConfig,
    /// Per-request timeout for the live checker
    pub check_timeout: Duration,
}
