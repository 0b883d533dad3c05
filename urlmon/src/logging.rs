//! ロギング初期化
//!
//! `URLMON_LOG_LEVEL`（旧: `LOG_LEVEL`）を `EnvFilter` として解釈する。

use crate::config::{lookup_env_with_fallback, EnvLookup};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// デフォルトのログフィルタ
pub const DEFAULT_LOG_FILTER: &str = "info";

/// ログフィルタを構築
///
/// 旧変数名から読んだ場合の警告はここでは出さず、返した [`EnvLookup`] に任せる。
pub fn build_filter() -> Result<(EnvFilter, EnvLookup), tracing_subscriber::filter::ParseError> {
    let lookup =
        lookup_env_with_fallback("URLMON_LOG_LEVEL", "LOG_LEVEL").unwrap_or_else(|| EnvLookup {
            value: DEFAULT_LOG_FILTER.to_string(),
            deprecated: None,
        });
    let filter = EnvFilter::try_new(&lookup.value)?;
    Ok((filter, lookup))
}

/// グローバルsubscriberを初期化
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (filter, lookup) = build_filter()?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()?;
    // subscriber導入後に出す
    lookup.warn_if_deprecated();
    Ok(())
}
