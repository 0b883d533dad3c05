//! チェック結果の記録先
//!
//! ワーカーは各チェック結果を [`Observer`] に渡す。記録はベストエフォートで、
//! 失敗が呼び出し元に返ることはない。

pub mod prometheus;

pub use self::prometheus::PrometheusObserver;

use std::time::Duration;

/// Records a single check outcome.
pub trait Observer: Send + Sync {
    /// Record the outcome of checking `url`.
    fn record(&self, url: &str, up: bool, duration: Duration);

    /// Observer backend name.
    fn name(&self) -> &str;
}

/// Observer that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    #[inline(always)]
    fn record(&self, _url: &str, _up: bool, _duration: Duration) {}

    fn name(&self) -> &str {
        "noop"
    }
}
