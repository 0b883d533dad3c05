//! HTTPルーティング
//!
//! - `GET /live`    - 生存確認（常に200）
//! - `GET /ready`   - 受付可否（準備完了時200、終了処理中500）
//! - `GET /metrics` - Prometheusメトリクス

pub mod health;
pub mod metrics;

use crate::AppState;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// ルーターを作成
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/live", get(health::live))
        .route("/ready", get(health::ready))
        .route("/metrics", get(metrics::get_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
