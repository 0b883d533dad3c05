//! urlmon
//!
//! 外部URLを一定周期でチェックし、結果をPrometheusメトリクスとして公開する

#![warn(missing_docs)]

/// HTTPハンドラー（/live, /ready, /metrics）
pub mod api;

/// プロセスの起動・停止シーケンス
pub mod app;

/// URLチェッカー（HTTP実装・テスト用モック）
pub mod checker;

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// エラー型
pub mod error;

/// ロギング初期化ユーティリティ
pub mod logging;

/// URL監視エンジン（プロデューサー・ワーカー・終了処理）
pub mod monitor;

/// チェック結果の記録先
pub mod observer;

/// Readiness signal
pub mod readiness;

/// axumサーバー
pub mod server;

/// 終了シグナル処理
pub mod shutdown;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// `/ready` の応答を決めるフラグ
    pub readiness: readiness::Readiness,
    /// `/metrics` で公開するメトリクス
    pub metrics: observer::PrometheusObserver,
}
