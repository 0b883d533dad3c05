//! プロセス全体のライフサイクル
//!
//! 起動: メトリクス → 監視エンジン → HTTPリスナー → エンジン開始
//! 停止: readiness失敗 → 猶予待ち → リスナー停止 → エンジン停止

use crate::api;
use crate::checker::{Checker, HttpChecker};
use crate::config::{AppConfig, ShutdownConfig};
use crate::error::MonitorResult;
use crate::monitor::Monitor;
use crate::observer::{Observer, PrometheusObserver};
use crate::readiness::Readiness;
use crate::server::HttpServer;
use crate::shutdown;
use crate::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// 起動済みのアプリケーション
#[derive(Debug)]
pub struct App {
    server: HttpServer,
    monitor: Monitor,
    readiness: Readiness,
    metrics: PrometheusObserver,
    shutdown: ShutdownConfig,
}

impl App {
    /// Build every component, bind the listener and start the monitor.
    pub async fn start(
        config: AppConfig,
        checker: Arc<dyn Checker>,
        token: &CancellationToken,
    ) -> MonitorResult<Self> {
        let metrics = PrometheusObserver::new()?;
        let readiness = Readiness::default();

        let observer: Arc<dyn Observer> = Arc::new(metrics.clone());
        let mut monitor = Monitor::new(config.monitor, Some(observer), checker)?;

        let state = AppState {
            readiness: readiness.clone(),
            metrics: metrics.clone(),
        };
        let server = HttpServer::bind(&config.server, api::create_router(state)).await?;

        monitor.run(token)?;

        Ok(Self {
            server,
            monitor,
            readiness,
            metrics,
            shutdown: config.shutdown,
        })
    }

    /// Address the HTTP listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.server.local_addr()
    }

    /// Readiness flag served on `/ready`.
    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    /// Metrics sink fed by the monitor.
    pub fn metrics(&self) -> &PrometheusObserver {
        &self.metrics
    }

    /// Stop in order: fail readiness, wait the grace period, stop the
    /// listener, stop the monitor.
    ///
    /// The monitor is shut down even when the listener fails to stop; the
    /// listener error is returned afterwards.
    pub async fn stop(self, token: &CancellationToken) -> MonitorResult<()> {
        let Self {
            server,
            mut monitor,
            readiness,
            shutdown: shutdown_config,
            ..
        } = self;

        shutdown::fail_readiness(&readiness, shutdown_config.ready_fail_duration, token).await;

        let server_result = server.shutdown().await;
        if let Err(e) = &server_result {
            error!(error = %e, "http server shutdown failed");
        }

        monitor.shutdown().await;

        server_result
    }
}

/// Production entry point: live HTTP checker, run until terminated.
pub async fn run(config: AppConfig) -> MonitorResult<()> {
    let checker: Arc<dyn Checker> = Arc::new(HttpChecker::new(config.check_timeout)?);
    // ルートトークン。キャンセルされると猶予待ちも打ち切る
    let token = CancellationToken::new();

    let app = App::start(config, checker, &token).await?;
    info!(addr = %app.local_addr(), "app start");

    shutdown::wait_for_termination(&token).await;

    app.stop(&token).await?;
    info!("app graceful stop");
    Ok(())
}
