//! axumサーバー起動・シャットダウンハンドリング

use crate::config::ServerConfig;
use crate::error::{MonitorError, MonitorResult};
use axum::Router;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// バックグラウンドで動作中のHTTPリスナー
#[derive(Debug)]
pub struct HttpServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<io::Result<()>>,
    shutdown_duration: Duration,
}

impl HttpServer {
    /// リスナーをバインドし、バックグラウンドで受付を開始する
    ///
    /// バインド失敗は起動エラーとして返す。
    pub async fn bind(config: &ServerConfig, app: Router) -> MonitorResult<Self> {
        let listener = tokio::net::TcpListener::bind(config.listen_addr)
            .await
            .map_err(|source| MonitorError::Bind {
                addr: config.listen_addr,
                source,
            })?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app.into_make_service())
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        info!(%addr, "http server listening");

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            handle,
            shutdown_duration: config.shutdown_duration,
        })
    }

    /// 実際にバインドされたアドレス（ポート0指定時の解決用）
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// 新規接続の受付を止め、処理中の接続を `shutdown_duration` まで待つ
    pub async fn shutdown(mut self) -> MonitorResult<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        match tokio::time::timeout(self.shutdown_duration, &mut self.handle).await {
            Ok(Ok(result)) => {
                result?;
                info!("http server shutdown complete");
                Ok(())
            }
            Ok(Err(join_err)) => Err(MonitorError::Server(io::Error::other(join_err))),
            Err(_) => {
                warn!(
                    timeout = ?self.shutdown_duration,
                    "http server did not finish in time"
                );
                self.handle.abort();
                Err(MonitorError::ShutdownTimeout(self.shutdown_duration))
            }
        }
    }
}
