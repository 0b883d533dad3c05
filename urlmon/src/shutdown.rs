//! Termination handling.
//!
//! `app::run` waits on [`wait_for_termination`] and then runs the stop
//! sequence, which starts with [`fail_readiness`].

use crate::readiness::Readiness;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Wait for SIGINT, SIGTERM (unix) or cancellation of `token`.
pub async fn wait_for_termination(token: &CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
        _ = token.cancelled() => {
            info!("Shutdown requested, shutting down...");
        }
    }
}

/// Flip readiness to not-ready, then wait `grace` so upstream load balancers
/// notice before the listener closes. Returns early if `token` is cancelled.
pub async fn fail_readiness(readiness: &Readiness, grace: Duration, token: &CancellationToken) {
    readiness.set_ready(false);
    info!(?grace, "waiting for readiness failure to propagate");

    tokio::select! {
        _ = tokio::time::sleep(grace) => {}
        _ = token.cancelled() => {
            info!("readiness grace period cut short");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wait_for_termination_returns_on_cancel() {
        let token = CancellationToken::new();
        let wait_task = {
            let token = token.clone();
            tokio::spawn(async move { wait_for_termination(&token).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();

        tokio::time::timeout(Duration::from_secs(2), wait_task)
            .await
            .expect("termination wait timed out")
            .expect("termination wait panicked");
    }

    #[tokio::test(start_paused = true)]
    async fn fail_readiness_waits_grace_period() {
        let readiness = Readiness::default();
        let token = CancellationToken::new();

        let start = tokio::time::Instant::now();
        fail_readiness(&readiness, Duration::from_secs(3), &token).await;

        assert!(!readiness.is_ready());
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn fail_readiness_stops_waiting_on_cancel() {
        let readiness = Readiness::default();
        let token = CancellationToken::new();
        token.cancel();

        let start = tokio::time::Instant::now();
        fail_readiness(&readiness, Duration::from_secs(3), &token).await;

        assert!(!readiness.is_ready());
        assert!(start.elapsed() < Duration::from_secs(3));
    }
}
