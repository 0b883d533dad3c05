//! URL監視エンジン
//!
//! 1つのプロデューサーが一定周期で全URLをタスクキューへ投入し、
//! 固定数のワーカーがキューからURLを取り出して並行にチェックする。
//!
//! 終了手順:
//! 1. キャンセルトークンを発火し、プロデューサーに停止を伝える
//! 2. キューを空になるまで読み捨て、送信待ちのプロデューサーを解放する
//! 3. プロデューサーがキューを閉じ、ワーカーは残りを処理して終了する
//! 4. すべてのタスクの終了を待ってから戻る

pub mod queue;

use crate::checker::{saturating_millis, Checker};
use crate::config::MonitorConfig;
use crate::error::{MonitorError, MonitorResult};
use crate::observer::{NoopObserver, Observer};
use queue::{task_queue, TaskReceiver, TaskSender};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Lifecycle of a [`Monitor`]. Monitors are single-use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Constructed, no tasks spawned yet
    NotStarted,
    /// Producer and workers are running
    Running,
    /// `shutdown` is in progress
    ShuttingDown,
    /// Every engine-owned task has finished
    Stopped,
}

/// Periodic URL checking system: one producer, a fixed pool of workers, and
/// the shutdown sequence that stops them.
pub struct Monitor {
    urls: Arc<[String]>,
    check_period: Duration,
    workers: usize,
    checker: Arc<dyn Checker>,
    observer: Arc<dyn Observer>,
    state: MonitorState,
    cancel: Option<CancellationToken>,
    queue: Option<TaskReceiver>,
    tasks: JoinSet<()>,
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("urls", &self.urls)
            .field("check_period", &self.check_period)
            .field("workers", &self.workers)
            .field("observer", &self.observer.name())
            .field("state", &self.state)
            .finish()
    }
}

impl Monitor {
    /// Create a monitor. No tasks are spawned until [`Monitor::run`].
    ///
    /// `observer` が `None` の場合、結果は記録されない。
    pub fn new(
        config: MonitorConfig,
        observer: Option<Arc<dyn Observer>>,
        checker: Arc<dyn Checker>,
    ) -> MonitorResult<Self> {
        if config.workers() == 0 {
            return Err(MonitorError::InvalidConfiguration(
                "workers must be a positive integer".to_string(),
            ));
        }
        if config.check_period().is_zero() {
            return Err(MonitorError::InvalidConfiguration(
                "check period must be positive".to_string(),
            ));
        }

        Ok(Self {
            urls: config.urls().into(),
            check_period: config.check_period(),
            workers: config.workers(),
            checker,
            observer: observer.unwrap_or_else(|| Arc::new(NoopObserver)),
            state: MonitorState::NotStarted,
            cancel: None,
            queue: None,
            tasks: JoinSet::new(),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Spawn the workers and the producer, then return immediately.
    ///
    /// The tasks run until [`Monitor::shutdown`] is called or `parent` is
    /// cancelled. Must be called from within a Tokio runtime.
    pub fn run(&mut self, parent: &CancellationToken) -> MonitorResult<()> {
        if self.state != MonitorState::NotStarted {
            return Err(MonitorError::AlreadyStarted);
        }

        let cancel = parent.child_token();
        let (sender, receiver) = task_queue(self.workers);

        for id in 0..self.workers {
            self.tasks.spawn(work(
                id,
                receiver.clone(),
                Arc::clone(&self.checker),
                Arc::clone(&self.observer),
                cancel.clone(),
            ));
        }

        self.tasks.spawn(produce(
            Arc::clone(&self.urls),
            self.check_period,
            sender,
            cancel.clone(),
        ));

        self.cancel = Some(cancel);
        self.queue = Some(receiver);
        self.state = MonitorState::Running;

        info!(
            urls = self.urls.len(),
            workers = self.workers,
            check_period_ms = saturating_millis(self.check_period),
            observer = self.observer.name(),
            "Monitor started"
        );
        Ok(())
    }

    /// Stop the producer and workers and wait until every one has finished.
    ///
    /// Does nothing unless the monitor is running.
    pub async fn shutdown(&mut self) {
        if self.state != MonitorState::Running {
            return;
        }
        self.state = MonitorState::ShuttingDown;
        info!("Monitor shutting down");

        if let Some(cancel) = &self.cancel {
            cancel.cancel();
        }

        // プロデューサーが送信待ちのままキャンセルを観測できないことがあるため、
        // キューが閉じられるまで読み捨てる
        if let Some(queue) = self.queue.take() {
            let drained = queue.drain().await;
            if drained > 0 {
                debug!(drained, "Discarded queued checks during shutdown");
            }
        }

        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                error!(error = %e, "Monitor task failed");
            }
        }

        self.state = MonitorState::Stopped;
        info!("Monitor stopped");
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        if let Some(cancel) = &self.cancel {
            cancel.cancel();
        }
    }
}

/// Enqueue every url once per period until cancelled, then close the queue.
async fn produce(
    urls: Arc<[String]>,
    period: Duration,
    sender: TaskSender,
    cancel: CancellationToken,
) {
    info!("producer startup");

    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                debug!(count = urls.len(), "producer starting monitoring cycle");
                if !enqueue_cycle(&urls, &sender, &cancel).await {
                    break;
                }
            }
        }
    }

    sender.close();
    info!("producer shutdown");
}

/// One monitoring cycle. Returns `false` when the producer must stop.
async fn enqueue_cycle(urls: &[String], sender: &TaskSender, cancel: &CancellationToken) -> bool {
    for url in urls {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return false,
            sent = sender.send(url.clone()) => {
                if sent.is_err() {
                    warn!("task queue has no consumers");
                    return false;
                }
            }
        }
    }
    true
}

/// Check urls from the queue until it is closed and empty.
async fn work(
    id: usize,
    queue: TaskReceiver,
    checker: Arc<dyn Checker>,
    observer: Arc<dyn Observer>,
    cancel: CancellationToken,
) {
    info!(worker = id, "worker startup");

    while let Some(url) = queue.recv().await {
        let outcome = checker.check(&cancel, &url).await;
        observer.record(&url, outcome.up, outcome.duration);
    }

    info!(worker = id, "worker shutdown");
}
