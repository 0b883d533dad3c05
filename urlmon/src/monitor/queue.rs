//! Bounded, closable task queue between the producer and the workers.
//!
//! The producer owns the only [`TaskSender`]; closing it (explicitly or by
//! dropping it) is the single termination signal for every consumer. A
//! [`TaskReceiver`] yields `None` only once the queue is both closed and empty,
//! so consumers never lose an already-enqueued task.

use async_channel::{Receiver, Sender};

/// キューに載せる1件のタスク（チェック対象URL）
pub type Task = String;

/// Create a queue holding at most `capacity` tasks.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn task_queue(capacity: usize) -> (TaskSender, TaskReceiver) {
    let (tx, rx) = async_channel::bounded(capacity);
    (TaskSender { tx }, TaskReceiver { rx })
}

/// Producer side. Not cloneable: exactly one owner closes the queue.
#[derive(Debug)]
pub struct TaskSender {
    tx: Sender<Task>,
}

/// Returned when every receiver has gone away.
#[derive(Debug, PartialEq, Eq)]
pub struct QueueClosed(pub Task);

impl TaskSender {
    /// Enqueue a task, waiting while the queue is full.
    pub async fn send(&self, task: Task) -> Result<(), QueueClosed> {
        self.tx.send(task).await.map_err(|e| QueueClosed(e.0))
    }

    /// Close the queue. Consumes the sender so the queue is closed at most once.
    pub fn close(self) {
        drop(self);
    }
}

/// Consumer side, cloned into every worker and the shutdown drain.
///
/// Clones receive concurrently; no consumer waits behind another.
#[derive(Debug, Clone)]
pub struct TaskReceiver {
    rx: Receiver<Task>,
}

impl TaskReceiver {
    /// Receive the next task; `None` once the queue is closed and empty.
    pub async fn recv(&self) -> Option<Task> {
        self.rx.recv().await.ok()
    }

    /// Discard tasks until the queue is closed and empty. Returns the number
    /// of discarded tasks.
    pub async fn drain(&self) -> usize {
        let mut drained = 0;
        while self.recv().await.is_some() {
            drained += 1;
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn delivers_in_enqueue_order() {
        let (tx, rx) = task_queue(4);
        tx.send("a".into()).await.unwrap();
        tx.send("b".into()).await.unwrap();
        tx.close();

        assert_eq!(rx.recv().await.as_deref(), Some("a"));
        assert_eq!(rx.recv().await.as_deref(), Some("b"));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn close_does_not_drop_queued_tasks() {
        let (tx, rx) = task_queue(2);
        tx.send("a".into()).await.unwrap();
        tx.send("b".into()).await.unwrap();
        tx.close();

        assert_eq!(rx.drain().await, 2);
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn send_waits_while_full() {
        let (tx, rx) = task_queue(1);
        tx.send("a".into()).await.unwrap();

        let blocked = tokio::time::timeout(Duration::from_millis(10), tx.send("b".into())).await;
        assert!(blocked.is_err(), "send should wait for capacity");

        assert_eq!(rx.recv().await.as_deref(), Some("a"));
        tx.send("b".into()).await.unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn drain_unblocks_a_waiting_producer() {
        let (tx, rx) = task_queue(1);
        let producer = tokio::spawn(async move {
            for task in ["a", "b", "c"] {
                tx.send(task.into()).await.unwrap();
            }
            tx.close();
        });

        assert_eq!(rx.drain().await, 3);
        producer.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn parked_consumer_does_not_block_others() {
        let (tx, rx) = task_queue(2);
        let idle = rx.clone();

        // 待機中のまま二度とpollされない受信
        let mut parked = Box::pin(idle.recv());
        assert!(tokio::time::timeout(Duration::from_millis(10), &mut parked)
            .await
            .is_err());

        tx.send("a".into()).await.unwrap();
        let received = tokio::time::timeout(Duration::from_millis(10), rx.recv())
            .await
            .expect("second consumer waited behind the parked one");
        assert_eq!(received.as_deref(), Some("a"));

        drop(parked);
        tx.close();
    }

    #[tokio::test]
    async fn two_consumers_wait_at_the_same_time() {
        let (tx, rx) = task_queue(2);
        let consumers: Vec<_> = (0..2)
            .map(|_| {
                let rx = rx.clone();
                tokio::spawn(async move { rx.recv().await })
            })
            .collect();

        // 両方が空のキューで待機に入るまで待つ
        tokio::time::sleep(Duration::from_millis(20)).await;
        tx.send("a".into()).await.unwrap();
        tx.send("b".into()).await.unwrap();

        let mut got = Vec::new();
        for consumer in consumers {
            let task = tokio::time::timeout(Duration::from_secs(1), consumer)
                .await
                .expect("consumer stuck")
                .unwrap();
            got.push(task.unwrap());
        }
        got.sort();
        assert_eq!(got, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn send_fails_without_receivers() {
        let (tx, rx) = task_queue(1);
        drop(rx);
        assert_eq!(tx.send("a".into()).await, Err(QueueClosed("a".into())));
    }

    #[tokio::test]
    async fn each_task_is_received_once_across_consumers() {
        let (tx, rx) = task_queue(2);
        let mut consumers = Vec::new();
        for _ in 0..3 {
            let rx = rx.clone();
            consumers.push(tokio::spawn(async move {
                let mut seen = Vec::new();
                while let Some(task) = rx.recv().await {
                    seen.push(task);
                }
                seen
            }));
        }

        for i in 0..20 {
            tx.send(format!("task-{i}")).await.unwrap();
        }
        tx.close();

        let mut all = Vec::new();
        for consumer in consumers {
            all.extend(consumer.await.unwrap());
        }
        all.sort();
        let mut expected: Vec<_> = (0..20).map(|i| format!("task-{i}")).collect();
        expected.sort();
        assert_eq!(all, expected);
    }
}
