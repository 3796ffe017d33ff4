/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;

use crate::config::SenderConfig;
use crate::transport::{DeliveryError, Transport};
use crate::types::DataPoint;

mod error;
pub use error::EnqueueError;

mod stats;
pub use stats::SenderStatsSnapshot;
use stats::SenderStats;

mod runtime;
use runtime::FlushRuntime;

/// Spread retries of many senders over time
fn jitter(wait: Duration) -> Duration {
    wait.mul_f64(0.8 + fastrand::f64() * 0.4)
}

struct ErrorLogLimit {
    create_instant: Instant,
    last_transient: AtomicU64,
    last_permanent: AtomicU64,
}

impl ErrorLogLimit {
    fn new() -> Self {
        ErrorLogLimit {
            create_instant: Instant::now(),
            last_transient: AtomicU64::new(u64::MAX),
            last_permanent: AtomicU64::new(u64::MAX),
        }
    }

    fn should_log(&self, e: &DeliveryError) -> bool {
        let time_slice = self.create_instant.elapsed().as_secs() >> 6; // every 64s
        let last = if e.is_transient() {
            &self.last_transient
        } else {
            &self.last_permanent
        };
        last.swap(time_slice, Ordering::Relaxed) != time_slice
    }
}

struct SenderShared {
    config: SenderConfig,
    transport: Arc<dyn Transport>,
    buffer: Mutex<VecDeque<DataPoint>>,
    closed: AtomicBool,
    size_notify: Notify,
    flush_lock: tokio::sync::Mutex<()>,
    stats: SenderStats,
    error_log: ErrorLogLimit,
}

impl SenderShared {
    fn lock_buffer(&self) -> MutexGuard<'_, VecDeque<DataPoint>> {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn enqueue(&self, points: Vec<DataPoint>) -> Result<(), EnqueueError> {
        let incoming = points.len();
        let mut buffer = self.lock_buffer();
        if self.closed.load(Ordering::Acquire) {
            return Err(EnqueueError::Closed);
        }
        if incoming == 0 {
            return Ok(());
        }

        let capacity = self.config.max_buffer_size;
        if buffer.len() + incoming > capacity {
            let buffered = buffer.len();
            drop(buffer);
            self.stats.add_rejected(incoming);
            return Err(EnqueueError::BufferFull {
                buffered,
                incoming,
                capacity,
            });
        }

        buffer.extend(points);
        let batch_ready = buffer.len() >= self.config.batch_size;
        drop(buffer);

        self.stats.add_enqueued(incoming);
        if batch_ready {
            self.size_notify.notify_one();
        }
        Ok(())
    }

    fn buffered(&self) -> usize {
        self.lock_buffer().len()
    }

    async fn flush(&self) -> usize {
        let _guard = self.flush_lock.lock().await;

        let batch: Vec<DataPoint> = {
            let mut buffer = self.lock_buffer();
            let n = buffer.len().min(self.config.batch_size);
            buffer.drain(..n).collect()
        };
        if batch.is_empty() {
            return 0;
        }

        self.stats.add_batch();
        self.deliver(&batch).await;
        batch.len()
    }

    async fn deliver(&self, batch: &[DataPoint]) {
        let retry = &self.config.retry;
        let mut attempt = 0;
        loop {
            attempt += 1;
            let e = match self.transport.deliver(batch).await {
                Ok(_) => {
                    self.stats.add_delivered(batch.len());
                    return;
                }
                Err(e) => e,
            };
            self.stats.add_failed_attempt();

            if e.is_transient() && attempt < retry.max_attempts {
                let wait = jitter(retry.backoff(attempt));
                if self.error_log.should_log(&e) {
                    warn!(
                        "delivery to {} failed at attempt {attempt}, will retry after {wait:?}: {e}",
                        self.transport.name()
                    );
                }
                tokio::time::sleep(wait).await;
                continue;
            }

            self.stats.add_dropped(batch.len());
            warn!(
                "dropped {} points after {attempt} attempt(s) to {}, last {} error: {e}",
                batch.len(),
                self.transport.name(),
                e.kind_str()
            );
            return;
        }
    }
}

/// Buffers data points and delivers them in batches through a [`Transport`]
pub struct Sender {
    shared: Arc<SenderShared>,
    quit_sender: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Sender {
    /// Create a sender without a background flush task, [`Sender::flush`] should be called
    /// by the caller
    pub fn new(config: SenderConfig, transport: Arc<dyn Transport>) -> anyhow::Result<Self> {
        config.check()?;
        let shared = SenderShared {
            config,
            transport,
            buffer: Mutex::new(VecDeque::new()),
            closed: AtomicBool::new(false),
            size_notify: Notify::new(),
            flush_lock: tokio::sync::Mutex::new(()),
            stats: SenderStats::default(),
            error_log: ErrorLogLimit::new(),
        };
        let (quit_sender, _) = watch::channel(false);
        Ok(Sender {
            shared: Arc::new(shared),
            quit_sender,
            task: Mutex::new(None),
        })
    }

    /// Create a sender and spawn its flush task on the current tokio runtime
    pub fn spawn(config: SenderConfig, transport: Arc<dyn Transport>) -> anyhow::Result<Self> {
        let sender = Sender::new(config, transport)?;
        let runtime = FlushRuntime::new(sender.shared.clone(), sender.quit_sender.subscribe());
        let handle = tokio::spawn(runtime.into_running());
        *sender.lock_task() = Some(handle);
        debug!(
            "sender spawned with transport {}",
            sender.shared.transport.name()
        );
        Ok(sender)
    }

    fn lock_task(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[inline]
    pub fn config(&self) -> &SenderConfig {
        &self.shared.config
    }

    /// Add points to the buffer, all or nothing, without waiting for any I/O
    pub fn enqueue(&self, points: Vec<DataPoint>) -> Result<(), EnqueueError> {
        self.shared.enqueue(points)
    }

    /// Deliver up to one batch of the oldest points, returns the number of points taken.
    ///
    /// The flush task of a spawned sender keeps flushing while a full batch is buffered.
    pub async fn flush(&self) -> usize {
        self.shared.flush().await
    }

    /// Refuse new points, stop the flush task and deliver everything still buffered
    pub async fn close(&self) {
        {
            let _buffer = self.shared.lock_buffer();
            self.shared.closed.store(true, Ordering::Release);
        }
        let _ = self.quit_sender.send(true);

        let task = self.lock_task().take();
        if let Some(handle) = task {
            let _ = handle.await;
        }

        let mut drained = 0;
        loop {
            let n = self.shared.flush().await;
            if n == 0 {
                break;
            }
            drained += n;
        }
        if drained > 0 {
            debug!("drained {drained} buffered points on close");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    pub fn buffered(&self) -> usize {
        self.shared.buffered()
    }

    pub fn stats(&self) -> SenderStatsSnapshot {
        self.shared.stats.snapshot()
    }

    /// Count of failed delivery attempts
    pub fn failure_count(&self) -> u64 {
        self.shared.stats.failed_attempts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use chrono::Utc;
    use tally_types::metrics::{MetricName, MetricTagMap};

    use crate::config::RetryConfig;
    use crate::transport::testing::ScriptedTransport;
    use crate::types::{PointKind, PointValue};

    fn points(start: i64, n: i64) -> Vec<DataPoint> {
        let name = MetricName::from_str("test.count").unwrap();
        let tags = Arc::new(MetricTagMap::default());
        (start..start + n)
            .map(|i| {
                DataPoint::new(
                    name.clone(),
                    tags.clone(),
                    PointValue::Signed(i),
                    Utc::now(),
                    PointKind::Counter,
                )
            })
            .collect()
    }

    fn values(batch: &[DataPoint]) -> Vec<i64> {
        batch
            .iter()
            .map(|p| match p.value() {
                PointValue::Signed(i) => i,
                PointValue::Double(_) => unreachable!(),
            })
            .collect()
    }

    fn config(batch_size: usize, max_buffer_size: usize, flush_interval: Duration) -> SenderConfig {
        SenderConfig {
            batch_size,
            max_buffer_size,
            flush_interval,
            retry: RetryConfig {
                max_attempts: 3,
                base_wait: Duration::from_millis(100),
                max_wait: Duration::from_secs(1),
            },
        }
    }

    async fn settle() {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn invalid_config() {
        let transport = Arc::new(ScriptedTransport::new());
        assert!(Sender::new(config(0, 5, Duration::from_secs(1)), transport.clone()).is_err());
        assert!(Sender::new(config(6, 5, Duration::from_secs(1)), transport.clone()).is_err());
        assert!(Sender::new(config(2, 5, Duration::ZERO), transport).is_err());
    }

    #[tokio::test]
    async fn buffer_full() {
        let transport = Arc::new(ScriptedTransport::new());
        let sender = Sender::new(config(2, 5, Duration::from_secs(1)), transport).unwrap();

        sender.enqueue(points(0, 4)).unwrap();
        let e = sender.enqueue(points(4, 2)).unwrap_err();
        assert_eq!(
            e,
            EnqueueError::BufferFull {
                buffered: 4,
                incoming: 2,
                capacity: 5
            }
        );
        assert_eq!(sender.buffered(), 4);

        sender.enqueue(points(4, 1)).unwrap();
        assert_eq!(sender.buffered(), 5);
        assert!(sender.enqueue(points(5, 1)).is_err());
        sender.enqueue(Vec::new()).unwrap();

        let stats = sender.stats();
        assert_eq!(stats.enqueued, 5);
        assert_eq!(stats.rejected, 3);
    }

    #[tokio::test]
    async fn flush_fifo_batches() {
        let transport = Arc::new(ScriptedTransport::new());
        let sender = Sender::new(config(2, 5, Duration::from_secs(1)), transport.clone()).unwrap();

        sender.enqueue(points(0, 5)).unwrap();
        assert_eq!(sender.flush().await, 2);
        assert_eq!(sender.flush().await, 2);
        assert_eq!(sender.flush().await, 1);
        assert_eq!(sender.flush().await, 0);

        let delivered = transport.delivered();
        assert_eq!(delivered.len(), 3);
        assert_eq!(values(&delivered[0]), vec![0, 1]);
        assert_eq!(values(&delivered[1]), vec![2, 3]);
        assert_eq!(values(&delivered[2]), vec![4]);
        assert_eq!(sender.stats().batches, 3);
        assert_eq!(sender.stats().delivered, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn size_then_interval_flush() {
        let transport = Arc::new(ScriptedTransport::new());
        let sender =
            Sender::spawn(config(2, 5, Duration::from_secs(1)), transport.clone()).unwrap();

        sender.enqueue(points(0, 3)).unwrap();
        settle().await;
        let delivered = transport.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(values(&delivered[0]), vec![0, 1]);
        assert_eq!(sender.buffered(), 1);

        tokio::time::advance(Duration::from_millis(500)).await;
        settle().await;
        assert_eq!(sender.buffered(), 1);

        tokio::time::advance(Duration::from_millis(500)).await;
        settle().await;
        let delivered = transport.delivered();
        assert_eq!(delivered.len(), 2);
        assert_eq!(values(&delivered[1]), vec![2]);
        assert_eq!(sender.buffered(), 0);

        sender.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn transient_retry_then_success() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_outcome(Err(DeliveryError::Transient("503".to_string())));
        transport.push_outcome(Err(DeliveryError::Transient("timeout".to_string())));
        let sender = Sender::new(config(2, 5, Duration::from_secs(1)), transport.clone()).unwrap();

        sender.enqueue(points(0, 2)).unwrap();
        assert_eq!(sender.flush().await, 2);

        assert_eq!(transport.attempts(), 3);
        assert_eq!(transport.delivered().len(), 1);
        assert_eq!(transport.delivered_points(), 2);
        assert_eq!(sender.failure_count(), 2);
        let stats = sender.stats();
        assert_eq!(stats.delivered, 2);
        assert_eq!(stats.dropped, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_exhausted() {
        let transport = Arc::new(ScriptedTransport::new());
        for _ in 0..3 {
            transport.push_outcome(Err(DeliveryError::Transient("503".to_string())));
        }
        let sender = Sender::new(config(2, 5, Duration::from_secs(1)), transport.clone()).unwrap();

        sender.enqueue(points(0, 2)).unwrap();
        sender.flush().await;
        assert_eq!(transport.attempts(), 3);
        assert_eq!(sender.stats().dropped, 2);

        // the next batch is not affected
        sender.enqueue(points(2, 1)).unwrap();
        sender.flush().await;
        assert_eq!(transport.attempts(), 4);
        assert_eq!(values(&transport.delivered()[0]), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_dropped() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_outcome(Err(DeliveryError::Permanent("400".to_string())));
        let sender =
            Sender::spawn(config(2, 5, Duration::from_secs(1)), transport.clone()).unwrap();

        sender.enqueue(points(0, 2)).unwrap();
        settle().await;
        assert_eq!(transport.attempts(), 1);
        assert!(transport.delivered().is_empty());
        assert_eq!(sender.stats().dropped, 2);
        assert_eq!(sender.buffered(), 0);

        sender.enqueue(points(2, 2)).unwrap();
        settle().await;
        assert_eq!(transport.attempts(), 2);
        assert_eq!(values(&transport.delivered()[0]), vec![2, 3]);

        sender.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn close_drains() {
        let transport = Arc::new(ScriptedTransport::new());
        let sender =
            Sender::spawn(config(2, 5, Duration::from_secs(60)), transport.clone()).unwrap();

        sender.enqueue(points(0, 1)).unwrap();
        settle().await;
        assert_eq!(sender.buffered(), 1);

        sender.close().await;
        assert!(sender.is_closed());
        assert_eq!(sender.buffered(), 0);
        assert_eq!(transport.delivered_points(), 1);
        assert_eq!(sender.enqueue(points(1, 1)), Err(EnqueueError::Closed));

        // closing twice is fine
        sender.close().await;
    }

    #[test]
    fn jitter_range() {
        let base = Duration::from_millis(1000);
        for _ in 0..100 {
            let d = jitter(base);
            assert!(d >= Duration::from_millis(800));
            assert!(d <= Duration::from_millis(1200));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn backlog_flushed_without_waiting() {
        let transport = Arc::new(ScriptedTransport::new());
        let sender =
            Sender::spawn(config(2, 10, Duration::from_secs(60)), transport.clone()).unwrap();

        sender.enqueue(points(0, 7)).unwrap();
        settle().await;
        let delivered = transport.delivered();
        assert_eq!(delivered.len(), 3);
        assert_eq!(values(&delivered[2]), vec![4, 5]);
        assert_eq!(sender.buffered(), 1);
        assert_eq!(sender.stats().batches, 3);

        // the partial batch waits for the interval
        tokio::time::advance(Duration::from_secs(59)).await;
        settle().await;
        assert_eq!(sender.buffered(), 1);
        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
        assert_eq!(sender.buffered(), 0);
        assert_eq!(transport.delivered_points(), 7);

        sender.close().await;
    }
}
