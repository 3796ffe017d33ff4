/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use ahash::AHashMap;
use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use tally_types::metrics::MetricTagMap;

use crate::config::ReporterConfig;
use crate::instrument::Instrument;
use crate::registry::{RegistrationError, Registry};
use crate::sender::{EnqueueError, Sender};
use crate::types::{DataPoint, MetricIdentity};

mod convert;
use convert::PointBuilder;

enum ReporterState {
    Stopped,
    Running {
        quit_sender: watch::Sender<bool>,
        handle: JoinHandle<()>,
    },
}

/// Periodically turns the state of all registered instruments into data points
pub struct Reporter {
    registry: Arc<Registry>,
    sender: Arc<Sender>,
    config: ReporterConfig,
    global_tags: MetricTagMap,
    interval: Duration,
    /// drained deltas of a rejected cycle
    carry_over: Mutex<AHashMap<Arc<MetricIdentity>, i64>>,
    state: Mutex<ReporterState>,
}

impl Reporter {
    pub fn new(registry: Arc<Registry>, sender: Arc<Sender>, config: ReporterConfig) -> Self {
        let interval = config
            .emit_interval
            .unwrap_or(sender.config().flush_interval);
        let global_tags = config.global_tags();
        Reporter {
            registry,
            sender,
            config,
            global_tags,
            interval,
            carry_over: Mutex::new(AHashMap::new()),
            state: Mutex::new(ReporterState::Stopped),
        }
    }

    #[inline]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    #[inline]
    pub fn sender(&self) -> &Arc<Sender> {
        &self.sender
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn register_metric<I>(
        &self,
        name: &str,
        instrument: I,
        tags: MetricTagMap,
    ) -> Result<(), RegistrationError>
    where
        I: Into<Instrument>,
    {
        self.registry.register_str(name, instrument, tags)
    }

    fn lock_state(&self) -> MutexGuard<'_, ReporterState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Spawn the tick task on the current tokio runtime, nothing happens if already running
    pub fn start(self: &Arc<Self>) {
        let mut state = self.lock_state();
        if matches!(*state, ReporterState::Running { .. }) {
            return;
        }

        let (quit_sender, quit_receiver) = watch::channel(false);
        let first_tick = Instant::now() + self.interval;
        let handle = tokio::spawn(run_ticks(
            Arc::downgrade(self),
            first_tick,
            self.interval,
            quit_receiver,
        ));
        *state = ReporterState::Running {
            quit_sender,
            handle,
        };
        info!("reporter started with interval {:?}", self.interval);
    }

    fn stop_task(&self) -> Option<JoinHandle<()>> {
        let mut state = self.lock_state();
        match std::mem::replace(&mut *state, ReporterState::Stopped) {
            ReporterState::Running {
                quit_sender,
                handle,
            } => {
                let _ = quit_sender.send(true);
                info!("reporter stopped");
                Some(handle)
            }
            ReporterState::Stopped => None,
        }
    }

    /// Cancel the pending tick, a cycle already in progress still completes
    pub fn stop(&self) {
        let _ = self.stop_task();
    }

    pub fn is_running(&self) -> bool {
        matches!(*self.lock_state(), ReporterState::Running { .. })
    }

    /// Stop, report one last time and deliver everything that is buffered
    pub async fn close(&self) {
        // a cycle in progress must reach the sender before it is closed
        if let Some(handle) = self.stop_task() {
            let _ = handle.await;
        }
        let _ = self.report_once();
        self.sender.close().await;
    }

    /// Run a single report cycle, returns the number of points handed to the sender
    pub fn report_once(&self) -> Result<usize, EnqueueError> {
        let snapshot = self.registry.snapshot_all();
        let builder = PointBuilder::new(self.config.prefix.as_ref(), &self.global_tags, Utc::now());

        let mut carry_over = self.carry_over.lock().unwrap_or_else(|e| e.into_inner());
        // carried values of unregistered identities are dropped with it
        let mut carried = std::mem::take(&mut *carry_over);

        let mut points: Vec<DataPoint> = Vec::with_capacity(snapshot.len());
        let mut drained: Vec<(Arc<MetricIdentity>, i64)> = Vec::new();
        for (id, instrument) in snapshot {
            match instrument {
                Instrument::Counter(c) => points.push(builder.counter(&id, c.read())),
                Instrument::DeltaCounter(d) => {
                    let value = d
                        .read_and_reset()
                        .saturating_add(carried.remove(&id).unwrap_or(0));
                    if value != 0 {
                        points.push(builder.delta(&id, value));
                        drained.push((id, value));
                    }
                }
                Instrument::Histogram(h) => match builder.histogram(&id, &h) {
                    Ok(v) => points.extend(v),
                    Err(e) => {
                        if self.config.log_errors {
                            warn!("skipped histogram {id} in this report: {e}");
                        }
                    }
                },
            }
        }

        let count = points.len();
        match self.sender.enqueue(points) {
            Ok(_) => {
                debug!("reported {count} points");
                Ok(count)
            }
            Err(e) => {
                if self.config.carry_over_deltas {
                    carry_over.extend(drained);
                } else if !drained.is_empty() && self.config.log_errors {
                    warn!("lost {} delta values", drained.len());
                }
                if self.config.log_errors {
                    warn!("failed to report {count} points: {e}");
                }
                Err(e)
            }
        }
    }
}

async fn run_ticks(
    reporter: Weak<Reporter>,
    first_tick: Instant,
    period: Duration,
    mut quit_receiver: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval_at(first_tick, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            r = quit_receiver.changed() => {
                if r.is_err() || *quit_receiver.borrow() {
                    break;
                }
            }
            _ = interval.tick() => {
                let Some(reporter) = reporter.upgrade() else {
                    break;
                };
                let _ = reporter.report_once();
            }
        }
    }
    debug!("reporter tick task quit");
}
