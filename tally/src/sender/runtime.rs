/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use log::debug;
use tokio::sync::watch;
use tokio::time::Instant;

use super::SenderShared;

/// The background task that flushes the buffer on size or time
pub(super) struct FlushRuntime {
    shared: Arc<SenderShared>,
    quit_receiver: watch::Receiver<bool>,
    deadline: Instant,
}

impl FlushRuntime {
    pub(super) fn new(shared: Arc<SenderShared>, quit_receiver: watch::Receiver<bool>) -> Self {
        let deadline = Instant::now() + shared.config.flush_interval;
        FlushRuntime {
            shared,
            quit_receiver,
            deadline,
        }
    }

    /// Flush full batches until less than one is buffered or quit is requested
    async fn flush_full_batches(&mut self) {
        let batch_size = self.shared.config.batch_size;
        while self.shared.buffered() >= batch_size {
            if *self.quit_receiver.borrow() {
                return;
            }
            self.shared.flush().await;
            self.deadline = Instant::now() + self.shared.config.flush_interval;
        }
    }

    pub(super) async fn into_running(mut self) {
        let interval = self.shared.config.flush_interval;

        loop {
            tokio::select! {
                biased;

                r = self.quit_receiver.changed() => {
                    if r.is_err() || *self.quit_receiver.borrow() {
                        break;
                    }
                }
                _ = self.shared.size_notify.notified() => {
                    self.flush_full_batches().await;
                }
                _ = tokio::time::sleep_until(self.deadline) => {
                    self.shared.flush().await;
                    self.deadline = Instant::now() + interval;
                    self.flush_full_batches().await;
                }
            }
        }

        debug!(
            "flush task for transport {} quit",
            self.shared.transport.name()
        );
    }
}
