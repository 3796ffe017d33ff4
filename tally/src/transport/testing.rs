/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{DeliveryError, Transport};
use crate::types::DataPoint;

/// In memory transport that replays queued outcomes, and succeeds once the queue is empty
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Result<(), DeliveryError>>>,
    delivered: Mutex<Vec<Vec<DataPoint>>>,
    attempts: AtomicUsize,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        ScriptedTransport::default()
    }

    pub(crate) fn push_outcome(&self, outcome: Result<(), DeliveryError>) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub(crate) fn delivered(&self) -> Vec<Vec<DataPoint>> {
        self.delivered.lock().unwrap().clone()
    }

    pub(crate) fn delivered_points(&self) -> usize {
        self.delivered.lock().unwrap().iter().map(|b| b.len()).sum()
    }

    pub(crate) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn deliver(&self, batch: &[DataPoint]) -> Result<(), DeliveryError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        let outcome = self.outcomes.lock().unwrap().pop_front().unwrap_or(Ok(()));
        if outcome.is_ok() {
            self.delivered.lock().unwrap().push(batch.to_vec());
        }
        outcome
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
