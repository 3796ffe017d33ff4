/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::{AtomicI64, Ordering};

/// Counter reported as the increments since the last report
#[derive(Debug, Default)]
pub struct DeltaCounter {
    value: AtomicI64,
}

impl DeltaCounter {
    pub const fn new() -> Self {
        DeltaCounter {
            value: AtomicI64::new(0),
        }
    }

    #[inline]
    pub fn increment(&self, delta: i64) {
        self.value.fetch_add(delta, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc(&self) {
        self.increment(1);
    }

    /// Peek the pending value without draining it
    #[inline]
    pub fn read(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Drain the pending value.
    ///
    /// The swap is a single atomic step, increments racing with it land
    /// either in the returned value or in the next one.
    #[inline]
    pub fn read_and_reset(&self) -> i64 {
        self.value.swap(0, Ordering::AcqRel)
    }
}
