/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::{AtomicI64, Ordering};

/// Lifetime total counter, it is never reset by reporting
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicI64,
}

impl Counter {
    pub const fn new() -> Self {
        Counter {
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

    #[inline]
    pub fn read(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}
