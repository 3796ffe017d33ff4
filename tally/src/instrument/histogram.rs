/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use tally_histogram::{BoundedHistogram, CreationError, HistogramConfig, HistogramStats};

use super::InstrumentError;

/// Histogram of u64 observations with bounded memory
pub struct Histogram {
    inner: Mutex<BoundedHistogram>,
}

impl Histogram {
    pub fn new(config: &HistogramConfig) -> Result<Self, CreationError> {
        let inner = config.build()?;
        Ok(Histogram {
            inner: Mutex::new(inner),
        })
    }

    fn lock(&self) -> MutexGuard<'_, BoundedHistogram> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn observe(&self, value: u64) {
        self.lock().record(value);
    }

    /// Read the current summary.
    ///
    /// The first read after a writer panicked fails, later ones see the recovered state.
    pub fn read(&self) -> Result<HistogramStats, InstrumentError> {
        match self.inner.lock() {
            Ok(h) => Ok(h.stats()),
            Err(_) => {
                self.inner.clear_poison();
                Err(InstrumentError::Poisoned)
            }
        }
    }

    pub fn clear(&self) {
        self.lock().reset();
    }

    #[cfg(test)]
    pub(crate) fn poison_for_test(self: &std::sync::Arc<Self>) {
        let h = self.clone();
        let _ = std::thread::spawn(move || {
            let _guard = h.inner.lock().unwrap();
            panic!("poison it");
        })
        .join();
    }
}

impl fmt::Debug for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Histogram").finish_non_exhaustive()
    }
}
