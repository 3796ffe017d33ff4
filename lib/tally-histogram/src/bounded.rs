/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use hdrhistogram::{CreationError, Histogram};

use crate::{HistogramStats, Quantile};

/// A histogram with a fixed trackable range.
///
/// Auto resize is disabled, so the memory used is decided when it is created.
/// Values above the max trackable value are saturated to it.
pub struct BoundedHistogram {
    inner: Histogram<u64>,
    quantiles: Arc<[Quantile]>,
}

impl BoundedHistogram {
    pub fn new(
        max_value: u64,
        significant_figures: u8,
        quantiles: Arc<[Quantile]>,
    ) -> Result<Self, CreationError> {
        let mut inner = Histogram::new_with_bounds(1, max_value, significant_figures)?;
        inner.auto(false);
        Ok(BoundedHistogram { inner, quantiles })
    }

    #[inline]
    pub fn record(&mut self, v: u64) {
        self.inner.saturating_record(v);
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline]
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn stats(&self) -> HistogramStats {
        let mut stats = HistogramStats::empty(self.inner.len());
        if self.inner.is_empty() {
            return stats;
        }
        stats.set_min_max_mean(self.inner.min(), self.inner.max(), self.inner.mean());
        for q in self.quantiles.iter() {
            stats.push_quantile(q.clone(), self.inner.value_at_quantile(q.value()));
        }
        stats
    }
}
