/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use crate::Quantile;

/// Point in time summary of a histogram.
///
/// Only `count` is set for an empty histogram.
#[derive(Clone, Debug, PartialEq)]
pub struct HistogramStats {
    count: u64,
    min: Option<u64>,
    max: Option<u64>,
    mean: Option<f64>,
    quantile: Vec<(Quantile, u64)>,
}

impl HistogramStats {
    pub(crate) fn empty(count: u64) -> Self {
        HistogramStats {
            count,
            min: None,
            max: None,
            mean: None,
            quantile: Vec::new(),
        }
    }

    pub(crate) fn set_min_max_mean(&mut self, min: u64, max: u64, mean: f64) {
        self.min = Some(min);
        self.max = Some(max);
        self.mean = Some(mean);
    }

    pub(crate) fn push_quantile(&mut self, quantile: Quantile, value: u64) {
        self.quantile.push((quantile, value));
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn min(&self) -> Option<u64> {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Option<u64> {
        self.max
    }

    #[inline]
    pub fn mean(&self) -> Option<f64> {
        self.mean
    }

    #[inline]
    pub fn quantiles(&self) -> &[(Quantile, u64)] {
        &self.quantile
    }
}
