/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeSet;
use std::sync::Arc;

use hdrhistogram::CreationError;

use crate::{BoundedHistogram, Quantile};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistogramConfig {
    quantile_list: BTreeSet<Quantile>,
    max_value: u64,
    significant_figures: u8,
}

impl HistogramConfig {
    #[inline]
    pub fn set_quantile_list(&mut self, list: BTreeSet<Quantile>) {
        self.quantile_list = list;
    }

    #[inline]
    pub fn set_max_value(&mut self, max: u64) {
        self.max_value = max;
    }

    #[inline]
    pub fn set_significant_figures(&mut self, sigfig: u8) {
        self.significant_figures = sigfig;
    }

    #[inline]
    pub fn quantile_list(&self) -> &BTreeSet<Quantile> {
        &self.quantile_list
    }

    #[inline]
    pub fn max_value(&self) -> u64 {
        self.max_value
    }

    #[inline]
    pub fn significant_figures(&self) -> u8 {
        self.significant_figures
    }

    pub fn build(&self) -> Result<BoundedHistogram, CreationError> {
        let quantiles: Arc<[Quantile]> = self.quantile_list.iter().cloned().collect();
        BoundedHistogram::new(self.max_value, self.significant_figures, quantiles)
    }
}

impl Default for HistogramConfig {
    fn default() -> Self {
        let mut quantile_list = BTreeSet::new();
        quantile_list.insert(Quantile::pct50());
        quantile_list.insert(Quantile::pct75());
        quantile_list.insert(Quantile::pct95());
        quantile_list.insert(Quantile::pct99());
        quantile_list.insert(Quantile::pct999());
        HistogramConfig {
            quantile_list,
            // one hour in microseconds
            max_value: 3_600_000_000,
            significant_figures: 3,
        }
    }
}
