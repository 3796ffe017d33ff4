/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod quantile;
pub use quantile::{ParseQuantileError, Quantile};

mod stats;
pub use stats::HistogramStats;

mod bounded;
pub use bounded::BoundedHistogram;

mod config;
pub use config::HistogramConfig;

pub use hdrhistogram::CreationError;
