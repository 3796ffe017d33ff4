/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod primary;
pub use primary::{as_bool, as_string, as_u8};

mod metrics;
pub use metrics::{as_metric_name, as_metric_tag_map};

mod net;
pub use net::as_url;

#[cfg(feature = "histogram")]
mod histogram;
#[cfg(feature = "histogram")]
pub use histogram::{as_histogram_config, as_quantile, as_quantile_list};
