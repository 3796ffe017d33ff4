/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use tally_types::metrics::{MetricName, MetricTagMap};

use crate::instrument::{Histogram, InstrumentError};
use crate::types::{DataPoint, MetricIdentity, PointKind, PointValue};

#[derive(Debug, Error)]
pub(super) enum ConvertError {
    #[error("read failed: {0}")]
    Read(#[from] InstrumentError),
    #[error("non finite value for {0}")]
    NonFinite(MetricName),
}

/// Turns instrument values into data points of a single report cycle
pub(super) struct PointBuilder<'a> {
    prefix: Option<&'a MetricName>,
    global_tags: &'a MetricTagMap,
    time: DateTime<Utc>,
}

impl<'a> PointBuilder<'a> {
    pub(super) fn new(
        prefix: Option<&'a MetricName>,
        global_tags: &'a MetricTagMap,
        time: DateTime<Utc>,
    ) -> Self {
        PointBuilder {
            prefix,
            global_tags,
            time,
        }
    }

    fn tags(&self, id: &MetricIdentity) -> Arc<MetricTagMap> {
        if self.global_tags.is_empty() {
            return Arc::new(id.tags.clone());
        }
        let mut tags = self.global_tags.clone();
        tags.extend(&id.tags);
        Arc::new(tags)
    }

    fn base_name(&self, id: &MetricIdentity) -> MetricName {
        id.name.with_prefix(self.prefix)
    }

    pub(super) fn counter(&self, id: &MetricIdentity, value: i64) -> DataPoint {
        DataPoint::new(
            self.base_name(id).with_suffix("count"),
            self.tags(id),
            PointValue::Signed(value),
            self.time,
            PointKind::Counter,
        )
    }

    pub(super) fn delta(&self, id: &MetricIdentity, value: i64) -> DataPoint {
        DataPoint::new(
            self.base_name(id).with_suffix("count"),
            self.tags(id),
            PointValue::Signed(value),
            self.time,
            PointKind::DeltaCounter,
        )
    }

    /// All points of a histogram, or none of them if any value is unusable
    pub(super) fn histogram(
        &self,
        id: &MetricIdentity,
        histogram: &Histogram,
    ) -> Result<Vec<DataPoint>, ConvertError> {
        let stats = histogram.read()?;
        let base = self.base_name(id);
        let tags = self.tags(id);

        let mut points = Vec::with_capacity(4 + stats.quantiles().len());
        let mut push = |suffix: &str, value: PointValue| {
            points.push(DataPoint::new(
                base.with_suffix(suffix),
                tags.clone(),
                value,
                self.time,
                PointKind::Histogram,
            ));
        };

        push("count", PointValue::Signed(stats.count() as i64));
        if let (Some(min), Some(max), Some(mean)) = (stats.min(), stats.max(), stats.mean()) {
            push("min", PointValue::Signed(min as i64));
            push("max", PointValue::Signed(max as i64));
            if !mean.is_finite() {
                return Err(ConvertError::NonFinite(base.with_suffix("mean")));
            }
            push("mean", PointValue::Double(mean));
            for (quantile, value) in stats.quantiles() {
                push(quantile.as_str(), PointValue::Signed(*value as i64));
            }
        }
        Ok(points)
    }
}
