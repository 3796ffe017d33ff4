/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use chrono::{DateTime, Utc};

use tally_types::metrics::{MetricName, MetricTagMap};

use super::PointValue;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointKind {
    Counter,
    DeltaCounter,
    Histogram,
}

/// A value ready to be sent, it can not be changed after creation
#[derive(Clone, Debug, PartialEq)]
pub struct DataPoint {
    name: MetricName,
    tags: Arc<MetricTagMap>,
    value: PointValue,
    timestamp: DateTime<Utc>,
    kind: PointKind,
}

impl DataPoint {
    pub fn new(
        name: MetricName,
        tags: Arc<MetricTagMap>,
        value: PointValue,
        timestamp: DateTime<Utc>,
        kind: PointKind,
    ) -> Self {
        DataPoint {
            name,
            tags,
            value,
            timestamp,
            kind,
        }
    }

    #[inline]
    pub fn name(&self) -> &MetricName {
        &self.name
    }

    #[inline]
    pub fn tags(&self) -> &MetricTagMap {
        &self.tags
    }

    #[inline]
    pub fn value(&self) -> PointValue {
        self.value
    }

    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[inline]
    pub fn kind(&self) -> PointKind {
        self.kind
    }
}
