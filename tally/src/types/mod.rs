/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;

use tally_types::metrics::{MetricName, MetricTagMap};

mod value;
pub use value::PointValue;

mod point;
pub use point::{DataPoint, PointKind};

/// The registry key of an instrument
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MetricIdentity {
    pub name: MetricName,
    pub tags: MetricTagMap,
}

impl MetricIdentity {
    pub fn new(name: MetricName, tags: MetricTagMap) -> Self {
        MetricIdentity { name, tags }
    }
}

impl fmt::Display for MetricIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tags.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}{{{}}}", self.name, self.tags)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn display() {
        let name = MetricName::from_str("counter").unwrap();
        let id = MetricIdentity::new(name.clone(), MetricTagMap::default());
        assert_eq!(id.to_string(), "counter");

        let tags = MetricTagMap::try_from_pairs([("env", "dev")]).unwrap();
        let id = MetricIdentity::new(name, tags);
        assert_eq!(id.to_string(), "counter{env=dev}");
    }
}
