/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

use super::{ParseError, chars_allowed_in_opentsdb};

/// Dot separated metric name, validated at parse time.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MetricName(SmolStr);

impl MetricName {
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Join `prefix` and `self` with a '.'
    pub fn with_prefix(&self, prefix: Option<&MetricName>) -> MetricName {
        match prefix {
            Some(p) => MetricName(smol_str::format_smolstr!("{}.{}", p.0, self.0)),
            None => self.clone(),
        }
    }

    /// Append a '.' separated suffix node
    ///
    /// The suffix should only contain chars allowed in metric names.
    pub fn with_suffix(&self, suffix: &str) -> MetricName {
        MetricName(smol_str::format_smolstr!("{}.{suffix}", self.0))
    }
}

impl FromStr for MetricName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseError::Empty);
        }
        chars_allowed_in_opentsdb(s)?;
        Ok(MetricName(s.into()))
    }
}

impl AsRef<str> for MetricName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        let name = MetricName::from_str("compute.test.counter").unwrap();
        assert_eq!(name.as_str(), "compute.test.counter");

        assert_eq!(MetricName::from_str(""), Err(ParseError::Empty));
        assert!(MetricName::from_str("a:b").is_err());
    }

    #[test]
    fn prefix_suffix() {
        let prefix = MetricName::from_str("compute.test").unwrap();
        let name = MetricName::from_str("hist1").unwrap();
        let full = name.with_prefix(Some(&prefix)).with_suffix("p99");
        assert_eq!(full.as_str(), "compute.test.hist1.p99");

        let full = name.with_prefix(None);
        assert_eq!(full, name);
    }
}
