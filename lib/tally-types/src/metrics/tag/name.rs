/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;

use crate::metrics::{ParseError, chars_allowed_in_opentsdb};

#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct MetricTagName(SmolStr);

impl MetricTagName {
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Build a tag name from a static str
    ///
    /// # Panics
    ///
    /// Panics if the name contains chars not allowed in tag names.
    pub fn from_static(name: &'static str) -> Self {
        match chars_allowed_in_opentsdb(name) {
            Ok(_) if !name.is_empty() => MetricTagName(SmolStr::new_static(name)),
            _ => panic!("invalid static metric tag name {name}"),
        }
    }
}

impl AsRef<str> for MetricTagName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for MetricTagName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseError::Empty);
        }
        chars_allowed_in_opentsdb(s)?;
        Ok(MetricTagName(s.into()))
    }
}

impl fmt::Display for MetricTagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_tag_name() {
        assert_eq!(
            MetricTagName::from_str("abc-1").unwrap(),
            MetricTagName("abc-1".into())
        );

        assert!(MetricTagName::from_str("a=b").is_err());
        assert_eq!(MetricTagName::from_str(""), Err(ParseError::Empty));
        assert_eq!(MetricTagName::from_static("env").as_str(), "env");
    }
}
