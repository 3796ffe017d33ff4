/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseQuantileError {
    #[error("not a valid float value")]
    NotFloat,
    #[error("quantile value should be in range (0, 1]")]
    OutOfRange,
}

/// A quantile and the stat name it is reported as, like `p99` for 0.99
#[derive(Clone, Debug)]
pub struct Quantile {
    value: f64,
    name: String,
}

impl Quantile {
    pub fn pct50() -> Self {
        Quantile::new_unchecked(0.50, "p50")
    }

    pub fn pct75() -> Self {
        Quantile::new_unchecked(0.75, "p75")
    }

    pub fn pct95() -> Self {
        Quantile::new_unchecked(0.95, "p95")
    }

    pub fn pct99() -> Self {
        Quantile::new_unchecked(0.99, "p99")
    }

    pub fn pct999() -> Self {
        Quantile::new_unchecked(0.999, "p999")
    }

    fn new_unchecked(value: f64, name: &str) -> Self {
        Quantile {
            value,
            name: name.to_string(),
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl FromStr for Quantile {
    type Err = ParseQuantileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = f64::from_str(s).map_err(|_| ParseQuantileError::NotFloat)?;
        if !(value > 0.0 && value <= 1.0) {
            return Err(ParseQuantileError::OutOfRange);
        }
        if value == 1.0 {
            return Ok(Quantile::new_unchecked(value, "p100"));
        }

        // shortest repr of the value, always "0.xxx" here
        let repr = value.to_string();
        let mut digits = repr.trim_start_matches("0.").to_string();
        if digits.len() == 1 {
            digits.push('0');
        }
        Ok(Quantile {
            value,
            name: format!("p{digits}"),
        })
    }
}

impl fmt::Display for Quantile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl PartialEq for Quantile {
    fn eq(&self, other: &Self) -> bool {
        self.value.total_cmp(&other.value) == Ordering::Equal
    }
}

impl Eq for Quantile {}

impl PartialOrd for Quantile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.total_cmp(&other.value)
    }
}
