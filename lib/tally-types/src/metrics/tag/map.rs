/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;
use std::fmt::{self, Write};
use std::str::FromStr;

use crate::metrics::{MetricTagName, MetricTagValue, ParseError};

/// Tag set attached to a metric.
///
/// Backed by an ordered map, so two maps with the same content always compare
/// and hash equal, whatever the insertion order was.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MetricTagMap {
    inner: BTreeMap<MetricTagName, MetricTagValue>,
}

impl MetricTagMap {
    /// Build a tag map from string pairs, validating every name and value
    pub fn try_from_pairs<'a, I>(pairs: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut map = MetricTagMap::default();
        for (k, v) in pairs {
            let name = MetricTagName::from_str(k)?;
            let value = MetricTagValue::from_str(v)?;
            map.inner.insert(name, value);
        }
        Ok(map)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn insert(&mut self, name: MetricTagName, value: MetricTagValue) -> Option<MetricTagValue> {
        self.inner.insert(name, value)
    }

    /// Add all tags in `other`, values in `other` win on conflict
    #[inline]
    pub fn extend(&mut self, other: &Self) {
        self.inner
            .extend(other.inner.iter().map(|(k, v)| (k.clone(), v.clone())))
    }

    #[inline]
    pub fn contains(&self, key: &MetricTagName) -> bool {
        self.inner.contains_key(key)
    }

    #[inline]
    pub fn get(&self, key: &MetricTagName) -> Option<&MetricTagValue> {
        self.inner.get(key)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&MetricTagName, &MetricTagValue)> {
        self.inner.iter()
    }

    #[inline]
    pub fn drop(&mut self, name: &MetricTagName) {
        self.inner.remove(name);
    }
}

impl FromIterator<(MetricTagName, MetricTagValue)> for MetricTagMap {
    fn from_iter<T: IntoIterator<Item = (MetricTagName, MetricTagValue)>>(iter: T) -> Self {
        MetricTagMap {
            inner: BTreeMap::from_iter(iter),
        }
    }
}

impl fmt::Display for MetricTagMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.inner.iter();
        let Some((name, value)) = iter.next() else {
            return Ok(());
        };
        f.write_str(name.as_str())?;
        f.write_char('=')?;
        f.write_str(value.as_str())?;

        for (name, value) in iter {
            f.write_char(',')?;
            f.write_str(name.as_str())?;
            f.write_char('=')?;
            f.write_str(value.as_str())?;
        }
        Ok(())
    }
}
