/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use tally_types::metrics::{MetricName, MetricTagMap, MetricTagName, MetricTagValue};

pub fn as_metric_name(v: &Yaml) -> anyhow::Result<MetricName> {
    if let Yaml::String(s) = v {
        MetricName::from_str(s).map_err(|e| anyhow!("invalid metric name: {e}"))
    } else {
        Err(anyhow!("yaml value type for 'metric name' should be 'string'"))
    }
}

pub fn as_metric_tag_map(v: &Yaml) -> anyhow::Result<MetricTagMap> {
    if let Yaml::Hash(map) = v {
        let mut tags = MetricTagMap::default();
        crate::foreach_kv(map, |k, v| {
            let name = MetricTagName::from_str(k).context("invalid metric tag name")?;
            let value_s = crate::value::as_string(v).context("invalid metric tag yaml value")?;
            let value = MetricTagValue::from_str(&value_s).context("invalid metric tag value")?;

            if tags.insert(name, value).is_some() {
                Err(anyhow!("found duplicate value for tag name {k}"))
            } else {
                Ok(())
            }
        })?;
        Ok(tags)
    } else {
        Err(anyhow!(
            "the yaml value type for 'metric tags' should be 'map'"
        ))
    }
}
