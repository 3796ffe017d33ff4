/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeSet;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use tally_histogram::{HistogramConfig, Quantile};

pub fn as_quantile(value: &Yaml) -> anyhow::Result<Quantile> {
    match value {
        Yaml::String(s) | Yaml::Real(s) => {
            Quantile::from_str(s).map_err(|e| anyhow!("invalid quantile value: {e}"))
        }
        Yaml::Integer(1) => Quantile::from_str("1").map_err(|e| anyhow!("{e}")),
        _ => Err(anyhow!(
            "yaml value type for 'quantile' should be 'str' or 'float'"
        )),
    }
}

pub fn as_quantile_list(value: &Yaml) -> anyhow::Result<BTreeSet<Quantile>> {
    let mut set = BTreeSet::new();
    match value {
        Yaml::String(s) => {
            for v in s.split(',') {
                let f = Quantile::from_str(v.trim())
                    .map_err(|e| anyhow!("invalid quantile string {v}: {e}"))?;
                set.insert(f);
            }
        }
        Yaml::Array(seq) => {
            for (i, v) in seq.iter().enumerate() {
                let f =
                    as_quantile(v).context(format!("invalid quantile value for element #{i}"))?;
                set.insert(f);
            }
        }
        _ => {
            return Err(anyhow!(
                "the yaml value type for 'histogram quantile' should be 'seq' or 'str'"
            ));
        }
    }
    Ok(set)
}

pub fn as_histogram_config(value: &Yaml) -> anyhow::Result<HistogramConfig> {
    let Yaml::Hash(map) = value else {
        return Err(anyhow!(
            "yaml value type for 'histogram config' should be 'map'"
        ));
    };

    let mut config = HistogramConfig::default();
    crate::foreach_kv(map, |k, v| match crate::key::normalize(k).as_str() {
        "quantile" | "quantiles" => {
            let list = as_quantile_list(v)
                .context(format!("invalid quantile list value for key {k}"))?;
            config.set_quantile_list(list);
            Ok(())
        }
        "max_value" => {
            let max = crate::humanize::as_u64(v)
                .context(format!("invalid humanize u64 value for key {k}"))?;
            config.set_max_value(max);
            Ok(())
        }
        "significant_figures" | "sigfig" => {
            let sigfig = crate::value::as_u8(v).context(format!("invalid u8 value for key {k}"))?;
            config.set_significant_figures(sigfig);
            Ok(())
        }
        _ => Err(anyhow!("invalid key {k}")),
    })?;
    config
        .build()
        .map_err(|e| anyhow!("invalid histogram config: {e}"))?;
    Ok(config)
}
