/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use anyhow::anyhow;
use url::Url;
use yaml_rust::Yaml;

pub fn as_url(v: &Yaml) -> anyhow::Result<Url> {
    if let Yaml::String(s) = v {
        Url::from_str(s).map_err(|e| anyhow!("invalid url string: {e}"))
    } else {
        Err(anyhow!("yaml value type for 'url' should be 'string'"))
    }
}
