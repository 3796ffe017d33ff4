/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, yaml};

/// Call `f` for every entry of a yaml map, the keys should all be strings
pub fn foreach_kv<F>(table: &yaml::Hash, mut f: F) -> anyhow::Result<()>
where
    F: FnMut(&str, &Yaml) -> anyhow::Result<()>,
{
    for (k, v) in table.iter() {
        let Yaml::String(key) = k else {
            return Err(anyhow!("key in hash should be string, found {k:?}"));
        };
        f(key, v).context(format!("failed to parse value of key {key}"))?;
    }
    Ok(())
}

pub fn get_required<'a>(map: &'a yaml::Hash, k: &str) -> anyhow::Result<&'a Yaml> {
    map.get(&Yaml::String(k.to_owned()))
        .ok_or_else(|| anyhow!("no required key {k} found in this map"))
}

pub fn get_required_str<'a>(map: &'a yaml::Hash, k: &str) -> anyhow::Result<&'a str> {
    match get_required(map, k)? {
        Yaml::String(s) => Ok(s),
        _ => Err(anyhow!("invalid string value for required key {k}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreach_kv_in_order() {
        let yaml = yaml_doc!("batch_size: 2\nmax_buffer_size: 5");
        let hash = yaml.as_hash().unwrap();
        let mut seen = Vec::new();
        foreach_kv(hash, |k, v| {
            seen.push((k.to_owned(), v.as_i64().unwrap()));
            Ok(())
        })
        .unwrap();
        assert_eq!(
            seen,
            [("batch_size".to_string(), 2), ("max_buffer_size".to_string(), 5)]
        );
    }

    #[test]
    fn foreach_kv_err() {
        let yaml = yaml_doc!("1: 1");
        let hash = yaml.as_hash().unwrap();
        assert!(foreach_kv(hash, |_, _| Ok(())).is_err());

        let yaml = yaml_doc!("server: x");
        let hash = yaml.as_hash().unwrap();
        let e = foreach_kv(hash, |k, _| Err(anyhow!("bad {k}"))).unwrap_err();
        assert_eq!(e.to_string(), "failed to parse value of key server");
    }

    #[test]
    fn required() {
        let yaml = yaml_doc!("type: http\nport: 80");
        let hash = yaml.as_hash().unwrap();
        assert_eq!(get_required_str(hash, "type").unwrap(), "http");
        assert!(get_required(hash, "server").is_err());
        assert!(get_required_str(hash, "port").is_err());
    }
}
