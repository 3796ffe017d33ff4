/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::time::Duration;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use tally_types::metrics::{MetricName, MetricTagMap, MetricTagName, MetricTagValue};

const TAG_KEY_APPLICATION: &str = "application";
const TAG_KEY_SERVICE: &str = "service";
const TAG_KEY_CLUSTER: &str = "cluster";
const TAG_KEY_SHARD: &str = "shard";

/// Tags that identify the reporting application
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplicationTags {
    pub application: Option<MetricTagValue>,
    pub service: Option<MetricTagValue>,
    pub cluster: Option<MetricTagValue>,
    pub shard: Option<MetricTagValue>,
}

impl ApplicationTags {
    fn add_to(&self, map: &mut MetricTagMap) {
        let all = [
            (TAG_KEY_APPLICATION, &self.application),
            (TAG_KEY_SERVICE, &self.service),
            (TAG_KEY_CLUSTER, &self.cluster),
            (TAG_KEY_SHARD, &self.shard),
        ];
        for (key, value) in all {
            if let Some(value) = value {
                map.insert(MetricTagName::from_static(key), value.clone());
            }
        }
    }

    fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        let Yaml::Hash(map) = v else {
            return Err(anyhow!("yaml value type for 'application tags' should be 'map'"));
        };

        let mut tags = ApplicationTags::default();
        tally_yaml::foreach_kv(map, |k, v| {
            let key = tally_yaml::key::normalize(k);
            let slot = match key.as_str() {
                TAG_KEY_APPLICATION => &mut tags.application,
                TAG_KEY_SERVICE => &mut tags.service,
                TAG_KEY_CLUSTER => &mut tags.cluster,
                TAG_KEY_SHARD => &mut tags.shard,
                _ => return Err(anyhow!("invalid key {k}")),
            };
            let s = tally_yaml::value::as_string(v)
                .context(format!("invalid string value for key {k}"))?;
            let value = s
                .parse::<MetricTagValue>()
                .context(format!("invalid metric tag value for key {k}"))?;
            *slot = Some(value);
            Ok(())
        })?;
        Ok(tags)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReporterConfig {
    pub prefix: Option<MetricName>,
    /// Falls back to the flush interval of the sender if not set
    pub emit_interval: Option<Duration>,
    pub log_errors: bool,
    /// Keep drained deltas of a rejected cycle and report them in the next one
    pub carry_over_deltas: bool,
    pub application: ApplicationTags,
    pub tags: MetricTagMap,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        ReporterConfig {
            prefix: None,
            emit_interval: None,
            log_errors: true,
            carry_over_deltas: true,
            application: ApplicationTags::default(),
            tags: MetricTagMap::default(),
        }
    }
}

impl ReporterConfig {
    /// Tags added to every data point, the plain tags override the application ones
    pub fn global_tags(&self) -> MetricTagMap {
        let mut map = MetricTagMap::default();
        self.application.add_to(&mut map);
        map.extend(&self.tags);
        map
    }

    pub(crate) fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        let Yaml::Hash(map) = v else {
            return Err(anyhow!("yaml value type for 'reporter config' should be 'map'"));
        };

        let mut config = ReporterConfig::default();
        tally_yaml::foreach_kv(map, |k, v| config.set_by_yaml_kv(k, v))?;
        if config.emit_interval.is_some_and(|d| d.is_zero()) {
            return Err(anyhow!("emit interval should not be 0"));
        }
        Ok(config)
    }

    fn set_by_yaml_kv(&mut self, k: &str, v: &Yaml) -> anyhow::Result<()> {
        match tally_yaml::key::normalize(k).as_str() {
            "prefix" => {
                let prefix = tally_yaml::value::as_metric_name(v)
                    .context(format!("invalid metric name value for key {k}"))?;
                self.prefix = Some(prefix);
            }
            "emit_interval" => {
                let interval = tally_yaml::humanize::as_duration(v)
                    .context(format!("invalid humanize duration value for key {k}"))?;
                self.emit_interval = Some(interval);
            }
            "log_errors" => {
                self.log_errors = tally_yaml::value::as_bool(v)
                    .context(format!("invalid bool value for key {k}"))?;
            }
            "carry_over_deltas" => {
                self.carry_over_deltas = tally_yaml::value::as_bool(v)
                    .context(format!("invalid bool value for key {k}"))?;
            }
            "application" | "application_tags" => {
                self.application = ApplicationTags::parse_yaml(v)
                    .context(format!("invalid application tags value for key {k}"))?;
            }
            "tags" | "global_tags" => {
                self.tags = tally_yaml::value::as_metric_tag_map(v)
                    .context(format!("invalid metric tag map value for key {k}"))?;
            }
            _ => return Err(anyhow!("invalid key {k}")),
        }
        Ok(())
    }
}
