/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::path::Path;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use tally_histogram::HistogramConfig;

mod reporter;
pub use reporter::{ApplicationTags, ReporterConfig};

mod sender;
pub use sender::{RetryConfig, SenderConfig};

mod transport;
pub use transport::{TransportConfig, TransportKind};

/// Everything needed to run the reporting pipeline
#[derive(Clone, Debug, Default)]
pub struct PipelineConfig {
    pub sender: SenderConfig,
    pub transport: TransportConfig,
    pub reporter: ReporterConfig,
    pub histogram: HistogramConfig,
}

impl PipelineConfig {
    /// The interval between two reporter ticks
    pub fn emit_interval(&self) -> std::time::Duration {
        self.reporter
            .emit_interval
            .unwrap_or(self.sender.flush_interval)
    }

    pub fn parse_yaml(v: &Yaml, lookup_dir: Option<&Path>) -> anyhow::Result<Self> {
        let Yaml::Hash(map) = v else {
            return Err(anyhow!("yaml value type for the main config should be 'map'"));
        };

        let mut config = PipelineConfig::default();
        let mut transport_set = false;
        tally_yaml::foreach_kv(map, |k, v| {
            match tally_yaml::key::normalize(k).as_str() {
                "sender" => {
                    config.sender =
                        SenderConfig::parse_yaml(v).context(format!("invalid value for key {k}"))?;
                }
                "transport" => {
                    config.transport = TransportConfig::parse_yaml(v, lookup_dir)
                        .context(format!("invalid value for key {k}"))?;
                    transport_set = true;
                }
                "reporter" => {
                    config.reporter = ReporterConfig::parse_yaml(v)
                        .context(format!("invalid value for key {k}"))?;
                }
                "histogram" => {
                    config.histogram = tally_yaml::value::as_histogram_config(v)
                        .context(format!("invalid histogram config value for key {k}"))?;
                }
                _ => return Err(anyhow!("invalid key {k}")),
            }
            Ok(())
        })?;

        if !transport_set {
            return Err(anyhow!("no transport config found"));
        }
        Ok(config)
    }
}

/// Load the config file, relative paths inside are resolved against its directory
pub fn load(path: &Path) -> anyhow::Result<PipelineConfig> {
    let doc = tally_yaml::load_doc(path)?;
    PipelineConfig::parse_yaml(&doc, path.parent())
        .context(format!("failed to parse config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tally_yaml::yaml_doc;

    #[test]
    fn parse_full() {
        let yaml = yaml_doc!(
            r#"
                sender:
                  batch_size: 100
                  max_buffer_size: 1K
                  flush_interval: 2s
                transport:
                  type: http
                  server: https://vmware.wavefront.com
                  token_file: wavefront.token
                reporter:
                  prefix: compute.test
                  tags:
                    env: dev
                histogram:
                  quantile: [0.5, 0.99]
            "#
        );
        let config = PipelineConfig::parse_yaml(&yaml, Some(Path::new("/etc/tally"))).unwrap();
        assert_eq!(config.sender.batch_size, 100);
        assert_eq!(config.sender.max_buffer_size, 1000);
        assert_eq!(config.emit_interval(), Duration::from_secs(2));
        assert_eq!(config.transport.kind, TransportKind::Http);
        assert_eq!(config.histogram.quantile_list().len(), 2);
        assert_eq!(config.reporter.global_tags().to_string(), "env=dev");
    }

    #[test]
    fn emit_interval_override() {
        let yaml = yaml_doc!(
            r#"
                transport:
                  type: discard
                reporter:
                  emit_interval: 5s
            "#
        );
        let config = PipelineConfig::parse_yaml(&yaml, None).unwrap();
        assert_eq!(config.sender, SenderConfig::default());
        assert_eq!(config.emit_interval(), Duration::from_secs(5));
    }

    #[test]
    fn load_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("conf/tally.yaml");
        let config = load(&path).unwrap();
        assert_eq!(config.sender, SenderConfig::default());
        assert_eq!(config.emit_interval(), Duration::from_secs(1));
        assert_eq!(
            config.transport.token_file,
            Some(Path::new(env!("CARGO_MANIFEST_DIR")).join("conf/wavefront.token"))
        );
        assert_eq!(config.transport.source, "compute-test");
        assert_eq!(
            config.reporter.global_tags().to_string(),
            "application=compute-test-app,env=dev,service=compute-test-service"
        );
        assert_eq!(config.histogram.quantile_list().len(), 5);
        assert_eq!(config.histogram.max_value(), 3_600_000_000);

        assert!(load(Path::new("/no/such/tally.yaml")).is_err());
    }

    #[test]
    fn parse_err() {
        let yaml = yaml_doc!("sender: {batch_size: 10}");
        assert!(PipelineConfig::parse_yaml(&yaml, None).is_err());

        let yaml = yaml_doc!("transport: {type: discard}\nexporter: {}");
        assert!(PipelineConfig::parse_yaml(&yaml, None).is_err());

        let yaml = yaml_doc!("- transport");
        assert!(PipelineConfig::parse_yaml(&yaml, None).is_err());
    }
}
