/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::time::Duration;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

/// Backoff settings for transient delivery failures
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total delivery attempts for a batch, including the first one
    pub max_attempts: usize,
    pub base_wait: Duration,
    pub max_wait: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_attempts: 3,
            base_wait: Duration::from_millis(100),
            max_wait: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    /// Wait time before retry number `retry` (starting from 1), without jitter
    pub fn backoff(&self, retry: usize) -> Duration {
        let shift = retry.saturating_sub(1).min(16) as u32;
        self.base_wait
            .saturating_mul(1 << shift)
            .min(self.max_wait)
    }

    pub(crate) fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        let Yaml::Hash(map) = v else {
            return Err(anyhow!("yaml value type for 'retry config' should be 'map'"));
        };

        let mut config = RetryConfig::default();
        tally_yaml::foreach_kv(map, |k, v| match tally_yaml::key::normalize(k).as_str() {
            "max_attempts" => {
                config.max_attempts = tally_yaml::humanize::as_usize(v)
                    .context(format!("invalid usize value for key {k}"))?;
                Ok(())
            }
            "base_wait" => {
                config.base_wait = tally_yaml::humanize::as_duration(v)
                    .context(format!("invalid humanize duration value for key {k}"))?;
                Ok(())
            }
            "max_wait" => {
                config.max_wait = tally_yaml::humanize::as_duration(v)
                    .context(format!("invalid humanize duration value for key {k}"))?;
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        })?;
        Ok(config)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SenderConfig {
    /// Max data points in one outbound batch
    pub batch_size: usize,
    /// Hard cap of buffered but not yet delivered data points
    pub max_buffer_size: usize,
    /// Max time between two flush attempts
    pub flush_interval: Duration,
    pub retry: RetryConfig,
}

impl Default for SenderConfig {
    fn default() -> Self {
        SenderConfig {
            batch_size: 10_000,
            max_buffer_size: 50_000,
            flush_interval: Duration::from_secs(1),
            retry: RetryConfig::default(),
        }
    }
}

impl SenderConfig {
    pub fn check(&self) -> anyhow::Result<()> {
        if self.batch_size == 0 {
            return Err(anyhow!("batch size should not be 0"));
        }
        if self.max_buffer_size < self.batch_size {
            return Err(anyhow!(
                "max buffer size {} should not be less than batch size {}",
                self.max_buffer_size,
                self.batch_size
            ));
        }
        if self.flush_interval.is_zero() {
            return Err(anyhow!("flush interval should not be 0"));
        }
        if self.retry.max_attempts == 0 {
            return Err(anyhow!("retry max attempts should not be 0"));
        }
        Ok(())
    }

    pub(crate) fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        let Yaml::Hash(map) = v else {
            return Err(anyhow!("yaml value type for 'sender config' should be 'map'"));
        };

        let mut config = SenderConfig::default();
        tally_yaml::foreach_kv(map, |k, v| config.set_by_yaml_kv(k, v))?;
        config.check()?;
        Ok(config)
    }

    fn set_by_yaml_kv(&mut self, k: &str, v: &Yaml) -> anyhow::Result<()> {
        match tally_yaml::key::normalize(k).as_str() {
            "batch_size" => {
                self.batch_size = tally_yaml::humanize::as_usize(v)
                    .context(format!("invalid humanize usize value for key {k}"))?;
            }
            "max_buffer_size" => {
                self.max_buffer_size = tally_yaml::humanize::as_usize(v)
                    .context(format!("invalid humanize usize value for key {k}"))?;
            }
            "flush_interval" | "flush_interval_seconds" => {
                self.flush_interval = tally_yaml::humanize::as_duration(v)
                    .context(format!("invalid humanize duration value for key {k}"))?;
            }
            "retry" => {
                self.retry =
                    RetryConfig::parse_yaml(v).context(format!("invalid value for key {k}"))?;
            }
            _ => return Err(anyhow!("invalid key {k}")),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_yaml::yaml_doc;

    #[test]
    fn parse_sender() {
        let yaml = yaml_doc!(
            r#"
                batch_size: 2
                max-buffer-size: 5
                flush_interval: 1
                retry:
                  max_attempts: 4
                  base_wait: 10ms
            "#
        );
        let config = SenderConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(config.batch_size, 2);
        assert_eq!(config.max_buffer_size, 5);
        assert_eq!(config.flush_interval, Duration::from_secs(1));
        assert_eq!(config.retry.max_attempts, 4);
        assert_eq!(config.retry.base_wait, Duration::from_millis(10));
        assert_eq!(config.retry.max_wait, Duration::from_secs(5));
    }

    #[test]
    fn parse_sender_err() {
        let yaml = yaml_doc!("batch_size: 0");
        assert!(SenderConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!("batch_size: 10\nmax_buffer_size: 5");
        assert!(SenderConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!("flush_interval: 0");
        assert!(SenderConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!("unknown: 1");
        assert!(SenderConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!("retry: {max_attempts: 0}");
        assert!(SenderConfig::parse_yaml(&yaml).is_err());

        let yaml = Yaml::Integer(1);
        assert!(SenderConfig::parse_yaml(&yaml).is_err());
    }

    #[test]
    fn backoff_capped() {
        let retry = RetryConfig {
            max_attempts: 10,
            base_wait: Duration::from_millis(100),
            max_wait: Duration::from_millis(350),
        };
        assert_eq!(retry.backoff(1), Duration::from_millis(100));
        assert_eq!(retry.backoff(2), Duration::from_millis(200));
        assert_eq!(retry.backoff(3), Duration::from_millis(350));
        assert_eq!(retry.backoff(60), Duration::from_millis(350));
    }
}
