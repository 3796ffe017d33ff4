/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, anyhow};
use url::Url;
use yaml_rust::Yaml;

use crate::transport::{ConsoleTransport, DiscardTransport, HttpTransport, Transport};

const DEFAULT_SOURCE: &str = "localhost";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransportKind {
    #[default]
    Http,
    Console,
    Discard,
}

impl FromStr for TransportKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" | "direct" => Ok(TransportKind::Http),
            "console" | "stdout" => Ok(TransportKind::Console),
            "discard" | "null" => Ok(TransportKind::Discard),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportConfig {
    pub kind: TransportKind,
    pub server: Option<Url>,
    pub token: Option<String>,
    pub token_file: Option<PathBuf>,
    /// Value of the `source` field of every line
    pub source: String,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            kind: TransportKind::default(),
            server: None,
            token: None,
            token_file: None,
            source: DEFAULT_SOURCE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    pub(crate) fn parse_yaml(v: &Yaml, lookup_dir: Option<&Path>) -> anyhow::Result<Self> {
        let Yaml::Hash(map) = v else {
            return Err(anyhow!(
                "yaml value type for 'transport config' should be 'map'"
            ));
        };

        let kind = tally_yaml::hash_get_required_str(map, "type")?;
        let mut config = TransportConfig {
            kind: TransportKind::from_str(kind)
                .map_err(|_| anyhow!("invalid transport type {kind}"))?,
            ..Default::default()
        };
        tally_yaml::foreach_kv(map, |k, v| config.set_by_yaml_kv(k, v, lookup_dir))?;
        config.check()?;
        Ok(config)
    }

    fn set_by_yaml_kv(
        &mut self,
        k: &str,
        v: &Yaml,
        lookup_dir: Option<&Path>,
    ) -> anyhow::Result<()> {
        match tally_yaml::key::normalize(k).as_str() {
            "type" => {}
            "server" => {
                let url =
                    tally_yaml::value::as_url(v).context(format!("invalid url value for key {k}"))?;
                self.server = Some(url);
            }
            "token" => {
                let token = tally_yaml::value::as_string(v)
                    .context(format!("invalid string value for key {k}"))?;
                self.token = Some(token);
            }
            "token_file" => {
                let s = tally_yaml::value::as_string(v)
                    .context(format!("invalid string value for key {k}"))?;
                let path = PathBuf::from(s);
                let path = match lookup_dir {
                    Some(dir) if path.is_relative() => dir.join(path),
                    _ => path,
                };
                self.token_file = Some(path);
            }
            "source" => {
                self.source = tally_yaml::value::as_string(v)
                    .context(format!("invalid string value for key {k}"))?;
            }
            "timeout" => {
                self.timeout = tally_yaml::humanize::as_duration(v)
                    .context(format!("invalid humanize duration value for key {k}"))?;
            }
            _ => return Err(anyhow!("invalid key {k}")),
        }
        Ok(())
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.source.is_empty() {
            return Err(anyhow!("source should not be empty"));
        }
        if self.kind == TransportKind::Http {
            if self.server.is_none() {
                return Err(anyhow!("server is required for http transport"));
            }
            if self.token.is_none() && self.token_file.is_none() {
                return Err(anyhow!("token or token_file is required for http transport"));
            }
        }
        Ok(())
    }

    /// Build the transport, loading the token file if needed
    pub fn build(&self) -> anyhow::Result<Arc<dyn Transport>> {
        match self.kind {
            TransportKind::Http => {
                let server = self
                    .server
                    .as_ref()
                    .ok_or_else(|| anyhow!("no server set for http transport"))?;
                let token = match (&self.token, &self.token_file) {
                    (Some(token), _) => token.clone(),
                    (None, Some(path)) => crate::credential::load_token(path)?,
                    (None, None) => return Err(anyhow!("no token set for http transport")),
                };
                let transport = HttpTransport::new(server, &token, &self.source, self.timeout)
                    .context(format!("failed to create http transport to {server}"))?;
                Ok(Arc::new(transport))
            }
            TransportKind::Console => Ok(Arc::new(ConsoleTransport::new(&self.source))),
            TransportKind::Discard => Ok(Arc::new(DiscardTransport)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_yaml::yaml_doc;

    #[test]
    fn parse_http() {
        let yaml = yaml_doc!(
            r#"
                type: http
                server: https://vmware.wavefront.com
                token_file: wavefront.token
                source: compute-test
                timeout: 5s
            "#
        );
        let config = TransportConfig::parse_yaml(&yaml, Some(Path::new("/etc/tally"))).unwrap();
        assert_eq!(config.kind, TransportKind::Http);
        assert_eq!(
            config.server.as_ref().map(|u| u.as_str()),
            Some("https://vmware.wavefront.com/")
        );
        assert_eq!(
            config.token_file.as_deref(),
            Some(Path::new("/etc/tally/wavefront.token"))
        );
        assert_eq!(config.source, "compute-test");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn parse_console() {
        let yaml = yaml_doc!("type: console");
        let config = TransportConfig::parse_yaml(&yaml, None).unwrap();
        assert_eq!(config.kind, TransportKind::Console);
        assert_eq!(config.source, "localhost");
        assert_eq!(config.build().unwrap().name(), "console");

        let yaml = yaml_doc!("type: discard");
        let config = TransportConfig::parse_yaml(&yaml, None).unwrap();
        assert_eq!(config.build().unwrap().name(), "discard");
    }

    #[test]
    fn parse_err() {
        // http without server or token
        let yaml = yaml_doc!("type: http");
        assert!(TransportConfig::parse_yaml(&yaml, None).is_err());

        // no type
        let yaml = yaml_doc!("server: https://a.com\ntoken: abc");
        assert!(TransportConfig::parse_yaml(&yaml, None).is_err());

        let yaml = yaml_doc!("type: grpc");
        assert!(TransportConfig::parse_yaml(&yaml, None).is_err());

        let yaml = yaml_doc!("type: console\nport: 80");
        assert!(TransportConfig::parse_yaml(&yaml, None).is_err());
    }

    #[test]
    fn build_http() {
        let yaml = yaml_doc!("type: http\nserver: https://a.com\ntoken: abc");
        let config = TransportConfig::parse_yaml(&yaml, None).unwrap();
        assert_eq!(config.build().unwrap().name(), "http");

        let yaml = yaml_doc!("type: http\nserver: ftp://a.com\ntoken: abc");
        let config = TransportConfig::parse_yaml(&yaml, None).unwrap();
        assert!(config.build().is_err());

        let yaml = yaml_doc!("type: http\nserver: https://a.com\ntoken_file: /no/such/file");
        let config = TransportConfig::parse_yaml(&yaml, None).unwrap();
        assert!(config.build().is_err());
    }
}
