/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::time::Duration;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use log::trace;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use url::Url;

use super::{DeliveryError, Transport, format};
use crate::types::DataPoint;

/// Wavefront direct ingestion
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
    source: String,
}

impl HttpTransport {
    pub fn new(server: &Url, token: &str, source: &str, timeout: Duration) -> anyhow::Result<Self> {
        match server.scheme() {
            "http" | "https" => {}
            s => return Err(anyhow!("unsupported scheme {s} in server url {server}")),
        }
        if server.host_str().is_none() {
            return Err(anyhow!("no host found in server url {server}"));
        }
        let token = token.trim();
        if token.is_empty() {
            return Err(anyhow!("empty api token"));
        }

        let endpoint = format!("{}/report", server.as_str().trim_end_matches('/'));
        let mut endpoint =
            Url::parse(&endpoint).context(format!("invalid report url {endpoint}"))?;
        endpoint.query_pairs_mut().append_pair("f", "wavefront");

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| anyhow!("api token contains invalid header characters"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("failed to build http client")?;

        Ok(HttpTransport {
            client,
            endpoint,
            source: source.to_string(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn check_status(status: StatusCode) -> Result<(), DeliveryError> {
    if status.is_success() {
        return Ok(());
    }
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
            Err(DeliveryError::Transient(format!("server returned {status}")))
        }
        s if s.is_server_error() => Err(DeliveryError::Transient(format!("server returned {s}"))),
        s => Err(DeliveryError::Permanent(format!("server returned {s}"))),
    }
}

fn map_request_error(e: reqwest::Error) -> DeliveryError {
    if e.is_builder() {
        DeliveryError::Permanent(format!("failed to build request: {e}"))
    } else if e.is_timeout() {
        DeliveryError::Transient(format!("request timed out: {e}"))
    } else if e.is_connect() {
        DeliveryError::Transient(format!("connect failed: {e}"))
    } else {
        DeliveryError::Transient(format!("request failed: {e}"))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn deliver(&self, batch: &[DataPoint]) -> Result<(), DeliveryError> {
        let body = format::format_batch(&self.source, batch);
        trace!("posting {} points to {}", batch.len(), self.endpoint);
        let rsp = self
            .client
            .post(self.endpoint.clone())
            .body(body)
            .send()
            .await
            .map_err(map_request_error)?;
        check_status(rsp.status())
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn build() {
        let t = HttpTransport::new(
            &url("https://vmware.wavefront.com"),
            "token",
            "localhost",
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(
            t.endpoint().as_str(),
            "https://vmware.wavefront.com/report?f=wavefront"
        );

        let t = HttpTransport::new(
            &url("http://127.0.0.1:2878/"),
            "token",
            "localhost",
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(t.endpoint().as_str(), "http://127.0.0.1:2878/report?f=wavefront");
    }

    #[test]
    fn build_err() {
        let timeout = Duration::from_secs(1);
        assert!(HttpTransport::new(&url("https://a.com"), "", "h", timeout).is_err());
        assert!(HttpTransport::new(&url("https://a.com"), " \n", "h", timeout).is_err());
        assert!(HttpTransport::new(&url("ftp://a.com"), "t", "h", timeout).is_err());
        assert!(HttpTransport::new(&url("unix:/tmp/a.sock"), "t", "h", timeout).is_err());
    }

    #[test]
    fn classify_status() {
        assert!(check_status(StatusCode::OK).is_ok());
        assert!(check_status(StatusCode::ACCEPTED).is_ok());

        for s in [
            StatusCode::REQUEST_TIMEOUT,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            assert!(check_status(s).unwrap_err().is_transient(), "{s}");
        }

        for s in [
            StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            StatusCode::FORBIDDEN,
            StatusCode::NOT_FOUND,
        ] {
            assert!(!check_status(s).unwrap_err().is_transient(), "{s}");
        }
    }
}
