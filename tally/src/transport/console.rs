/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use super::{DeliveryError, Transport, format};
use crate::types::DataPoint;

/// Print every batch to stdout in the wire format
pub struct ConsoleTransport {
    source: String,
}

impl ConsoleTransport {
    pub fn new(source: &str) -> Self {
        ConsoleTransport {
            source: source.to_string(),
        }
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn deliver(&self, batch: &[DataPoint]) -> Result<(), DeliveryError> {
        let content = format::format_batch(&self.source, batch);
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(content.as_bytes())
            .await
            .map_err(|e| DeliveryError::Transient(format!("write to stdout failed: {e}")))?;
        stdout
            .flush()
            .await
            .map_err(|e| DeliveryError::Transient(format!("flush stdout failed: {e}")))
    }

    fn name(&self) -> &str {
        "console"
    }
}
