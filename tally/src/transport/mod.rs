/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use async_trait::async_trait;
use thiserror::Error;

use crate::types::DataPoint;

pub mod format;

mod console;
pub use console::ConsoleTransport;

mod discard;
pub use discard::DiscardTransport;

mod http;
pub use http::HttpTransport;

#[cfg(test)]
pub(crate) mod testing;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The same batch may succeed if sent again later
    #[error("transient delivery error: {0}")]
    Transient(String),
    /// Sending the same batch again will never succeed
    #[error("permanent delivery error: {0}")]
    Permanent(String),
}

impl DeliveryError {
    #[inline]
    pub fn is_transient(&self) -> bool {
        matches!(self, DeliveryError::Transient(_))
    }

    pub(crate) fn kind_str(&self) -> &'static str {
        match self {
            DeliveryError::Transient(_) => "transient",
            DeliveryError::Permanent(_) => "permanent",
        }
    }
}

/// Delivers one batch of data points to the backend
#[async_trait]
pub trait Transport: Send + Sync {
    async fn deliver(&self, batch: &[DataPoint]) -> Result<(), DeliveryError>;

    fn name(&self) -> &str;
}
