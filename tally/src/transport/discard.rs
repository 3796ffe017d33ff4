/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use async_trait::async_trait;

use super::{DeliveryError, Transport};
use crate::types::DataPoint;

pub struct DiscardTransport;

#[async_trait]
impl Transport for DiscardTransport {
    async fn deliver(&self, _batch: &[DataPoint]) -> Result<(), DeliveryError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "discard"
    }
}
