/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnqueueError {
    #[error("buffer full: {buffered} buffered + {incoming} incoming > {capacity}")]
    BufferFull {
        buffered: usize,
        incoming: usize,
        capacity: usize,
    },
    #[error("sender closed")]
    Closed,
}
