/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use thiserror::Error;

mod counter;
pub use counter::Counter;

mod delta;
pub use delta::DeltaCounter;

mod histogram;
pub use histogram::Histogram;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstrumentError {
    #[error("lock poisoned by a panicked writer")]
    Poisoned,
}

/// A registered instrument.
///
/// Cloning only clones the handle, all clones share the same state.
#[derive(Clone, Debug)]
pub enum Instrument {
    Counter(Arc<Counter>),
    DeltaCounter(Arc<DeltaCounter>),
    Histogram(Arc<Histogram>),
}

impl Instrument {
    pub fn kind_str(&self) -> &'static str {
        match self {
            Instrument::Counter(_) => "counter",
            Instrument::DeltaCounter(_) => "delta_counter",
            Instrument::Histogram(_) => "histogram",
        }
    }
}

impl From<Arc<Counter>> for Instrument {
    fn from(value: Arc<Counter>) -> Self {
        Instrument::Counter(value)
    }
}

impl From<Arc<DeltaCounter>> for Instrument {
    fn from(value: Arc<DeltaCounter>) -> Self {
        Instrument::DeltaCounter(value)
    }
}

impl From<Arc<Histogram>> for Instrument {
    fn from(value: Arc<Histogram>) -> Self {
        Instrument::Histogram(value)
    }
}
