/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use ahash::AHashMap;
use log::debug;
use thiserror::Error;

use tally_types::metrics::{MetricName, MetricTagMap, ParseError};

use crate::instrument::Instrument;
use crate::types::MetricIdentity;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("metric {0} has already been registered")]
    DuplicateIdentity(MetricIdentity),
    #[error("invalid metric name: {0}")]
    InvalidName(#[from] ParseError),
}

/// All registered instruments, keyed by name and tags
#[derive(Default)]
pub struct Registry {
    inner: Mutex<AHashMap<Arc<MetricIdentity>, Instrument>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    fn lock(&self) -> MutexGuard<'_, AHashMap<Arc<MetricIdentity>, Instrument>> {
        // the map is never left in a half updated state, so a poisoned lock is still usable
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn register<I>(
        &self,
        name: MetricName,
        instrument: I,
        tags: MetricTagMap,
    ) -> Result<(), RegistrationError>
    where
        I: Into<Instrument>,
    {
        let instrument = instrument.into();
        let id = Arc::new(MetricIdentity::new(name, tags));

        let mut map = self.lock();
        if map.contains_key(&id) {
            return Err(RegistrationError::DuplicateIdentity(id.as_ref().clone()));
        }
        debug!("registered {} {id}", instrument.kind_str());
        map.insert(id, instrument);
        Ok(())
    }

    pub fn register_str<I>(
        &self,
        name: &str,
        instrument: I,
        tags: MetricTagMap,
    ) -> Result<(), RegistrationError>
    where
        I: Into<Instrument>,
    {
        let name = MetricName::from_str(name)?;
        self.register(name, instrument, tags)
    }

    pub fn unregister(&self, name: &MetricName, tags: &MetricTagMap) -> Option<Instrument> {
        let id = MetricIdentity::new(name.clone(), tags.clone());
        let removed = self.lock().remove(&id);
        if removed.is_some() {
            debug!("unregistered {id}");
        }
        removed
    }

    pub fn get(&self, name: &MetricName, tags: &MetricTagMap) -> Option<Instrument> {
        let id = MetricIdentity::new(name.clone(), tags.clone());
        self.lock().get(&id).cloned()
    }

    /// List all instruments registered at this moment.
    ///
    /// Only handles are cloned while holding the lock.
    pub fn snapshot_all(&self) -> Vec<(Arc<MetricIdentity>, Instrument)> {
        let map = self.lock();
        map.iter()
            .map(|(id, instrument)| (id.clone(), instrument.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
