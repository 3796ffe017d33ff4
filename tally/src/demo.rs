/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use log::{debug, warn};

use tally_histogram::HistogramConfig;
use tally_types::metrics::MetricTagMap;

use crate::instrument::{Counter, DeltaCounter, Histogram, Instrument};
use crate::reporter::Reporter;

const COUNTER_NAME: &str = "counter";
const HISTOGRAM_NAME: &str = "hist1";
const DELTA_COUNTER_NAME: &str = "delta.metric";

/// The instruments updated by the demo loop of the binary
///
/// An instrument that failed to register is left out of the loop.
pub struct DemoMetrics {
    counter: Option<Arc<Counter>>,
    histogram: Option<Arc<Histogram>>,
    delta: Option<Arc<DeltaCounter>>,
}

fn register_or_warn<T>(
    reporter: &Reporter,
    name: &str,
    instrument: T,
    tags: &MetricTagMap,
) -> Option<Arc<T>>
where
    Arc<T>: Into<Instrument>,
{
    let instrument = Arc::new(instrument);
    match reporter.register_metric(name, instrument.clone(), tags.clone()) {
        Ok(_) => Some(instrument),
        Err(e) => {
            warn!("demo metric {name} will not be updated: {e}");
            None
        }
    }
}

impl DemoMetrics {
    pub fn register(
        reporter: &Reporter,
        histogram_config: &HistogramConfig,
        tags: &MetricTagMap,
    ) -> anyhow::Result<Self> {
        let histogram = Histogram::new(histogram_config)
            .map_err(|e| anyhow::anyhow!("failed to create histogram: {e}"))?;

        Ok(DemoMetrics {
            counter: register_or_warn(reporter, COUNTER_NAME, Counter::new(), tags),
            histogram: register_or_warn(reporter, HISTOGRAM_NAME, histogram, tags),
            delta: register_or_warn(reporter, DELTA_COUNTER_NAME, DeltaCounter::new(), tags),
        })
    }

    pub fn update(&self, value: i64) {
        debug!("demo update with value {value}");
        if let Some(counter) = &self.counter {
            counter.increment(value);
        }
        if let Some(delta) = &self.delta {
            delta.increment(value);
        }
        if let Some(histogram) = &self.histogram {
            histogram.observe(value.unsigned_abs());
        }
    }

    pub fn update_random(&self) {
        self.update(fastrand::i64(0..16));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::{ReporterConfig, SenderConfig};
    use crate::registry::Registry;
    use crate::sender::Sender;
    use crate::transport::DiscardTransport;

    fn reporter() -> Reporter {
        let sender = Sender::new(SenderConfig::default(), Arc::new(DiscardTransport)).unwrap();
        Reporter::new(
            Arc::new(Registry::new()),
            Arc::new(sender),
            ReporterConfig::default(),
        )
    }

    #[test]
    fn register_and_update() {
        let reporter = reporter();
        let tags = MetricTagMap::try_from_pairs([("env", "dev")]).unwrap();
        let demo = DemoMetrics::register(&reporter, &HistogramConfig::default(), &tags).unwrap();
        assert_eq!(reporter.registry().len(), 3);

        demo.update(5);
        demo.update_random();
        let counter = demo.counter.as_ref().unwrap();
        let delta = demo.delta.as_ref().unwrap();
        assert!(counter.read() >= 5);
        assert_eq!(counter.read(), delta.read());
        assert_eq!(demo.histogram.as_ref().unwrap().read().unwrap().count(), 2);
    }

    #[test]
    fn taken_names_skipped() {
        let reporter = reporter();
        let tags = MetricTagMap::default();
        reporter
            .register_metric(COUNTER_NAME, Arc::new(Counter::new()), tags.clone())
            .unwrap();

        let demo = DemoMetrics::register(&reporter, &HistogramConfig::default(), &tags).unwrap();
        assert!(demo.counter.is_none());
        assert!(demo.histogram.is_some());
        assert!(demo.delta.is_some());
        assert_eq!(reporter.registry().len(), 3);

        // the rest keeps working
        demo.update(4);
        assert_eq!(demo.delta.as_ref().unwrap().read(), 4);
    }
}
