//! Deterministic extraction stand-ins used by unit and behaviour tests.

use std::collections::BTreeMap;

use crate::{ExtractionConfig, ExtractionFailure, MetricExtractor, RouteMetrics, RouteSource};

/// `MetricExtractor` that replays canned results keyed by route name.
///
/// Routes without a canned result fail with a "no fixture" message.
#[derive(Debug, Clone, Default)]
pub struct FixtureExtractor {
    results: BTreeMap<String, Result<RouteMetrics, String>>,
}

impl FixtureExtractor {
    /// Create an extractor without canned results.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            results: BTreeMap::new(),
        }
    }

    /// Reply to `route` with the given metric values.
    #[must_use]
    pub fn with_metrics<'a, I>(mut self, route: &str, metrics: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<f64>)>,
    {
        let values = metrics
            .into_iter()
            .map(|(metric, value)| (metric.to_owned(), value))
            .collect();
        self.results.insert(route.to_owned(), Ok(values));
        self
    }

    /// Reply to `route` with an extraction failure.
    #[must_use]
    pub fn with_failure(mut self, route: &str, message: &str) -> Self {
        self.results
            .insert(route.to_owned(), Err(message.to_owned()));
        self
    }
}

impl MetricExtractor for FixtureExtractor {
    fn extract(
        &self,
        route: &RouteSource,
        _config: &ExtractionConfig,
    ) -> Result<RouteMetrics, ExtractionFailure> {
        match self.results.get(&route.name) {
            Some(Ok(metrics)) => Ok(metrics.clone()),
            Some(Err(message)) => Err(ExtractionFailure::new(&route.name, message.as_str())),
            None => Err(ExtractionFailure::new(&route.name, "no fixture for route")),
        }
    }
}
