//! Filter chains.
//!
//! A [`FilterChain`] is the conjunction of the filters attached to one route.
//! Filters run in attachment order and evaluation stops at the first one that
//! rejects the event.
//!
//! # Tower Integration
//!
//! `FilterChain` implements [`tower::filter::Predicate`], so it can front any
//! service that accepts [`MatchedEvent`]s:
//!
//! ```rust,ignore
//! use tower::ServiceBuilder;
//!
//! let svc = ServiceBuilder::new()
//!     .filter(chain)
//!     .service_fn(|matched: MatchedEvent| async move { Ok::<_, BoxError>(()) });
//! ```
//!
//! Rejected events surface as [`EventSkipped`].

use std::sync::Arc;

use tidings_core::Event;
use tower::BoxError;
use tower::filter::Predicate;
use tracing::{Level, debug, span, trace};

use crate::error::{EventSkipped, FilterResult};
use crate::filter::{BoxedFilter, Filter, FilterExt};
use crate::matched::MatchedEvent;
use crate::registry::{FilterRegistry, FilterSpec};

/// A named, ordered conjunction of filters.
///
/// Cheap to clone; the filters are shared.
#[derive(Clone)]
pub struct FilterChain {
    name: Arc<str>,
    filters: Arc<[BoxedFilter]>,
}

impl FilterChain {
    /// Creates an empty chain, which accepts every event.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
            filters: Arc::from(Vec::new()),
        }
    }

    /// Builds a chain from declarative specs.
    pub fn from_specs(
        name: impl AsRef<str>,
        specs: &[FilterSpec],
        registry: &FilterRegistry,
    ) -> FilterResult<Self> {
        Ok(Self::new(name).with_filters(registry.build_all(specs)?))
    }

    /// Appends a filter.
    pub fn filter(self, filter: impl Filter + 'static) -> Self {
        self.with_filters([filter.boxed()])
    }

    /// Appends already boxed filters.
    pub fn with_filters(self, extra: impl IntoIterator<Item = BoxedFilter>) -> Self {
        let filters: Vec<BoxedFilter> = self.filters.iter().cloned().chain(extra).collect();
        Self {
            name: self.name,
            filters: filters.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Runs the filters in order, stopping at the first rejection.
    pub fn matches(&self, event: &Event) -> bool {
        self.first_rejection(event).is_none()
    }

    /// Evaluates the chain and, on success, bundles the event with the match
    /// list of the first capturing filter.
    pub fn evaluate(&self, event: Arc<Event>) -> Option<MatchedEvent> {
        let span = span!(
            Level::TRACE,
            "chain",
            chain = %self.name,
            event_name = event.event_name()
        );
        let _enter = span.enter();

        if let Some(index) = self.first_rejection(&event) {
            trace!(
                filter = self.filters[index].name(),
                filter_index = index,
                "Filter rejected event"
            );
            return None;
        }

        let matches = self.filters.iter().find_map(|filter| filter.captures(&event));
        debug!(
            chain = %self.name,
            captured = matches.as_ref().map_or(0, Vec::len),
            "Chain matched"
        );
        Some(MatchedEvent::new(event, matches))
    }

    fn first_rejection(&self, event: &Event) -> Option<usize> {
        self.filters.iter().position(|filter| !filter.apply(event))
    }
}

impl Filter for FilterChain {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, event: &Event) -> bool {
        self.matches(event)
    }

    fn captures(&self, event: &Event) -> Option<Vec<String>> {
        self.filters.iter().find_map(|filter| filter.captures(event))
    }
}

impl Predicate<Arc<Event>> for FilterChain {
    type Request = MatchedEvent;

    fn check(&mut self, request: Arc<Event>) -> Result<MatchedEvent, BoxError> {
        self.evaluate(request)
            .ok_or_else(|| Box::new(EventSkipped) as BoxError)
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("name", &self.name)
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
