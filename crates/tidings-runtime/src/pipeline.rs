//! Decode-and-route pipeline.
//!
//! One raw record is decoded once, wrapped in an `Arc`, and offered to every
//! route. Each route that accepts it yields its own [`MatchedEvent`]; the
//! event itself is never mutated. Invoking handlers is left to the caller.
//!
//! ```rust,ignore
//! let config = load_config()?;
//! let pipeline = Pipeline::from_config(&config, mtproto_decoder(), &FilterRegistry::default())?;
//!
//! let routed = pipeline.process_str(&line)?;
//! for (route, matched) in &routed.matched {
//!     println!("{route}: {:?}", matched.matches());
//! }
//! ```

use std::sync::Arc;

use serde_json::Value;
use tidings_core::{Event, EventDecoder};
use tidings_framework::{FilterChain, FilterRegistry, MatchedEvent};
use tracing::{Level, debug, info, span};

use crate::config::TidingsConfig;
use crate::error::{RuntimeError, RuntimeResult};

/// The outcome of routing one event.
#[derive(Debug, Clone)]
pub struct Routed {
    pub event: Arc<Event>,
    /// `(route name, match bundle)` for every accepting route, in route order.
    pub matched: Vec<(String, MatchedEvent)>,
}

impl Routed {
    /// Whether no route accepted the event.
    pub fn is_unrouted(&self) -> bool {
        self.matched.is_empty()
    }

    pub fn route_names(&self) -> impl Iterator<Item = &str> {
        self.matched.iter().map(|(name, _)| name.as_str())
    }

    /// The bundle produced by the named route, if it matched.
    pub fn get(&self, route: &str) -> Option<&MatchedEvent> {
        self.matched
            .iter()
            .find(|(name, _)| name == route)
            .map(|(_, matched)| matched)
    }
}

/// A decoder plus an ordered list of routes.
#[derive(Debug, Clone)]
pub struct Pipeline {
    decoder: EventDecoder,
    routes: Vec<FilterChain>,
}

impl Pipeline {
    pub fn new(decoder: EventDecoder) -> Self {
        Self {
            decoder,
            routes: Vec::new(),
        }
    }

    /// Builds the enabled routes of `config` against `registry` and applies
    /// the decoder options.
    pub fn from_config(
        config: &TidingsConfig,
        decoder: EventDecoder,
        registry: &FilterRegistry,
    ) -> RuntimeResult<Self> {
        let mut pipeline = Self::new(decoder.with_options(config.decoder.options()));
        for route in config.enabled_routes() {
            let chain = FilterChain::from_specs(&route.name, &route.filters, registry)
                .map_err(|err| RuntimeError::route(&route.name, err))?;
            debug!(route = %route.name, filters = chain.len(), "Route built");
            pipeline = pipeline.route(chain);
        }

        info!(
            routes = pipeline.routes.len(),
            disabled = config.routes.len() - pipeline.routes.len(),
            eager_html = config.decoder.eager_html,
            "Pipeline ready"
        );
        Ok(pipeline)
    }

    /// Appends a route.
    pub fn route(mut self, chain: FilterChain) -> Self {
        self.routes.push(chain);
        self
    }

    pub fn routes(&self) -> &[FilterChain] {
        &self.routes
    }

    pub fn decoder(&self) -> &EventDecoder {
        &self.decoder
    }

    /// Offers an already decoded event to every route.
    pub fn dispatch(&self, event: impl Into<Arc<Event>>) -> Routed {
        let event = event.into();
        let span = span!(Level::DEBUG, "dispatch", event_id = event.id());
        let _enter = span.enter();

        let matched: Vec<_> = self
            .routes
            .iter()
            .filter_map(|chain| {
                chain
                    .evaluate(Arc::clone(&event))
                    .map(|m| (chain.name().to_owned(), m))
            })
            .collect();

        debug!(
            event_name = event.event_name(),
            matched = matched.len(),
            "Event routed"
        );
        Routed { event, matched }
    }

    /// Decodes a raw record and routes it.
    pub fn process(&self, raw: &Value) -> RuntimeResult<Routed> {
        let event = self.decoder.decode_event(raw)?;
        Ok(self.dispatch(event))
    }

    /// Parses JSON text, decodes it and routes it.
    pub fn process_str(&self, input: &str) -> RuntimeResult<Routed> {
        let event = self.decoder.decode_str(input)?;
        Ok(self.dispatch(event))
    }
}
