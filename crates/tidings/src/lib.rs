//! # Tidings
//!
//! Typed events from MTProto-style message records, with HTML rendering and
//! declarative filter routing.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌────────────┐   ┌─────────────────┐
//! │ raw record │──▶│ EventDecoder │──▶│ Arc<Event> │──▶│ route "start"   │──▶ MatchedEvent
//! └────────────┘   └──────┬───────┘   └────────────┘──▶│ route "quizzes" │──▶ MatchedEvent
//!                         │ resolvers                  └─────────────────┘
//! ```
//!
//! - **Core**: event model, decoder, command parser, HTML renderer
//! - **Framework**: filters, filter registry, filter chains
//! - **Runtime**: configuration, logging, the decode-and-route pipeline
//! - **Adapters**: protocol-specific resolvers (MTProto)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tidings::prelude::*;
//!
//! let config = load_config()?;
//! logging::init_from_config(&config.logging);
//!
//! let pipeline = Pipeline::from_config(&config, mtproto_decoder(), &FilterRegistry::default())?;
//! let routed = pipeline.process_str(&line)?;
//! if let Some(msg) = routed.event.as_message() {
//!     println!("{}", msg.html(true));
//! }
//! ```
//!
//! ## Features
//!
//! - `command`: clap-backed typed commands (default)
//! - `adapter-mtproto`: reference MTProto resolvers (default)
//! - `toml-config` / `yaml-config`: configuration file formats
//! - `json-log`: JSON log output

#[cfg(feature = "adapter-mtproto")]
pub use tidings_adapter_mtproto as mtproto;
pub use tidings_core as core;
pub use tidings_framework as framework;
pub use tidings_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use tidings::prelude::*;
/// ```
pub mod prelude {
    // Event model and decoding
    pub use tidings_core::{
        BotCommand, DecodeError, DecoderOptions, Event, EventDecoder, Keyboard, Media, MediaKind,
        Message, PeerId, Poll, ServiceMessage, render_html,
    };

    // Collaborators
    pub use tidings_core::{KeyboardResolver, MediaResolver, PeerResolver, ResolveError};

    // Filtering
    pub use tidings_framework::{
        BoxedFilter, Filter, FilterChain, FilterExt, FilterRegistry, FilterSpec, MatchedEvent,
        filter_fn,
    };

    // Typed commands (requires "command" feature)
    #[cfg(feature = "command")]
    pub use tidings_framework::{TypedCommand, TypedCommandFilter, parse_typed_command};

    // Runtime
    pub use tidings_runtime::config::load_config;
    pub use tidings_runtime::{ConfigLoader, Pipeline, Routed, TidingsConfig, logging};

    #[cfg(feature = "adapter-mtproto")]
    pub use tidings_adapter_mtproto::mtproto_decoder;
}
