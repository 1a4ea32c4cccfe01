//! # Tidings Framework
//!
//! Routing predicates for decoded Tidings events.
//!
//! This layer provides:
//! - The [`Filter`] trait and the built-in filters in [`filters`]
//! - [`FilterRegistry`] for building filters from declarative [`FilterSpec`]s
//! - [`FilterChain`] for short-circuit conjunctions, usable as a tower predicate
//! - [`MatchedEvent`] bundles carrying regex captures alongside the event
//! - Clap-based typed commands (with `command` feature)

pub mod chain;
pub mod error;
pub mod filter;
pub mod filters;
pub mod matched;
pub mod registry;

#[cfg(feature = "command")]
pub mod command;

pub use chain::FilterChain;
pub use error::{EventSkipped, FilterError, FilterResult};
pub use filter::{BoxedFilter, Filter, FilterExt, FnFilter, filter_fn};
pub use filters::{
    AllOf, AnyOf, CommandFilter, EditedFilter, ForwardedFilter, ImportedFilter, IncomingFilter,
    KeyboardFilter, MediaFilter, MessageFilter, NotFilter, OutgoingFilter, PollFilter, PsaFilter,
    QuizPollFilter, RegexFilter, RegularPollFilter, ScheduledFilter, ServiceFilter, TextFilter,
    ViaBotFilter,
};
pub use matched::MatchedEvent;
pub use registry::{FilterConstructor, FilterRegistry, FilterSpec};

#[cfg(feature = "command")]
pub use command::{TypedCommand, TypedCommandFilter, parse_typed_command};
