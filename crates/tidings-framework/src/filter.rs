//! The filter abstraction.
//!
//! A [`Filter`] is a pure predicate over a decoded [`Event`]. It must be
//! total: for event variants it does not care about it returns `false`
//! instead of failing.
//!
//! # Example
//!
//! ```rust,ignore
//! use tidings_framework::{Filter, filter_fn};
//!
//! let long_text = filter_fn("long_text", |event| {
//!     event.as_message().is_some_and(|msg| msg.text().len() > 100)
//! });
//! assert!(!long_text.apply(&event));
//! ```

use std::sync::Arc;

use tidings_core::Event;

/// A pure boolean predicate over events.
pub trait Filter: Send + Sync {
    /// Identifier used in log fields.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Returns whether the event passes this filter.
    fn apply(&self, event: &Event) -> bool;

    /// Match list produced by a passing event, if this filter captures.
    ///
    /// Only meaningful when [`apply`](Self::apply) returns `true`.
    fn captures(&self, _event: &Event) -> Option<Vec<String>> {
        None
    }
}

/// A shared, type-erased filter.
pub type BoxedFilter = Arc<dyn Filter>;

impl<F: Filter + ?Sized> Filter for Arc<F> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn apply(&self, event: &Event) -> bool {
        (**self).apply(event)
    }

    fn captures(&self, event: &Event) -> Option<Vec<String>> {
        (**self).captures(event)
    }
}

/// Extension methods for any [`Filter`].
pub trait FilterExt: Filter + Sized + 'static {
    /// Type-erases this filter.
    fn boxed(self) -> BoxedFilter {
        Arc::new(self)
    }
}

impl<F: Filter + Sized + 'static> FilterExt for F {}

/// A filter backed by a closure. Created by [`filter_fn`].
pub struct FnFilter<F> {
    name: String,
    f: F,
}

impl<F> Filter for FnFilter<F>
where
    F: Fn(&Event) -> bool + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, event: &Event) -> bool {
        (self.f)(event)
    }
}

/// Wraps a closure as a named filter.
pub fn filter_fn<F>(name: impl Into<String>, f: F) -> FnFilter<F>
where
    F: Fn(&Event) -> bool + Send + Sync,
{
    FnFilter {
        name: name.into(),
        f,
    }
}
