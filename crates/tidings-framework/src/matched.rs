//! Events paired with the result of filtering.

use std::ops::Deref;
use std::sync::Arc;

use tidings_core::{Event, Message};

/// A decoded event together with the match list its filter chain produced.
///
/// The event itself stays shared and immutable; each chain that accepts it
/// produces its own bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedEvent {
    event: Arc<Event>,
    matches: Option<Vec<String>>,
}

impl MatchedEvent {
    pub fn new(event: Arc<Event>, matches: Option<Vec<String>>) -> Self {
        Self { event, matches }
    }

    pub fn event(&self) -> &Arc<Event> {
        &self.event
    }

    /// The message, if the event is one.
    pub fn message(&self) -> Option<&Message> {
        self.event.as_message()
    }

    /// Regex captures, when a capturing filter accepted the event.
    ///
    /// Index 0 is the whole match; later entries are the groups.
    pub fn matches(&self) -> Option<&[String]> {
        self.matches.as_deref()
    }

    pub fn into_parts(self) -> (Arc<Event>, Option<Vec<String>>) {
        (self.event, self.matches)
    }
}

impl Deref for MatchedEvent {
    type Target = Event;

    fn deref(&self) -> &Self::Target {
        &self.event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_shares_event() {
        let event = Arc::new(Event::from(Message::builder("hi").build()));
        let a = MatchedEvent::new(Arc::clone(&event), Some(vec!["hi".into()]));
        let b = MatchedEvent::new(Arc::clone(&event), None);

        assert!(Arc::ptr_eq(a.event(), b.event()));
        assert_eq!(a.matches(), Some(&["hi".to_string()][..]));
        assert!(b.matches().is_none());
        assert_eq!(a.message().map(Message::text), Some("hi"));
        assert_eq!(a.event_name(), "message");
    }
}
