//! Built-in filters.
//!
//! Each filter looks at one aspect of an [`Event`]. Message-only filters
//! return `false` for service messages. Combinators ([`NotFilter`],
//! [`AnyOf`], [`AllOf`]) compose other filters.

use regex::Regex;
use tidings_core::{Event, MediaKind, Message};

use crate::error::{FilterError, FilterResult};
use crate::filter::{BoxedFilter, Filter};

fn message(event: &Event) -> Option<&Message> {
    event.as_message()
}

// =============================================================================
// Event kind
// =============================================================================

/// Passes regular messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFilter;

impl Filter for MessageFilter {
    fn name(&self) -> &str {
        "message"
    }

    fn apply(&self, event: &Event) -> bool {
        matches!(event, Event::Message(_))
    }
}

/// Passes service messages, optionally of one action kind.
///
/// The kind may be given in full (`messageActionPinMessage`) or without the
/// `messageAction` prefix (`PinMessage`).
#[derive(Debug, Clone, Default)]
pub struct ServiceFilter {
    action: Option<String>,
}

impl ServiceFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn action(kind: impl Into<String>) -> Self {
        Self {
            action: Some(kind.into()),
        }
    }
}

impl Filter for ServiceFilter {
    fn name(&self) -> &str {
        "service"
    }

    fn apply(&self, event: &Event) -> bool {
        let Some(svc) = event.as_service() else {
            return false;
        };
        match &self.action {
            None => true,
            Some(kind) => svc.action.kind == *kind || svc.action.short_kind() == kind,
        }
    }
}

/// Passes events sent by someone else.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncomingFilter;

impl Filter for IncomingFilter {
    fn name(&self) -> &str {
        "incoming"
    }

    fn apply(&self, event: &Event) -> bool {
        !event.is_outgoing()
    }
}

/// Passes events sent by the current account.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutgoingFilter;

impl Filter for OutgoingFilter {
    fn name(&self) -> &str {
        "outgoing"
    }

    fn apply(&self, event: &Event) -> bool {
        event.is_outgoing()
    }
}

// =============================================================================
// Text and commands
// =============================================================================

/// Passes messages whose text equals the given string.
#[derive(Debug, Clone)]
pub struct TextFilter {
    text: String,
}

impl TextFilter {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Filter for TextFilter {
    fn name(&self) -> &str {
        "text"
    }

    fn apply(&self, event: &Event) -> bool {
        message(event).is_some_and(|msg| msg.text() == self.text)
    }
}

/// Passes messages whose text matches a regex; the captures become the
/// match list.
#[derive(Debug, Clone)]
pub struct RegexFilter {
    regex: Regex,
}

impl RegexFilter {
    /// Compiles `pattern`.
    pub fn new(pattern: &str) -> FilterResult<Self> {
        let regex = Regex::new(pattern).map_err(|source| FilterError::InvalidRegex {
            pattern: pattern.to_owned(),
            source,
        })?;
        Ok(Self { regex })
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl Filter for RegexFilter {
    fn name(&self) -> &str {
        "regex"
    }

    fn apply(&self, event: &Event) -> bool {
        message(event).is_some_and(|msg| self.regex.is_match(msg.text()))
    }

    fn captures(&self, event: &Event) -> Option<Vec<String>> {
        let caps = self.regex.captures(message(event)?.text())?;
        Some(
            caps.iter()
                .map(|group| group.map_or_else(String::new, |m| m.as_str().to_owned()))
                .collect(),
        )
    }
}

/// Passes bot commands, optionally restricted to some names.
///
/// Names are compared case-insensitively against the command without its
/// `@botname` suffix.
#[derive(Debug, Clone, Default)]
pub struct CommandFilter {
    names: Vec<String>,
}

impl CommandFilter {
    /// Passes any command.
    pub fn any() -> Self {
        Self::default()
    }

    /// Passes only the given command names (without the leading `/`).
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(|name| name.into().to_lowercase()).collect(),
        }
    }
}

impl Filter for CommandFilter {
    fn name(&self) -> &str {
        "command"
    }

    fn apply(&self, event: &Event) -> bool {
        let Some(cmd) = message(event).and_then(Message::bot_command) else {
            return false;
        };
        self.names.is_empty() || {
            let base = cmd.base_name().to_lowercase();
            self.names.iter().any(|name| *name == base)
        }
    }
}

// =============================================================================
// Media
// =============================================================================

/// Passes messages carrying one of the given attachment kinds.
#[derive(Debug, Clone)]
pub struct MediaFilter {
    kinds: Vec<MediaKind>,
}

impl MediaFilter {
    /// Passes any attachment.
    pub fn any() -> Self {
        Self { kinds: Vec::new() }
    }

    /// Passes any attachment when `kinds` is empty.
    pub fn new(kinds: impl IntoIterator<Item = MediaKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }
}

impl Filter for MediaFilter {
    fn name(&self) -> &str {
        "media"
    }

    fn apply(&self, event: &Event) -> bool {
        message(event)
            .and_then(Message::media_kind)
            .is_some_and(|kind| self.kinds.is_empty() || self.kinds.contains(&kind))
    }
}

/// Passes messages carrying any poll.
#[derive(Debug, Clone, Copy, Default)]
pub struct PollFilter;

impl Filter for PollFilter {
    fn name(&self) -> &str {
        "poll"
    }

    fn apply(&self, event: &Event) -> bool {
        message(event).and_then(Message::poll).is_some()
    }
}

/// Passes messages carrying a poll that is not a quiz.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegularPollFilter;

impl Filter for RegularPollFilter {
    fn name(&self) -> &str {
        "regular_poll"
    }

    fn apply(&self, event: &Event) -> bool {
        message(event)
            .and_then(Message::poll)
            .is_some_and(|poll| !poll.is_quiz())
    }
}

/// Passes messages carrying a quiz poll.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizPollFilter;

impl Filter for QuizPollFilter {
    fn name(&self) -> &str {
        "quiz_poll"
    }

    fn apply(&self, event: &Event) -> bool {
        message(event)
            .and_then(Message::poll)
            .is_some_and(|poll| poll.is_quiz())
    }
}

// =============================================================================
// Message flags
// =============================================================================

/// Passes forwarded messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardedFilter;

impl Filter for ForwardedFilter {
    fn name(&self) -> &str {
        "forwarded"
    }

    fn apply(&self, event: &Event) -> bool {
        message(event).is_some_and(|msg| msg.forwarded_info().is_some())
    }
}

/// Passes messages sent from the scheduled queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduledFilter;

impl Filter for ScheduledFilter {
    fn name(&self) -> &str {
        "scheduled"
    }

    fn apply(&self, event: &Event) -> bool {
        message(event).is_some_and(Message::from_scheduled)
    }
}

/// Passes edited messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditedFilter;

impl Filter for EditedFilter {
    fn name(&self) -> &str {
        "edited"
    }

    fn apply(&self, event: &Event) -> bool {
        message(event).is_some_and(|msg| msg.edit_date().is_some())
    }
}

/// Passes messages sent through an inline bot, optionally a specific one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViaBotFilter {
    bot_id: Option<i64>,
}

impl ViaBotFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn bot(bot_id: i64) -> Self {
        Self {
            bot_id: Some(bot_id),
        }
    }
}

impl Filter for ViaBotFilter {
    fn name(&self) -> &str {
        "via_bot"
    }

    fn apply(&self, event: &Event) -> bool {
        match (message(event).and_then(Message::via_bot_id), self.bot_id) {
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
            (None, _) => false,
        }
    }
}

/// Passes messages with a keyboard, optionally only inline or only reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardFilter {
    inline: Option<bool>,
}

impl KeyboardFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn inline() -> Self {
        Self { inline: Some(true) }
    }

    pub fn reply() -> Self {
        Self {
            inline: Some(false),
        }
    }
}

impl Filter for KeyboardFilter {
    fn name(&self) -> &str {
        "keyboard"
    }

    fn apply(&self, event: &Event) -> bool {
        message(event)
            .and_then(Message::keyboard)
            .is_some_and(|kb| self.inline.is_none_or(|inline| kb.is_inline() == inline))
    }
}

/// Passes imported messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportedFilter;

impl Filter for ImportedFilter {
    fn name(&self) -> &str {
        "imported"
    }

    fn apply(&self, event: &Event) -> bool {
        message(event).is_some_and(Message::imported)
    }
}

/// Passes public-service-announcement forwards, optionally of one type.
#[derive(Debug, Clone, Default)]
pub struct PsaFilter {
    psa_type: Option<String>,
}

impl PsaFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn of_type(psa_type: impl Into<String>) -> Self {
        Self {
            psa_type: Some(psa_type.into()),
        }
    }
}

impl Filter for PsaFilter {
    fn name(&self) -> &str {
        "psa"
    }

    fn apply(&self, event: &Event) -> bool {
        message(event)
            .and_then(Message::psa_type)
            .is_some_and(|actual| {
                self.psa_type
                    .as_deref()
                    .is_none_or(|expected| actual == expected)
            })
    }
}

// =============================================================================
// Combinators
// =============================================================================

/// Inverts another filter. Never captures.
pub struct NotFilter(BoxedFilter);

impl NotFilter {
    pub fn new(inner: BoxedFilter) -> Self {
        Self(inner)
    }
}

impl Filter for NotFilter {
    fn name(&self) -> &str {
        "not"
    }

    fn apply(&self, event: &Event) -> bool {
        !self.0.apply(event)
    }
}

/// Passes if any inner filter passes. Captures come from the first one that
/// passes.
pub struct AnyOf(Vec<BoxedFilter>);

impl AnyOf {
    pub fn new(filters: Vec<BoxedFilter>) -> Self {
        Self(filters)
    }
}

impl Filter for AnyOf {
    fn name(&self) -> &str {
        "any_of"
    }

    fn apply(&self, event: &Event) -> bool {
        self.0.iter().any(|filter| filter.apply(event))
    }

    fn captures(&self, event: &Event) -> Option<Vec<String>> {
        self.0
            .iter()
            .find(|filter| filter.apply(event))
            .and_then(|filter| filter.captures(event))
    }
}

/// Passes if every inner filter passes. Captures come from the first inner
/// filter that yields any.
pub struct AllOf(Vec<BoxedFilter>);

impl AllOf {
    pub fn new(filters: Vec<BoxedFilter>) -> Self {
        Self(filters)
    }
}

impl Filter for AllOf {
    fn name(&self) -> &str {
        "all_of"
    }

    fn apply(&self, event: &Event) -> bool {
        self.0.iter().all(|filter| filter.apply(event))
    }

    fn captures(&self, event: &Event) -> Option<Vec<String>> {
        self.0.iter().find_map(|filter| filter.captures(event))
    }
}
