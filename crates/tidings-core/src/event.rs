//! Decoded events.
//!
//! [`Event`] is a closed sum over everything the decoder produces. Events are
//! immutable once built; the only interior state is the pair of HTML caches
//! on [`Message`], each written at most once.

use std::sync::OnceLock;

use serde::Serialize;
use serde_json::Value;

use crate::command::BotCommand;
use crate::entity::MessageEntity;
use crate::forward::ForwardedInfo;
use crate::html::render_html;
use crate::keyboard::Keyboard;
use crate::media::{Media, MediaKind, Poll};
use crate::peer::PeerId;

// =============================================================================
// Event
// =============================================================================

/// One decoded occurrence from the protocol stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Message(Message),
    Service(ServiceMessage),
}

impl Event {
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Event::Message(msg) => Some(msg),
            Event::Service(_) => None,
        }
    }

    pub fn as_service(&self) -> Option<&ServiceMessage> {
        match self {
            Event::Service(svc) => Some(svc),
            Event::Message(_) => None,
        }
    }

    /// Short name of the variant, used in log fields.
    pub fn event_name(&self) -> &'static str {
        match self {
            Event::Message(_) => "message",
            Event::Service(_) => "service",
        }
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            Event::Message(msg) => msg.id,
            Event::Service(svc) => svc.id,
        }
    }

    /// Whether the event was sent by the current account.
    pub fn is_outgoing(&self) -> bool {
        match self {
            Event::Message(msg) => msg.out,
            Event::Service(svc) => svc.out,
        }
    }
}

impl From<Message> for Event {
    fn from(msg: Message) -> Self {
        Event::Message(msg)
    }
}

impl From<ServiceMessage> for Event {
    fn from(svc: ServiceMessage) -> Self {
        Event::Service(svc)
    }
}

// =============================================================================
// Message
// =============================================================================

/// A regular message.
///
/// Built by the decoder or by [`MessageBuilder`]; fields are read through
/// accessors and never change after construction.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub(crate) id: Option<i64>,
    pub(crate) date: Option<i64>,
    pub(crate) out: bool,
    pub(crate) mentioned: bool,
    pub(crate) silent: bool,
    pub(crate) post: bool,
    pub(crate) chat: Option<PeerId>,
    pub(crate) sender: Option<PeerId>,
    pub(crate) reply_to_msg_id: Option<i64>,
    pub(crate) text: String,
    pub(crate) entities: Vec<MessageEntity>,
    pub(crate) from_scheduled: bool,
    pub(crate) via_bot_id: Option<i64>,
    pub(crate) edit_date: Option<i64>,
    pub(crate) keyboard: Option<Keyboard>,
    pub(crate) forwarded_info: Option<ForwardedInfo>,
    pub(crate) psa_type: Option<String>,
    pub(crate) imported: bool,
    pub(crate) media: Option<Media>,
    pub(crate) command: Option<BotCommand>,
    #[serde(skip)]
    html: OnceLock<String>,
    #[serde(skip)]
    html_extended: OnceLock<String>,
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        // Caches are derived from text and entities.
        self.id == other.id
            && self.date == other.date
            && self.out == other.out
            && self.mentioned == other.mentioned
            && self.silent == other.silent
            && self.post == other.post
            && self.chat == other.chat
            && self.sender == other.sender
            && self.reply_to_msg_id == other.reply_to_msg_id
            && self.text == other.text
            && self.entities == other.entities
            && self.from_scheduled == other.from_scheduled
            && self.via_bot_id == other.via_bot_id
            && self.edit_date == other.edit_date
            && self.keyboard == other.keyboard
            && self.forwarded_info == other.forwarded_info
            && self.psa_type == other.psa_type
            && self.imported == other.imported
            && self.media == other.media
            && self.command == other.command
    }
}

impl Message {
    /// Starts building a message with the given text.
    pub fn builder(text: impl Into<String>) -> MessageBuilder {
        MessageBuilder::new(text)
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Send time (unix seconds).
    pub fn date(&self) -> Option<i64> {
        self.date
    }

    pub fn is_outgoing(&self) -> bool {
        self.out
    }

    pub fn mentioned(&self) -> bool {
        self.mentioned
    }

    pub fn silent(&self) -> bool {
        self.silent
    }

    /// Whether this is a channel post.
    pub fn is_post(&self) -> bool {
        self.post
    }

    pub fn chat(&self) -> Option<PeerId> {
        self.chat
    }

    pub fn sender(&self) -> Option<PeerId> {
        self.sender
    }

    pub fn reply_to_msg_id(&self) -> Option<i64> {
        self.reply_to_msg_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn entities(&self) -> &[MessageEntity] {
        &self.entities
    }

    pub fn from_scheduled(&self) -> bool {
        self.from_scheduled
    }

    pub fn via_bot_id(&self) -> Option<i64> {
        self.via_bot_id
    }

    pub fn edit_date(&self) -> Option<i64> {
        self.edit_date
    }

    pub fn keyboard(&self) -> Option<&Keyboard> {
        self.keyboard.as_ref()
    }

    pub fn forwarded_info(&self) -> Option<&ForwardedInfo> {
        self.forwarded_info.as_ref()
    }

    /// Public-service-announcement type of a PSA forward.
    pub fn psa_type(&self) -> Option<&str> {
        self.psa_type.as_deref()
    }

    pub fn imported(&self) -> bool {
        self.imported
    }

    pub fn media(&self) -> Option<&Media> {
        self.media.as_ref()
    }

    pub fn media_kind(&self) -> Option<MediaKind> {
        self.media.as_ref().map(Media::kind)
    }

    pub fn poll(&self) -> Option<&Poll> {
        self.media.as_ref().and_then(Media::as_poll)
    }

    pub fn bot_command(&self) -> Option<&BotCommand> {
        self.command.as_ref()
    }

    /// Command name, set iff the message starts with a bot command.
    pub fn command(&self) -> Option<&str> {
        self.command.as_ref().map(BotCommand::name)
    }

    /// Command arguments, set iff [`command`](Self::command) is.
    pub fn command_args(&self) -> Option<&[String]> {
        self.command.as_ref().map(BotCommand::args)
    }

    /// Renders the text as HTML.
    ///
    /// Each mode is computed on first use and cached; later calls return the
    /// same string. Without entities the escaped text is returned uncached.
    pub fn html(&self, allow_extended: bool) -> String {
        if self.entities.is_empty() {
            return crate::html::escape_html(&self.text);
        }
        self.html_cell(allow_extended)
            .get_or_init(|| render_html(&self.text, &self.entities, allow_extended))
            .clone()
    }

    /// Fills both HTML caches.
    pub fn warm_html(&self) {
        if self.entities.is_empty() {
            return;
        }
        for allow_extended in [false, true] {
            self.html_cell(allow_extended)
                .get_or_init(|| render_html(&self.text, &self.entities, allow_extended));
        }
    }

    /// Whether the given mode has been rendered already.
    pub fn is_html_cached(&self, allow_extended: bool) -> bool {
        self.html_cell(allow_extended).get().is_some()
    }

    fn html_cell(&self, allow_extended: bool) -> &OnceLock<String> {
        if allow_extended {
            &self.html_extended
        } else {
            &self.html
        }
    }
}

// =============================================================================
// MessageBuilder
// =============================================================================

/// Builder for [`Message`], for adapters and tests that already hold typed
/// values. The command is derived from text and entities on [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    msg: Message,
    command_resolved: bool,
}

impl MessageBuilder {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            msg: Message {
                id: None,
                date: None,
                out: false,
                mentioned: false,
                silent: false,
                post: false,
                chat: None,
                sender: None,
                reply_to_msg_id: None,
                text: text.into(),
                entities: Vec::new(),
                from_scheduled: false,
                via_bot_id: None,
                edit_date: None,
                keyboard: None,
                forwarded_info: None,
                psa_type: None,
                imported: false,
                media: None,
                command: None,
                html: OnceLock::new(),
                html_extended: OnceLock::new(),
            },
            command_resolved: false,
        }
    }

    pub fn id(mut self, id: i64) -> Self {
        self.msg.id = Some(id);
        self
    }

    pub fn date(mut self, date: i64) -> Self {
        self.msg.date = Some(date);
        self
    }

    pub fn outgoing(mut self, out: bool) -> Self {
        self.msg.out = out;
        self
    }

    pub fn mentioned(mut self, mentioned: bool) -> Self {
        self.msg.mentioned = mentioned;
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.msg.silent = silent;
        self
    }

    pub fn post(mut self, post: bool) -> Self {
        self.msg.post = post;
        self
    }

    pub fn chat(mut self, chat: PeerId) -> Self {
        self.msg.chat = Some(chat);
        self
    }

    pub fn sender(mut self, sender: PeerId) -> Self {
        self.msg.sender = Some(sender);
        self
    }

    pub fn reply_to(mut self, msg_id: i64) -> Self {
        self.msg.reply_to_msg_id = Some(msg_id);
        self
    }

    pub fn entities(mut self, entities: Vec<MessageEntity>) -> Self {
        self.msg.entities = entities;
        self
    }

    pub fn from_scheduled(mut self, from_scheduled: bool) -> Self {
        self.msg.from_scheduled = from_scheduled;
        self
    }

    pub fn via_bot(mut self, bot_id: i64) -> Self {
        self.msg.via_bot_id = Some(bot_id);
        self
    }

    pub fn edit_date(mut self, edit_date: i64) -> Self {
        self.msg.edit_date = Some(edit_date);
        self
    }

    pub fn keyboard(mut self, keyboard: Keyboard) -> Self {
        self.msg.keyboard = Some(keyboard);
        self
    }

    pub fn forwarded(mut self, info: ForwardedInfo) -> Self {
        self.msg.forwarded_info = Some(info);
        self
    }

    pub fn psa_type(mut self, psa_type: impl Into<String>) -> Self {
        self.msg.psa_type = Some(psa_type.into());
        self
    }

    pub fn imported(mut self, imported: bool) -> Self {
        self.msg.imported = imported;
        self
    }

    pub fn media(mut self, media: Media) -> Self {
        self.msg.media = Some(media);
        self
    }

    /// Sets the command outcome directly instead of deriving it on build.
    pub(crate) fn command(mut self, command: Option<BotCommand>) -> Self {
        self.msg.command = command;
        self.command_resolved = true;
        self
    }

    /// Finishes the message, recognising a leading bot command.
    pub fn build(self) -> Message {
        let mut msg = self.msg;
        if !self.command_resolved {
            msg.command = crate::command::parse_command(&msg.text, &msg.entities);
        }
        msg
    }
}

// =============================================================================
// ServiceMessage
// =============================================================================

/// A service message (member joined, title changed, pinned, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceMessage {
    pub id: Option<i64>,
    pub date: Option<i64>,
    pub out: bool,
    pub chat: Option<PeerId>,
    pub sender: Option<PeerId>,
    pub action: ServiceAction,
}

/// The action a service message reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceAction {
    /// Constructor tag, e.g. `messageActionChatAddUser`.
    pub kind: String,
    /// The undecoded action record.
    pub raw: Value,
}

impl ServiceAction {
    /// `kind` with the `messageAction` prefix removed.
    pub fn short_kind(&self) -> &str {
        self.kind.strip_prefix("messageAction").unwrap_or(&self.kind)
    }
}
