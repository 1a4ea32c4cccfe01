//! Event decoding.
//!
//! [`EventDecoder`] turns one raw JSON record into an [`Event`]. Peer ids,
//! attachments and keyboards are delegated to the resolvers it was built
//! with; everything else is read directly from the record.
//!
//! # Example
//!
//! ```rust,ignore
//! use tidings_core::{EventDecoder, DecoderOptions};
//!
//! let decoder = EventDecoder::new(MyPeers)
//!     .with_media(MyMedia)
//!     .with_options(DecoderOptions { eager_html: true });
//!
//! let msg = decoder.decode(&raw)?;
//! println!("{:?}", msg.command());
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{Level, debug, span, trace, warn};

use crate::command::parse_command;
use crate::entity::MessageEntity;
use crate::error::{DecodeError, DecodeResult};
use crate::event::{Event, Message, MessageBuilder, ServiceAction, ServiceMessage};
use crate::forward;
use crate::raw;
use crate::resolver::{KeyboardResolver, MediaResolver, NullResolver, PeerResolver};

/// Raw tag of service messages.
pub const SERVICE_MESSAGE_TAG: &str = "messageService";

/// Tunables for [`EventDecoder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderOptions {
    /// Render both HTML modes at decode time instead of on first use.
    pub eager_html: bool,
}

/// Decodes raw records into events.
///
/// Holds no mutable state; a single decoder can be shared across threads and
/// called concurrently.
#[derive(Clone)]
pub struct EventDecoder {
    peers: Arc<dyn PeerResolver>,
    media: Arc<dyn MediaResolver>,
    keyboards: Arc<dyn KeyboardResolver>,
    options: DecoderOptions,
}

impl EventDecoder {
    /// Creates a decoder that ignores media and keyboards.
    pub fn new(peers: impl PeerResolver + 'static) -> Self {
        Self {
            peers: Arc::new(peers),
            media: Arc::new(NullResolver),
            keyboards: Arc::new(NullResolver),
            options: DecoderOptions::default(),
        }
    }

    pub fn with_media(mut self, media: impl MediaResolver + 'static) -> Self {
        self.media = Arc::new(media);
        self
    }

    pub fn with_keyboards(mut self, keyboards: impl KeyboardResolver + 'static) -> Self {
        self.keyboards = Arc::new(keyboards);
        self
    }

    pub fn with_options(mut self, options: DecoderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> DecoderOptions {
        self.options
    }

    /// Parses JSON text and decodes it with [`decode_event`](Self::decode_event).
    pub fn decode_str(&self, input: &str) -> DecodeResult<Event> {
        let raw: Value = serde_json::from_str(input)?;
        self.decode_event(&raw)
    }

    /// Decodes any record, dispatching on its `_` tag.
    ///
    /// `messageService` records become [`Event::Service`]; everything else,
    /// including untagged records, is decoded as a message.
    pub fn decode_event(&self, raw: &Value) -> DecodeResult<Event> {
        match raw.get("_").and_then(Value::as_str) {
            Some(SERVICE_MESSAGE_TAG) => self.decode_service(raw).map(Event::Service),
            _ => self.decode(raw).map(Event::Message),
        }
    }

    /// Decodes a regular message record.
    ///
    /// Fails if `message` or `from_scheduled` is absent, if a present key has
    /// the wrong type, or if a resolver fails. Malformed entities are dropped
    /// rather than failing the decode.
    pub fn decode(&self, raw: &Value) -> DecodeResult<Message> {
        let id = raw.get("id").and_then(Value::as_i64);
        let span = span!(Level::DEBUG, "decode", id);
        let _enter = span.enter();

        let text = raw::req_str(raw, "message", "message")?;
        let mut builder = MessageBuilder::new(text.clone())
            .from_scheduled(raw::req_bool(raw, "from_scheduled", "from_scheduled")?);

        if let Some(via_bot_id) = raw::opt_i64(raw, "via_bot_id", "via_bot_id")? {
            builder = builder.via_bot(via_bot_id);
        }
        if let Some(edit_date) = raw::opt_i64(raw, "edit_date", "edit_date")? {
            builder = builder.edit_date(edit_date);
        }

        if let Some(markup) = raw::get(raw, "reply_markup") {
            match self.keyboards.resolve(markup)? {
                Some(keyboard) => builder = builder.keyboard(keyboard),
                None => trace!("reply markup carries no keyboard"),
            }
        }

        if let Some(fwd) = raw::get(raw, "fwd_from") {
            builder = builder
                .forwarded(forward::build_forwarded_info(fwd, self.peers.as_ref())?)
                .imported(forward::imported(fwd)?);
            if let Some(psa_type) = forward::psa_type(fwd)? {
                builder = builder.psa_type(psa_type);
            }
        }

        if let Some(media) = raw::get(raw, "media") {
            match self.media.resolve(media)? {
                Some(media) => builder = builder.media(media),
                None => trace!("media record resolved to nothing"),
            }
        }

        let (entities, first_malformed) = decode_entities(raw)?;
        let command = if first_malformed {
            None
        } else {
            parse_command(&text, &entities)
        };
        builder = builder.entities(entities).command(command);

        builder = self.decode_metadata(raw, builder)?;

        let msg = builder.build();
        if self.options.eager_html {
            msg.warm_html();
        }

        debug!(
            command = msg.command(),
            media = msg.media_kind().map(|k| k.as_str()),
            forwarded = msg.forwarded_info().is_some(),
            "decoded message"
        );
        Ok(msg)
    }

    fn decode_metadata(
        &self,
        raw: &Value,
        mut builder: MessageBuilder,
    ) -> DecodeResult<MessageBuilder> {
        if let Some(id) = raw::opt_i64(raw, "id", "id")? {
            builder = builder.id(id);
        }
        if let Some(date) = raw::opt_i64(raw, "date", "date")? {
            builder = builder.date(date);
        }
        builder = builder
            .outgoing(raw::flag(raw, "out", "out")?)
            .mentioned(raw::flag(raw, "mentioned", "mentioned")?)
            .silent(raw::flag(raw, "silent", "silent")?)
            .post(raw::flag(raw, "post", "post")?);

        if let Some(peer) = raw::get(raw, "peer_id") {
            builder = builder.chat(self.peers.resolve(peer)?);
        }
        if let Some(peer) = raw::get(raw, "from_id") {
            builder = builder.sender(self.peers.resolve(peer)?);
        }
        if let Some(reply_to) = raw::get(raw, "reply_to")
            && let Some(msg_id) =
                raw::opt_i64(reply_to, "reply_to_msg_id", "reply_to.reply_to_msg_id")?
        {
            builder = builder.reply_to(msg_id);
        }
        Ok(builder)
    }

    fn decode_service(&self, raw: &Value) -> DecodeResult<ServiceMessage> {
        let id = raw.get("id").and_then(Value::as_i64);
        let span = span!(Level::DEBUG, "decode_service", id);
        let _enter = span.enter();

        let action = raw::get(raw, "action").ok_or(DecodeError::missing("action"))?;
        let kind = raw::opt_str(action, "_", "action._")?.unwrap_or_default();

        let svc = ServiceMessage {
            id: raw::opt_i64(raw, "id", "id")?,
            date: raw::opt_i64(raw, "date", "date")?,
            out: raw::flag(raw, "out", "out")?,
            chat: raw::get(raw, "peer_id")
                .map(|peer| self.peers.resolve(peer))
                .transpose()?,
            sender: raw::get(raw, "from_id")
                .map(|peer| self.peers.resolve(peer))
                .transpose()?,
            action: ServiceAction {
                kind,
                raw: action.clone(),
            },
        };

        debug!(action = %svc.action.kind, "decoded service message");
        Ok(svc)
    }
}

impl std::fmt::Debug for EventDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDecoder")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Parses the `entities` list, dropping malformed records.
///
/// The flag reports whether the first record was malformed, in which case
/// no command may be recognised.
fn decode_entities(raw: &Value) -> DecodeResult<(Vec<MessageEntity>, bool)> {
    let Some(list) = raw::get(raw, "entities") else {
        return Ok((Vec::new(), false));
    };
    let list = list
        .as_array()
        .ok_or_else(|| DecodeError::invalid("entities", "expected a list"))?;

    let mut entities = Vec::with_capacity(list.len());
    let mut first_malformed = false;
    for (index, entry) in list.iter().enumerate() {
        match MessageEntity::from_raw(index, entry) {
            Ok(entity) => entities.push(entity),
            Err(err) => {
                warn!(error = %err, "dropping malformed entity");
                if index == 0 {
                    first_malformed = true;
                }
            }
        }
    }
    Ok((entities, first_malformed))
}
