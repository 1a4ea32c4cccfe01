//! # Tidings Core
//!
//! Typed event model and decoder for MTProto-style message records.
//!
//! Raw records arrive as loosely typed JSON. This crate turns them into
//! immutable [`Event`] values and keeps everything protocol-specific behind
//! three collaborator traits:
//!
//! - [`PeerResolver`]: raw peer references to [`PeerId`]
//! - [`MediaResolver`]: raw attachments to [`Media`]
//! - [`KeyboardResolver`]: raw reply markup to [`Keyboard`]
//!
//! ## Flow
//!
//! ```text
//! ┌────────────┐     ┌──────────────┐     ┌───────────┐
//! │ raw record │────▶│ EventDecoder │────▶│   Event   │
//! └────────────┘     └──────┬───────┘     └───────────┘
//!                           │ resolvers, forwarded info,
//!                           │ command parser
//! ```
//!
//! Formatted text renders to HTML through [`render_html`]; messages memoise
//! both rendering modes via [`Message::html`].

pub mod command;
pub mod decoder;
pub mod entity;
pub mod error;
pub mod event;
pub mod forward;
pub mod html;
pub mod keyboard;
pub mod media;
pub mod peer;
pub mod resolver;

mod raw;

#[cfg(test)]
mod testing;

pub use command::{BotCommand, parse_command};
pub use decoder::{DecoderOptions, EventDecoder, SERVICE_MESSAGE_TAG};
pub use entity::{BOT_COMMAND_TAG, EntityKind, MessageEntity, utf16_len, utf16_slice};
pub use error::{DecodeError, DecodeResult, ResolveError, ResolveResult};
pub use event::{Event, Message, MessageBuilder, ServiceAction, ServiceMessage};
pub use forward::{ForwardedInfo, build_forwarded_info};
pub use html::{escape_html, render_html};
pub use keyboard::{Button, ButtonKind, InlineKeyboard, Keyboard, ReplyKeyboard};
pub use media::{FileMedia, Media, MediaKind, Photo, Poll, PollAnswer, PollKind};
pub use peer::PeerId;
pub use resolver::{KeyboardResolver, MediaResolver, NullResolver, PeerResolver};
