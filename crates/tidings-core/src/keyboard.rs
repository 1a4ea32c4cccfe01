//! Keyboards attached to messages.
//!
//! A message carries either an inline keyboard or a reply keyboard, never
//! both. Markup that only hides or forces a reply is not a keyboard.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Keyboard {
    Inline(InlineKeyboard),
    Reply(ReplyKeyboard),
}

impl Keyboard {
    pub fn rows(&self) -> &[Vec<Button>] {
        match self {
            Keyboard::Inline(kb) => &kb.rows,
            Keyboard::Reply(kb) => &kb.rows,
        }
    }

    /// Iterates over every button, row by row.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows().iter().flatten()
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, Keyboard::Inline(_))
    }
}

/// Buttons shown under the message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<Button>>,
}

/// Buttons replacing the client's keyboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplyKeyboard {
    pub rows: Vec<Vec<Button>>,
    #[serde(default)]
    pub resize: bool,
    #[serde(default)]
    pub single_use: bool,
    #[serde(default)]
    pub selective: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub text: String,
    #[serde(flatten)]
    pub kind: ButtonKind,
}

impl Button {
    pub fn new(text: impl Into<String>, kind: ButtonKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ButtonKind {
    Text,
    Url { url: String },
    Callback { data: Vec<u8> },
    SwitchInline { query: String, same_peer: bool },
    RequestPhone,
    RequestGeo,
    RequestPoll { quiz: Option<bool> },
    Game,
    Buy,
    UserProfile { user_id: i64 },
    /// A button constructor this crate does not model.
    Other { tag: String },
}
