//! Typed peer handles.
//!
//! The protocol addresses users, basic groups and channels in separate id
//! spaces. [`PeerId`] keeps them apart; the bot-API "marked" form folds them
//! into a single signed integer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Offset applied to channel ids in the bot-API marked form.
const CHANNEL_MARK: i64 = 1_000_000_000_000;

/// A resolved peer handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum PeerId {
    /// A user or bot account.
    User(i64),
    /// A basic group.
    Chat(i64),
    /// A channel or supergroup.
    Channel(i64),
}

impl PeerId {
    /// Returns the bare id without the peer type.
    pub fn bare_id(&self) -> i64 {
        match *self {
            PeerId::User(id) | PeerId::Chat(id) | PeerId::Channel(id) => id,
        }
    }

    /// Converts to the bot-API marked id.
    ///
    /// Users stay positive, basic groups become negative and channels are
    /// prefixed with `-100`.
    pub fn to_bot_api_id(&self) -> i64 {
        match *self {
            PeerId::User(id) => id,
            PeerId::Chat(id) => -id,
            PeerId::Channel(id) => -CHANNEL_MARK - id,
        }
    }

    /// Parses a bot-API marked id. Returns `None` for zero.
    pub fn from_bot_api_id(id: i64) -> Option<Self> {
        match id {
            0 => None,
            id if id > 0 => Some(PeerId::User(id)),
            id if id <= -CHANNEL_MARK => Some(PeerId::Channel(-id - CHANNEL_MARK)),
            id => Some(PeerId::Chat(-id)),
        }
    }

    /// Returns `true` for user peers.
    pub fn is_user(&self) -> bool {
        matches!(self, PeerId::User(_))
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerId::User(id) => write!(f, "user#{id}"),
            PeerId::Chat(id) => write!(f, "chat#{id}"),
            PeerId::Channel(id) => write!(f, "channel#{id}"),
        }
    }
}
