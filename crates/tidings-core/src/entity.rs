//! Formatting entities and UTF-16 text helpers.
//!
//! Entities are tagged spans over message text. Offsets and lengths count
//! UTF-16 code units, so every slice taken here goes through the helpers at
//! the bottom of this module rather than byte indexing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DecodeError, DecodeResult};

/// Raw tag of the bot-command entity.
pub const BOT_COMMAND_TAG: &str = "messageEntityBotCommand";

// =============================================================================
// Entity Types
// =============================================================================

/// The kind of a formatting entity, with the payload some kinds carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityKind {
    Bold,
    Italic,
    Underline,
    Strike,
    Spoiler,
    Code,
    Pre {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        language: String,
    },
    Blockquote,
    Url,
    TextUrl {
        url: String,
    },
    Email,
    Phone,
    Mention,
    MentionName {
        user_id: i64,
    },
    Hashtag,
    Cashtag,
    BankCard,
    BotCommand,
    CustomEmoji {
        document_id: i64,
    },
    /// A tag this crate does not model. Rendered as plain text.
    Unknown {
        tag: String,
    },
}

impl EntityKind {
    /// Maps a raw `_` tag plus its record to a kind.
    pub fn from_raw(tag: &str, raw: &Value) -> Self {
        let str_field = |key: &str| {
            raw.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };
        let int_field = |key: &str| raw.get(key).and_then(Value::as_i64).unwrap_or_default();

        match tag {
            "messageEntityBold" => EntityKind::Bold,
            "messageEntityItalic" => EntityKind::Italic,
            "messageEntityUnderline" => EntityKind::Underline,
            "messageEntityStrike" => EntityKind::Strike,
            "messageEntitySpoiler" => EntityKind::Spoiler,
            "messageEntityCode" => EntityKind::Code,
            "messageEntityPre" => EntityKind::Pre {
                language: str_field("language"),
            },
            "messageEntityBlockquote" => EntityKind::Blockquote,
            "messageEntityUrl" => EntityKind::Url,
            "messageEntityTextUrl" => EntityKind::TextUrl {
                url: str_field("url"),
            },
            "messageEntityEmail" => EntityKind::Email,
            "messageEntityPhone" => EntityKind::Phone,
            "messageEntityMention" => EntityKind::Mention,
            "messageEntityMentionName" | "inputMessageEntityMentionName" => {
                EntityKind::MentionName {
                    user_id: int_field("user_id"),
                }
            }
            "messageEntityHashtag" => EntityKind::Hashtag,
            "messageEntityCashtag" => EntityKind::Cashtag,
            "messageEntityBankCard" => EntityKind::BankCard,
            BOT_COMMAND_TAG => EntityKind::BotCommand,
            "messageEntityCustomEmoji" => EntityKind::CustomEmoji {
                document_id: int_field("document_id"),
            },
            other => EntityKind::Unknown {
                tag: other.to_owned(),
            },
        }
    }
}

/// A tagged span over message text, measured in UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntity {
    #[serde(flatten)]
    pub kind: EntityKind,
    pub offset: usize,
    pub length: usize,
}

impl MessageEntity {
    pub fn new(kind: EntityKind, offset: usize, length: usize) -> Self {
        Self {
            kind,
            offset,
            length,
        }
    }

    /// Parses one raw entity record.
    ///
    /// `index` is the record's position in the raw list and is only used for
    /// error reporting.
    pub fn from_raw(index: usize, raw: &Value) -> DecodeResult<Self> {
        let tag = raw.get("_").and_then(Value::as_str).unwrap_or_default();
        let offset = Self::position(index, raw, "offset")?;
        let length = Self::position(index, raw, "length")?;
        Ok(Self::new(EntityKind::from_raw(tag, raw), offset, length))
    }

    /// Returns `true` for the bot-command entity.
    pub fn is_bot_command(&self) -> bool {
        self.kind == EntityKind::BotCommand
    }

    /// Exclusive end position.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    fn position(index: usize, raw: &Value, key: &str) -> DecodeResult<usize> {
        let value = raw.get(key).ok_or_else(|| DecodeError::MalformedEntity {
            index,
            reason: format!("missing `{key}`"),
        })?;
        value
            .as_u64()
            .and_then(|v| usize::try_from(v).ok())
            .ok_or_else(|| DecodeError::MalformedEntity {
                index,
                reason: format!("`{key}` is not a non-negative integer"),
            })
    }
}

// =============================================================================
// UTF-16 Helpers
// =============================================================================

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Slices `text` by UTF-16 positions, clamping both ends to the text length.
///
/// A range that splits a surrogate pair yields a replacement character for
/// the orphaned half.
pub fn utf16_slice(text: &str, start: usize, end: Option<usize>) -> String {
    let units: Vec<u16> = text.encode_utf16().collect();
    let start = start.min(units.len());
    let end = end.unwrap_or(units.len()).clamp(start, units.len());
    String::from_utf16_lossy(&units[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bot_command_entity() {
        let raw = json!({"_": "messageEntityBotCommand", "offset": 0, "length": 6});
        let entity = MessageEntity::from_raw(0, &raw).unwrap();
        assert!(entity.is_bot_command());
        assert_eq!(entity.end(), 6);
    }

    #[test]
    fn test_parse_payload_kinds() {
        let raw = json!({
            "_": "messageEntityTextUrl",
            "offset": 1,
            "length": 2,
            "url": "https://a.b",
        });
        let entity = MessageEntity::from_raw(0, &raw).unwrap();
        assert_eq!(
            entity.kind,
            EntityKind::TextUrl {
                url: "https://a.b".into()
            }
        );

        let raw = json!({"_": "messageEntityPre", "offset": 0, "length": 3, "language": "rust"});
        let entity = MessageEntity::from_raw(0, &raw).unwrap();
        assert_eq!(
            entity.kind,
            EntityKind::Pre {
                language: "rust".into()
            }
        );
    }

    #[test]
    fn test_unknown_tag_is_kept() {
        let raw = json!({"_": "messageEntityFancy", "offset": 0, "length": 1});
        let entity = MessageEntity::from_raw(0, &raw).unwrap();
        assert_eq!(
            entity.kind,
            EntityKind::Unknown {
                tag: "messageEntityFancy".into()
            }
        );
    }

    #[test]
    fn test_missing_length_is_malformed() {
        let raw = json!({"_": "messageEntityBold", "offset": 0});
        let err = MessageEntity::from_raw(3, &raw).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedEntity { index: 3, .. }));
    }

    #[test]
    fn test_negative_offset_is_malformed() {
        let raw = json!({"_": "messageEntityBold", "offset": -1, "length": 2});
        assert!(MessageEntity::from_raw(0, &raw).is_err());
    }

    #[test]
    fn test_utf16_slice_counts_code_units() {
        // U+1F600 is two UTF-16 code units.
        let text = "😀ab";
        assert_eq!(utf16_len(text), 4);
        assert_eq!(utf16_slice(text, 2, None), "ab");
        assert_eq!(utf16_slice(text, 0, Some(2)), "😀");
    }

    #[test]
    fn test_utf16_slice_clamps() {
        assert_eq!(utf16_slice("abc", 10, None), "");
        assert_eq!(utf16_slice("abc", 1, Some(99)), "bc");
        assert_eq!(utf16_slice("abc", 2, Some(1)), "");
    }
}
