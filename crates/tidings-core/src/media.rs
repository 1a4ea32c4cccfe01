//! Message attachments.
//!
//! [`Media`] is a closed set: a message carries exactly one variant or none.

use serde::{Deserialize, Serialize};

// =============================================================================
// Media
// =============================================================================

/// A file-backed attachment (audio, video, document, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMedia {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default)]
    pub size: u64,
    /// Duration in seconds for audio and video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    /// Sticker emoji or audio title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// An attached message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Media {
    Audio(FileMedia),
    Voice(FileMedia),
    Video(FileMedia),
    RoundVideo(FileMedia),
    Gif(FileMedia),
    Sticker(FileMedia),
    MaskSticker(FileMedia),
    Photo(Photo),
    /// A photo sent as an uncompressed document.
    DocumentPhoto(FileMedia),
    Document(FileMedia),
    Poll(Poll),
}

impl Media {
    /// Returns the fieldless tag of this attachment.
    pub fn kind(&self) -> MediaKind {
        match self {
            Media::Audio(_) => MediaKind::Audio,
            Media::Voice(_) => MediaKind::Voice,
            Media::Video(_) => MediaKind::Video,
            Media::RoundVideo(_) => MediaKind::RoundVideo,
            Media::Gif(_) => MediaKind::Gif,
            Media::Sticker(_) => MediaKind::Sticker,
            Media::MaskSticker(_) => MediaKind::MaskSticker,
            Media::Photo(_) => MediaKind::Photo,
            Media::DocumentPhoto(_) => MediaKind::DocumentPhoto,
            Media::Document(_) => MediaKind::Document,
            Media::Poll(_) => MediaKind::Poll,
        }
    }

    pub fn as_poll(&self) -> Option<&Poll> {
        match self {
            Media::Poll(poll) => Some(poll),
            _ => None,
        }
    }
}

/// Tag-only view of [`Media`], used by filters and configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Audio,
    Voice,
    Video,
    RoundVideo,
    Gif,
    Sticker,
    MaskSticker,
    Photo,
    DocumentPhoto,
    Document,
    Poll,
}

impl MediaKind {
    /// All kinds, in declaration order.
    pub const ALL: [MediaKind; 11] = [
        MediaKind::Audio,
        MediaKind::Voice,
        MediaKind::Video,
        MediaKind::RoundVideo,
        MediaKind::Gif,
        MediaKind::Sticker,
        MediaKind::MaskSticker,
        MediaKind::Photo,
        MediaKind::DocumentPhoto,
        MediaKind::Document,
        MediaKind::Poll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Voice => "voice",
            MediaKind::Video => "video",
            MediaKind::RoundVideo => "round_video",
            MediaKind::Gif => "gif",
            MediaKind::Sticker => "sticker",
            MediaKind::MaskSticker => "mask_sticker",
            MediaKind::Photo => "photo",
            MediaKind::DocumentPhoto => "document_photo",
            MediaKind::Document => "document",
            MediaKind::Poll => "poll",
        }
    }

    /// Parses the snake_case name used in configuration.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Photo
// =============================================================================

/// A compressed photo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: i64,
    #[serde(default)]
    pub has_stickers: bool,
    /// Self-destruct timer in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_seconds: Option<i32>,
}

// =============================================================================
// Poll
// =============================================================================

/// A poll attachment. Quiz polls are a subtype with a designated answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    pub id: i64,
    pub question: String,
    pub answers: Vec<PollAnswer>,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub public_voters: bool,
    #[serde(default)]
    pub multiple_choice: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_period: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_date: Option<i64>,
    pub kind: PollKind,
}

impl Poll {
    pub fn is_quiz(&self) -> bool {
        matches!(self.kind, PollKind::Quiz { .. })
    }

    /// The correct answer of a quiz, once results are known.
    pub fn correct_answer(&self) -> Option<&PollAnswer> {
        match self.kind {
            PollKind::Quiz {
                correct_answer: Some(index),
                ..
            } => self.answers.get(index),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PollKind {
    Regular,
    Quiz {
        /// Index into [`Poll::answers`]. Only known after voting or closing.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        correct_answer: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        solution: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollAnswer {
    pub text: String,
    /// Opaque option token.
    pub option: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voters: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(text: &str, option: u8) -> PollAnswer {
        PollAnswer {
            text: text.into(),
            option: vec![option],
            voters: None,
        }
    }

    fn poll(kind: PollKind) -> Poll {
        Poll {
            id: 1,
            question: "2 + 2?".into(),
            answers: vec![answer("3", 0), answer("4", 1)],
            closed: false,
            public_voters: false,
            multiple_choice: false,
            close_period: None,
            close_date: None,
            kind,
        }
    }

    #[test]
    fn test_quiz_correct_answer() {
        let quiz = poll(PollKind::Quiz {
            correct_answer: Some(1),
            solution: None,
        });
        assert!(quiz.is_quiz());
        assert_eq!(quiz.correct_answer().map(|a| a.text.as_str()), Some("4"));

        let regular = poll(PollKind::Regular);
        assert!(!regular.is_quiz());
        assert!(regular.correct_answer().is_none());
    }

    #[test]
    fn test_media_kind_names() {
        for kind in MediaKind::ALL {
            assert_eq!(MediaKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(MediaKind::parse("hologram"), None);
        assert_eq!(Media::Poll(poll(PollKind::Regular)).kind(), MediaKind::Poll);
    }
}
