//! Message media.
//!
//! Photos and polls map directly. Documents are classified by their
//! attributes, most specific first: sticker, animation, video, audio, image,
//! then plain document. Other media constructors (geo, contact, web page,
//! ...) resolve to nothing.

use serde::Deserialize;
use serde_json::Value;
use tidings_core::{
    FileMedia, Media, MediaResolver, Photo, Poll, PollAnswer, PollKind, ResolveError,
    ResolveResult,
};
use tracing::trace;

use crate::constructor;

// ============================================================================
// Wire model
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawPhotoMedia {
    #[serde(default)]
    photo: Option<RawPhoto>,
    #[serde(default)]
    ttl_seconds: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct RawPhoto {
    #[serde(rename = "_")]
    tag: String,
    #[serde(default)]
    id: i64,
    #[serde(default)]
    has_stickers: bool,
}

#[derive(Debug, Deserialize)]
struct RawDocumentMedia {
    #[serde(default)]
    document: Option<RawDocument>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(rename = "_")]
    tag: String,
    #[serde(default)]
    id: i64,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    attributes: Vec<RawAttribute>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "_")]
enum RawAttribute {
    #[serde(rename = "documentAttributeImageSize")]
    ImageSize { w: i32, h: i32 },
    #[serde(rename = "documentAttributeAnimated")]
    Animated,
    #[serde(rename = "documentAttributeSticker")]
    Sticker {
        #[serde(default)]
        alt: Option<String>,
        #[serde(default)]
        mask: bool,
    },
    #[serde(rename = "documentAttributeVideo")]
    Video {
        #[serde(default)]
        round_message: bool,
        #[serde(default)]
        duration: f64,
        #[serde(default)]
        w: i32,
        #[serde(default)]
        h: i32,
    },
    #[serde(rename = "documentAttributeAudio")]
    Audio {
        #[serde(default)]
        voice: bool,
        #[serde(default)]
        duration: f64,
        #[serde(default)]
        title: Option<String>,
    },
    #[serde(rename = "documentAttributeFilename")]
    Filename { file_name: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct RawPollMedia {
    poll: RawPoll,
    #[serde(default)]
    results: Option<RawPollResults>,
}

#[derive(Debug, Deserialize)]
struct RawPoll {
    id: i64,
    question: RawText,
    answers: Vec<RawPollAnswer>,
    #[serde(default)]
    closed: bool,
    #[serde(default)]
    public_voters: bool,
    #[serde(default)]
    multiple_choice: bool,
    #[serde(default)]
    quiz: bool,
    #[serde(default)]
    close_period: Option<i32>,
    #[serde(default)]
    close_date: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawPollAnswer {
    text: RawText,
    option: RawBytes,
}

#[derive(Debug, Default, Deserialize)]
struct RawPollResults {
    #[serde(default)]
    results: Vec<RawAnswerVoters>,
    #[serde(default)]
    solution: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAnswerVoters {
    option: RawBytes,
    #[serde(default)]
    correct: bool,
    #[serde(default)]
    voters: Option<i32>,
}

/// Plain strings on older layers, `textWithEntities` on newer ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawText {
    Plain(String),
    Rich { text: String },
}

impl RawText {
    fn into_string(self) -> String {
        match self {
            RawText::Plain(text) | RawText::Rich { text } => text,
        }
    }
}

/// Byte strings arrive either as a list of numbers or as a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawBytes {
    List(Vec<u8>),
    Text(String),
}

impl RawBytes {
    fn into_bytes(self) -> Vec<u8> {
        match self {
            RawBytes::List(bytes) => bytes,
            RawBytes::Text(text) => text.into_bytes(),
        }
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Resolves MTProto `messageMedia*` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct MtprotoMediaResolver;

impl MediaResolver for MtprotoMediaResolver {
    fn resolve(&self, raw: &Value) -> ResolveResult<Option<Media>> {
        match constructor("media", raw)? {
            "messageMediaPhoto" => photo(parse(raw)?),
            "messageMediaDocument" => document(parse(raw)?),
            "messageMediaPoll" => poll(parse(raw)?).map(Some),
            other => {
                trace!(media = other, "Media constructor not modelled");
                Ok(None)
            }
        }
    }
}

fn parse<T: for<'de> Deserialize<'de>>(raw: &Value) -> ResolveResult<T> {
    serde_json::from_value(raw.clone())
        .map_err(|err| ResolveError::malformed("media", err.to_string()))
}

fn photo(media: RawPhotoMedia) -> ResolveResult<Option<Media>> {
    Ok(media.photo.filter(|p| p.tag == "photo").map(|p| {
        Media::Photo(Photo {
            id: p.id,
            has_stickers: p.has_stickers,
            ttl_seconds: media.ttl_seconds,
        })
    }))
}

fn document(media: RawDocumentMedia) -> ResolveResult<Option<Media>> {
    let Some(doc) = media.document.filter(|d| d.tag == "document") else {
        return Ok(None);
    };

    let mut file = FileMedia {
        id: doc.id,
        mime_type: doc.mime_type,
        size: doc.size,
        ..Default::default()
    };

    let mut sticker = None;
    let mut animated = false;
    let mut video = None;
    let mut audio = None;
    let mut image = false;

    for attribute in doc.attributes {
        match attribute {
            RawAttribute::ImageSize { w, h } => {
                image = true;
                file.width.get_or_insert(w);
                file.height.get_or_insert(h);
            }
            RawAttribute::Animated => animated = true,
            RawAttribute::Sticker { alt, mask } => {
                file.alt = alt.or(file.alt.take());
                sticker = Some(mask);
            }
            RawAttribute::Video {
                round_message,
                duration,
                w,
                h,
            } => {
                file.duration = Some(duration);
                file.width = Some(w);
                file.height = Some(h);
                video = Some(round_message);
            }
            RawAttribute::Audio {
                voice,
                duration,
                title,
            } => {
                file.duration.get_or_insert(duration);
                if file.alt.is_none() {
                    file.alt = title;
                }
                audio = Some(voice);
            }
            RawAttribute::Filename { file_name } => file.file_name = Some(file_name),
            RawAttribute::Other => {}
        }
    }

    let is_image_mime = file
        .mime_type
        .as_deref()
        .is_some_and(|mime| mime.starts_with("image/"));

    let media = match (sticker, animated, video, audio) {
        (Some(true), ..) => Media::MaskSticker(file),
        (Some(false), ..) => Media::Sticker(file),
        (None, true, ..) => Media::Gif(file),
        (None, false, Some(true), _) => Media::RoundVideo(file),
        (None, false, Some(false), _) => Media::Video(file),
        (None, false, None, Some(true)) => Media::Voice(file),
        (None, false, None, Some(false)) => Media::Audio(file),
        (None, false, None, None) if image && is_image_mime => Media::DocumentPhoto(file),
        (None, false, None, None) => Media::Document(file),
    };
    Ok(Some(media))
}

fn poll(media: RawPollMedia) -> ResolveResult<Media> {
    let RawPollMedia { poll, results } = media;
    let results = results.unwrap_or_default();
    let voters: Vec<(Vec<u8>, bool, Option<i32>)> = results
        .results
        .into_iter()
        .map(|r| (r.option.into_bytes(), r.correct, r.voters))
        .collect();

    let answers: Vec<PollAnswer> = poll
        .answers
        .into_iter()
        .map(|answer| {
            let option = answer.option.into_bytes();
            let voters = voters
                .iter()
                .find(|(opt, ..)| *opt == option)
                .and_then(|(_, _, count)| *count);
            PollAnswer {
                text: answer.text.into_string(),
                option,
                voters,
            }
        })
        .collect();

    let kind = if poll.quiz {
        let correct_answer = voters
            .iter()
            .find(|(_, correct, _)| *correct)
            .and_then(|(opt, ..)| answers.iter().position(|a| a.option == *opt));
        PollKind::Quiz {
            correct_answer,
            solution: results.solution,
        }
    } else {
        PollKind::Regular
    };

    Ok(Media::Poll(Poll {
        id: poll.id,
        question: poll.question.into_string(),
        answers,
        closed: poll.closed,
        public_voters: poll.public_voters,
        multiple_choice: poll.multiple_choice,
        close_period: poll.close_period,
        close_date: poll.close_date,
        kind,
    }))
}
