//! Stub collaborators shared by unit tests.

use serde_json::Value;

use crate::error::{ResolveError, ResolveResult};
use crate::keyboard::{Button, ButtonKind, InlineKeyboard, Keyboard};
use crate::media::{FileMedia, Media, Poll, PollAnswer, PollKind};
use crate::peer::PeerId;
use crate::resolver::{KeyboardResolver, MediaResolver, PeerResolver};

/// Resolves `peerUser`/`peerChat`/`peerChannel` records and bare integers.
pub(crate) struct StubPeers;

impl PeerResolver for StubPeers {
    fn resolve(&self, raw: &Value) -> ResolveResult<PeerId> {
        if let Some(id) = raw.as_i64() {
            return PeerId::from_bot_api_id(id)
                .ok_or_else(|| ResolveError::malformed("peer", "zero id"));
        }
        let id = |key: &str| {
            raw.get(key)
                .and_then(Value::as_i64)
                .ok_or_else(|| ResolveError::malformed("peer", format!("missing {key}")))
        };
        match raw.get("_").and_then(Value::as_str) {
            Some("peerUser") => id("user_id").map(PeerId::User),
            Some("peerChat") => id("chat_id").map(PeerId::Chat),
            Some("peerChannel") => id("channel_id").map(PeerId::Channel),
            Some(tag) => Err(ResolveError::unknown_constructor("peer", tag)),
            None => Err(ResolveError::malformed("peer", "missing constructor")),
        }
    }
}

/// Fails every lookup.
pub(crate) struct FailingPeers;

impl PeerResolver for FailingPeers {
    fn resolve(&self, _raw: &Value) -> ResolveResult<PeerId> {
        Err(ResolveError::PeerNotFound("stub".into()))
    }
}

/// Understands `{"_": "quiz"}`, `{"_": "poll"}`, `{"_": "document"}` and
/// `{"_": "empty"}`; rejects everything else.
pub(crate) struct StubMedia;

impl MediaResolver for StubMedia {
    fn resolve(&self, raw: &Value) -> ResolveResult<Option<Media>> {
        match raw.get("_").and_then(Value::as_str).unwrap_or_default() {
            "quiz" => Ok(Some(Media::Poll(poll(PollKind::Quiz {
                correct_answer: Some(0),
                solution: None,
            })))),
            "poll" => Ok(Some(Media::Poll(poll(PollKind::Regular)))),
            "document" => Ok(Some(Media::Document(FileMedia {
                id: 1,
                ..Default::default()
            }))),
            "empty" => Ok(None),
            tag => Err(ResolveError::unknown_constructor("media", tag)),
        }
    }
}

/// Produces a one-button inline keyboard for any markup except `{"_": "hide"}`.
pub(crate) struct StubKeyboards;

impl KeyboardResolver for StubKeyboards {
    fn resolve(&self, raw: &Value) -> ResolveResult<Option<Keyboard>> {
        if raw.get("_").and_then(Value::as_str) == Some("hide") {
            return Ok(None);
        }
        Ok(Some(Keyboard::Inline(InlineKeyboard {
            rows: vec![vec![Button::new("ok", ButtonKind::Text)]],
        })))
    }
}

pub(crate) fn poll(kind: PollKind) -> Poll {
    Poll {
        id: 7,
        question: "?".into(),
        answers: vec![PollAnswer {
            text: "yes".into(),
            option: vec![0],
            voters: None,
        }],
        closed: false,
        public_voters: false,
        multiple_choice: false,
        close_period: None,
        close_date: None,
        kind,
    }
}
