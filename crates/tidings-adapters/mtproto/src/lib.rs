//! # Tidings Adapter for MTProto records
//!
//! Collaborators that understand MTProto-shaped JSON, as produced by common
//! client libraries when dumping updates:
//!
//! - [`MtprotoPeerResolver`]: `peerUser` / `peerChat` / `peerChannel`
//! - [`MtprotoMediaResolver`]: photos, documents and polls
//! - [`MtprotoKeyboardResolver`]: inline and reply keyboards
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tidings_adapter_mtproto::mtproto_decoder;
//!
//! let decoder = mtproto_decoder();
//! let event = decoder.decode_str(&line)?;
//! if let Some(msg) = event.as_message() {
//!     println!("{}", msg.html(false));
//! }
//! ```

pub mod keyboard;
pub mod media;
pub mod peer;

pub use keyboard::MtprotoKeyboardResolver;
pub use media::MtprotoMediaResolver;
pub use peer::MtprotoPeerResolver;

use serde_json::Value;
use tidings_core::{EventDecoder, ResolveError, ResolveResult};

/// A decoder wired with all three MTProto resolvers.
pub fn mtproto_decoder() -> EventDecoder {
    EventDecoder::new(MtprotoPeerResolver)
        .with_media(MtprotoMediaResolver)
        .with_keyboards(MtprotoKeyboardResolver)
}

/// Reads the `_` constructor tag of a record.
pub(crate) fn constructor<'a>(what: &'static str, raw: &'a Value) -> ResolveResult<&'a str> {
    raw.get("_")
        .and_then(Value::as_str)
        .ok_or_else(|| ResolveError::malformed(what, "missing constructor"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use tidings_core::{DecodeError, DecoderOptions, Event, MediaKind, PeerId};
    use tidings_framework::{Filter, FilterChain, FilterRegistry, FilterSpec, QuizPollFilter};

    fn quiz_update() -> Value {
        json!({
            "_": "message",
            "id": 501,
            "date": 1_700_000_000,
            "peer_id": {"_": "peerChannel", "channel_id": 77},
            "from_id": {"_": "peerUser", "user_id": 9},
            "message": "",
            "from_scheduled": false,
            "media": {
                "_": "messageMediaPoll",
                "poll": {
                    "_": "poll",
                    "id": 3,
                    "quiz": true,
                    "question": "2 + 2?",
                    "answers": [
                        {"_": "pollAnswer", "text": "4", "option": [0]},
                        {"_": "pollAnswer", "text": "5", "option": [1]},
                    ],
                },
                "results": {"results": [{"option": [0], "correct": true, "voters": 1}]},
            },
        })
    }

    #[test]
    fn test_decodes_command_update() {
        let event = mtproto_decoder()
            .decode_event(&json!({
                "_": "message",
                "id": 10,
                "peer_id": {"_": "peerUser", "user_id": 42},
                "message": "/start@my_bot deep link",
                "from_scheduled": false,
                "entities": [{"_": "messageEntityBotCommand", "offset": 0, "length": 13}],
                "reply_to": {"_": "messageReplyHeader", "reply_to_msg_id": 9},
            }))
            .unwrap();

        let msg = event.as_message().unwrap();
        assert_eq!(msg.chat(), Some(PeerId::User(42)));
        assert_eq!(msg.command(), Some("start@my_bot"));
        assert_eq!(
            msg.command_args(),
            Some(&["deep".to_string(), "link".to_string()][..])
        );
        assert_eq!(msg.reply_to_msg_id(), Some(9));
    }

    #[test]
    fn test_decodes_forwarded_post_with_keyboard() {
        let msg = mtproto_decoder()
            .decode(&json!({
                "message": "<b>news</b>",
                "from_scheduled": true,
                "post": true,
                "fwd_from": {
                    "_": "messageFwdHeader",
                    "date": 1_600_000_000,
                    "from_id": {"_": "peerChannel", "channel_id": 5},
                    "channel_post": 12,
                    "psa_type": "covid",
                },
                "reply_markup": {
                    "_": "replyInlineMarkup",
                    "rows": [{"buttons": [{"_": "keyboardButtonUrl", "text": "Open", "url": "https://t.me"}]}],
                },
                "entities": [{"_": "messageEntityBold", "offset": 0, "length": 3}],
            }))
            .unwrap();

        let fwd = msg.forwarded_info().unwrap();
        assert_eq!(fwd.from, Some(PeerId::Channel(5)));
        assert_eq!(fwd.channel_post, Some(12));
        assert_eq!(msg.psa_type(), Some("covid"));
        assert!(msg.from_scheduled());
        assert!(msg.keyboard().unwrap().is_inline());
        assert_eq!(msg.html(false), "<b>&lt;b&gt;</b>news&lt;/b&gt;");
    }

    #[test]
    fn test_resolver_errors_fail_decode() {
        let err = mtproto_decoder()
            .decode(&json!({
                "message": "hi",
                "from_scheduled": false,
                "peer_id": {"_": "peerSecretChat", "id": 1},
            }))
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::Resolve(ResolveError::unknown_constructor("peer", "peerSecretChat"))
        );
    }

    #[test]
    fn test_eager_html() {
        let decoder = mtproto_decoder().with_options(DecoderOptions { eager_html: true });
        let msg = decoder
            .decode(&json!({
                "message": "spoiler",
                "from_scheduled": false,
                "entities": [{"_": "messageEntitySpoiler", "offset": 0, "length": 7}],
            }))
            .unwrap();
        assert!(msg.is_html_cached(true));
        assert!(msg.is_html_cached(false));
        assert_eq!(msg.html(true), "<tg-spoiler>spoiler</tg-spoiler>");
        assert_eq!(msg.html(false), "spoiler");
    }

    #[test]
    fn test_quiz_poll_routing() {
        let event: Event = mtproto_decoder().decode_event(&quiz_update()).unwrap();
        assert_eq!(event.as_message().and_then(|m| m.media_kind()), Some(MediaKind::Poll));
        assert!(QuizPollFilter.apply(&event));

        let registry = FilterRegistry::default();
        let quizzes =
            FilterChain::from_specs("quizzes", &[FilterSpec::new("quiz_poll")], &registry).unwrap();
        let text_only =
            FilterChain::from_specs("text", &[FilterSpec::with_args("text", "".into())], &registry)
                .unwrap();

        let event = Arc::new(event);
        assert!(quizzes.evaluate(Arc::clone(&event)).is_some());
        assert!(text_only.evaluate(event).is_some());
    }

    #[test]
    fn test_service_update() {
        let event = mtproto_decoder()
            .decode_str(concat!(
                r#"{"_":"messageService","id":4,"peer_id":{"_":"peerChat","chat_id":8},"#,
                r#""action":{"_":"messageActionChatJoinedByLink","inviter_id":1}}"#,
            ))
            .unwrap();
        let svc = event.as_service().unwrap();
        assert_eq!(svc.chat, Some(PeerId::Chat(8)));
        assert_eq!(svc.action.short_kind(), "ChatJoinedByLink");
    }

    #[test]
    fn test_constructor_helper() {
        assert_eq!(constructor("peer", &json!({"_": "peerUser"})).unwrap(), "peerUser");
        assert!(constructor("peer", &json!({"_": 1})).is_err());
    }
}
