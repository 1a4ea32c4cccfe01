//! Reply markup.

use serde::Deserialize;
use serde_json::Value;
use tidings_core::{
    Button, ButtonKind, InlineKeyboard, Keyboard, KeyboardResolver, ReplyKeyboard, ResolveError,
    ResolveResult,
};

use crate::constructor;

#[derive(Debug, Deserialize)]
struct RawMarkup {
    #[serde(default)]
    rows: Vec<RawRow>,
    #[serde(default)]
    resize: bool,
    #[serde(default)]
    single_use: bool,
    #[serde(default)]
    selective: bool,
    #[serde(default)]
    placeholder: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    buttons: Vec<Value>,
}

/// Resolves MTProto `replyInlineMarkup` / `replyKeyboardMarkup` records.
///
/// `replyKeyboardHide` and `replyKeyboardForceReply` carry no buttons and
/// resolve to `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MtprotoKeyboardResolver;

impl KeyboardResolver for MtprotoKeyboardResolver {
    fn resolve(&self, raw: &Value) -> ResolveResult<Option<Keyboard>> {
        let tag = constructor("reply markup", raw)?;
        let inline = match tag {
            "replyInlineMarkup" => true,
            "replyKeyboardMarkup" => false,
            "replyKeyboardHide" | "replyKeyboardForceReply" => return Ok(None),
            other => return Err(ResolveError::unknown_constructor("reply markup", other)),
        };

        let markup: RawMarkup = serde_json::from_value(raw.clone())
            .map_err(|err| ResolveError::malformed("reply markup", err.to_string()))?;
        let rows = markup
            .rows
            .iter()
            .map(|row| row.buttons.iter().map(button).collect::<ResolveResult<Vec<_>>>())
            .collect::<ResolveResult<Vec<_>>>()?;

        Ok(Some(if inline {
            Keyboard::Inline(InlineKeyboard { rows })
        } else {
            Keyboard::Reply(ReplyKeyboard {
                rows,
                resize: markup.resize,
                single_use: markup.single_use,
                selective: markup.selective,
                placeholder: markup.placeholder,
            })
        }))
    }
}

fn button(raw: &Value) -> ResolveResult<Button> {
    let tag = constructor("button", raw)?;
    let text = str_field(raw, "text")?.unwrap_or_default();

    let kind = match tag {
        "keyboardButton" => ButtonKind::Text,
        "keyboardButtonUrl" => ButtonKind::Url {
            url: required(raw, "url")?,
        },
        "keyboardButtonCallback" => ButtonKind::Callback {
            data: bytes(raw.get("data"))?,
        },
        "keyboardButtonSwitchInline" => ButtonKind::SwitchInline {
            query: str_field(raw, "query")?.unwrap_or_default(),
            same_peer: raw.get("same_peer").and_then(Value::as_bool).unwrap_or(false),
        },
        "keyboardButtonRequestPhone" => ButtonKind::RequestPhone,
        "keyboardButtonRequestGeoLocation" => ButtonKind::RequestGeo,
        "keyboardButtonRequestPoll" => ButtonKind::RequestPoll {
            quiz: raw.get("quiz").and_then(Value::as_bool),
        },
        "keyboardButtonGame" => ButtonKind::Game,
        "keyboardButtonBuy" => ButtonKind::Buy,
        "keyboardButtonUserProfile" => ButtonKind::UserProfile {
            user_id: raw
                .get("user_id")
                .and_then(Value::as_i64)
                .ok_or_else(|| ResolveError::malformed("button", "missing `user_id`"))?,
        },
        other => ButtonKind::Other { tag: other.to_owned() },
    };
    Ok(Button::new(text, kind))
}

fn str_field(raw: &Value, key: &str) -> ResolveResult<Option<String>> {
    match raw.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ResolveError::malformed("button", format!("`{key}` is not a string"))),
    }
}

fn required(raw: &Value, key: &str) -> ResolveResult<String> {
    str_field(raw, key)?
        .ok_or_else(|| ResolveError::malformed("button", format!("missing `{key}`")))
}

fn bytes(raw: Option<&Value>) -> ResolveResult<Vec<u8>> {
    match raw {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(s.clone().into_bytes()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|err| ResolveError::malformed("button", err.to_string())),
    }
}
