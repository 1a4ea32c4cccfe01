//! Typed accessors over raw JSON records.
//!
//! Absent keys and explicit `null` both read as `None`. A present key of the
//! wrong type is an [`DecodeError::InvalidField`] naming `field`.

use serde_json::Value;

use crate::error::{DecodeError, DecodeResult};

/// Returns the value under `key`, treating `null` as absent.
pub(crate) fn get<'a>(raw: &'a Value, key: &str) -> Option<&'a Value> {
    raw.get(key).filter(|v| !v.is_null())
}

pub(crate) fn opt_i64(raw: &Value, key: &str, field: &'static str) -> DecodeResult<Option<i64>> {
    get(raw, key)
        .map(|v| {
            v.as_i64()
                .ok_or_else(|| DecodeError::invalid(field, format!("expected integer, got {v}")))
        })
        .transpose()
}

pub(crate) fn opt_str(
    raw: &Value,
    key: &str,
    field: &'static str,
) -> DecodeResult<Option<String>> {
    get(raw, key)
        .map(|v| {
            v.as_str()
                .map(str::to_owned)
                .ok_or_else(|| DecodeError::invalid(field, format!("expected string, got {v}")))
        })
        .transpose()
}

pub(crate) fn opt_bool(raw: &Value, key: &str, field: &'static str) -> DecodeResult<Option<bool>> {
    get(raw, key)
        .map(|v| {
            v.as_bool()
                .ok_or_else(|| DecodeError::invalid(field, format!("expected boolean, got {v}")))
        })
        .transpose()
}

pub(crate) fn flag(raw: &Value, key: &str, field: &'static str) -> DecodeResult<bool> {
    Ok(opt_bool(raw, key, field)?.unwrap_or(false))
}

pub(crate) fn req_i64(raw: &Value, key: &str, field: &'static str) -> DecodeResult<i64> {
    opt_i64(raw, key, field)?.ok_or(DecodeError::missing(field))
}

pub(crate) fn req_str(raw: &Value, key: &str, field: &'static str) -> DecodeResult<String> {
    opt_str(raw, key, field)?.ok_or(DecodeError::missing(field))
}

pub(crate) fn req_bool(raw: &Value, key: &str, field: &'static str) -> DecodeResult<bool> {
    opt_bool(raw, key, field)?.ok_or(DecodeError::missing(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_reads_as_absent() {
        let raw = json!({"a": null});
        assert_eq!(opt_i64(&raw, "a", "a").unwrap(), None);
        assert_eq!(
            req_i64(&raw, "a", "a").unwrap_err(),
            DecodeError::missing("a")
        );
    }

    #[test]
    fn test_wrong_type_is_invalid() {
        let raw = json!({"a": "x", "b": 1});
        assert!(matches!(
            opt_i64(&raw, "a", "a"),
            Err(DecodeError::InvalidField { field: "a", .. })
        ));
        assert!(matches!(
            opt_bool(&raw, "b", "b"),
            Err(DecodeError::InvalidField { field: "b", .. })
        ));
    }

    #[test]
    fn test_flag_defaults_false() {
        let raw = json!({"on": true});
        assert!(flag(&raw, "on", "on").unwrap());
        assert!(!flag(&raw, "off", "off").unwrap());
    }
}
