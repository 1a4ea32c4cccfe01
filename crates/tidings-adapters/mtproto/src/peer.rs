//! Peer references.
//!
//! Accepts `peerUser` / `peerChat` / `peerChannel` records as well as bare
//! bot-API marked integers.

use serde::Deserialize;
use serde_json::Value;
use tidings_core::{PeerId, PeerResolver, ResolveError, ResolveResult};

use crate::constructor;

#[derive(Debug, Deserialize)]
#[serde(tag = "_")]
enum RawPeer {
    #[serde(rename = "peerUser")]
    User { user_id: i64 },
    #[serde(rename = "peerChat")]
    Chat { chat_id: i64 },
    #[serde(rename = "peerChannel")]
    Channel { channel_id: i64 },
}

const KNOWN: [&str; 3] = ["peerUser", "peerChat", "peerChannel"];

/// Resolves MTProto peer records without any lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct MtprotoPeerResolver;

impl PeerResolver for MtprotoPeerResolver {
    fn resolve(&self, raw: &Value) -> ResolveResult<PeerId> {
        if let Some(id) = raw.as_i64() {
            return PeerId::from_bot_api_id(id)
                .ok_or_else(|| ResolveError::malformed("peer", "id 0 is not a peer"));
        }

        let tag = constructor("peer", raw)?;
        if !KNOWN.contains(&tag) {
            return Err(ResolveError::unknown_constructor("peer", tag));
        }
        let peer: RawPeer = serde_json::from_value(raw.clone())
            .map_err(|err| ResolveError::malformed("peer", err.to_string()))?;

        Ok(match peer {
            RawPeer::User { user_id } => PeerId::User(user_id),
            RawPeer::Chat { chat_id } => PeerId::Chat(chat_id),
            RawPeer::Channel { channel_id } => PeerId::Channel(channel_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_peer_records() {
        let r = MtprotoPeerResolver;
        assert_eq!(
            r.resolve(&json!({"_": "peerUser", "user_id": 1})).unwrap(),
            PeerId::User(1)
        );
        assert_eq!(
            r.resolve(&json!({"_": "peerChat", "chat_id": 2})).unwrap(),
            PeerId::Chat(2)
        );
        assert_eq!(
            r.resolve(&json!({"_": "peerChannel", "channel_id": 3})).unwrap(),
            PeerId::Channel(3)
        );
    }

    #[test]
    fn test_bot_api_ids() {
        let r = MtprotoPeerResolver;
        assert_eq!(r.resolve(&json!(-1_000_000_000_005_i64)).unwrap(), PeerId::Channel(5));
        assert_eq!(r.resolve(&json!(-9)).unwrap(), PeerId::Chat(9));
        assert!(r.resolve(&json!(0)).is_err());
    }

    #[test]
    fn test_errors() {
        let r = MtprotoPeerResolver;
        assert_eq!(
            r.resolve(&json!({"_": "inputPeerSelf"})).unwrap_err(),
            ResolveError::unknown_constructor("peer", "inputPeerSelf")
        );
        assert!(matches!(
            r.resolve(&json!({"_": "peerUser"})),
            Err(ResolveError::Malformed { .. })
        ));
        assert!(matches!(
            r.resolve(&json!("user")),
            Err(ResolveError::Malformed { .. })
        ));
    }
}
