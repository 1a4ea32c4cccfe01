//! Forwarding provenance.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::error::DecodeResult;
use crate::peer::PeerId;
use crate::raw;
use crate::resolver::PeerResolver;

/// Where a forwarded message originally came from.
///
/// Owned by the [`Message`](crate::Message) that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardedInfo {
    /// Original send time (unix seconds).
    pub date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<PeerId>,
    /// Display name of an origin that hides its account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_post: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_from: Option<PeerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_from_msg_id: Option<i64>,
}

impl ForwardedInfo {
    /// Best available label for the origin: the peer if known, else the name.
    pub fn origin_label(&self) -> Option<String> {
        self.from
            .map(|peer| peer.to_string())
            .or_else(|| self.from_name.clone())
    }
}

/// Builds [`ForwardedInfo`] from a raw `fwd_from` record.
///
/// `date` is required. Peer references go through `peers`; their errors are
/// propagated unchanged.
pub fn build_forwarded_info(
    raw_fwd: &Value,
    peers: &dyn PeerResolver,
) -> DecodeResult<ForwardedInfo> {
    let date = raw::req_i64(raw_fwd, "date", "fwd_from.date")?;

    let from = raw::get(raw_fwd, "from_id")
        .map(|peer| peers.resolve(peer))
        .transpose()?;
    let from_name = raw::opt_str(raw_fwd, "from_name", "fwd_from.from_name")?;
    let channel_post = raw::opt_i64(raw_fwd, "channel_post", "fwd_from.channel_post")?;
    let post_author = raw::opt_str(raw_fwd, "post_author", "fwd_from.post_author")?;
    let saved_from = raw::get(raw_fwd, "saved_from_peer")
        .map(|peer| peers.resolve(peer))
        .transpose()?;
    let saved_from_msg_id =
        raw::opt_i64(raw_fwd, "saved_from_msg_id", "fwd_from.saved_from_msg_id")?;

    trace!(date, ?from, ?saved_from, "built forwarded info");

    Ok(ForwardedInfo {
        date,
        from,
        from_name,
        channel_post,
        post_author,
        saved_from,
        saved_from_msg_id,
    })
}

/// Reads the public-service-announcement tag carried on the forward header.
pub fn psa_type(raw_fwd: &Value) -> DecodeResult<Option<String>> {
    raw::opt_str(raw_fwd, "psa_type", "fwd_from.psa_type")
}

/// Reads the import flag carried on the forward header.
pub fn imported(raw_fwd: &Value) -> DecodeResult<bool> {
    raw::flag(raw_fwd, "imported", "fwd_from.imported")
}
