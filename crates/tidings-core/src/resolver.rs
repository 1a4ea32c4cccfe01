//! Collaborator traits.
//!
//! The decoder never interprets peer ids, media or keyboard markup itself.
//! It hands the raw sub-record to one of these resolvers and propagates
//! whatever error the resolver reports.

use std::sync::Arc;

use serde_json::Value;

use crate::error::ResolveResult;
use crate::keyboard::Keyboard;
use crate::media::Media;
use crate::peer::PeerId;

/// Resolves a raw peer reference (`from_id`, `saved_from_peer`, ...).
pub trait PeerResolver: Send + Sync {
    fn resolve(&self, raw: &Value) -> ResolveResult<PeerId>;
}

/// Resolves a raw `media` record.
///
/// `Ok(None)` means the record describes nothing this crate models (an empty
/// or unsupported attachment).
pub trait MediaResolver: Send + Sync {
    fn resolve(&self, raw: &Value) -> ResolveResult<Option<Media>>;
}

/// Resolves a raw `reply_markup` record.
///
/// `Ok(None)` means the markup is not a keyboard (hide or force-reply).
pub trait KeyboardResolver: Send + Sync {
    fn resolve(&self, raw: &Value) -> ResolveResult<Option<Keyboard>>;
}

// =============================================================================
// Blanket implementations
// =============================================================================

impl<T: PeerResolver + ?Sized> PeerResolver for Arc<T> {
    fn resolve(&self, raw: &Value) -> ResolveResult<PeerId> {
        (**self).resolve(raw)
    }
}

impl<T: MediaResolver + ?Sized> MediaResolver for Arc<T> {
    fn resolve(&self, raw: &Value) -> ResolveResult<Option<Media>> {
        (**self).resolve(raw)
    }
}

impl<T: KeyboardResolver + ?Sized> KeyboardResolver for Arc<T> {
    fn resolve(&self, raw: &Value) -> ResolveResult<Option<Keyboard>> {
        (**self).resolve(raw)
    }
}

// =============================================================================
// Null resolvers
// =============================================================================

/// Ignores every attachment and keyboard.
///
/// Useful when only text, commands and forwarding data matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl MediaResolver for NullResolver {
    fn resolve(&self, _raw: &Value) -> ResolveResult<Option<Media>> {
        Ok(None)
    }
}

impl KeyboardResolver for NullResolver {
    fn resolve(&self, _raw: &Value) -> ResolveResult<Option<Keyboard>> {
        Ok(None)
    }
}
