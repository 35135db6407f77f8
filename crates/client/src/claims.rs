//! Unverified decode of the access credential's identity claims.
//!
//! The API is the authority on authorization; the client only reads the
//! claims to decide which views to offer (role gating, greeting by name).
//! Decoding therefore skips signature verification entirely, and any
//! malformed input yields "no identity" instead of an error.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::api::models::Rol;

/// Identity claims embedded in the access credential.
///
/// The issuer adds `username`, `first_name` and `role` on top of the
/// standard claim set; older tokens may miss any of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub user_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub role: Option<Rol>,
    /// Expiration timestamp (Unix)
    pub exp: u64,
    /// Issued at timestamp (Unix)
    #[serde(default)]
    pub iat: Option<u64>,
}

impl IdentityClaims {
    /// Whether the access credential's own expiry has passed.
    pub fn is_expired(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.exp <= now
    }

    /// Name to greet the user with: first name, falling back to username.
    pub fn display_name(&self) -> Option<&str> {
        self.first_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or(self.username.as_deref())
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Some(Rol::Admin)
    }
}

/// Decode the payload segment of a bearer token into identity claims.
///
/// Returns `None` for anything that is not a well-formed token carrying the
/// expected claims; never fails.
pub fn decode_identity(token: &str) -> Option<IdentityClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}
