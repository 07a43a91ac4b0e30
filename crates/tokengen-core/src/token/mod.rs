//! Session tokens over two backends
//!
//! ```text
//! SessionClaim + issued_at
//!        │
//!        ├── Jwt  ─► header.payload.signature   (HS256, signing key)
//!        │
//!        └── Aead ─► base64url(version || nonce || ciphertext || tag)
//!                                               (XChaCha20-Poly1305, token key)
//! ```
//!
//! The wire format is self-describing: a JWT always has three dot-separated
//! segments, an AEAD token never contains a dot. Parsing detects the backend
//! and dispatches. Each backend rejects the other's format as
//! [`GeneratorError::MalformedToken`].
//!
//! Expiry is checked only after authentication succeeds, so an expired
//! token is always a genuine one.

mod aead;
mod jwt;

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use tokengen_crypto::{KeyMaterial, KeyPurpose};
use uuid::Uuid;

pub use self::{
    aead::{AeadCodec, CLAIM_SCHEMA_VERSION},
    jwt::JwtCodec,
};
use crate::{claim::SessionClaim, env::Environment, error::GeneratorError};

/// Token backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// HMAC-signed JSON Web Token. Integrity only, the claim is readable.
    Jwt,
    /// Encrypted token. Integrity and confidentiality.
    Aead,
}

impl Algorithm {
    /// Backend implied by the token's structure, if any.
    pub fn detect(token: &str) -> Option<Self> {
        match token.bytes().filter(|&b| b == b'.').count() {
            0 if !token.is_empty() => Some(Self::Aead),
            2 => Some(Self::Jwt),
            _ => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt => f.write_str("jwt"),
            Self::Aead => f.write_str("aead"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jwt" => Ok(Self::Jwt),
            "aead" | "aesgcm" => Ok(Self::Aead),
            other => Err(format!("unknown token algorithm: {other}")),
        }
    }
}

/// Wire payload shared by both backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TokenPayload {
    gid: Uuid,
    rid: Uuid,
    uid: Uuid,
    ttl: Duration,
    iat: Duration,
}

impl TokenPayload {
    fn issue(claim: &SessionClaim, issued_at: Duration) -> Self {
        Self {
            gid: claim.game_id,
            rid: claim.room_id,
            uid: claim.user_id,
            ttl: claim.ttl,
            iat: issued_at,
        }
    }

    /// Recover the claim, failing if the TTL has elapsed at `now`.
    ///
    /// A token issued in the future (clock skew) counts as just issued. A
    /// token is still valid when exactly `ttl` has elapsed.
    fn into_claim(self, now: Duration) -> Result<SessionClaim, GeneratorError> {
        let elapsed = now.saturating_sub(self.iat);

        if elapsed > self.ttl {
            return Err(GeneratorError::TokenExpired { ttl: self.ttl, elapsed });
        }

        Ok(SessionClaim::new(self.gid, self.rid, self.uid, self.ttl))
    }
}

/// Generates and parses tokens for both backends.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    jwt: JwtCodec,
    aead: AeadCodec,
}

impl TokenCodec {
    /// Build both backends from the signing and token encryption keys.
    pub fn new(material: &KeyMaterial) -> Self {
        Self {
            jwt: JwtCodec::new(&material.derive(KeyPurpose::Signing)),
            aead: AeadCodec::new(material.derive(KeyPurpose::TokenEncryption)),
        }
    }

    /// Issue a token for `claim` at the environment's current time.
    pub fn generate<E: Environment>(
        &self,
        claim: &SessionClaim,
        algorithm: Algorithm,
        env: &E,
    ) -> Result<String, GeneratorError> {
        let payload = TokenPayload::issue(claim, env.unix_time());

        let token = match algorithm {
            Algorithm::Jwt => self.jwt.encode(&payload)?,
            Algorithm::Aead => self.aead.encode(&payload, env.random_array())?,
        };

        tracing::debug!(%algorithm, ttl = ?claim.ttl, "issued session token");
        Ok(token)
    }

    /// Parse a token of either backend, detected from its structure.
    pub fn parse<E: Environment>(
        &self,
        token: &str,
        env: &E,
    ) -> Result<SessionClaim, GeneratorError> {
        let Some(algorithm) = Algorithm::detect(token) else {
            tracing::debug!("token rejected: unrecognized format");
            return Err(GeneratorError::MalformedToken);
        };

        self.parse_as(token, algorithm, env)
    }

    /// Parse a token that must belong to `algorithm`.
    pub fn parse_as<E: Environment>(
        &self,
        token: &str,
        algorithm: Algorithm,
        env: &E,
    ) -> Result<SessionClaim, GeneratorError> {
        let payload = match algorithm {
            Algorithm::Jwt => self.jwt.decode(token),
            Algorithm::Aead => self.aead.decode(token),
        };

        let result = payload.and_then(|payload| payload.into_claim(env.unix_time()));

        match &result {
            Ok(_) => tracing::trace!(%algorithm, "session token accepted"),
            Err(GeneratorError::TokenExpired { ttl, elapsed }) => {
                tracing::debug!(%algorithm, ?ttl, ?elapsed, "session token expired");
            },
            Err(err) => tracing::debug!(%algorithm, error = %err, "session token rejected"),
        }

        result
    }
}
