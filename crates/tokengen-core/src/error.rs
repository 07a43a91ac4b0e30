//! Error types for token and encoding operations.
//!
//! Three categories, handled differently by callers:
//!
//! - Construction (`InvalidKeyLength`): fatal, the generator cannot exist
//! - Rejection (malformed, tampered, wrong key): reject the input. Callers
//!   should check [`GeneratorError::is_rejection`] rather than match on
//!   individual variants, so tamper and bad format are handled identically
//! - Expiry (`TokenExpired`): the token was genuine but too old, prompt the
//!   user to re-authenticate

use std::time::Duration;

use thiserror::Error;
use tokengen_crypto::CryptoError;

/// Errors from [`crate::TokenGenerator`] and the token codecs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// Master key is too short for the AEAD cipher
    #[error("invalid key length: expected at least {expected}, got {actual}")]
    InvalidKeyLength {
        /// Minimum accepted length in bytes
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// Claim could not be encoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// JWT signing failed
    #[error("signing error: {0}")]
    Signing(String),

    /// AEAD sealing failed
    #[error("seal error")]
    Seal,

    /// Encoded blob is structurally invalid
    #[error("malformed input")]
    MalformedInput,

    /// Decoded blob is not valid UTF-8 text
    #[error("malformed input: not valid UTF-8")]
    InvalidUtf8,

    /// Token does not match the format of any backend
    #[error("malformed token")]
    MalformedToken,

    /// JWT signature did not verify
    #[error("invalid signature")]
    InvalidSignature,

    /// AEAD tag did not verify
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Token authenticated but its TTL has elapsed
    #[error("token expired: issued {elapsed:?} ago with ttl {ttl:?}")]
    TokenExpired {
        /// TTL embedded in the token
        ttl: Duration,
        /// Time since issuance
        elapsed: Duration,
    },
}

impl GeneratorError {
    /// Returns true if the input should be rejected as invalid.
    ///
    /// Covers malformed structure and failed verification alike. Expiry is
    /// excluded: an expired token was genuine.
    pub fn is_rejection(&self) -> bool {
        match self {
            Self::MalformedInput
            | Self::InvalidUtf8
            | Self::MalformedToken
            | Self::InvalidSignature
            | Self::AuthenticationFailed => true,

            Self::InvalidKeyLength { .. }
            | Self::Serialization(_)
            | Self::Signing(_)
            | Self::Seal
            | Self::TokenExpired { .. } => false,
        }
    }

    /// Returns true if this is a genuine token past its TTL.
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::TokenExpired { .. })
    }
}

impl From<CryptoError> for GeneratorError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidKeyLength { expected, actual } => {
                Self::InvalidKeyLength { expected, actual }
            },
            CryptoError::MalformedInput { .. } => Self::MalformedInput,
            CryptoError::AuthenticationFailed => Self::AuthenticationFailed,
            CryptoError::SealFailed => Self::Seal,
        }
    }
}
