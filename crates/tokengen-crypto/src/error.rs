//! Error types for key derivation and encoding operations

use thiserror::Error;

/// Errors from key derivation, sealing and opening.
///
/// Verification failures deliberately carry no detail: a caller learns that
/// a blob was rejected, never which byte or check rejected it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Master key is shorter than the AEAD key size
    #[error("invalid key length: expected at least {expected}, got {actual}")]
    InvalidKeyLength {
        /// Minimum accepted length in bytes
        expected: usize,
        /// Length that was supplied
        actual: usize,
    },

    /// Blob is structurally invalid (too short, unknown version)
    #[error("malformed input: {reason}")]
    MalformedInput {
        /// What was wrong with the structure
        reason: &'static str,
    },

    /// Authentication tag or derived nonce did not verify
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The cipher refused to seal the plaintext
    #[error("seal failed")]
    SealFailed,
}

impl CryptoError {
    /// Returns true if the input should simply be rejected.
    ///
    /// Malformed and tampered blobs are indistinguishable to callers that
    /// only check this predicate.
    pub fn is_rejection(&self) -> bool {
        match self {
            Self::MalformedInput { .. } | Self::AuthenticationFailed => true,
            Self::InvalidKeyLength { .. } | Self::SealFailed => false,
        }
    }
}
