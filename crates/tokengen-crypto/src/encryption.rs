//! Authenticated sealing using `XChaCha20-Poly1305`
//!
//! All functions are pure - nonces must be provided by the caller.
//!
//! Sealed layout:
//!
//! ```text
//! version (1) || nonce (24) || ciphertext || Poly1305 tag (16)
//! ```
//!
//! The associated data is `domain || version`. Encoders seal under their own
//! domain, so a blob produced by one encoder never opens under another.

use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit, Payload},
};

use crate::{derivation::DerivedKey, error::CryptoError};

/// `XChaCha20` nonce size (24 bytes)
pub const NONCE_SIZE: usize = 24;

/// Poly1305 tag size (16 bytes)
pub const TAG_SIZE: usize = 16;

/// Current sealed layout version
pub const SCHEME_VERSION: u8 = 1;

/// Smallest well-formed sealed blob: version, nonce and tag around an empty
/// plaintext.
pub const MIN_SEALED_LEN: usize = 1 + NONCE_SIZE + TAG_SIZE;

/// Seal `plaintext` under `key` with the given nonce.
///
/// # Security
///
/// - The caller MUST never reuse a nonce with the same key for different
///   plaintexts
/// - The domain label binds the blob to one encoder
pub fn seal(
    key: &DerivedKey,
    nonce: &[u8; NONCE_SIZE],
    plaintext: &[u8],
    domain: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = XChaCha20Poly1305::new(key.bytes().into());
    let aad = associated_data(domain);

    let ciphertext = cipher
        .encrypt(XNonce::from_slice(nonce), Payload { msg: plaintext, aad: &aad })
        .map_err(|_| CryptoError::SealFailed)?;

    let mut sealed = Vec::with_capacity(1 + NONCE_SIZE + ciphertext.len());
    sealed.push(SCHEME_VERSION);
    sealed.extend_from_slice(nonce);
    sealed.extend_from_slice(&ciphertext);

    Ok(sealed)
}

/// Open a blob produced by [`seal`].
///
/// # Errors
///
/// - `MalformedInput`: too short or unknown version
/// - `AuthenticationFailed`: wrong key, wrong domain or any tampering
pub fn open(key: &DerivedKey, sealed: &[u8], domain: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let (nonce, ciphertext) = split(sealed)?;

    let cipher = XChaCha20Poly1305::new(key.bytes().into());
    let aad = associated_data(domain);

    cipher
        .decrypt(XNonce::from_slice(nonce), Payload { msg: ciphertext, aad: &aad })
        .map_err(|_| CryptoError::AuthenticationFailed)
}

/// Nonce carried by a sealed blob.
pub fn sealed_nonce(sealed: &[u8]) -> Result<&[u8], CryptoError> {
    split(sealed).map(|(nonce, _)| nonce)
}

/// Split into (nonce, ciphertext || tag) after structural checks.
fn split(sealed: &[u8]) -> Result<(&[u8], &[u8]), CryptoError> {
    if sealed.len() < MIN_SEALED_LEN {
        return Err(CryptoError::MalformedInput { reason: "sealed blob too short" });
    }

    if sealed[0] != SCHEME_VERSION {
        return Err(CryptoError::MalformedInput { reason: "unknown sealed blob version" });
    }

    Ok(sealed[1..].split_at(NONCE_SIZE))
}

fn associated_data(domain: &[u8]) -> Vec<u8> {
    let mut aad = Vec::with_capacity(domain.len() + 1);
    aad.extend_from_slice(domain);
    aad.push(SCHEME_VERSION);
    aad
}
