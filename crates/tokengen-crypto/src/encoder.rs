//! Reversible encoders over opaque byte strings
//!
//! Both encoders share the [`crate::encryption`] primitive and differ only in
//! where the nonce comes from:
//!
//! - [`RandomizedEncoder`]: caller-supplied random nonce, so identical input
//!   yields a different blob on every call
//! - [`DeterministicEncoder`]: nonce derived from a keyed hash of the
//!   plaintext, so identical input always yields the same blob
//!
//! The two encoders MUST be built from different encryption keys. A derived
//! nonce repeats for repeated plaintexts, which is only safe because no
//! randomized blob is ever sealed under the same key.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{
    derivation::DerivedKey,
    encryption::{self, NONCE_SIZE},
    error::CryptoError,
};

type HmacSha256 = Hmac<Sha256>;

/// Associated-data domain for randomized blobs
const BLOB_DOMAIN: &[u8] = b"tokengen.blob";

/// Associated-data domain for deterministic blobs
const SECRET_DOMAIN: &[u8] = b"tokengen.secret";

/// Randomized-reversible encoder.
#[derive(Debug, Clone)]
pub struct RandomizedEncoder {
    key: DerivedKey,
}

impl RandomizedEncoder {
    /// Create an encoder from the blob encryption key.
    pub fn new(key: DerivedKey) -> Self {
        Self { key }
    }

    /// Seal `plaintext` under a fresh nonce.
    ///
    /// Caller MUST provide cryptographically secure random bytes in
    /// production. Reusing a nonce breaks confidentiality.
    pub fn encode(
        &self,
        plaintext: &[u8],
        nonce: [u8; NONCE_SIZE],
    ) -> Result<Vec<u8>, CryptoError> {
        encryption::seal(&self.key, &nonce, plaintext, BLOB_DOMAIN)
    }

    /// Recover the plaintext of a blob produced by [`Self::encode`].
    pub fn decode(&self, blob: &[u8]) -> Result<Vec<u8>, CryptoError> {
        encryption::open(&self.key, blob, BLOB_DOMAIN)
    }
}

/// Deterministic-reversible encoder.
///
/// # Security
///
/// - Nonce = first 24 bytes of HMAC-SHA256(nonce key, plaintext)
/// - Leaks only equality: two blobs are equal iff their plaintexts are
/// - Decode re-derives the nonce and rejects non-canonical blobs
#[derive(Debug, Clone)]
pub struct DeterministicEncoder {
    key: DerivedKey,
    nonce_key: DerivedKey,
}

impl DeterministicEncoder {
    /// Create an encoder from the secret encryption and secret nonce keys.
    pub fn new(key: DerivedKey, nonce_key: DerivedKey) -> Self {
        Self { key, nonce_key }
    }

    /// Seal `plaintext` under its derived nonce.
    pub fn encode(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let nonce = self.derive_nonce(plaintext);
        encryption::seal(&self.key, &nonce, plaintext, SECRET_DOMAIN)
    }

    /// Recover the plaintext of a blob produced by [`Self::encode`].
    ///
    /// # Errors
    ///
    /// - `MalformedInput`: structurally invalid blob
    /// - `AuthenticationFailed`: tampered, wrong key, or a nonce that was
    ///   not derived from the plaintext
    pub fn decode(&self, blob: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let plaintext = encryption::open(&self.key, blob, SECRET_DOMAIN)?;
        let nonce = encryption::sealed_nonce(blob)?;

        if self.nonce_mac(&plaintext).verify_truncated_left(nonce).is_err() {
            return Err(CryptoError::AuthenticationFailed);
        }

        Ok(plaintext)
    }

    fn derive_nonce(&self, plaintext: &[u8]) -> [u8; NONCE_SIZE] {
        let result = self.nonce_mac(plaintext).finalize().into_bytes();

        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&result[..NONCE_SIZE]);
        nonce
    }

    fn nonce_mac(&self, plaintext: &[u8]) -> HmacSha256 {
        let Ok(mut mac) = HmacSha256::new_from_slice(self.nonce_key.bytes()) else {
            unreachable!("HMAC-SHA256 accepts any key size");
        };
        mac.update(plaintext);
        mac
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::{KeyMaterial, KeyPurpose};

    fn material() -> KeyMaterial {
        KeyMaterial::new(b"test_master_key_material_here!!!").unwrap()
    }

    fn randomized() -> RandomizedEncoder {
        RandomizedEncoder::new(material().derive(KeyPurpose::BlobEncryption))
    }

    fn deterministic() -> DeterministicEncoder {
        let material = material();
        DeterministicEncoder::new(
            material.derive(KeyPurpose::SecretEncryption),
            material.derive(KeyPurpose::SecretNonce),
        )
    }

    #[test]
    fn randomized_roundtrip() {
        let encoder = randomized();
        let blob = encoder.encode(b"reset-payload", [7; NONCE_SIZE]).unwrap();

        assert_eq!(encoder.decode(&blob).unwrap(), b"reset-payload");
    }

    #[test]
    fn randomized_differs_per_nonce() {
        let encoder = randomized();

        let first = encoder.encode(b"same input", [0x00; NONCE_SIZE]).unwrap();
        let second = encoder.encode(b"same input", [0xFF; NONCE_SIZE]).unwrap();

        assert_ne!(first, second);
        assert_eq!(encoder.decode(&first).unwrap(), encoder.decode(&second).unwrap());
    }

    #[test]
    fn deterministic_is_stable() {
        let encoder = deterministic();

        let first = encoder.encode(b"same input").unwrap();
        let second = encoder.encode(b"same input").unwrap();

        assert_eq!(first, second);
        assert_eq!(encoder.decode(&first).unwrap(), b"same input");
    }

    #[test]
    fn deterministic_distinguishes_inputs() {
        let encoder = deterministic();
        assert_ne!(encoder.encode(b"input-a").unwrap(), encoder.encode(b"input-b").unwrap());
    }

    #[test]
    fn deterministic_nonce_is_keyed_hash_prefix() {
        let encoder = deterministic();
        let blob = encoder.encode(b"payload").unwrap();

        assert_eq!(encryption::sealed_nonce(&blob).unwrap(), &encoder.derive_nonce(b"payload"));
    }

    #[test]
    fn deterministic_rejects_non_canonical_nonce() {
        let encoder = deterministic();

        // Valid seal under the right key, but with a nonce not derived from the plaintext
        let forged =
            encryption::seal(&encoder.key, &[0x11; NONCE_SIZE], b"payload", SECRET_DOMAIN)
                .unwrap();

        assert_eq!(encoder.decode(&forged), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn encoders_do_not_open_each_other() {
        let randomized = randomized();
        let deterministic = deterministic();

        let blob = randomized.encode(b"cross", [3; NONCE_SIZE]).unwrap();
        let secret = deterministic.encode(b"cross").unwrap();

        assert_eq!(deterministic.decode(&blob), Err(CryptoError::AuthenticationFailed));
        assert_eq!(randomized.decode(&secret), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn tampered_blobs_fail() {
        let randomized = randomized();
        let deterministic = deterministic();

        let mut blob = randomized.encode(b"tamper me", [9; NONCE_SIZE]).unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        assert_eq!(randomized.decode(&blob), Err(CryptoError::AuthenticationFailed));

        let mut secret = deterministic.encode(b"tamper me").unwrap();
        secret[1 + NONCE_SIZE] ^= 0x01;
        assert_eq!(deterministic.decode(&secret), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(randomized().decode(b"nope"), Err(CryptoError::MalformedInput { .. })));
        assert!(matches!(deterministic().decode(&[]), Err(CryptoError::MalformedInput { .. })));
    }
}
