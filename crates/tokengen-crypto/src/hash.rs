//! One-way keyed hashing for verifier-style comparisons

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::derivation::DerivedKey;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 digest size (32 bytes)
pub const DIGEST_SIZE: usize = 32;

/// Deterministic, non-reversible keyed hash.
///
/// There is no inverse: the digest can only be recomputed from the secret
/// and compared.
#[derive(Debug, Clone)]
pub struct OneWayHasher {
    key: DerivedKey,
}

impl OneWayHasher {
    /// Create a hasher from the hashing key.
    pub fn new(key: DerivedKey) -> Self {
        Self { key }
    }

    /// Keyed digest of `secret`.
    pub fn hash(&self, secret: &[u8]) -> [u8; DIGEST_SIZE] {
        let result = self.mac(secret).finalize().into_bytes();

        let mut digest = [0u8; DIGEST_SIZE];
        digest.copy_from_slice(&result);
        digest
    }

    /// Constant-time check that `digest` is the digest of `secret`.
    pub fn verify(&self, secret: &[u8], digest: &[u8]) -> bool {
        self.mac(secret).verify_slice(digest).is_ok()
    }

    fn mac(&self, secret: &[u8]) -> HmacSha256 {
        let Ok(mut mac) = HmacSha256::new_from_slice(self.key.bytes()) else {
            unreachable!("HMAC-SHA256 accepts any key size");
        };
        mac.update(secret);
        mac
    }
}
