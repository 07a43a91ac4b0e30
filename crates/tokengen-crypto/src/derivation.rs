//! Purpose-bound key derivation using HKDF

use std::fmt;

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::error::CryptoError;

/// Size of every derived key, and the minimum master key size (32 bytes).
///
/// Matches the XChaCha20-Poly1305 key size, the strongest backend in use.
pub const KEY_SIZE: usize = 32;

/// What a derived key is used for.
///
/// Each purpose maps to a distinct HKDF `info` label, so keys for different
/// purposes share no derivable bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPurpose {
    /// HMAC key for signing JWT tokens
    Signing,
    /// AEAD key for sealing AEAD tokens
    TokenEncryption,
    /// AEAD key for the randomized encoder
    BlobEncryption,
    /// AEAD key for the deterministic encoder
    SecretEncryption,
    /// HMAC key deriving the deterministic encoder's nonces
    SecretNonce,
    /// HMAC key for one-way hashing
    Hashing,
}

impl KeyPurpose {
    /// Every purpose, in a stable order.
    pub const ALL: [Self; 6] = [
        Self::Signing,
        Self::TokenEncryption,
        Self::BlobEncryption,
        Self::SecretEncryption,
        Self::SecretNonce,
        Self::Hashing,
    ];

    /// HKDF `info` label for this purpose.
    pub fn label(self) -> &'static [u8] {
        match self {
            Self::Signing => b"tokengen/v1/signing",
            Self::TokenEncryption => b"tokengen/v1/token-encryption",
            Self::BlobEncryption => b"tokengen/v1/blob-encryption",
            Self::SecretEncryption => b"tokengen/v1/secret-encryption",
            Self::SecretNonce => b"tokengen/v1/secret-nonce",
            Self::Hashing => b"tokengen/v1/hashing",
        }
    }
}

/// A 32-byte key bound to a single [`KeyPurpose`].
///
/// Zeroized on drop. `Debug` never prints the key bytes.
#[derive(Clone)]
pub struct DerivedKey {
    key: [u8; KEY_SIZE],
    purpose: KeyPurpose,
}

impl DerivedKey {
    /// Raw key bytes.
    pub fn bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }

    /// Purpose this key was derived for.
    pub fn purpose(&self) -> KeyPurpose {
        self.purpose
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey").field("purpose", &self.purpose).finish_non_exhaustive()
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// The master secret, from which every purpose key is derived.
///
/// # Security
///
/// - Deterministic: the same master key and purpose always yield the same
///   key, so blobs and tokens survive process restarts
/// - Purpose separation: distinct labels make the derived keys independent
/// - The master key copy is zeroized on drop
pub struct KeyMaterial {
    master: Vec<u8>,
}

impl KeyMaterial {
    /// Take ownership of a master key.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: the key is shorter than [`KEY_SIZE`]
    pub fn new(master_key: &[u8]) -> Result<Self, CryptoError> {
        if master_key.len() < KEY_SIZE {
            return Err(CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: master_key.len(),
            });
        }

        Ok(Self { master: master_key.to_vec() })
    }

    /// Derive the key for `purpose`.
    pub fn derive(&self, purpose: KeyPurpose) -> DerivedKey {
        let hkdf = Hkdf::<Sha256>::new(None, &self.master);

        let mut key = [0u8; KEY_SIZE];
        let Ok(()) = hkdf.expand(purpose.label(), &mut key) else {
            unreachable!("32 bytes is a valid HKDF-SHA256 output length");
        };

        DerivedKey { key, purpose }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial").finish_non_exhaustive()
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.master.zeroize();
    }
}
