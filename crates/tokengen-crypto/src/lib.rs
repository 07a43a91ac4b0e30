//! Tokengen Cryptographic Primitives
//!
//! Building blocks for session tokens and secret encoding. Pure functions
//! with deterministic outputs. Callers provide random bytes for deterministic
//! testing.
//!
//! # Key Hierarchy
//!
//! A single master secret is expanded into independent purpose-bound keys.
//! Every consumer holds only the key for its own purpose.
//!
//! ```text
//! Master Key (>= 32 bytes)
//!        │
//!        ▼ HKDF-SHA256, info = purpose label
//! ┌──────────┬──────────────────┬─────────────────┬───────────────────┬──────────────┬─────────┐
//! Signing    TokenEncryption    BlobEncryption    SecretEncryption    SecretNonce    Hashing
//! (JWT)      (AEAD tokens)      (randomized)      (deterministic) ◄── (nonce HMAC)   (HMAC)
//! ```
//!
//! # Security
//!
//! Key Separation:
//! - Each purpose has its own HKDF label, so breaking one key reveals nothing
//!   about the others
//! - The randomized and deterministic encoders never share an encryption key
//!
//! Authenticity:
//! - XChaCha20-Poly1305 AEAD provides tamper-proof encryption
//! - Associated data binds every blob to its encoder and layout version
//! - Failed authentication tag -> reject blob
//!
//! Determinism:
//! - Same master key -> same derived keys across restarts
//! - Deterministic encoder: same plaintext -> byte-identical blob

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod derivation;
pub mod encoder;
pub mod encryption;
pub mod error;
pub mod hash;

pub use derivation::{DerivedKey, KEY_SIZE, KeyMaterial, KeyPurpose};
pub use encoder::{DeterministicEncoder, RandomizedEncoder};
pub use encryption::{MIN_SEALED_LEN, NONCE_SIZE, TAG_SIZE, open, seal};
pub use error::CryptoError;
pub use hash::{DIGEST_SIZE, OneWayHasher};
