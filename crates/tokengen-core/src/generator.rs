//! Single entry point over tokens, reversible encoders and password hashing.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use tokengen_crypto::{
    DeterministicEncoder, KeyMaterial, KeyPurpose, OneWayHasher, RandomizedEncoder,
};

use crate::{
    claim::SessionClaim,
    env::{Environment, SystemEnv},
    error::GeneratorError,
    token::{Algorithm, TokenCodec},
};

/// Issues session tokens and encodes secrets, all keyed from one master key.
///
/// Every purpose key is derived once at construction and never changes.
/// No method mutates the generator, so it can be shared across threads
/// (e.g. behind an `Arc`) without locking.
///
/// # Outputs
///
/// | Method                  | Property                    | Alphabet  |
/// |-------------------------|-----------------------------|-----------|
/// | `generate_token`        | signed or encrypted, expiry | base64url |
/// | `generate_hash`         | randomized, reversible      | base64url |
/// | `generate_unique_hash`  | randomized, reversible      | base64url |
/// | `generate_secret_hash`  | deterministic, reversible   | base64url |
/// | `password_hash`         | deterministic, one-way      | hex       |
#[derive(Debug, Clone)]
pub struct TokenGenerator<E: Environment = SystemEnv> {
    env: E,
    tokens: TokenCodec,
    blobs: RandomizedEncoder,
    secrets: DeterministicEncoder,
    hasher: OneWayHasher,
}

impl TokenGenerator<SystemEnv> {
    /// Create a generator using the system clock and OS randomness.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: the master key is shorter than 32 bytes
    pub fn new(master_key: impl AsRef<[u8]>) -> Result<Self, GeneratorError> {
        Self::with_env(master_key, SystemEnv::new())
    }
}

impl<E: Environment> TokenGenerator<E> {
    /// Create a generator with a custom environment.
    pub fn with_env(master_key: impl AsRef<[u8]>, env: E) -> Result<Self, GeneratorError> {
        let material = KeyMaterial::new(master_key.as_ref())?;

        Ok(Self {
            env,
            tokens: TokenCodec::new(&material),
            blobs: RandomizedEncoder::new(material.derive(KeyPurpose::BlobEncryption)),
            secrets: DeterministicEncoder::new(
                material.derive(KeyPurpose::SecretEncryption),
                material.derive(KeyPurpose::SecretNonce),
            ),
            hasher: OneWayHasher::new(material.derive(KeyPurpose::Hashing)),
        })
    }

    /// Environment this generator reads time and randomness from.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Issue a token carrying `claim`, valid for `claim.ttl` from now.
    pub fn generate_token(
        &self,
        claim: &SessionClaim,
        algorithm: Algorithm,
    ) -> Result<String, GeneratorError> {
        self.tokens.generate(claim, algorithm, &self.env)
    }

    /// Verify a token of either backend and return its claim.
    ///
    /// # Errors
    ///
    /// - `MalformedToken`: unrecognized structure
    /// - `InvalidSignature` / `AuthenticationFailed`: tampered or wrong key
    /// - `TokenExpired`: genuine, but issued more than `ttl` ago
    pub fn parse_token(&self, token: &str) -> Result<SessionClaim, GeneratorError> {
        self.tokens.parse(token, &self.env)
    }

    /// Like [`Self::parse_token`], but only accepts `algorithm`.
    pub fn parse_token_as(
        &self,
        token: &str,
        algorithm: Algorithm,
    ) -> Result<SessionClaim, GeneratorError> {
        self.tokens.parse_as(token, algorithm, &self.env)
    }

    /// Randomized reversible encoding: a fresh blob on every call.
    pub fn generate_hash(&self, data: &str) -> Result<String, GeneratorError> {
        let blob = self.blobs.encode(data.as_bytes(), self.env.random_array())?;
        Ok(URL_SAFE_NO_PAD.encode(blob))
    }

    /// Recover the text behind a [`Self::generate_hash`] blob.
    pub fn parse_hash(&self, blob: &str) -> Result<String, GeneratorError> {
        let sealed = decode_printable(blob)?;
        into_text(self.blobs.decode(&sealed)?)
    }

    /// Same contract as [`Self::generate_hash`].
    pub fn generate_unique_hash(&self, data: &str) -> Result<String, GeneratorError> {
        self.generate_hash(data)
    }

    /// Same contract as [`Self::parse_hash`].
    pub fn parse_unique_hash(&self, blob: &str) -> Result<String, GeneratorError> {
        self.parse_hash(blob)
    }

    /// Deterministic reversible encoding: identical input always yields the
    /// identical string, across calls and restarts.
    pub fn generate_secret_hash(&self, data: &str) -> Result<String, GeneratorError> {
        let blob = self.secrets.encode(data.as_bytes())?;
        Ok(URL_SAFE_NO_PAD.encode(blob))
    }

    /// Recover the text behind a [`Self::generate_secret_hash`] blob.
    pub fn parse_secret_hash(&self, blob: &str) -> Result<String, GeneratorError> {
        let sealed = decode_printable(blob)?;
        into_text(self.secrets.decode(&sealed)?)
    }

    /// One-way keyed hash, lowercase hex.
    pub fn password_hash(&self, data: &str) -> String {
        hex::encode(self.hasher.hash(data.as_bytes()))
    }

    /// Constant-time check of `data` against a [`Self::password_hash`] digest.
    pub fn verify_password(&self, data: &str, digest: &str) -> bool {
        hex::decode(digest).is_ok_and(|digest| self.hasher.verify(data.as_bytes(), &digest))
    }
}

fn decode_printable(blob: &str) -> Result<Vec<u8>, GeneratorError> {
    URL_SAFE_NO_PAD.decode(blob).map_err(|_| GeneratorError::MalformedInput)
}

fn into_text(bytes: Vec<u8>) -> Result<String, GeneratorError> {
    String::from_utf8(bytes).map_err(|_| GeneratorError::InvalidUtf8)
}
