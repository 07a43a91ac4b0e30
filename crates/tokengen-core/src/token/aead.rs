//! Encrypted token backend
//!
//! ```text
//! plaintext = schema version (1) || CBOR(payload)
//! token     = base64url(seal(token key, nonce, plaintext, "tokengen.token"))
//! ```

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use tokengen_crypto::{CryptoError, DerivedKey, NONCE_SIZE};

use super::TokenPayload;
use crate::error::GeneratorError;

/// Claim schema understood by this build. Other versions are malformed.
pub const CLAIM_SCHEMA_VERSION: u8 = 1;

/// Associated-data domain for AEAD tokens
const TOKEN_DOMAIN: &[u8] = b"tokengen.token";

/// Seals and opens AEAD tokens with the token encryption key.
#[derive(Debug, Clone)]
pub struct AeadCodec {
    key: DerivedKey,
}

impl AeadCodec {
    /// Create a codec from the token encryption key.
    pub fn new(key: DerivedKey) -> Self {
        Self { key }
    }

    pub(crate) fn encode(
        &self,
        payload: &TokenPayload,
        nonce: [u8; NONCE_SIZE],
    ) -> Result<String, GeneratorError> {
        let mut plaintext = vec![CLAIM_SCHEMA_VERSION];
        ciborium::into_writer(payload, &mut plaintext)
            .map_err(|err| GeneratorError::Serialization(err.to_string()))?;

        let sealed = tokengen_crypto::seal(&self.key, &nonce, &plaintext, TOKEN_DOMAIN)?;
        Ok(URL_SAFE_NO_PAD.encode(sealed))
    }

    /// Authenticate and decrypt, then decode the payload.
    ///
    /// # Errors
    ///
    /// - `MalformedToken`: not base64url, too short, unknown version or
    ///   schema, or an undecodable payload
    /// - `AuthenticationFailed`: tampered or sealed under another key
    pub(crate) fn decode(&self, token: &str) -> Result<TokenPayload, GeneratorError> {
        let sealed = URL_SAFE_NO_PAD.decode(token).map_err(|_| GeneratorError::MalformedToken)?;

        let plaintext =
            tokengen_crypto::open(&self.key, &sealed, TOKEN_DOMAIN).map_err(|err| match err {
                CryptoError::AuthenticationFailed => GeneratorError::AuthenticationFailed,
                _ => GeneratorError::MalformedToken,
            })?;

        let Some((&version, body)) = plaintext.split_first() else {
            return Err(GeneratorError::MalformedToken);
        };
        if version != CLAIM_SCHEMA_VERSION {
            return Err(GeneratorError::MalformedToken);
        }

        ciborium::from_reader(body).map_err(|_| GeneratorError::MalformedToken)
    }
}
