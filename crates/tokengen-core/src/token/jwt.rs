//! HS256 JSON Web Token backend

use std::fmt;

use jsonwebtoken::{
    Algorithm as JwtAlgorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind,
};
use tokengen_crypto::DerivedKey;

use super::{Algorithm, TokenPayload};
use crate::error::GeneratorError;

/// Signs and verifies JWT tokens with the signing key.
///
/// Library-side `exp` handling is disabled: the payload carries the literal
/// TTL and issuance time, and expiry is checked by the caller after the
/// signature verifies.
#[derive(Clone)]
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtCodec {
    /// Create a codec from the signing key.
    pub fn new(signing_key: &DerivedKey) -> Self {
        let mut validation = Validation::new(JwtAlgorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims::<&str>(&[]);

        Self {
            encoding_key: EncodingKey::from_secret(signing_key.bytes()),
            decoding_key: DecodingKey::from_secret(signing_key.bytes()),
            validation,
        }
    }

    pub(crate) fn encode(&self, payload: &TokenPayload) -> Result<String, GeneratorError> {
        jsonwebtoken::encode(&Header::new(JwtAlgorithm::HS256), payload, &self.encoding_key)
            .map_err(|err| match err.kind() {
                ErrorKind::Json(_) => GeneratorError::Serialization(err.to_string()),
                _ => GeneratorError::Signing(err.to_string()),
            })
    }

    /// Verify the signature, then decode the payload.
    ///
    /// # Errors
    ///
    /// - `MalformedToken`: not a JWT, bad header, wrong algorithm or payload
    /// - `InvalidSignature`: signature mismatch (constant-time compare)
    pub(crate) fn decode(&self, token: &str) -> Result<TokenPayload, GeneratorError> {
        if Algorithm::detect(token) != Some(Algorithm::Jwt) {
            return Err(GeneratorError::MalformedToken);
        }

        jsonwebtoken::decode::<TokenPayload>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidSignature => GeneratorError::InvalidSignature,
                _ => GeneratorError::MalformedToken,
            })
    }
}

impl fmt::Debug for JwtCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtCodec").field("algorithm", &JwtAlgorithm::HS256).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
    use tokengen_crypto::{KeyMaterial, KeyPurpose};
    use uuid::Uuid;

    use super::*;
    use crate::claim::SessionClaim;

    fn codec(master: &[u8]) -> JwtCodec {
        JwtCodec::new(&KeyMaterial::new(master).unwrap().derive(KeyPurpose::Signing))
    }

    fn payload() -> TokenPayload {
        let claim = SessionClaim::new(
            Uuid::from_u128(1),
            Uuid::from_u128(2),
            Uuid::from_u128(3),
            Duration::from_secs(5),
        );
        TokenPayload::issue(&claim, Duration::from_secs(1_700_000_000))
    }

    const MASTER: &[u8] = b"1234-1234-1234-1234-1234-1234-12";

    #[test]
    fn encode_decode_roundtrip() {
        let codec = codec(MASTER);
        let token = codec.encode(&payload()).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(codec.decode(&token).unwrap(), payload());
    }

    #[test]
    fn header_declares_hs256() {
        let token = codec(MASTER).encode(&payload()).unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();

        assert_eq!(header.alg, JwtAlgorithm::HS256);
    }

    #[test]
    fn wrong_key_is_invalid_signature() {
        let token = codec(MASTER).encode(&payload()).unwrap();
        let other = codec(b"another-master-key-of-32-bytes!!");

        assert_eq!(other.decode(&token), Err(GeneratorError::InvalidSignature));
    }

    #[test]
    fn swapped_payload_is_invalid_signature() {
        let codec = codec(MASTER);
        let token = codec.encode(&payload()).unwrap();
        let segments: Vec<&str> = token.split('.').collect();

        let forged_body = URL_SAFE_NO_PAD.encode(
            br#"{"gid":"00000000-0000-0000-0000-000000000001","rid":"00000000-0000-0000-0000-000000000002","uid":"00000000-0000-0000-0000-000000000003","ttl":{"secs":999999,"nanos":0},"iat":{"secs":1700000000,"nanos":0}}"#,
        );
        let forged = format!("{}.{}.{}", segments[0], forged_body, segments[2]);

        assert_eq!(codec.decode(&forged), Err(GeneratorError::InvalidSignature));
    }

    #[test]
    fn aead_shaped_input_is_malformed() {
        assert_eq!(codec(MASTER).decode("AQIDBAUGBwgJCgsM"), Err(GeneratorError::MalformedToken));
    }

    #[test]
    fn garbage_segments_are_malformed() {
        assert_eq!(codec(MASTER).decode("not.a.jwt"), Err(GeneratorError::MalformedToken));
    }

    #[test]
    fn debug_hides_keys() {
        let rendered = format!("{:?}", codec(MASTER));
        assert!(rendered.starts_with("JwtCodec"));
        assert!(!rendered.contains("1234"));
    }
}
