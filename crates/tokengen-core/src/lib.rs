//! Session tokens and secret encoding for multiplayer sessions.
//!
//! [`TokenGenerator`] is the entry point. It is constructed once from a
//! master key and offers:
//!
//! - Session tokens ([`SessionClaim`] in, printable token out) over two
//!   backends, [`Algorithm::Jwt`] and [`Algorithm::Aead`], with expiry
//!   enforced on parse
//! - Randomized reversible encoding (`generate_hash` / `parse_hash`)
//! - Deterministic reversible encoding (`generate_secret_hash` /
//!   `parse_secret_hash`), usable as a stable lookup key
//! - One-way password hashing (`password_hash`)
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use tokengen_core::{Algorithm, SessionClaim, TokenGenerator};
//! use uuid::Uuid;
//!
//! let generator = TokenGenerator::new("1234-1234-1234-1234-1234-1234-12")?;
//! let claim = SessionClaim::new(
//!     Uuid::from_u128(1),
//!     Uuid::from_u128(2),
//!     Uuid::from_u128(3),
//!     Duration::from_secs(60),
//! );
//!
//! let token = generator.generate_token(&claim, Algorithm::Aead)?;
//! assert_eq!(generator.parse_token(&token)?, claim);
//! # Ok::<(), tokengen_core::GeneratorError>(())
//! ```
//!
//! # Concurrency
//!
//! Everything is synchronous and side-effect free apart from reading the
//! clock and drawing random nonces. The generator holds no mutable state.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod claim;
pub mod env;
pub mod error;
pub mod generator;
pub mod token;

pub use claim::SessionClaim;
pub use env::{Environment, SystemEnv};
pub use error::GeneratorError;
pub use generator::TokenGenerator;
pub use token::{AeadCodec, Algorithm, CLAIM_SCHEMA_VERSION, JwtCodec, TokenCodec};
