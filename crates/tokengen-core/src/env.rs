//! Environment abstraction for deterministic testing.
//!
//! Decouples token logic from system resources (wall clock, randomness).
//! Production uses [`SystemEnv`]; tests inject a manual clock and fixed
//! random bytes to exercise expiry and nonce handling deterministically.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Abstract environment providing time and randomness.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `random_bytes()` uses cryptographically secure entropy in production
/// - `random_bytes()` is safe to call from many threads at once
/// - Methods are infallible except in exceptional circumstances (e.g., OS
///   entropy exhaustion)
pub trait Environment: Clone + Send + Sync + 'static {
    /// Wall-clock time since the Unix epoch.
    ///
    /// Token issuance and expiry are both measured on this clock.
    fn unix_time(&self) -> Duration;

    /// Fills the provided buffer with random bytes.
    ///
    /// # Invariants
    ///
    /// - Uses cryptographically secure RNG
    /// - Two calls never return the same bytes in production (nonce
    ///   uniqueness depends on it)
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random fixed-size array.
    ///
    /// Convenience for nonces.
    fn random_array<const N: usize>(&self) -> [u8; N] {
        let mut bytes = [0u8; N];
        self.random_bytes(&mut bytes);
        bytes
    }
}

/// Production environment using the system clock and OS randomness.
///
/// # Panics
///
/// Panics if the OS RNG fails. Continuing without cryptographic randomness
/// would risk nonce reuse, which breaks confidentiality of every blob sealed
/// under the same key.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::disallowed_methods)]
    fn unix_time(&self) -> Duration {
        // A clock before 1970 reads as the epoch itself, which only makes
        // freshly issued tokens look older
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO)
    }

    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer)
            .expect("invariant: OS RNG failure is unrecoverable - nonces cannot be generated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_env_time_is_after_epoch() {
        let env = SystemEnv::new();
        // 2020-01-01T00:00:00Z
        assert!(env.unix_time() > Duration::from_secs(1_577_836_800));
    }

    #[test]
    #[allow(clippy::disallowed_methods)]
    fn system_env_time_advances() {
        let env = SystemEnv::new();

        let t1 = env.unix_time();
        std::thread::sleep(Duration::from_millis(10));
        let t2 = env.unix_time();

        assert!(t2 > t1, "Time should advance");
    }

    #[test]
    fn system_env_random_bytes_are_random() {
        let env = SystemEnv::new();

        let bytes1: [u8; 32] = env.random_array();
        let bytes2: [u8; 32] = env.random_array();

        // Extremely unlikely to be equal if random
        assert_ne!(bytes1, bytes2, "Random bytes should differ");
    }

    #[test]
    fn system_env_random_bytes_fills_buffer() {
        let env = SystemEnv::new();

        let mut bytes = [0u8; 64];
        env.random_bytes(&mut bytes);

        let non_zero_count = bytes.iter().filter(|&&b| b != 0).count();
        assert!(non_zero_count > 32, "Most bytes should be non-zero");
    }
}
