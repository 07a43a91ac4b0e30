//! Tokengen command-line tool.
//!
//! # Usage
//!
//! ```bash
//! export TOKENGEN_MASTER_KEY=1234-1234-1234-1234-1234-1234-12
//!
//! # Issue and verify session tokens
//! tokengen issue --game <uuid> --room <uuid> --user <uuid> --ttl 300 --algorithm jwt
//! tokengen inspect <token>
//!
//! # Reversible encoding (randomized by default)
//! tokengen encode "reset:player-42" --deterministic
//! tokengen decode <blob> --deterministic
//!
//! # One-way password hashing
//! tokengen password-hash hunter2
//! tokengen verify-password hunter2 <digest>
//! ```

use std::{
    io::{self, Write},
    time::Duration,
};

use clap::{Parser, Subcommand, ValueEnum};
use tokengen_core::{Algorithm, Environment, SessionClaim, TokenGenerator};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Session token and secret encoding tool
#[derive(Parser, Debug)]
#[command(name = "tokengen")]
#[command(about = "Issue and verify session tokens, encode and hash secrets")]
#[command(version)]
struct Args {
    /// Master key, at least 32 bytes
    #[arg(long, env = "TOKENGEN_MASTER_KEY", hide_env_values = true)]
    master_key: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Issue a session token
    Issue {
        /// Game identifier
        #[arg(long)]
        game: Uuid,

        /// Room identifier
        #[arg(long)]
        room: Uuid,

        /// User identifier
        #[arg(long)]
        user: Uuid,

        /// Lifetime in seconds
        #[arg(long, default_value = "300")]
        ttl: u64,

        /// Token backend
        #[arg(long, value_enum, default_value_t = Backend::Aead)]
        algorithm: Backend,
    },

    /// Verify a token and print its claim
    Inspect {
        /// Token of either backend
        token: String,
    },

    /// Reversibly encode a string
    Encode {
        /// Text to encode
        data: String,

        /// Same input always gives the same output
        #[arg(long)]
        deterministic: bool,
    },

    /// Decode a string produced by `encode`
    Decode {
        /// Encoded blob
        blob: String,

        /// The blob was produced with `--deterministic`
        #[arg(long)]
        deterministic: bool,
    },

    /// One-way hash of a password
    PasswordHash {
        /// Password to hash
        data: String,
    },

    /// Check a password against a digest from `password-hash`
    VerifyPassword {
        /// Password to check
        data: String,

        /// Hex digest
        digest: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Backend {
    Jwt,
    Aead,
}

impl From<Backend> for Algorithm {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Jwt => Self::Jwt,
            Backend::Aead => Self::Aead,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let generator = TokenGenerator::new(&args.master_key)?;
    tracing::debug!("generator ready");

    run(&generator, args.command, &mut io::stdout().lock())
}

fn run<E: Environment>(
    generator: &TokenGenerator<E>,
    command: Command,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Issue { game, room, user, ttl, algorithm } => {
            let claim = SessionClaim::new(game, room, user, Duration::from_secs(ttl));
            let token = generator.generate_token(&claim, algorithm.into())?;
            writeln!(out, "{token}")?;
        },
        Command::Inspect { token } => {
            let claim = generator.parse_token(&token)?;
            writeln!(out, "game: {}", claim.game_id)?;
            writeln!(out, "room: {}", claim.room_id)?;
            writeln!(out, "user: {}", claim.user_id)?;
            writeln!(out, "ttl:  {:?}", claim.ttl)?;
        },
        Command::Encode { data, deterministic } => {
            let blob = if deterministic {
                generator.generate_secret_hash(&data)?
            } else {
                generator.generate_hash(&data)?
            };
            writeln!(out, "{blob}")?;
        },
        Command::Decode { blob, deterministic } => {
            let data = if deterministic {
                generator.parse_secret_hash(&blob)?
            } else {
                generator.parse_hash(&blob)?
            };
            writeln!(out, "{data}")?;
        },
        Command::PasswordHash { data } => {
            writeln!(out, "{}", generator.password_hash(&data))?;
        },
        Command::VerifyPassword { data, digest } => {
            if !generator.verify_password(&data, &digest) {
                return Err("password does not match digest".into());
            }
            writeln!(out, "ok")?;
        },
    }

    Ok(())
}
