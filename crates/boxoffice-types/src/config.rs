//! Engine configuration: reservation window and ticket-token key.
//!
//! The key is supplied from outside the binary (`BOXOFFICE_TOKEN_KEY`, 64 hex
//! characters) and lives for the whole process. It is never logged; use
//! [`TokenKey::fingerprint`] to identify which key is loaded.

use std::{env, fmt, time::Duration};

use sha2::{Digest, Sha256};

use crate::{BoxofficeError, Result, constants};

/// 256-bit symmetric key for ticket tokens.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenKey([u8; constants::TOKEN_KEY_LEN]);

impl TokenKey {
    /// Parse a hex-encoded key.
    ///
    /// # Errors
    /// Returns `Configuration` if the input is not exactly 32 hex-encoded bytes.
    pub fn from_hex(encoded: &str) -> Result<Self> {
        let bytes = hex::decode(encoded.trim())
            .map_err(|e| BoxofficeError::Configuration(format!("token key is not hex: {e}")))?;
        let bytes: [u8; constants::TOKEN_KEY_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
            BoxofficeError::Configuration(format!(
                "token key must be {} bytes, got {}",
                constants::TOKEN_KEY_LEN,
                b.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; constants::TOKEN_KEY_LEN] {
        &self.0
    }

    /// Short, non-reversible identifier of the key, safe to log.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(b"boxoffice:token_key:v1:");
        hasher.update(self.0);
        hex::encode(&hasher.finalize()[..8])
    }
}

impl fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenKey({})", self.fingerprint())
    }
}

/// Random key for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl TokenKey {
    pub fn random() -> Self {
        Self(rand::random::<[u8; constants::TOKEN_KEY_LEN]>())
    }
}

/// Configuration for one engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long a PENDING order holds its stock before expiring.
    pub reservation_window: Duration,
    /// Key sealing ticket tokens.
    pub token_key: TokenKey,
}

impl EngineConfig {
    /// Default window with the given key.
    #[must_use]
    pub fn new(token_key: TokenKey) -> Self {
        Self {
            reservation_window: Duration::from_secs(constants::DEFAULT_RESERVATION_WINDOW_SECS),
            token_key,
        }
    }

    #[must_use]
    pub fn with_reservation_window(mut self, window: Duration) -> Self {
        self.reservation_window = window;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// - `BOXOFFICE_TOKEN_KEY` (required): 64 hex characters
    /// - `BOXOFFICE_RESERVATION_WINDOW_SECS` (optional, default 300)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let key = lookup(constants::ENV_TOKEN_KEY).ok_or_else(|| {
            BoxofficeError::Configuration(format!("{} is not set", constants::ENV_TOKEN_KEY))
        })?;
        let token_key = TokenKey::from_hex(&key)?;

        let window_secs = match lookup(constants::ENV_RESERVATION_WINDOW_SECS) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                BoxofficeError::Configuration(format!(
                    "{} must be a whole number of seconds: {e}",
                    constants::ENV_RESERVATION_WINDOW_SECS
                ))
            })?,
            None => constants::DEFAULT_RESERVATION_WINDOW_SECS,
        };
        if window_secs == 0 {
            return Err(BoxofficeError::Configuration(format!(
                "{} must be greater than zero",
                constants::ENV_RESERVATION_WINDOW_SECS
            )));
        }

        Ok(Self {
            reservation_window: Duration::from_secs(window_secs),
            token_key,
        })
    }
}
