//! System-wide constants for the BoxOffice reservation engine.

/// Default reservation window in seconds (5 minutes).
pub const DEFAULT_RESERVATION_WINDOW_SECS: u64 = 300;

/// Length of the symmetric ticket-token key in bytes (AES-256).
pub const TOKEN_KEY_LEN: usize = 32;

/// Length of the per-token random nonce in bytes (96-bit GCM nonce).
pub const TOKEN_NONCE_LEN: usize = 12;

/// Length of the GCM authentication tag appended to every sealed token.
pub const TOKEN_TAG_LEN: usize = 16;

/// Value stored as `qrCode` when token generation fails after payment.
pub const TOKEN_FAILURE_SENTINEL: &str = "ERROR_GEN_QR";

/// Trailing status marker of every ticket-token plaintext.
pub const TOKEN_PAID_MARKER: &str = "PAID";

/// Field separator inside a ticket-token plaintext.
pub const TOKEN_FIELD_SEPARATOR: char = '|';

/// Environment variable holding the hex-encoded ticket-token key.
pub const ENV_TOKEN_KEY: &str = "BOXOFFICE_TOKEN_KEY";

/// Environment variable overriding the reservation window (seconds).
pub const ENV_RESERVATION_WINDOW_SECS: &str = "BOXOFFICE_RESERVATION_WINDOW_SECS";
