//! The sealing seam used by payment.

use boxoffice_types::Result;

use crate::{TicketClaim, TokenCodec};

/// Turns ticket claims into opaque tokens and back.
///
/// [`TokenCodec`] is the production implementation.
pub trait TicketSealer: Send + Sync {
    /// Seal a claim into its token text.
    ///
    /// # Errors
    /// Returns `TokenGenerationFailure` if the token cannot be produced.
    fn seal(&self, claim: &TicketClaim) -> Result<String>;

    /// Authenticate a token and recover its claim.
    ///
    /// # Errors
    /// `MalformedToken` or `TokenRejected`.
    fn open(&self, token: &str) -> Result<TicketClaim>;

    /// Identifier of the key in use, safe to log.
    fn key_fingerprint(&self) -> &str;
}

impl TicketSealer for TokenCodec {
    fn seal(&self, claim: &TicketClaim) -> Result<String> {
        TokenCodec::seal(self, claim)
    }

    fn open(&self, token: &str) -> Result<TicketClaim> {
        TokenCodec::open(self, token)
    }

    fn key_fingerprint(&self) -> &str {
        TokenCodec::key_fingerprint(self)
    }
}
