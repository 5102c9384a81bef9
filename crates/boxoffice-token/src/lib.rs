//! # boxoffice-token
//!
//! Ticket tokens: the opaque string printed as a QR code once an order is
//! paid.
//!
//! ## Format
//!
//! ```text
//! plaintext = eventId "|" orderId "|" phone "|PAID"
//! token     = base64( nonce[12] || AES-256-GCM(plaintext) || tag[16] )
//! ```
//!
//! A fresh random nonce is drawn from the OS for every token, so one key can
//! seal any number of tokens without nonce reuse.

pub mod claim;
pub mod codec;
pub mod sealer;

pub use claim::TicketClaim;
pub use codec::TokenCodec;
pub use sealer::TicketSealer;
