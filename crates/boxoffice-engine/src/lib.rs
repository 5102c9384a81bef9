//! # boxoffice-engine
//!
//! The reservation-then-pay lifecycle over the ledger stores.
//!
//! ## Architecture
//!
//! 1. **ReservationEngine**: holds stock, records a PENDING order, arms its expiry
//! 2. **ExpiryScheduler**: one-shot timer per order; releases stock if still PENDING
//! 3. **PaymentProcessor**: PENDING → PAID, confirms the sale, issues the ticket token
//! 4. **BoxOffice**: the facade the transport layer calls
//!
//! ## Order Flow
//!
//! ```text
//! create_order → reserve() → OrderStore.insert() → ExpiryScheduler.arm()
//!     ├─ pay_order  → try_transition(PENDING→PAID)    → confirm_sale() → seal token
//!     └─ timer fire → try_transition(PENDING→EXPIRED) → release()
//! ```
//!
//! Payment and expiry race on the same order. Both go through the
//! PENDING-guarded transition, so exactly one of them wins and only the winner
//! adjusts inventory.

pub mod box_office;
pub mod expiry;
pub mod payment;
pub mod reservation;

pub use box_office::BoxOffice;
pub use expiry::{ExpiryScheduler, PendingHold};
pub use payment::PaymentProcessor;
pub use reservation::ReservationEngine;
