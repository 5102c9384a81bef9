//! # Order — a timed claim on ticket stock
//!
//! An order is created PENDING together with a stock hold, and leaves that
//! state exactly once.
//!
//! ## State Machine
//!
//! ```text
//!   ┌─────────┐   payment    ┌──────┐
//!   │ PENDING ├─────────────▶│ PAID │
//!   └────┬────┘              └──────┘
//!        │ window elapsed
//!        ▼
//!   ┌─────────┐
//!   │ EXPIRED │
//!   └─────────┘
//! ```
//!
//! Transitions are **monotonic**: PAID and EXPIRED are terminal, and an order
//! can never reach both. Whoever moves an order out of PENDING owns the
//! matching stock adjustment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BoxofficeError, EventId, OrderId, Result, TicketTier};

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Stock is locked; waiting for payment or the window to elapse.
    Pending,
    /// Paid. Stock is sold and a ticket token was issued. **Terminal.**
    Paid,
    /// The window elapsed unpaid. Stock went back to available. **Terminal.**
    Expired,
}

impl OrderStatus {
    /// Can an order in this status move to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!((self, target), (Self::Pending, Self::Paid | Self::Expired))
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Paid => write!(f, "PAID"),
            Self::Expired => write!(f, "EXPIRED"),
        }
    }
}

/// Contact details of the person buying the tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buyer {
    pub name: String,
    pub phone: String,
}

impl Buyer {
    #[must_use]
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }
}

/// What a client submits to reserve tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub event_id: EventId,
    #[serde(rename = "ticketType")]
    pub tier: TicketTier,
    pub quantity: u32,
    pub user: Buyer,
}

/// A reservation of `quantity` tickets of one tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub event_id: EventId,
    #[serde(rename = "ticketType")]
    pub tier: TicketTier,
    pub quantity: u32,
    pub user: Buyer,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Unit price × quantity, priced when the hold was placed.
    pub total_amount: u64,
    /// Base64 ticket token, present once PAID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
}

impl Order {
    /// Move to `target`.
    ///
    /// # Errors
    /// Returns `InvalidOrderState` unless the move is PENDING → PAID or
    /// PENDING → EXPIRED.
    pub fn transition_to(&mut self, target: OrderStatus) -> Result<()> {
        if !self.status.can_transition_to(target) {
            return Err(BoxofficeError::InvalidOrderState {
                expected: OrderStatus::Pending,
                actual: self.status,
            });
        }
        self.status = target;
        Ok(())
    }
}

/// Dummy order for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    /// Create a PENDING order for unit tests.
    pub fn dummy(event_id: &str, tier: TicketTier, quantity: u32) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::new(),
            event_id: EventId::new(event_id),
            tier,
            quantity,
            user: Buyer::new("Test Buyer", "08123456789"),
            status: OrderStatus::Pending,
            created_at: now,
            expires_at: now + chrono::Duration::minutes(5),
            total_amount: 0,
            qr_code: None,
        }
    }
}
