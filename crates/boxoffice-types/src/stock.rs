//! Stock accounting for one (event, ticket tier) pair.
//!
//! Every tier has an `available` pool (sellable now) and a `locked` pool
//! (held by PENDING orders awaiting payment). Tickets already sold are not
//! tracked directly: `sold = total - available - locked`.
//!
//! ```text
//!            hold               confirm
//! available ──────▶ locked ───────────────▶ (sold)
//!     ▲               │
//!     └───────────────┘
//!          release
//! ```
//!
//! Each adjustment validates first and mutates second, so a failed call
//! leaves the stock untouched.

use serde::{Deserialize, Serialize};

use crate::{BoxofficeError, Result};

/// A ticket category with its own price and stock pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum TicketTier {
    Regular,
    #[serde(rename = "VIP")]
    Vip,
}

impl std::fmt::Display for TicketTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regular => write!(f, "Regular"),
            Self::Vip => write!(f, "VIP"),
        }
    }
}

/// Stock counters for a single (event, tier) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketStock {
    /// Unit price in the smallest currency unit.
    pub price: u64,
    /// Seats ever offered. Never decremented.
    pub total: u32,
    /// Free to reserve.
    pub available: u32,
    /// Held by PENDING orders.
    pub locked: u32,
}

impl TicketStock {
    /// Fresh stock: everything available, nothing locked.
    #[must_use]
    pub fn new(price: u64, total: u32) -> Self {
        Self {
            price,
            total,
            available: total,
            locked: 0,
        }
    }

    /// Tickets paid for (`total - available - locked`).
    #[must_use]
    pub fn sold(&self) -> u32 {
        self.total
            .saturating_sub(self.available)
            .saturating_sub(self.locked)
    }

    /// Amount due for `quantity` tickets at the current price.
    ///
    /// # Errors
    /// Returns `InvalidQuantity` if `quantity` is zero or the amount overflows.
    pub fn amount_for(&self, quantity: u32) -> Result<u64> {
        if quantity == 0 {
            return Err(BoxofficeError::InvalidQuantity {
                reason: "quantity must be greater than zero".to_string(),
            });
        }
        self.price
            .checked_mul(u64::from(quantity))
            .ok_or_else(|| BoxofficeError::InvalidQuantity {
                reason: format!("total for {quantity} x {} overflows", self.price),
            })
    }

    /// Move `quantity` from available to locked. Returns the amount due,
    /// priced at the moment of the hold.
    ///
    /// # Errors
    /// - `InvalidQuantity` if `quantity` is zero or the amount overflows
    /// - `InsufficientStock` if `available < quantity`
    pub fn hold(&mut self, quantity: u32) -> Result<u64> {
        let amount = self.amount_for(quantity)?;
        if self.available < quantity {
            return Err(BoxofficeError::InsufficientStock {
                requested: quantity,
                available: self.available,
            });
        }
        self.available -= quantity;
        self.locked += quantity;
        Ok(amount)
    }

    /// Payment landed: drop `quantity` from locked. Available stays reduced.
    ///
    /// # Errors
    /// Returns `StockUnderflow` if `locked < quantity`.
    pub fn confirm(&mut self, quantity: u32) -> Result<()> {
        self.locked = self.checked_unlock(quantity)?;
        Ok(())
    }

    /// Hold lapsed: move `quantity` from locked back to available.
    ///
    /// # Errors
    /// Returns `StockUnderflow` if `locked < quantity`.
    pub fn release(&mut self, quantity: u32) -> Result<()> {
        let locked = self.checked_unlock(quantity)?;
        self.locked = locked;
        self.available += quantity;
        Ok(())
    }

    /// Check `available + locked <= total`.
    ///
    /// # Errors
    /// Returns `StockInvariantViolation` if the counters over-account.
    pub fn verify(&self) -> Result<()> {
        let accounted = u64::from(self.available) + u64::from(self.locked);
        if accounted > u64::from(self.total) {
            return Err(BoxofficeError::StockInvariantViolation {
                reason: format!(
                    "available {} + locked {} exceeds total {}",
                    self.available, self.locked, self.total
                ),
            });
        }
        Ok(())
    }

    fn checked_unlock(&self, quantity: u32) -> Result<u32> {
        self.locked
            .checked_sub(quantity)
            .ok_or(BoxofficeError::StockUnderflow {
                locked: self.locked,
                adjustment: quantity,
            })
    }
}
