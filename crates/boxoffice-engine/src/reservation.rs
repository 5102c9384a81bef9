//! Reservation engine — turns a request into a PENDING order with a stock hold.
//!
//! 1. Hold the stock (available → locked), priced at this moment
//! 2. Record the PENDING order
//! 3. Arm the expiry timer, only once the order is stored
//!
//! If step 2 fails the hold is released again, so stock is never left locked
//! without an order behind it.

use std::{sync::Arc, time::Duration};

use boxoffice_ledger::{InventoryStore, OrderStore};
use boxoffice_types::{
    BoxofficeError, Buyer, EventId, Order, OrderId, OrderStatus, Result, TicketTier,
};
use chrono::{TimeDelta, Utc};

use crate::expiry::{ExpiryScheduler, PendingHold};

/// Places stock holds and records PENDING orders.
pub struct ReservationEngine {
    inventory: Arc<InventoryStore>,
    orders: Arc<OrderStore>,
    scheduler: ExpiryScheduler,
    window: Duration,
    /// `window` as a wall-clock offset for `expires_at`.
    window_delta: TimeDelta,
}

impl ReservationEngine {
    /// # Errors
    /// Returns `Configuration` if `window` does not fit a wall-clock offset.
    pub fn new(
        inventory: Arc<InventoryStore>,
        orders: Arc<OrderStore>,
        scheduler: ExpiryScheduler,
        window: Duration,
    ) -> Result<Self> {
        let window_delta = TimeDelta::from_std(window).map_err(|e| {
            BoxofficeError::Configuration(format!("reservation window out of range: {e}"))
        })?;
        Ok(Self {
            inventory,
            orders,
            scheduler,
            window,
            window_delta,
        })
    }

    /// The configured reservation window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Reserve `quantity` tickets of `tier` for `user`.
    ///
    /// # Errors
    /// - `EventNotFound` / `TicketTypeNotFound` for unknown keys
    /// - `InvalidQuantity` for a zero quantity or an overflowing total
    /// - `InsufficientStock` if the tier cannot cover `quantity`
    ///
    /// On any error, inventory and orders are as they were.
    pub async fn create_reservation(
        &self,
        event_id: &EventId,
        tier: TicketTier,
        quantity: u32,
        user: Buyer,
    ) -> Result<Order> {
        let total_amount = match self.inventory.reserve(event_id, tier, quantity).await {
            Ok(amount) => amount,
            Err(err) => {
                tracing::debug!(
                    event = %event_id,
                    tier = %tier,
                    qty = quantity,
                    error = %err,
                    "Reservation rejected"
                );
                return Err(err);
            }
        };

        let created_at = Utc::now();
        let order = Order {
            id: OrderId::new(),
            event_id: event_id.clone(),
            tier,
            quantity,
            user,
            status: OrderStatus::Pending,
            created_at,
            expires_at: created_at + self.window_delta,
            total_amount,
            qr_code: None,
        };
        let hold = PendingHold::from(&order);

        if let Err(err) = self.orders.insert(order.clone()).await {
            tracing::warn!(
                order = %order.id,
                event = %event_id,
                error = %err,
                "Order insert failed, rolling back stock hold"
            );
            if let Err(rollback) = self.inventory.release(event_id, tier, quantity).await {
                tracing::error!(
                    order = %order.id,
                    error = %rollback,
                    "Stock rollback failed"
                );
            }
            return Err(err);
        }

        self.scheduler.arm(hold, self.window).await;

        tracing::info!(
            order = %order.id,
            event = %event_id,
            tier = %tier,
            qty = quantity,
            total = total_amount,
            expires_at = %order.expires_at,
            "Reservation created"
        );
        Ok(order)
    }
}
