//! Payment processor — settles a PENDING order and issues its ticket token.
//!
//! Payment is authoritative: once the PENDING → PAID transition succeeds it is
//! never rolled back. A token that cannot be sealed degrades to the
//! `ERROR_GEN_QR` sentinel instead of failing the payment.

use std::sync::Arc;

use boxoffice_ledger::{InventoryStore, OrderStore};
use boxoffice_token::{TicketClaim, TicketSealer, TokenCodec};
use boxoffice_types::{
    BoxofficeError, Order, OrderId, OrderStatus, Result, constants::TOKEN_FAILURE_SENTINEL,
};

use crate::expiry::ExpiryScheduler;

/// Moves orders to PAID and seals their ticket tokens.
pub struct PaymentProcessor<S: TicketSealer = TokenCodec> {
    inventory: Arc<InventoryStore>,
    orders: Arc<OrderStore>,
    scheduler: ExpiryScheduler,
    sealer: S,
}

impl<S: TicketSealer> PaymentProcessor<S> {
    #[must_use]
    pub fn new(
        inventory: Arc<InventoryStore>,
        orders: Arc<OrderStore>,
        scheduler: ExpiryScheduler,
        sealer: S,
    ) -> Self {
        Self {
            inventory,
            orders,
            scheduler,
            sealer,
        }
    }

    /// Pay for an order.
    ///
    /// 1. PENDING → PAID (the race point with expiry)
    /// 2. Cancel the expiry timer
    /// 3. Confirm the sale: locked decreases, available stays reduced
    /// 4. Seal `eventId|orderId|phone|PAID` and attach it as `qrCode`
    ///
    /// # Errors
    /// - `OrderNotFound` for an unknown ID
    /// - `InvalidOrderState` if the order is already PAID or EXPIRED
    ///   (inventory untouched)
    pub async fn pay(&self, order_id: OrderId) -> Result<Order> {
        let order = self
            .orders
            .try_transition(order_id, OrderStatus::Pending, OrderStatus::Paid, |_| {})
            .await?;

        self.scheduler.cancel(order_id).await;

        if let Err(err) = self
            .inventory
            .confirm_sale(&order.event_id, order.tier, order.quantity)
            .await
        {
            tracing::error!(
                order = %order_id,
                event = %order.event_id,
                error = %err,
                "Order paid but sale confirmation failed"
            );
        }

        let claim = TicketClaim::new(order.event_id.clone(), order.id, order.user.phone.clone());
        let qr_code = self.issue_token(&claim);
        let order = self.orders.attach_qr_code(order_id, qr_code).await?;

        tracing::info!(
            order = %order_id,
            event = %order.event_id,
            tier = %order.tier,
            qty = order.quantity,
            total = order.total_amount,
            "Order paid"
        );
        Ok(order)
    }

    /// Check a presented ticket token against the order it names.
    ///
    /// # Errors
    /// - `MalformedToken` / `TokenRejected` if the token does not open
    /// - `OrderNotFound` if the order is unknown
    /// - `InvalidOrderState` if the order is not PAID
    /// - `TokenRejected` if event or phone disagree with the order
    pub async fn verify_ticket(&self, token: &str) -> Result<Order> {
        let claim = self.sealer.open(token)?;
        let order = self.orders.get(claim.order_id).await?;

        if order.status != OrderStatus::Paid {
            return Err(BoxofficeError::InvalidOrderState {
                expected: OrderStatus::Paid,
                actual: order.status,
            });
        }
        if order.event_id != claim.event_id || order.user.phone != claim.phone {
            tracing::warn!(order = %order.id, "Ticket claim does not match order");
            return Err(BoxofficeError::TokenRejected);
        }
        Ok(order)
    }

    fn issue_token(&self, claim: &TicketClaim) -> String {
        match self.sealer.seal(claim) {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(
                    order = %claim.order_id,
                    key = self.sealer.key_fingerprint(),
                    error = %err,
                    "Token generation failed, storing sentinel"
                );
                TOKEN_FAILURE_SENTINEL.to_string()
            }
        }
    }
}
