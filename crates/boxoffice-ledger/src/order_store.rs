//! Order store — orders by ID with guarded status transitions.
//!
//! [`OrderStore::try_transition`] is the synchronization point between payment
//! and expiry: both move an order out of PENDING, and whichever arrives first
//! wins. The loser sees `InvalidOrderState` and must not touch inventory.

use std::collections::HashMap;

use boxoffice_types::{BoxofficeError, Order, OrderId, OrderStatus, Result};
use tokio::sync::RwLock;

/// All orders of this process, keyed by ID.
pub struct OrderStore {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl OrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
        }
    }

    /// Add a new order.
    ///
    /// # Errors
    /// Returns `DuplicateOrder` if the ID is taken (the existing order is kept).
    pub async fn insert(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(BoxofficeError::DuplicateOrder(order.id));
        }
        orders.insert(order.id, order);
        Ok(())
    }

    /// Copy of an order.
    ///
    /// # Errors
    /// Returns `OrderNotFound` for an unknown ID.
    pub async fn get(&self, id: OrderId) -> Result<Order> {
        self.orders
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(BoxofficeError::OrderNotFound(id))
    }

    /// If the order is in `from`, move it to `to` and apply `mutate`, all under
    /// one write lock. Returns the updated order.
    ///
    /// # Errors
    /// - `OrderNotFound` for an unknown ID
    /// - `InvalidOrderState` if the order is not in `from` or `from → to` is
    ///   not a legal move (order unchanged)
    pub async fn try_transition(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
        mutate: impl FnOnce(&mut Order),
    ) -> Result<Order> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(&id).ok_or(BoxofficeError::OrderNotFound(id))?;

        if order.status != from {
            return Err(BoxofficeError::InvalidOrderState {
                expected: from,
                actual: order.status,
            });
        }
        order.transition_to(to)?;
        mutate(order);
        Ok(order.clone())
    }

    /// Attach the ticket token to a PAID order.
    ///
    /// # Errors
    /// `OrderNotFound`, or `InvalidOrderState` if the order is not PAID.
    pub async fn attach_qr_code(&self, id: OrderId, qr_code: String) -> Result<Order> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(&id).ok_or(BoxofficeError::OrderNotFound(id))?;

        if order.status != OrderStatus::Paid {
            return Err(BoxofficeError::InvalidOrderState {
                expected: OrderStatus::Paid,
                actual: order.status,
            });
        }
        order.qr_code = Some(qr_code);
        Ok(order.clone())
    }

    /// Number of orders tracked.
    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Whether no order has been placed yet.
    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }

    /// Number of orders currently in `status`.
    pub async fn count_by_status(&self, status: OrderStatus) -> usize {
        self.orders
            .read()
            .await
            .values()
            .filter(|order| order.status == status)
            .count()
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}
