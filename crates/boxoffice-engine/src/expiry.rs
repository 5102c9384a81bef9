//! Expiry scheduler — releases the stock of orders left unpaid.
//!
//! Every reservation arms one timer task. When it fires it tries
//! PENDING → EXPIRED; only on success does it return the held quantity to
//! available. A paid order has already left PENDING, so a late timer is a
//! no-op. Payment also cancels the timer outright, which keeps the number of
//! outstanding timers bounded by the number of PENDING orders.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use boxoffice_ledger::{InventoryStore, OrderStore};
use boxoffice_types::{BoxofficeError, EventId, Order, OrderId, OrderStatus, TicketTier};
use tokio::{sync::Mutex, task::AbortHandle};

/// What an expiry timer needs to undo one reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingHold {
    pub order_id: OrderId,
    pub event_id: EventId,
    pub tier: TicketTier,
    pub quantity: u32,
}

impl From<&Order> for PendingHold {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            event_id: order.event_id.clone(),
            tier: order.tier,
            quantity: order.quantity,
        }
    }
}

struct Timer {
    generation: u64,
    handle: AbortHandle,
}

/// One-shot timers keyed by order ID. Cloning shares the timer table.
#[derive(Clone)]
pub struct ExpiryScheduler {
    inventory: Arc<InventoryStore>,
    orders: Arc<OrderStore>,
    timers: Arc<Mutex<HashMap<OrderId, Timer>>>,
    generations: Arc<AtomicU64>,
}

impl ExpiryScheduler {
    #[must_use]
    pub fn new(inventory: Arc<InventoryStore>, orders: Arc<OrderStore>) -> Self {
        Self {
            inventory,
            orders,
            timers: Arc::new(Mutex::new(HashMap::new())),
            generations: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fire `hold` once after `window`. Re-arming the same order supersedes
    /// the earlier timer.
    ///
    /// The order must already be stored. If it has left PENDING by the time
    /// the timer is in the table (a payment that found nothing to cancel),
    /// the timer is dropped again, so no timer outlives a settled order.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn arm(&self, hold: PendingHold, window: Duration) {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed);
        let order_id = hold.order_id;

        // The table lock is held until the handle is stored; the task takes
        // the same lock before acting, so it always finds its own entry.
        let mut timers = self.timers.lock().await;
        let scheduler = self.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            scheduler.fire(hold, generation).await;
        });

        let timer = Timer {
            generation,
            handle: task.abort_handle(),
        };
        if let Some(previous) = timers.insert(order_id, timer) {
            previous.handle.abort();
        }
        drop(timers);

        tracing::debug!(
            order = %order_id,
            window_secs = window.as_secs(),
            "Expiry armed"
        );

        let still_pending = matches!(
            self.orders.get(order_id).await,
            Ok(order) if order.status == OrderStatus::Pending
        );
        if !still_pending {
            self.cancel(order_id).await;
        }
    }

    /// Drop the timer for an order. Returns `true` if one was outstanding.
    pub async fn cancel(&self, order_id: OrderId) -> bool {
        let removed = self.timers.lock().await.remove(&order_id);
        match removed {
            Some(timer) => {
                timer.handle.abort();
                tracing::debug!(order = %order_id, "Expiry cancelled");
                true
            }
            None => false,
        }
    }

    /// Abort every outstanding timer. Held stock stays locked.
    pub async fn cancel_all(&self) -> usize {
        let mut timers = self.timers.lock().await;
        let count = timers.len();
        for (_, timer) in timers.drain() {
            timer.handle.abort();
        }
        count
    }

    /// Number of timers that have neither fired nor been cancelled.
    pub async fn pending(&self) -> usize {
        self.timers.lock().await.len()
    }

    async fn fire(&self, hold: PendingHold, generation: u64) {
        {
            let mut timers = self.timers.lock().await;
            let current = timers
                .get(&hold.order_id)
                .is_some_and(|timer| timer.generation == generation);
            // Superseded or cancelled while waiting for the lock.
            if !current {
                return;
            }
            timers.remove(&hold.order_id);
        }

        match self
            .orders
            .try_transition(
                hold.order_id,
                OrderStatus::Pending,
                OrderStatus::Expired,
                |_| {},
            )
            .await
        {
            Ok(_) => match self
                .inventory
                .release(&hold.event_id, hold.tier, hold.quantity)
                .await
            {
                Ok(()) => tracing::info!(
                    order = %hold.order_id,
                    event = %hold.event_id,
                    tier = %hold.tier,
                    qty = hold.quantity,
                    "Order expired, stock released"
                ),
                Err(err) => tracing::error!(
                    order = %hold.order_id,
                    event = %hold.event_id,
                    error = %err,
                    "Order expired but stock release failed"
                ),
            },
            Err(BoxofficeError::InvalidOrderState { actual, .. }) => tracing::debug!(
                order = %hold.order_id,
                status = %actual,
                "Expiry skipped: order already settled"
            ),
            Err(err) => tracing::warn!(
                order = %hold.order_id,
                error = %err,
                "Expiry could not transition order"
            ),
        }
    }
}
