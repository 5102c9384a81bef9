//! The box office — the operations exposed to the transport layer.

use std::sync::Arc;

use boxoffice_ledger::{InventoryStore, OrderStore};
use boxoffice_token::TokenCodec;
use boxoffice_types::{
    Buyer, EngineConfig, Event, EventId, Order, OrderId, OrderRequest, OrderStatus, Result,
    TicketStock, TicketTier, seed_catalog,
};

use crate::{ExpiryScheduler, PaymentProcessor, ReservationEngine};

/// One engine instance: stores, timers, and the token key, wired together.
pub struct BoxOffice {
    inventory: Arc<InventoryStore>,
    orders: Arc<OrderStore>,
    scheduler: ExpiryScheduler,
    reservations: ReservationEngine,
    payments: PaymentProcessor,
}

impl BoxOffice {
    /// Build an engine over `catalog`.
    ///
    /// # Errors
    /// Returns `Configuration` if the reservation window is out of range.
    pub fn new(config: &EngineConfig, catalog: impl IntoIterator<Item = Event>) -> Result<Self> {
        let inventory = Arc::new(InventoryStore::new(catalog));
        let orders = Arc::new(OrderStore::new());
        let scheduler = ExpiryScheduler::new(Arc::clone(&inventory), Arc::clone(&orders));
        let codec = TokenCodec::new(&config.token_key);

        tracing::info!(
            events = inventory.event_count(),
            window_secs = config.reservation_window.as_secs(),
            key = codec.key_fingerprint(),
            "Box office ready"
        );

        Ok(Self {
            reservations: ReservationEngine::new(
                Arc::clone(&inventory),
                Arc::clone(&orders),
                scheduler.clone(),
                config.reservation_window,
            )?,
            payments: PaymentProcessor::new(
                Arc::clone(&inventory),
                Arc::clone(&orders),
                scheduler.clone(),
                codec,
            ),
            inventory,
            orders,
            scheduler,
        })
    }

    /// Build an engine over the built-in catalog.
    ///
    /// # Errors
    /// Returns `Configuration` if the reservation window is out of range.
    pub fn with_seed_catalog(config: &EngineConfig) -> Result<Self> {
        Self::new(config, seed_catalog())
    }

    /// Snapshots of every event, ordered by event ID.
    pub async fn list_events(&self) -> Vec<Event> {
        self.inventory.snapshot_all().await
    }

    /// Snapshot of one event.
    ///
    /// # Errors
    /// Returns `EventNotFound` for an unknown ID.
    pub async fn get_event(&self, event_id: &EventId) -> Result<Event> {
        self.inventory.snapshot(event_id).await
    }

    /// Reserve tickets. The order stays PENDING until paid or expired.
    ///
    /// # Errors
    /// `EventNotFound`, `TicketTypeNotFound`, `InvalidQuantity`, or
    /// `InsufficientStock`.
    pub async fn create_order(
        &self,
        event_id: &EventId,
        tier: TicketTier,
        quantity: u32,
        user: Buyer,
    ) -> Result<Order> {
        self.reservations
            .create_reservation(event_id, tier, quantity, user)
            .await
    }

    /// [`BoxOffice::create_order`] from a decoded client request.
    ///
    /// # Errors
    /// Same as [`BoxOffice::create_order`].
    pub async fn submit(&self, request: OrderRequest) -> Result<Order> {
        self.create_order(&request.event_id, request.tier, request.quantity, request.user)
            .await
    }

    /// Pay for a PENDING order and receive its ticket token.
    ///
    /// # Errors
    /// `OrderNotFound`, or `InvalidOrderState` if the order is not PENDING.
    pub async fn pay_order(&self, order_id: OrderId) -> Result<Order> {
        self.payments.pay(order_id).await
    }

    /// Current state of an order.
    ///
    /// # Errors
    /// Returns `OrderNotFound` for an unknown ID.
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order> {
        self.orders.get(order_id).await
    }

    /// Check a ticket token presented at the gate.
    ///
    /// # Errors
    /// See [`PaymentProcessor::verify_ticket`].
    pub async fn verify_ticket(&self, token: &str) -> Result<Order> {
        self.payments.verify_ticket(token).await
    }

    /// Number of expiry timers still outstanding.
    pub async fn pending_expiries(&self) -> usize {
        self.scheduler.pending().await
    }

    /// Stop all expiry timers. State is process-lifetime only, so nothing is
    /// flushed.
    pub async fn shutdown(&self) {
        let cancelled = self.scheduler.cancel_all().await;
        tracing::info!(cancelled, "Box office shut down");
    }

    /// Copy of one tier's counters.
    ///
    /// # Errors
    /// `EventNotFound` or `TicketTypeNotFound`.
    pub async fn stock(&self, event_id: &EventId, tier: TicketTier) -> Result<TicketStock> {
        self.inventory.stock(event_id, tier).await
    }

    /// Check the stock invariant across the whole catalog.
    ///
    /// # Errors
    /// Returns `StockInvariantViolation` if any tier over-accounts.
    pub async fn verify_inventory(&self) -> Result<()> {
        self.inventory.verify().await
    }

    /// Number of orders currently in `status`.
    pub async fn count_orders(&self, status: OrderStatus) -> usize {
        self.orders.count_by_status(status).await
    }

    /// The configured reservation window.
    #[must_use]
    pub fn reservation_window(&self) -> std::time::Duration {
        self.reservations.window()
    }
}
