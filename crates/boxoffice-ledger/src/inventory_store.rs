//! Inventory store — stock counters for every (event, tier) pair.
//!
//! Each event sits behind its own lock, so reservations on different events
//! never contend, and a snapshot reads all tiers of one event under a single
//! acquisition. The set of events is fixed when the store is built.

use std::collections::BTreeMap;

use boxoffice_types::{BoxofficeError, Event, EventId, Result, TicketStock, TicketTier};
use tokio::sync::RwLock;

/// Source of truth for ticket stock.
pub struct InventoryStore {
    /// Catalog events keyed (and therefore ordered) by ID.
    events: BTreeMap<EventId, RwLock<Event>>,
}

impl InventoryStore {
    /// Build the store from a catalog.
    #[must_use]
    pub fn new(catalog: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: catalog
                .into_iter()
                .map(|event| (event.id.clone(), RwLock::new(event)))
                .collect(),
        }
    }

    /// Hold `quantity` tickets: available → locked. Returns the amount due at
    /// the current price.
    ///
    /// Check and mutation happen under one write lock, so two concurrent
    /// holds can never together take more than was available.
    ///
    /// # Errors
    /// - `EventNotFound` / `TicketTypeNotFound` for unknown keys
    /// - `InvalidQuantity` if `quantity` is zero or the amount overflows
    /// - `InsufficientStock` if available < quantity (stock unchanged)
    pub async fn reserve(
        &self,
        event_id: &EventId,
        tier: TicketTier,
        quantity: u32,
    ) -> Result<u64> {
        self.with_stock(event_id, tier, |stock| stock.hold(quantity))
            .await
    }

    /// Payment landed: locked decreases, available stays reduced.
    ///
    /// # Errors
    /// `EventNotFound`, `TicketTypeNotFound`, or `StockUnderflow`.
    pub async fn confirm_sale(
        &self,
        event_id: &EventId,
        tier: TicketTier,
        quantity: u32,
    ) -> Result<()> {
        self.with_stock(event_id, tier, |stock| stock.confirm(quantity))
            .await
    }

    /// Hold lapsed: locked → available.
    ///
    /// # Errors
    /// `EventNotFound`, `TicketTypeNotFound`, or `StockUnderflow`.
    pub async fn release(
        &self,
        event_id: &EventId,
        tier: TicketTier,
        quantity: u32,
    ) -> Result<()> {
        self.with_stock(event_id, tier, |stock| stock.release(quantity))
            .await
    }

    /// Point-in-time copy of one event, all tiers read under one lock.
    ///
    /// # Errors
    /// Returns `EventNotFound` for an unknown ID.
    pub async fn snapshot(&self, event_id: &EventId) -> Result<Event> {
        let event = self
            .events
            .get(event_id)
            .ok_or_else(|| BoxofficeError::EventNotFound(event_id.clone()))?;
        Ok(event.read().await.clone())
    }

    /// Snapshots of every event, ordered by event ID.
    pub async fn snapshot_all(&self) -> Vec<Event> {
        let mut out = Vec::with_capacity(self.events.len());
        for event in self.events.values() {
            out.push(event.read().await.clone());
        }
        out
    }

    /// Copy of one tier's counters.
    ///
    /// # Errors
    /// `EventNotFound` or `TicketTypeNotFound`.
    pub async fn stock(&self, event_id: &EventId, tier: TicketTier) -> Result<TicketStock> {
        let event = self.snapshot(event_id).await?;
        event
            .tickets
            .get(&tier)
            .cloned()
            .ok_or_else(|| BoxofficeError::TicketTypeNotFound {
                event_id: event_id.clone(),
                tier,
            })
    }

    /// Whether the catalog contains this event.
    #[must_use]
    pub fn contains(&self, event_id: &EventId) -> bool {
        self.events.contains_key(event_id)
    }

    /// Number of events in the catalog.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Check `available + locked <= total` for every tier of every event.
    ///
    /// # Errors
    /// Returns the first `StockInvariantViolation` found.
    pub async fn verify(&self) -> Result<()> {
        for event in self.events.values() {
            let event = event.read().await;
            for stock in event.tickets.values() {
                stock.verify()?;
            }
        }
        Ok(())
    }

    async fn with_stock<T>(
        &self,
        event_id: &EventId,
        tier: TicketTier,
        apply: impl FnOnce(&mut TicketStock) -> Result<T>,
    ) -> Result<T> {
        let event = self
            .events
            .get(event_id)
            .ok_or_else(|| BoxofficeError::EventNotFound(event_id.clone()))?;
        let mut event = event.write().await;
        let stock = event
            .tickets
            .get_mut(&tier)
            .ok_or_else(|| BoxofficeError::TicketTypeNotFound {
                event_id: event_id.clone(),
                tier,
            })?;
        apply(stock)
    }
}
