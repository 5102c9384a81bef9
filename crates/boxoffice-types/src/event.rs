//! Catalog events.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{EventId, TicketStock, TicketTier};

/// A catalog entry. Metadata is fixed at load time; only the stock of its
/// tiers changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: String,
    /// Display string, e.g. "Sabtu, 19:00 WIB".
    pub date: String,
    pub location: String,
    pub tickets: BTreeMap<TicketTier, TicketStock>,
}

impl Event {
    /// Stock for one tier, if the event sells it.
    #[must_use]
    pub fn stock(&self, tier: TicketTier) -> Option<&TicketStock> {
        self.tickets.get(&tier)
    }

    /// Tickets paid for across all tiers.
    #[must_use]
    pub fn sold(&self) -> u32 {
        self.tickets.values().map(TicketStock::sold).sum()
    }
}
