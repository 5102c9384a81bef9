//! # boxoffice-ledger
//!
//! The two shared tables of the reservation engine, each behind its own lock:
//!
//! 1. **InventoryStore**: per-(event, tier) stock with available/locked accounting
//! 2. **OrderStore**: orders by ID, mutated only through guarded status transitions
//!
//! Neither store hands out references into its table. Every operation is a
//! single check-and-mutate under the lock, and the lock is released before the
//! call returns, so callers never hold it across encryption or timers.
//!
//! Cross-store consistency (order exists ⇔ stock is held) is kept by the
//! engine through ordering: hold stock, then insert the order.

pub mod inventory_store;
pub mod order_store;

pub use inventory_store::InventoryStore;
pub use order_store::OrderStore;
