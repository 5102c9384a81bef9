//! # boxoffice-types
//!
//! Shared types, errors, and configuration for the **BoxOffice** reservation
//! engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`OrderId`], [`EventId`]
//! - **Catalog model**: [`Event`], [`TicketTier`], [`TicketStock`], [`seed_catalog`]
//! - **Order model**: [`Order`], [`OrderStatus`], [`Buyer`], [`OrderRequest`]
//! - **Configuration**: [`EngineConfig`], [`TokenKey`]
//! - **Errors**: [`BoxofficeError`] with `BO_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod order;
pub mod stock;

// Re-export all primary types at crate root for ergonomic imports:
//   use boxoffice_types::{Order, OrderStatus, TicketStock, ...};

pub use catalog::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use order::*;
pub use stock::*;

// Constants are accessed via `boxoffice_types::constants::FOO`
// (not re-exported to avoid name collisions).
