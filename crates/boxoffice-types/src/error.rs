//! Error types for the BoxOffice reservation engine.
//!
//! All errors use the `BO_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Catalog errors
//! - 2xx: Stock errors
//! - 3xx: Order errors
//! - 4xx: Ticket-token errors
//! - 9xx: Configuration errors

use thiserror::Error;

use crate::{EventId, OrderId, OrderStatus, TicketTier};

/// Central error enum for all BoxOffice operations.
#[derive(Debug, Error)]
pub enum BoxofficeError {
    // =================================================================
    // Catalog Errors (1xx)
    // =================================================================
    /// The requested event is not in the catalog.
    #[error("BO_ERR_100: Event not found: {0}")]
    EventNotFound(EventId),

    /// The event exists but does not sell this ticket tier.
    #[error("BO_ERR_101: Ticket type {tier} not found for event {event_id}")]
    TicketTypeNotFound { event_id: EventId, tier: TicketTier },

    // =================================================================
    // Stock Errors (2xx)
    // =================================================================
    /// Not enough available stock to place the hold.
    #[error("BO_ERR_200: Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    /// The requested quantity is zero or its total amount overflows.
    #[error("BO_ERR_201: Invalid quantity: {reason}")]
    InvalidQuantity { reason: String },

    /// A stock adjustment would drive `locked` below zero.
    #[error("BO_ERR_202: Stock underflow: locked {locked}, adjustment {adjustment}")]
    StockUnderflow { locked: u32, adjustment: u32 },

    /// `available + locked > total`. Critical accounting alert.
    #[error("BO_ERR_203: Stock invariant violation: {reason}")]
    StockInvariantViolation { reason: String },

    // =================================================================
    // Order Errors (3xx)
    // =================================================================
    /// The requested order does not exist.
    #[error("BO_ERR_300: Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order is not in the status the operation requires.
    #[error("BO_ERR_301: Invalid order state: expected {expected}, got {actual}")]
    InvalidOrderState {
        expected: OrderStatus,
        actual: OrderStatus,
    },

    /// An order with this ID already exists.
    #[error("BO_ERR_302: Order already exists: {0}")]
    DuplicateOrder(OrderId),

    // =================================================================
    // Ticket-Token Errors (4xx)
    // =================================================================
    /// Sealing the ticket token failed. Non-fatal for payment.
    #[error("BO_ERR_400: Token generation failed: {0}")]
    TokenGenerationFailure(String),

    /// The token did not authenticate under the configured key.
    #[error("BO_ERR_401: Token rejected: authentication failed")]
    TokenRejected,

    /// The token is not valid base64, is truncated, or its plaintext is malformed.
    #[error("BO_ERR_402: Malformed token: {reason}")]
    MalformedToken { reason: String },

    // =================================================================
    // Configuration (9xx)
    // =================================================================
    /// Configuration error (missing or invalid environment values).
    #[error("BO_ERR_900: Configuration error: {0}")]
    Configuration(String),
}

impl BoxofficeError {
    /// Whether the error was caused by the caller's request rather than by
    /// the engine. The transport layer maps these to 4xx responses.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EventNotFound(_)
                | Self::TicketTypeNotFound { .. }
                | Self::InsufficientStock { .. }
                | Self::InvalidQuantity { .. }
                | Self::OrderNotFound(_)
                | Self::InvalidOrderState { .. }
                | Self::TokenRejected
                | Self::MalformedToken { .. }
        )
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, BoxofficeError>;
