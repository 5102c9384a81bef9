//! The plaintext carried inside a ticket token.

use boxoffice_types::{
    BoxofficeError, EventId, OrderId, Result,
    constants::{TOKEN_FIELD_SEPARATOR, TOKEN_PAID_MARKER},
};

/// Who may enter which event with which order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketClaim {
    pub event_id: EventId,
    pub order_id: OrderId,
    pub phone: String,
}

impl TicketClaim {
    #[must_use]
    pub fn new(event_id: EventId, order_id: OrderId, phone: impl Into<String>) -> Self {
        Self {
            event_id,
            order_id,
            phone: phone.into(),
        }
    }

    /// Canonical plaintext: `eventId|orderId|phone|PAID`.
    #[must_use]
    pub fn to_plaintext(&self) -> String {
        let sep = TOKEN_FIELD_SEPARATOR;
        format!(
            "{}{sep}{}{sep}{}{sep}{TOKEN_PAID_MARKER}",
            self.event_id, self.order_id, self.phone
        )
    }

    /// Parse a canonical plaintext. The phone field may itself contain the
    /// separator; event and order IDs never do.
    ///
    /// # Errors
    /// Returns `MalformedToken` if a field is missing or the order ID is not a UUID.
    pub fn parse(plaintext: &str) -> Result<Self> {
        let malformed = |reason: &str| BoxofficeError::MalformedToken {
            reason: reason.to_string(),
        };

        let body = plaintext
            .strip_suffix(TOKEN_PAID_MARKER)
            .and_then(|rest| rest.strip_suffix(TOKEN_FIELD_SEPARATOR))
            .ok_or_else(|| malformed("missing PAID marker"))?;

        let mut fields = body.splitn(3, TOKEN_FIELD_SEPARATOR);
        let event_id = fields
            .next()
            .filter(|f| !f.is_empty())
            .ok_or_else(|| malformed("missing event id"))?;
        let order_id = fields
            .next()
            .ok_or_else(|| malformed("missing order id"))?
            .parse::<OrderId>()
            .map_err(|e| malformed(&format!("bad order id: {e}")))?;
        let phone = fields.next().ok_or_else(|| malformed("missing phone"))?;

        Ok(Self::new(EventId::new(event_id), order_id, phone))
    }
}
