//! BoxOffice demo
//!
//! Runs the reservation lifecycle end to end against the built-in catalog:
//! - list the catalog
//! - reserve and pay an order, then check its ticket token
//! - reserve an order and let it expire (when the window is short)
//!
//! # Usage
//!
//! ```bash
//! BOXOFFICE_TOKEN_KEY=$(openssl rand -hex 32) \
//! BOXOFFICE_RESERVATION_WINDOW_SECS=3 \
//! cargo run --bin boxoffice-demo
//! ```
//!
//! Set `BOXOFFICE_LOG_JSON=1` for JSON log lines.

use std::time::Duration;

use boxoffice_engine::BoxOffice;
use boxoffice_types::{Buyer, EngineConfig, EventId, TicketTier};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Longest window the demo will sit through to show an expiry.
const MAX_DEMO_WAIT: Duration = Duration::from_secs(30);

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,boxoffice_engine=debug".into());
    let json = std::env::var("BOXOFFICE_LOG_JSON").is_ok_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = EngineConfig::from_env()?;
    let office = BoxOffice::with_seed_catalog(&config)?;

    let events = office.list_events().await;
    println!("{}", serde_json::to_string_pretty(&events)?);

    let ev1 = EventId::new("ev1");
    let buyer = Buyer::new("Sari", "08123456789");

    // Reserve → pay → verify.
    let order = office
        .create_order(&ev1, TicketTier::Regular, 3, buyer.clone())
        .await?;
    let paid = office.pay_order(order.id).await?;
    println!("{}", serde_json::to_string_pretty(&paid)?);

    if let Some(token) = paid.qr_code.as_deref() {
        let verified = office.verify_ticket(token).await?;
        tracing::info!(order = %verified.id, "Ticket token verified");
    }

    // Reserve → let the window lapse.
    let window = office.reservation_window();
    if window <= MAX_DEMO_WAIT {
        let held = office.create_order(&ev1, TicketTier::Vip, 2, buyer).await?;
        tokio::time::sleep(window + Duration::from_millis(500)).await;
        let expired = office.get_order(held.id).await?;
        println!("{}", serde_json::to_string_pretty(&expired)?);
    } else {
        tracing::info!(
            window_secs = window.as_secs(),
            "Skipping expiry demo; set BOXOFFICE_RESERVATION_WINDOW_SECS to 30 or less"
        );
    }

    let stock = office.stock(&ev1, TicketTier::Regular).await?;
    tracing::info!(
        available = stock.available,
        locked = stock.locked,
        sold = stock.sold(),
        "Final ev1 Regular stock"
    );

    office.shutdown().await;
    Ok(())
}
