//! End-to-end tests of the reservation lifecycle.
//!
//! These drive the `BoxOffice` facade the way the transport layer does:
//! reserve, pay, read back, and let windows lapse. Timing tests run on
//! tokio's paused clock so a five-minute window elapses instantly.

use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use boxoffice_engine::BoxOffice;
use boxoffice_types::*;

const WINDOW: Duration = Duration::from_secs(300);

fn office() -> BoxOffice {
    BoxOffice::with_seed_catalog(&EngineConfig::new(TokenKey::random())).unwrap()
}

fn buyer() -> Buyer {
    Buyer::new("Sari", "08123456789")
}

fn ev1() -> EventId {
    EventId::new("ev1")
}

async fn counters(office: &BoxOffice, tier: TicketTier) -> (u32, u32) {
    let stock = office.stock(&ev1(), tier).await.unwrap();
    (stock.available, stock.locked)
}

// =============================================================================
// Scenario: reserve → pay, and reserve → expire, on ev1 Regular
// =============================================================================
#[tokio::test(start_paused = true)]
async fn pay_then_expire_scenario() {
    let office = office();
    assert_eq!(counters(&office, TicketTier::Regular).await, (100, 0));

    // Reserve 3
    let order = office
        .create_order(&ev1(), TicketTier::Regular, 3, buyer())
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, 150_000);
    assert_eq!(counters(&office, TicketTier::Regular).await, (97, 3));

    // Pay it
    let paid = office.pay_order(order.id).await.unwrap();
    assert_eq!(paid.status, OrderStatus::Paid);
    assert_eq!(counters(&office, TicketTier::Regular).await, (97, 0));
    let token = paid.qr_code.clone().unwrap();
    assert!(!token.is_empty());
    assert_ne!(token, constants::TOKEN_FAILURE_SENTINEL);

    // Reserve 5 and let the window lapse unpaid
    let held = office
        .create_order(&ev1(), TicketTier::Regular, 5, buyer())
        .await
        .unwrap();
    assert_eq!(counters(&office, TicketTier::Regular).await, (92, 5));

    tokio::time::sleep(WINDOW + Duration::from_secs(1)).await;

    assert_eq!(
        office.get_order(held.id).await.unwrap().status,
        OrderStatus::Expired
    );
    assert_eq!(counters(&office, TicketTier::Regular).await, (97, 0));

    // The paid order is untouched by the passage of time
    let still_paid = office.get_order(order.id).await.unwrap();
    assert_eq!(still_paid.status, OrderStatus::Paid);
    assert_eq!(still_paid.qr_code, Some(token));

    let stock = office.stock(&ev1(), TicketTier::Regular).await.unwrap();
    assert_eq!(stock.sold(), 3);
    office.verify_inventory().await.unwrap();
}

// =============================================================================
// Paying an expired order fails and leaves inventory alone
// =============================================================================
#[tokio::test(start_paused = true)]
async fn paying_expired_order_is_invalid() {
    let office = office();
    let order = office
        .create_order(&ev1(), TicketTier::Vip, 2, buyer())
        .await
        .unwrap();

    tokio::time::sleep(WINDOW + Duration::from_secs(1)).await;
    assert_eq!(counters(&office, TicketTier::Vip).await, (5, 0));

    let err = office.pay_order(order.id).await.unwrap_err();
    assert!(matches!(
        err,
        BoxofficeError::InvalidOrderState {
            expected: OrderStatus::Pending,
            actual: OrderStatus::Expired
        }
    ));
    assert!(err.is_client_error());
    assert_eq!(counters(&office, TicketTier::Vip).await, (5, 0));
    assert!(office.get_order(order.id).await.unwrap().qr_code.is_none());
}

// =============================================================================
// Payment just before the deadline wins; the timer is gone
// =============================================================================
#[tokio::test(start_paused = true)]
async fn payment_inside_window_beats_expiry() {
    let office = office();
    let order = office
        .create_order(&ev1(), TicketTier::Regular, 4, buyer())
        .await
        .unwrap();
    assert_eq!(office.pending_expiries().await, 1);

    tokio::time::sleep(WINDOW - Duration::from_secs(1)).await;
    office.pay_order(order.id).await.unwrap();
    assert_eq!(office.pending_expiries().await, 0);

    tokio::time::sleep(WINDOW).await;
    assert_eq!(
        office.get_order(order.id).await.unwrap().status,
        OrderStatus::Paid
    );
    assert_eq!(counters(&office, TicketTier::Regular).await, (96, 0));
}

// =============================================================================
// Competing reservations of 60 and 50 against 100: exactly one wins
// =============================================================================
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn competing_reservations_one_winner() {
    let office = std::sync::Arc::new(office());

    let a = {
        let office = std::sync::Arc::clone(&office);
        tokio::spawn(async move {
            office
                .create_order(&ev1(), TicketTier::Regular, 60, buyer())
                .await
        })
    };
    let b = {
        let office = std::sync::Arc::clone(&office);
        tokio::spawn(async move {
            office
                .create_order(&ev1(), TicketTier::Regular, 50, buyer())
                .await
        })
    };
    let results = [a.await.unwrap(), b.await.unwrap()];

    let winners: Vec<&Order> = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .collect();
    assert_eq!(winners.len(), 1, "exactly one reservation must succeed");
    let losers: Vec<&BoxofficeError> = results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .collect();
    assert!(matches!(losers[0], BoxofficeError::InsufficientStock { .. }));

    let won = winners[0].quantity;
    assert_eq!(
        counters(&office, TicketTier::Regular).await,
        (100 - won, won)
    );
    assert_eq!(office.count_orders(OrderStatus::Pending).await, 1);
    office.shutdown().await;
}

// =============================================================================
// Many concurrent reservations never oversell
// =============================================================================
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_reservations_never_oversell() {
    let office = std::sync::Arc::new(office());
    let mut handles = Vec::new();
    for i in 0..200u32 {
        let office = std::sync::Arc::clone(&office);
        handles.push(tokio::spawn(async move {
            let qty = i % 3 + 1;
            office
                .create_order(&ev1(), TicketTier::Vip, qty, buyer())
                .await
                .map(|o| o.quantity)
        }));
    }

    let mut reserved = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(qty) => reserved += qty,
            Err(err) => assert!(matches!(err, BoxofficeError::InsufficientStock { .. })),
        }
    }

    assert!(reserved <= 5);
    let (available, locked) = counters(&office, TicketTier::Vip).await;
    assert_eq!(locked, reserved);
    assert_eq!(available + locked, 5);
    office.verify_inventory().await.unwrap();
    office.shutdown().await;
}

// =============================================================================
// Payment racing the timer: one winner, inventory adjusted exactly once
// =============================================================================
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn pay_and_expiry_race_is_safe() {
    let window = Duration::from_millis(20);
    let office = std::sync::Arc::new(
        BoxOffice::with_seed_catalog(
            &EngineConfig::new(TokenKey::random()).with_reservation_window(window),
        )
        .unwrap(),
    );

    let mut orders = Vec::new();
    for _ in 0..20 {
        orders.push(
            office
                .create_order(&ev1(), TicketTier::Regular, 2, buyer())
                .await
                .unwrap(),
        );
    }

    // Pay each order somewhere around its deadline.
    let mut payments = Vec::new();
    for (i, order) in orders.iter().enumerate() {
        let office = std::sync::Arc::clone(&office);
        let id = order.id;
        let delay = Duration::from_millis(15 + (i as u64 % 10));
        payments.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            office.pay_order(id).await
        }));
    }

    let mut paid = 0u32;
    for payment in payments {
        match payment.await.unwrap() {
            Ok(order) => {
                assert_eq!(order.status, OrderStatus::Paid);
                paid += 1;
            }
            Err(err) => assert!(matches!(
                err,
                BoxofficeError::InvalidOrderState {
                    actual: OrderStatus::Expired,
                    ..
                }
            )),
        }
    }

    // Let every remaining timer fire.
    tokio::time::sleep(window * 5).await;

    let mut expired = 0u32;
    for order in &orders {
        match office.get_order(order.id).await.unwrap().status {
            OrderStatus::Expired => expired += 1,
            OrderStatus::Paid => {}
            OrderStatus::Pending => panic!("order {} never settled", order.id),
        }
    }
    assert_eq!(paid + expired, 20);

    // Paid orders keep their seats; expired ones went back.
    assert_eq!(
        counters(&office, TicketTier::Regular).await,
        (100 - 2 * paid, 0)
    );
    assert_eq!(office.pending_expiries().await, 0);
}

// =============================================================================
// Ticket tokens
// =============================================================================
#[tokio::test(start_paused = true)]
async fn token_decrypts_to_claim_and_rejects_tampering() {
    let key = TokenKey::random();
    let office = BoxOffice::with_seed_catalog(&EngineConfig::new(key.clone())).unwrap();
    let order = office
        .create_order(&ev1(), TicketTier::Regular, 1, buyer())
        .await
        .unwrap();
    let token = office.pay_order(order.id).await.unwrap().qr_code.unwrap();

    let codec = boxoffice_token::TokenCodec::new(&key);
    let claim = codec.open(&token).unwrap();
    assert_eq!(
        claim.to_plaintext(),
        format!("ev1|{}|08123456789|PAID", order.id)
    );
    assert_eq!(office.verify_ticket(&token).await.unwrap().id, order.id);

    let mut sealed = STANDARD.decode(&token).unwrap();
    let last = sealed.len() - 1;
    sealed[last] ^= 0x80;
    let tampered = STANDARD.encode(sealed);
    assert!(matches!(
        office.verify_ticket(&tampered).await.unwrap_err(),
        BoxofficeError::TokenRejected
    ));
}

// =============================================================================
// Catalog listing and request decoding
// =============================================================================
#[tokio::test(start_paused = true)]
async fn list_events_reflects_holds_in_id_order() {
    let office = office();
    let request: OrderRequest = serde_json::from_str(
        r#"{"eventId":"ev2","ticketType":"VIP","quantity":4,
            "user":{"name":"Budi","phone":"0813"}}"#,
    )
    .unwrap();
    let order = office.submit(request).await.unwrap();
    assert_eq!(order.total_amount, 300_000);

    let events = office.list_events().await;
    let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["ev1", "ev2", "ev3", "ev4", "ev5"]);

    let vip = events[1].stock(TicketTier::Vip).unwrap();
    assert_eq!((vip.available, vip.locked, vip.total), (16, 4, 20));

    let json = serde_json::to_value(&events[1]).unwrap();
    assert_eq!(json["tickets"]["VIP"]["locked"], 4);
}

#[tokio::test(start_paused = true)]
async fn unknown_keys_map_to_typed_errors() {
    let office = office();
    assert!(matches!(
        office
            .create_order(&EventId::new("ev42"), TicketTier::Regular, 1, buyer())
            .await
            .unwrap_err(),
        BoxofficeError::EventNotFound(_)
    ));
    assert!(matches!(
        office.get_order(OrderId::new()).await.unwrap_err(),
        BoxofficeError::OrderNotFound(_)
    ));
    assert!(matches!(
        office.pay_order(OrderId::new()).await.unwrap_err(),
        BoxofficeError::OrderNotFound(_)
    ));
    assert!(matches!(
        office.get_event(&EventId::new("ev42")).await.unwrap_err(),
        BoxofficeError::EventNotFound(_)
    ));
}
