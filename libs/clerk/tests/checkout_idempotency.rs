//! Checkout sequence semantics against an in-memory cart

mod common;

use clerk::application::{CheckoutAutomator, CheckoutError, StoreCheckout};
use clerk::domain::SessionToken;
use common::fixtures::{gbr_3080, usa_3080};
use common::{FakeCart, CHECKOUT_URL};
use std::sync::Arc;

#[tokio::test]
async fn test_repeated_checkout_keeps_quantity_one() {
    let cart = Arc::new(FakeCart::new());
    let checkout = StoreCheckout::new(cart.clone());
    let token = SessionToken::new("session-1");

    let first = checkout.execute(&usa_3080(), &token).await.unwrap();
    let second = checkout.execute(&usa_3080(), &token).await.unwrap();

    assert_eq!(first, CHECKOUT_URL);
    assert_eq!(second, CHECKOUT_URL);
    assert_eq!(cart.add_calls(), 2);
    assert_eq!(cart.quantity("session-1", "5438481700"), 1);
}

#[tokio::test]
async fn test_targets_do_not_share_cart_lines() {
    let cart = Arc::new(FakeCart::new());
    let checkout = StoreCheckout::new(cart.clone());
    let token = SessionToken::new("session-1");

    checkout.execute(&usa_3080(), &token).await.unwrap();
    checkout.execute(&gbr_3080(), &token).await.unwrap();

    assert_eq!(cart.quantity("session-1", "5438481700"), 1);
    assert_eq!(cart.quantity("session-1", "5438792800"), 1);
}

#[tokio::test]
async fn test_add_failure_skips_checkout_step() {
    let cart = Arc::new(FakeCart::new().fail_adds(1));
    let checkout = StoreCheckout::new(cart.clone());

    let err = checkout
        .execute(&usa_3080(), &SessionToken::new("session-1"))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::AddToCart(_)));
    assert_eq!(cart.checkout_calls(), 0);
}

#[tokio::test]
async fn test_checkout_failure_reruns_whole_sequence() {
    let cart = Arc::new(FakeCart::new().fail_checkouts(1));
    let checkout = StoreCheckout::new(cart.clone());
    let token = SessionToken::new("session-1");

    let err = checkout.execute(&usa_3080(), &token).await.unwrap_err();
    assert!(matches!(err, CheckoutError::Checkout(_)));

    let url = checkout.execute(&usa_3080(), &token).await.unwrap();
    assert_eq!(url, CHECKOUT_URL);
    assert_eq!(cart.add_calls(), 2);
    assert_eq!(cart.checkout_calls(), 2);
    assert_eq!(cart.quantity("session-1", "5438481700"), 1);
}
