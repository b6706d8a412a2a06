mod common;

use assert_matches::assert_matches;
use godown_api::{
    errors::ServiceError,
    models::{FeedCategory, LogAction, StockLine},
};
use uuid::Uuid;

use common::TestApp;

#[tokio::test]
async fn registering_twice_replaces_the_stock() {
    let app = TestApp::new().await;
    let feed_a = Uuid::new_v4();
    let feed_b = Uuid::new_v4();
    let transfers = &app.services().transfers;

    let first = transfers
        .register_load("TRK-1", vec![StockLine::new(feed_a, 10)])
        .await
        .unwrap();
    let second = transfers
        .register_load(" TRK-1", vec![StockLine::new(feed_b, 4)])
        .await
        .unwrap();

    assert_eq!(first.load.id, second.load.id);
    assert_eq!(second.load.stock, vec![StockLine::new(feed_b, 4)]);
    assert_eq!(transfers.loads().await.unwrap().len(), 1);
    assert_eq!(
        app.services()
            .audit
            .entries_for(LogAction::RegisterTruckLoad)
            .await
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
async fn transfer_moves_stock_and_creates_the_destination() {
    let app = TestApp::new().await;
    let feed_a = Uuid::new_v4();
    let feed_b = Uuid::new_v4();
    let transfers = &app.services().transfers;
    transfers
        .register_load(
            "SRC",
            vec![StockLine::new(feed_a, 10), StockLine::new(feed_b, 3)],
        )
        .await
        .unwrap();

    let outcome = transfers
        .transfer("SRC", "DST", vec![StockLine::new(feed_a, 4)])
        .await
        .unwrap();

    assert_eq!(outcome.source.quantity_of(feed_a), 6);
    assert_eq!(outcome.source.quantity_of(feed_b), 3);
    assert_eq!(outcome.destination.truck_number, "DST");
    assert_eq!(outcome.destination.quantity_of(feed_a), 4);
    assert_eq!(transfers.transfers().await.unwrap().len(), 1);

    let stored = transfers.load_for("DST").await.unwrap().unwrap();
    assert_eq!(stored.id, outcome.destination.id);

    let logged = app
        .services()
        .audit
        .entries_for(LogAction::DirectTransfer)
        .await
        .unwrap();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].id, outcome.log_entry.id);
}

#[tokio::test]
async fn transfer_adds_to_an_existing_destination() {
    let app = TestApp::new().await;
    let feed = Uuid::new_v4();
    let transfers = &app.services().transfers;
    transfers
        .register_load("SRC", vec![StockLine::new(feed, 10)])
        .await
        .unwrap();
    transfers
        .register_load("DST", vec![StockLine::new(feed, 1)])
        .await
        .unwrap();

    let outcome = transfers
        .transfer("SRC", "DST", vec![StockLine::new(feed, 10)])
        .await
        .unwrap();
    assert_eq!(outcome.source.quantity_of(feed), 0);
    assert_eq!(outcome.destination.quantity_of(feed), 11);
    assert_eq!(transfers.loads().await.unwrap().len(), 2);
}

#[tokio::test]
async fn shortfall_leaves_both_trucks_untouched() {
    let app = TestApp::new().await;
    let feed = Uuid::new_v4();
    let transfers = &app.services().transfers;
    transfers
        .register_load("SRC", vec![StockLine::new(feed, 5)])
        .await
        .unwrap();

    // each line fits alone, together they do not
    let err = transfers
        .transfer(
            "SRC",
            "DST",
            vec![StockLine::new(feed, 3), StockLine::new(feed, 3)],
        )
        .await
        .unwrap_err();
    assert_matches!(
        err,
        ServiceError::InsufficientTruckStock { requested: 3, available: 2, .. }
    );

    assert_eq!(
        transfers.load_for("SRC").await.unwrap().unwrap().quantity_of(feed),
        5
    );
    assert!(transfers.load_for("DST").await.unwrap().is_none());
    assert!(transfers.transfers().await.unwrap().is_empty());
    assert!(app
        .services()
        .audit
        .entries_for(LogAction::DirectTransfer)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn unknown_source_and_same_truck_are_rejected() {
    let app = TestApp::new().await;
    let feed = Uuid::new_v4();
    let transfers = &app.services().transfers;

    let missing = transfers
        .transfer("NOPE", "DST", vec![StockLine::new(feed, 1)])
        .await;
    assert_matches!(missing, Err(ServiceError::SourceTruckNotFound(number)) if number == "NOPE");

    transfers
        .register_load("SRC", vec![StockLine::new(feed, 5)])
        .await
        .unwrap();
    let same = transfers
        .transfer("SRC", " SRC ", vec![StockLine::new(feed, 1)])
        .await;
    assert_matches!(same, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn transfers_never_touch_the_warehouse() {
    let app = TestApp::new().await;
    let feed = app.add_feed("Shrimp", FeedCategory::ShrimpFeed, Some(9)).await;
    let transfers = &app.services().transfers;
    transfers
        .register_load("SRC", vec![StockLine::new(feed.id, 5)])
        .await
        .unwrap();
    transfers
        .transfer("SRC", "DST", vec![StockLine::new(feed.id, 5)])
        .await
        .unwrap();

    let entry = app.services().ledger.entry_for(feed.id).await.unwrap().unwrap();
    assert_eq!(entry.quantity, 9);
}

#[tokio::test]
async fn transfers_work_over_sqlite() {
    let app = TestApp::with_sqlite().await;
    let feed = Uuid::new_v4();
    let transfers = &app.services().transfers;
    transfers
        .register_load("SRC", vec![StockLine::new(feed, 8)])
        .await
        .unwrap();

    let outcome = transfers
        .transfer("SRC", "DST", vec![StockLine::new(feed, 8)])
        .await
        .unwrap();
    assert_eq!(outcome.source.quantity_of(feed), 0);
    assert_eq!(
        transfers.load_for("DST").await.unwrap().unwrap().quantity_of(feed),
        8
    );
}
