//! Integration tests for the publisher harness and subscription contract
//!
//! These tests validate the full delivery lifecycle across the crate,
//! including:
//! - Publisher lifecycle ordering (activate / subscribe / publish / deactivate)
//! - first() resolution semantics (immediate vs. suspended)
//! - Per-waiter delivery (no coalescing of distinct publishes)
//! - Teardown and close cancellation of suspended readers

use std::task::Poll;
use std::time::Duration;

use anyhow::Result;
use futures::{pin_mut, poll, FutureExt, StreamExt};
use tokio::time::timeout;

use posture_tracker::error::HarnessError;
use posture_tracker::model::{FoldState, HingeOrientation, LayoutSnapshot};
use posture_tracker::publisher::LayoutPublisher;
use posture_tracker::testing::PostureEventBuilder;

mod common;

fn flat_snapshot() -> LayoutSnapshot {
    PostureEventBuilder::new()
        .state(FoldState::Flat)
        .build_snapshot()
        .expect("builder output is always valid")
}

fn tabletop_snapshot() -> LayoutSnapshot {
    PostureEventBuilder::new()
        .state(FoldState::HalfOpened)
        .orientation(HingeOrientation::Horizontal)
        .build_snapshot()
        .expect("builder output is always valid")
}

fn book_snapshot() -> LayoutSnapshot {
    PostureEventBuilder::new()
        .state(FoldState::HalfOpened)
        .orientation(HingeOrientation::Vertical)
        .build_snapshot()
        .expect("builder output is always valid")
}

/// first() after at least one publish resolves immediately with the
/// latest published snapshot, never suspending.
#[tokio::test]
async fn test_first_after_publish_resolves_without_suspending() -> Result<()> {
    common::init_logging();

    let publisher = LayoutPublisher::new();
    publisher.activate()?;

    let subscription = publisher.subscribe()?;
    publisher.publish(flat_snapshot())?;
    publisher.publish(tabletop_snapshot())?;

    let resolved = subscription
        .first()
        .now_or_never()
        .expect("first() must not suspend once a snapshot was delivered")?;
    assert_eq!(resolved, tabletop_snapshot());
    Ok(())
}

/// first() with no prior publish suspends, then resolves with exactly
/// the next published snapshot.
#[tokio::test]
async fn test_first_suspends_until_next_publish() -> Result<()> {
    common::init_logging();

    let publisher = LayoutPublisher::new();
    publisher.activate()?;
    let subscription = publisher.subscribe()?;

    let first = subscription.first();
    pin_mut!(first);
    assert!(poll!(&mut first).is_pending(), "no value delivered yet");

    publisher.publish(book_snapshot())?;

    match poll!(&mut first) {
        Poll::Ready(Ok(snapshot)) => assert_eq!(snapshot, book_snapshot()),
        Poll::Ready(Err(err)) => panic!("Expected snapshot, got error {:?}", err),
        Poll::Pending => panic!("publish must resume the suspended reader"),
    }
    Ok(())
}

/// A reader suspended across two publishes resumes with the first of
/// them, not the newest-at-resume-time; polling afterwards sees the
/// newest.
#[tokio::test]
async fn test_suspended_reader_gets_next_publish_not_newest() -> Result<()> {
    common::init_logging();

    let publisher = LayoutPublisher::new();
    publisher.activate()?;
    let subscription = publisher.subscribe()?;

    let first = subscription.first();
    pin_mut!(first);
    assert!(poll!(&mut first).is_pending());

    publisher.publish(tabletop_snapshot())?;
    publisher.publish(book_snapshot())?;

    match poll!(&mut first) {
        Poll::Ready(Ok(snapshot)) => assert_eq!(snapshot, tabletop_snapshot()),
        other => panic!("Expected tabletop snapshot, got {:?}", other),
    }
    assert_eq!(subscription.current()?, Some(book_snapshot()));
    Ok(())
}

/// Two subscriptions created before a single publish both resolve
/// first() with the identical snapshot.
#[tokio::test]
async fn test_two_subscriptions_share_the_first_value() -> Result<()> {
    common::init_logging();

    let publisher = LayoutPublisher::new();
    publisher.activate()?;

    let first_subscription = publisher.subscribe()?;
    let second_subscription = publisher.subscribe()?;

    let one = first_subscription.first();
    let two = second_subscription.first();
    pin_mut!(one);
    pin_mut!(two);
    assert!(poll!(&mut one).is_pending());
    assert!(poll!(&mut two).is_pending());

    publisher.publish(tabletop_snapshot())?;

    let (a, b) = match (poll!(&mut one), poll!(&mut two)) {
        (Poll::Ready(Ok(a)), Poll::Ready(Ok(b))) => (a, b),
        other => panic!("Expected both readers resumed, got {:?}", other),
    };
    assert_eq!(a, b);
    assert_eq!(a, tabletop_snapshot());
    Ok(())
}

/// Deactivating the publisher while first() is suspended fails the
/// reader with TornDown instead of hanging it.
#[tokio::test]
async fn test_teardown_fails_suspended_first() -> Result<()> {
    common::init_logging();

    let publisher = LayoutPublisher::new();
    publisher.activate()?;
    let subscription = publisher.subscribe()?;

    let first = subscription.first();
    pin_mut!(first);
    assert!(poll!(&mut first).is_pending());

    publisher.deactivate()?;

    match poll!(&mut first) {
        Poll::Ready(Err(HarnessError::TornDown)) => {}
        other => panic!("Expected TornDown, got {:?}", other),
    }
    Ok(())
}

/// Closing a subscription while first() is suspended fails that reader
/// with SubscriptionClosed rather than leaking the waiting task.
#[tokio::test]
async fn test_close_fails_suspended_first() -> Result<()> {
    common::init_logging();

    let publisher = LayoutPublisher::new();
    publisher.activate()?;
    let subscription = publisher.subscribe()?;

    let first = subscription.first();
    pin_mut!(first);
    assert!(poll!(&mut first).is_pending());

    subscription.close();

    match poll!(&mut first) {
        Poll::Ready(Err(HarnessError::SubscriptionClosed)) => {}
        other => panic!("Expected SubscriptionClosed, got {:?}", other),
    }
    Ok(())
}

/// A suspended reader resumed through the task scheduler (not manual
/// polling) observes the published snapshot end to end.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_spawned_reader_is_resumed_by_publish() -> Result<()> {
    common::init_logging();

    let publisher = LayoutPublisher::new();
    publisher.activate()?;
    let subscription = publisher.subscribe()?;

    let reader = tokio::spawn(async move { subscription.first().await });

    // Give the reader a chance to suspend before publishing.
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    publisher.publish(book_snapshot())?;

    let resolved = timeout(Duration::from_secs(5), reader)
        .await
        .expect("suspended reader must not hang after publish")??;
    assert_eq!(resolved, book_snapshot());
    Ok(())
}

/// The continuing updates() feed observes publishes in order and ends
/// once the publisher and subscription are gone.
#[tokio::test]
async fn test_updates_observes_publishes_in_order() -> Result<()> {
    common::init_logging();

    let publisher = LayoutPublisher::new();
    publisher.activate()?;
    let subscription = publisher.subscribe()?;
    let mut updates = subscription.updates()?;

    publisher.publish(flat_snapshot())?;
    publisher.publish(tabletop_snapshot())?;
    publisher.publish(book_snapshot())?;

    assert_eq!(updates.next().await, Some(flat_snapshot()));
    assert_eq!(updates.next().await, Some(tabletop_snapshot()));
    assert_eq!(updates.next().await, Some(book_snapshot()));

    publisher.deactivate()?;
    drop(subscription);
    assert_eq!(updates.next().await, None);
    Ok(())
}

/// Dropping a subscription releases it without disturbing the publisher
/// or its other subscriptions.
#[tokio::test]
async fn test_dropped_subscription_does_not_disturb_others() -> Result<()> {
    common::init_logging();

    let publisher = LayoutPublisher::new();
    publisher.activate()?;

    let dropped = publisher.subscribe()?;
    let kept = publisher.subscribe()?;
    drop(dropped);

    publisher.publish(flat_snapshot())?;
    assert_eq!(kept.first().await?, flat_snapshot());
    Ok(())
}
