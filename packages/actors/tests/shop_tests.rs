//! Integration tests for the barbershop coordination protocol.
//!
//! Assertions run against the structured event stream and the shop's
//! counters, never against log text.

use std::time::Duration;

use futures_util::future::join_all;
use shop_actors::{Actor, Barbershop, ShopActor, ShopActorState, ShopMessage};
use shop_core::{BarberId, CustomerId, ShopConfig, ShopEvent, VisitOutcome};
use tokio::sync::broadcast;
use tokio::time::timeout;

const EVENT_WAIT: Duration = Duration::from_secs(5);
const RUN_WAIT: Duration = Duration::from_secs(10);

async fn next_event(events: &mut broadcast::Receiver<ShopEvent>) -> ShopEvent {
    timeout(EVENT_WAIT, events.recv())
        .await
        .expect("timed out waiting for a shop event")
        .expect("event channel closed")
}

/// Drain events until one matches, returning every event seen on the way.
async fn wait_for(
    events: &mut broadcast::Receiver<ShopEvent>,
    pred: impl Fn(&ShopEvent) -> bool,
) -> Vec<ShopEvent> {
    let mut seen = Vec::new();
    loop {
        let event = next_event(events).await;
        let done = pred(&event);
        seen.push(event);
        if done {
            return seen;
        }
    }
}

fn spawn_visit(
    shop: &Barbershop,
    customer: CustomerId,
) -> tokio::task::JoinHandle<Result<VisitOutcome, shop_actors::ShopError>> {
    let shop_ref = shop.shop().clone();
    tokio::spawn(async move { shop_actors::visit(&shop_ref, customer).await })
}

// Scenario 1: a walk-in customer never touches the queue when a barber is
// idle. Chairs are requested as zero, exercising the forgiving constructor.
#[tokio::test]
async fn walk_in_bypasses_the_queue() {
    let shop = Barbershop::open(ShopConfig::new(1, 0), Duration::from_millis(10))
        .await
        .expect("open shop");
    let mut events = shop.subscribe();

    let outcome = timeout(RUN_WAIT, shop.visit(CustomerId(1)))
        .await
        .expect("visit stalled")
        .expect("visit failed");
    assert_eq!(outcome, VisitOutcome::Served { barber: BarberId(0) });

    let seen = wait_for(&mut events, |e| {
        matches!(e, ShopEvent::CustomerPaid { .. })
    })
    .await;
    assert!(
        !seen
            .iter()
            .any(|e| matches!(e, ShopEvent::CustomerTookChair { .. })),
        "direct assignment must bypass the waiting area"
    );

    let stats = shop.stats().await.expect("stats");
    assert_eq!(stats.served, 1);
    assert_eq!(stats.dropped, 0);
    assert_eq!(stats.waiting, 0);

    shop.close().await.expect("close shop");
}

// Scenario 2: one barber busy, one waiting chair. The first arrival takes
// the chair, the second is turned away on the spot.
#[tokio::test]
async fn full_house_turns_customers_away() {
    let shop = Barbershop::open(ShopConfig::new(1, 1), Duration::from_millis(1000))
        .await
        .expect("open shop");
    let mut events = shop.subscribe();

    // c0 occupies the barber for the length of the cut.
    let c0 = spawn_visit(&shop, CustomerId(0));
    wait_for(&mut events, |e| matches!(e, ShopEvent::CutStarted { .. })).await;

    // c1 finds no idle barber and takes the only chair.
    let c1 = spawn_visit(&shop, CustomerId(1));
    wait_for(&mut events, |e| {
        matches!(e, ShopEvent::CustomerTookChair { .. })
    })
    .await;
    assert_eq!(shop.stats().await.expect("stats").waiting, 1);

    // c2 finds the shop full and leaves immediately.
    let outcome = timeout(RUN_WAIT, shop.visit(CustomerId(2)))
        .await
        .expect("check-in stalled")
        .expect("visit failed");
    assert_eq!(outcome, VisitOutcome::TurnedAway);
    assert_eq!(shop.dropped_count().await.expect("dropped"), 1);

    // The admitted customers are both served.
    for handle in [c0, c1] {
        let outcome = timeout(RUN_WAIT, handle)
            .await
            .expect("visit stalled")
            .expect("join")
            .expect("visit failed");
        assert!(outcome.is_served());
    }

    let stats = shop.stats().await.expect("stats");
    assert_eq!(stats.served, 2);
    assert_eq!(stats.dropped, 1);
    assert_eq!(stats.waiting, 0);

    shop.close().await.expect("close shop");
}

// Scenario 3: two idle barbers, two concurrent arrivals; both admitted
// directly, nothing queues, nothing drops.
#[tokio::test]
async fn concurrent_arrivals_use_both_idle_barbers() {
    let shop = Barbershop::open(ShopConfig::new(2, 3), Duration::from_millis(50))
        .await
        .expect("open shop");
    let mut events = shop.subscribe();

    let handles = vec![spawn_visit(&shop, CustomerId(1)), spawn_visit(&shop, CustomerId(2))];
    let outcomes = timeout(RUN_WAIT, join_all(handles))
        .await
        .expect("visits stalled");

    let mut barbers = Vec::new();
    for outcome in outcomes {
        match outcome.expect("join").expect("visit failed") {
            VisitOutcome::Served { barber } => barbers.push(barber),
            VisitOutcome::TurnedAway => panic!("customer turned away with idle barbers"),
        }
    }
    barbers.sort();
    barbers.dedup();
    assert_eq!(barbers.len(), 2, "each customer must get their own barber");

    // Drain through both payments: the queue was never used.
    let mut paid = 0;
    let mut took_chair = false;
    while paid < 2 {
        match next_event(&mut events).await {
            ShopEvent::CustomerPaid { .. } => paid += 1,
            ShopEvent::CustomerTookChair { .. } => took_chair = true,
            _ => {}
        }
    }
    assert!(!took_chair, "no customer should have waited");

    let stats = shop.stats().await.expect("stats");
    assert_eq!(stats.served, 2);
    assert_eq!(stats.dropped, 0);

    shop.close().await.expect("close shop");
}

// Scenario 4: one barber, two chairs, three arrivals while the chair is
// busy. Two queue, the third drops, and freed slots are refilled from the
// queue head without any further arrivals.
#[tokio::test]
async fn freed_barber_promotes_the_queue_head() {
    let shop = Barbershop::open(ShopConfig::new(1, 2), Duration::from_millis(500))
        .await
        .expect("open shop");
    let mut events = shop.subscribe();

    let c0 = spawn_visit(&shop, CustomerId(0));
    wait_for(&mut events, |e| matches!(e, ShopEvent::CutStarted { .. })).await;

    let c1 = spawn_visit(&shop, CustomerId(1));
    wait_for(&mut events, |e| {
        matches!(e, ShopEvent::CustomerTookChair { customer, .. } if *customer == CustomerId(1))
    })
    .await;
    let c2 = spawn_visit(&shop, CustomerId(2));
    wait_for(&mut events, |e| {
        matches!(e, ShopEvent::CustomerTookChair { customer, .. } if *customer == CustomerId(2))
    })
    .await;

    let outcome = timeout(RUN_WAIT, shop.visit(CustomerId(3)))
        .await
        .expect("check-in stalled")
        .expect("visit failed");
    assert_eq!(outcome, VisitOutcome::TurnedAway);

    for handle in [c0, c1, c2] {
        let outcome = timeout(RUN_WAIT, handle)
            .await
            .expect("visit stalled")
            .expect("join")
            .expect("visit failed");
        assert!(outcome.is_served());
    }

    // Cuts started strictly in arrival order.
    let mut started = vec![CustomerId(0)];
    loop {
        match next_event(&mut events).await {
            ShopEvent::CutStarted { customer, .. } => started.push(customer),
            _ => {}
        }
        if started.len() == 3 {
            break;
        }
    }
    assert_eq!(started, vec![CustomerId(0), CustomerId(1), CustomerId(2)]);

    let stats = shop.stats().await.expect("stats");
    assert_eq!(stats.served, 3);
    assert_eq!(stats.dropped, 1);

    shop.close().await.expect("close shop");
}

// FIFO property: customers who queued earlier are assigned earlier.
#[tokio::test]
async fn waiting_customers_are_served_in_arrival_order() {
    let shop = Barbershop::open(ShopConfig::new(1, 4), Duration::from_millis(300))
        .await
        .expect("open shop");
    let mut events = shop.subscribe();

    let first = spawn_visit(&shop, CustomerId(10));
    wait_for(&mut events, |e| matches!(e, ShopEvent::CutStarted { .. })).await;

    let mut handles = vec![first];
    for id in 11..15 {
        handles.push(spawn_visit(&shop, CustomerId(id)));
        wait_for(&mut events, |e| {
            matches!(e, ShopEvent::CustomerTookChair { customer, .. } if *customer == CustomerId(id))
        })
        .await;
    }

    for handle in handles {
        let outcome = timeout(RUN_WAIT, handle)
            .await
            .expect("visit stalled")
            .expect("join")
            .expect("visit failed");
        assert!(outcome.is_served());
    }

    let mut started = vec![CustomerId(10)];
    while started.len() < 5 {
        if let ShopEvent::CutStarted { customer, .. } = next_event(&mut events).await {
            started.push(customer);
        }
    }
    let expected: Vec<_> = (10..15).map(CustomerId).collect();
    assert_eq!(started, expected, "queue assignment must be FIFO");

    shop.close().await.expect("close shop");
}

// Conservation and liveness under load: every submitted customer reaches a
// terminal outcome, the queue never exceeds its capacity, and nobody is
// seated twice.
#[tokio::test]
async fn every_customer_reaches_a_terminal_outcome() {
    const TOTAL: u32 = 40;
    const CHAIRS: usize = 2;

    let shop = Barbershop::open(ShopConfig::new(3, CHAIRS), Duration::from_millis(5))
        .await
        .expect("open shop");
    let mut events = shop.subscribe();

    let mut handles = Vec::new();
    for id in 0..TOTAL {
        handles.push(spawn_visit(&shop, CustomerId(id)));
        // A little spacing so arrivals overlap cuts rather than all landing
        // in one mailbox burst.
        if id % 5 == 0 {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }

    let mut served = 0u64;
    let mut turned_away = 0u64;
    for outcome in timeout(RUN_WAIT, join_all(handles))
        .await
        .expect("visits stalled")
    {
        match outcome.expect("join").expect("visit failed") {
            VisitOutcome::Served { .. } => served += 1,
            VisitOutcome::TurnedAway => turned_away += 1,
        }
    }
    assert_eq!(served + turned_away, TOTAL as u64);

    let stats = shop.stats().await.expect("stats");
    assert_eq!(stats.served, served);
    assert_eq!(stats.dropped, turned_away);
    assert_eq!(stats.waiting, 0);
    assert_eq!(stats.outcomes(), TOTAL as u64);

    // Replay the event stream for the structural invariants.
    let mut cut_starts = std::collections::HashMap::new();
    let mut chair_waits = std::collections::HashMap::new();
    while let Ok(event) = events.try_recv() {
        match event {
            ShopEvent::CutStarted { customer, .. } => {
                *cut_starts.entry(customer).or_insert(0u32) += 1;
            }
            ShopEvent::CustomerTookChair {
                customer,
                chairs_left,
                ..
            } => {
                *chair_waits.entry(customer).or_insert(0u32) += 1;
                assert!(chairs_left < CHAIRS, "waiting area exceeded its capacity");
            }
            _ => {}
        }
    }
    assert_eq!(cut_starts.len() as u64, served);
    assert!(cut_starts.values().all(|&n| n == 1), "a customer was seated twice");
    assert!(chair_waits.values().all(|&n| n == 1), "a customer queued twice");

    shop.close().await.expect("close shop");
}

// Closing the shop wakes barbers parked on an empty waiting area.
#[tokio::test]
async fn close_wakes_sleeping_barbers() {
    let shop = Barbershop::open(ShopConfig::new(2, 3), Duration::from_millis(10))
        .await
        .expect("open shop");

    // Barbers may already have parked during open, before any subscriber
    // existed, so give them time to settle instead of watching for events.
    tokio::time::sleep(Duration::from_millis(100)).await;

    timeout(RUN_WAIT, shop.close())
        .await
        .expect("close stalled with sleeping barbers")
        .expect("close failed");
}

// Signaling completion for an empty chair violates the protocol and must
// fail the shop actor rather than be ignored.
#[tokio::test]
async fn completion_for_an_empty_chair_is_fatal() {
    let state = ShopActorState::new(ShopConfig::new(1, 1));
    let (shop, handle) = Actor::spawn(None, ShopActor, state)
        .await
        .expect("spawn shop actor");

    let result = ractor::rpc::call(
        &shop,
        |reply| ShopMessage::FinishCut {
            barber: BarberId(0),
            reply,
        },
        Some(EVENT_WAIT),
    )
    .await;
    assert!(
        !matches!(result, Ok(ractor::rpc::CallResult::Success(()))),
        "protocol violation must not be acknowledged"
    );

    // The actor is gone; it must not keep serving requests.
    let _ = timeout(EVENT_WAIT, handle).await.expect("actor did not stop");
    let stats = ractor::rpc::call(
        &shop,
        |reply| ShopMessage::GetStats { reply },
        Some(EVENT_WAIT),
    )
    .await;
    assert!(!matches!(stats, Ok(ractor::rpc::CallResult::Success(_))));
}
