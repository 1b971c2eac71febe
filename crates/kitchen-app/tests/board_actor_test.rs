use chrono::{Duration, Utc};
use kitchen_app::api::InMemoryApi;
use kitchen_app::board_actor::{self, BoardContext, BoardError};
use kitchen_app::clients::{BoardChange, BoardClient};
use kitchen_app::hub::HubEvent;
use kitchen_app::model::{Order, OrderId, OrderItem, OrderStatus, ProductId};
use kitchen_app::notify::{Notice, Notifier, SoundCue, ToastKind};
use replica_actor::ReplicaHandle;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

fn order(id: &str, status: OrderStatus, urgent: bool, age_secs: i64) -> Order {
    Order {
        id: OrderId::from(id),
        created_at: Utc::now() - Duration::seconds(age_secs),
        status,
        is_urgent: urgent,
        items: vec![
            OrderItem {
                product_id: ProductId::from("p-arroz"),
                product_name: "Arroz branco".into(),
                quantity: 1,
                prep_seconds: 300,
            },
            OrderItem {
                product_id: ProductId::from("p-farofa"),
                product_name: "Farofa".into(),
                quantity: 2,
                prep_seconds: 180,
            },
        ],
    }
}

fn start_board(api: Arc<InMemoryApi>, sound: SoundCue) -> (BoardClient, UnboundedReceiver<Notice>) {
    let (notifier, notices) = Notifier::channel();
    let (actor, replica) = board_actor::new();
    tokio::spawn(actor.run(BoardContext::new(api.clone(), notifier.clone(), sound)));
    (BoardClient::new(replica, api, notifier), notices)
}

fn ids(orders: &[Order]) -> Vec<&str> {
    orders.iter().map(|o| o.id.0.as_str()).collect()
}

/// Pattern 2: Actor + in-memory API
/// - Real board actor (retention and ordering)
/// - In-memory API seeded directly
#[tokio::test]
async fn test_mount_keeps_active_orders_in_board_order() {
    let api = Arc::new(InMemoryApi::demo());
    api.seed_order(order("done", OrderStatus::Completed, true, 10)).await;
    api.seed_order(order("cooking", OrderStatus::InProgress, false, 5)).await;
    api.seed_order(order("old-pending", OrderStatus::Pending, false, 120)).await;
    api.seed_order(order("new-pending", OrderStatus::Pending, false, 30)).await;
    api.seed_order(order("rush", OrderStatus::InProgress, true, 300)).await;
    api.seed_order(order("void", OrderStatus::Cancelled, false, 1)).await;

    let (board, _notices) = start_board(api, SoundCue::default());
    assert_eq!(board.mount().await.unwrap(), 5);

    let orders = board.orders().await.unwrap();
    assert_eq!(
        ids(&orders),
        vec!["rush", "new-pending", "old-pending", "cooking", "void"]
    );
    assert!(orders.iter().all(|o| o.status != OrderStatus::Completed));
}

#[tokio::test]
async fn test_mount_failure_empties_board_and_toasts() {
    let api = Arc::new(InMemoryApi::demo());
    let (board, mut notices) = start_board(api.clone(), SoundCue::default());

    board
        .apply(HubEvent::OrderCreated(order("o-1", OrderStatus::Pending, false, 0)))
        .await
        .unwrap();
    assert_eq!(board.active_count().await.unwrap(), 1);

    api.set_offline(true);
    assert!(matches!(board.mount().await, Err(BoardError::Api(_))));
    assert_eq!(board.active_count().await.unwrap(), 0);

    let failure = std::iter::from_fn(|| notices.try_recv().ok()).find_map(|n| match n {
        Notice::Toast(t) => Some(t),
        _ => None,
    });
    assert_eq!(failure.map(|t| t.kind), Some(ToastKind::Failure));
}

#[tokio::test]
async fn test_created_event_alerts_and_beeps_once_unlocked() {
    let api = Arc::new(InMemoryApi::demo());
    let sound = SoundCue::default();
    let (board, mut notices) = start_board(api, sound.clone());

    board
        .apply(HubEvent::OrderCreated(order("o-1", OrderStatus::Pending, false, 0)))
        .await
        .unwrap();
    assert_eq!(
        notices.try_recv().unwrap(),
        Notice::Alert("Arroz branco x1 • Farofa x2".into())
    );
    assert!(notices.try_recv().is_err(), "no beep before unlock");

    sound.unlock();
    board
        .apply(HubEvent::OrderCreated(order("o-2", OrderStatus::Pending, false, 0)))
        .await
        .unwrap();
    assert!(matches!(notices.try_recv().unwrap(), Notice::Alert(_)));
    assert_eq!(notices.try_recv().unwrap(), Notice::Beep(3));
}

#[tokio::test]
async fn test_created_event_deduplicates_and_drops_completed() {
    let api = Arc::new(InMemoryApi::demo());
    let (board, _notices) = start_board(api, SoundCue::default());

    for event in [
        HubEvent::OrderCreated(order("a", OrderStatus::Pending, false, 60)),
        HubEvent::OrderCreated(order("b", OrderStatus::Pending, false, 30)),
        HubEvent::OrderCreated(order("a", OrderStatus::InProgress, false, 60)),
        HubEvent::OrderCreated(order("c", OrderStatus::Completed, false, 0)),
    ] {
        assert_eq!(board.apply(event).await.unwrap(), BoardChange::Inserted);
    }

    let orders = board.orders().await.unwrap();
    assert_eq!(ids(&orders), vec!["b", "a"]);
    assert_eq!(orders[1].status, OrderStatus::InProgress);
}

#[tokio::test]
async fn test_updates_replace_remove_or_ignore() {
    let api = Arc::new(InMemoryApi::demo());
    let (board, _notices) = start_board(api, SoundCue::default());
    board
        .apply(HubEvent::OrderCreated(order("a", OrderStatus::Pending, false, 0)))
        .await
        .unwrap();

    let change = board
        .apply(HubEvent::OrderUpdated(order("a", OrderStatus::InProgress, false, 0)))
        .await
        .unwrap();
    assert_eq!(change, BoardChange::Replaced);
    let a = board.get(OrderId::from("a")).await.unwrap().unwrap();
    assert_eq!(a.status, OrderStatus::InProgress);

    // A Completed update for an order the board never fetched changes nothing
    let change = board
        .apply(HubEvent::OrderUpdated(order("ghost", OrderStatus::Completed, false, 0)))
        .await
        .unwrap();
    assert_eq!(change, BoardChange::Ignored);
    let change = board
        .apply(HubEvent::OrderUpdated(order("stranger", OrderStatus::Pending, false, 0)))
        .await
        .unwrap();
    assert_eq!(change, BoardChange::Ignored);
    assert_eq!(board.active_count().await.unwrap(), 1);

    let change = board
        .apply(HubEvent::OrderUpdated(order("a", OrderStatus::Completed, false, 0)))
        .await
        .unwrap();
    assert_eq!(change, BoardChange::Removed);
    assert!(board.orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_numeric_status_payload_is_decoded() {
    let api = Arc::new(InMemoryApi::demo());
    let (board, _notices) = start_board(api, SoundCue::default());
    board
        .apply(HubEvent::OrderCreated(order("a", OrderStatus::Pending, false, 0)))
        .await
        .unwrap();

    let payload = serde_json::json!({
        "id": "a",
        "createdAt": "2024-05-01T12:00:00",
        "status": 2,
        "isUrgent": false,
        "items": []
    });
    let change = board
        .apply_invocation("order:updated", &[payload])
        .await
        .unwrap();
    assert_eq!(change, BoardChange::Removed);
}

#[tokio::test]
async fn test_complete_calls_api_and_removes_order() {
    let api = Arc::new(InMemoryApi::demo());
    api.seed_order(order("0123456789", OrderStatus::Pending, false, 0)).await;
    let (board, mut notices) = start_board(api.clone(), SoundCue::default());
    board.mount().await.unwrap();

    board.complete(OrderId::from("0123456789")).await.unwrap();
    assert!(board.orders().await.unwrap().is_empty());

    let stored = kitchen_app::api::OrdersApi::list_orders(api.as_ref())
        .await
        .unwrap();
    assert_eq!(stored[0].status, OrderStatus::Completed);

    match notices.try_recv().unwrap() {
        Notice::Toast(toast) => {
            assert_eq!(toast.kind, ToastKind::Success);
            assert_eq!(toast.description.as_deref(), Some("#01234567"));
        }
        other => panic!("Expected toast, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_complete_keeps_order() {
    let api = Arc::new(InMemoryApi::demo());
    api.seed_order(order("a", OrderStatus::Pending, false, 0)).await;
    let (board, mut notices) = start_board(api.clone(), SoundCue::default());
    board.mount().await.unwrap();

    api.set_offline(true);
    let err = board.complete(OrderId::from("a")).await.unwrap_err();
    assert!(matches!(err, BoardError::Api(_)));
    assert_eq!(ids(&board.orders().await.unwrap()), vec!["a"]);
    assert!(matches!(
        notices.try_recv().unwrap(),
        Notice::Toast(t) if t.kind == ToastKind::Failure
    ));

    let err = board.complete(OrderId::from("missing")).await.unwrap_err();
    assert_eq!(err, BoardError::NotFound("missing".into()));
}
