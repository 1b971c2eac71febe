use kitchen_app::api::{CatalogApi, InMemoryApi, OrdersApi, ProductQuery};
use kitchen_app::card_actor::{self, CardContext, CardError, ProductCard};
use kitchen_app::clients::{CardClient, Gesture, UrgentButton};
use kitchen_app::hub::HubEvent;
use kitchen_app::model::{OrderStatus, ProductId};
use kitchen_app::notify::{Notice, Notifier, ToastKind};
use replica_actor::ReplicaHandle;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

fn everything() -> ProductQuery {
    ProductQuery {
        only_available: Some(false),
        ..ProductQuery::default()
    }
}

async fn start_cards(api: Arc<InMemoryApi>) -> (CardClient, UnboundedReceiver<Notice>) {
    let (notifier, notices) = Notifier::channel();
    let (actor, replica) = card_actor::new();
    tokio::spawn(actor.run(CardContext::new(api.clone())));
    let cards = CardClient::new(replica, api, notifier);
    cards.load(&everything()).await.unwrap();
    (cards, notices)
}

async fn card(cards: &CardClient, id: &ProductId) -> ProductCard {
    cards.get(id.clone()).await.unwrap().expect("card")
}

/// Pattern 2: Actor + in-memory API
/// - Real card actor (submission rules)
/// - In-memory API standing in for the order endpoints
#[tokio::test]
async fn test_one_normal_order_at_a_time() {
    let api = Arc::new(InMemoryApi::demo());
    let (cards, mut notices) = start_cards(api.clone()).await;
    let arroz = ProductId::from("p-arroz");

    let first = cards.send_normal(&arroz).await.unwrap();
    assert!(!first.is_urgent);
    assert_eq!(first.items[0].quantity, 1);
    assert!(!card(&cards, &arroz).await.can_send_normal());

    let err = cards.send_normal(&arroz).await.unwrap_err();
    assert!(matches!(err, CardError::NormalOutstanding(_)));

    // Urgent submissions are never blocked
    cards.send_urgent(&arroz).await.unwrap();
    cards.send_urgent(&arroz).await.unwrap();
    assert_eq!(api.list_orders().await.unwrap().len(), 3);

    let toasts: Vec<_> = std::iter::from_fn(|| notices.try_recv().ok())
        .filter_map(|n| match n {
            Notice::Toast(t) => Some(t),
            _ => None,
        })
        .collect();
    assert_eq!(toasts.len(), 4);
    assert_eq!(toasts[0].title, "Order sent");
    assert_eq!(toasts[0].description.as_deref(), Some("Arroz branco x1"));
    assert_eq!(toasts[1].kind, ToastKind::Failure);
    assert_eq!(toasts[2].title, "Urgent order sent");
}

#[tokio::test]
async fn test_complete_prefers_urgent_then_releases_normal() {
    let api = Arc::new(InMemoryApi::demo());
    let (cards, _notices) = start_cards(api.clone()).await;
    let farofa = ProductId::from("p-farofa");

    let normal = cards.send_normal(&farofa).await.unwrap();
    let urgent = cards.send_urgent(&farofa).await.unwrap();

    let done = cards.complete_one(&farofa).await.unwrap().unwrap();
    assert_eq!(done.id, urgent.id);
    assert!(card(&cards, &farofa).await.normal.is_some());

    let done = cards.complete_one(&farofa).await.unwrap().unwrap();
    assert_eq!(done.id, normal.id);
    assert!(!card(&cards, &farofa).await.has_outstanding());
    assert_eq!(cards.complete_one(&farofa).await.unwrap(), None);

    let stored = api.list_orders().await.unwrap();
    assert!(stored.iter().all(|o| o.status == OrderStatus::Completed));

    cards.send_normal(&farofa).await.unwrap();
}

#[tokio::test]
async fn test_hub_update_releases_normal_slot() {
    let api = Arc::new(InMemoryApi::demo());
    let (cards, _notices) = start_cards(api.clone()).await;
    let fritas = ProductId::from("p-fritas");

    let mut order = cards.send_normal(&fritas).await.unwrap();
    order.status = OrderStatus::InProgress;
    assert_eq!(cards.apply(&HubEvent::OrderUpdated(order.clone())).await.unwrap(), 1);
    let held = card(&cards, &fritas).await.normal.unwrap();
    assert_eq!(held.status, OrderStatus::InProgress);

    order.status = OrderStatus::Cancelled;
    cards.apply(&HubEvent::OrderUpdated(order)).await.unwrap();
    assert!(card(&cards, &fritas).await.can_send_normal());
}

#[tokio::test]
async fn test_unavailable_products_reject_both_kinds() {
    let api = Arc::new(InMemoryApi::demo());
    let salada = api.get_product(&ProductId::from("p-salada")).await.unwrap();
    api.update_product(&salada.id, &salada.toggled_availability())
        .await
        .unwrap();
    let (cards, _notices) = start_cards(api.clone()).await;

    assert!(matches!(
        cards.send_normal(&salada.id).await,
        Err(CardError::Unavailable(_))
    ));
    assert!(matches!(
        cards.send_urgent(&salada.id).await,
        Err(CardError::Unavailable(_))
    ));
    assert!(api.list_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_submission_leaves_card_untouched() {
    let api = Arc::new(InMemoryApi::demo());
    let (cards, mut notices) = start_cards(api.clone()).await;
    let arroz = ProductId::from("p-arroz");

    api.set_offline(true);
    assert!(matches!(cards.send_normal(&arroz).await, Err(CardError::Api(_))));
    assert!(card(&cards, &arroz).await.can_send_normal());
    assert!(matches!(
        notices.try_recv().unwrap(),
        Notice::Toast(t) if t.title == "Could not send order"
    ));
}

#[tokio::test]
async fn test_reload_keeps_outstanding_orders() {
    let api = Arc::new(InMemoryApi::demo());
    let (cards, _notices) = start_cards(api.clone()).await;
    let picanha = ProductId::from("p-picanha");
    let sent = cards.send_normal(&picanha).await.unwrap();

    let mut product = api.get_product(&picanha).await.unwrap();
    product.name = "Picanha fatiada".into();
    assert!(cards.refresh(product).await.unwrap());

    assert_eq!(cards.load(&everything()).await.unwrap(), 7);
    let reloaded = card(&cards, &picanha).await;
    assert_eq!(reloaded.normal.map(|o| o.id), Some(sent.id));
    assert_eq!(reloaded.product.name, "Picanha na chapa");
}

#[tokio::test(start_paused = true)]
async fn test_tap_submits_one_urgent_order() {
    let api = Arc::new(InMemoryApi::demo());
    let (cards, _notices) = start_cards(api.clone()).await;
    let mut button = UrgentButton::new(cards.clone(), ProductId::from("p-arroz"));

    button.press();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let gesture = button.release().await;
    assert!(matches!(gesture, Gesture::Tap(Ok(ref o)) if o.is_urgent));

    // The aborted hold never fires
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(api.list_orders().await.unwrap().len(), 1);
    assert_eq!(button.release().await, Gesture::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_hold_submits_once_and_release_does_not_repeat() {
    let api = Arc::new(InMemoryApi::demo());
    let (cards, _notices) = start_cards(api.clone()).await;
    let mut button = UrgentButton::new(cards.clone(), ProductId::from("p-arroz"));

    button.press();
    tokio::time::sleep(Duration::from_millis(700)).await;
    let gesture = button.release().await;
    assert!(matches!(gesture, Gesture::Held(Ok(_))));
    assert_eq!(api.list_orders().await.unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_leaving_cancels_the_hold() {
    let api = Arc::new(InMemoryApi::demo());
    let (cards, _notices) = start_cards(api.clone()).await;
    let mut button = UrgentButton::new(cards.clone(), ProductId::from("p-arroz"));

    button.press();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(button.leave());
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(button.release().await, Gesture::Idle);
    assert!(api.list_orders().await.unwrap().is_empty());

    // Dropping an armed button cancels its hold too
    button.press();
    drop(button);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(api.list_orders().await.unwrap().is_empty());
}
