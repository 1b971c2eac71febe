//! # Mock Framework & Testing Guide
//!
//! `MockClient<T>` hands out a real `ReplicaClient<T>` whose requests are answered
//! from a queue of expectations instead of by a `ReplicaActor`. Domain clients
//! (the board client, the card client) can be tested against scripted replies
//! without running any actor.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **State** | None (scripted replies) | Real replica |
//! | **Identity checks** | Asserts the requested id | n/a |
//! | **Use Case** | Logic *around* the client | The entity hooks or the full system |
//! | **Error Injection** | Easy (`return_err`) | Needs a failing context |
//!
//! ## Testing Strategies
//!
//! <details>
//! <summary><b>Pattern 0: Client Logic Test (Pure Mock)</b></summary>
//!
//! ```rust
//! use replica_actor::mock::MockClient;
//! use replica_actor::{ReplicaEntity, UpdateOutcome};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Ticket { id: u32, open: bool }
//! #[derive(Debug, thiserror::Error)] #[error("ticket error")] struct TicketError;
//!
//! #[async_trait]
//! impl ReplicaEntity for Ticket {
//!     type Id = u32; type Update = bool; type Action = (); type ActionResult = ();
//!     type Context = (); type Error = TicketError;
//!     fn id(&self) -> &u32 { &self.id }
//!     async fn on_update(&mut self, open: bool, _: &()) -> Result<(), TicketError> { self.open = open; Ok(()) }
//!     async fn handle_action(&mut self, _: (), _: &()) -> Result<(), TicketError> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Ticket>::new();
//!     mock.expect_update(7).return_ok(UpdateOutcome::Untracked);
//!
//!     let client = mock.client();
//!     let outcome = client.update(7, false).await.unwrap();
//!     assert_eq!(outcome, UpdateOutcome::Untracked);
//!     mock.verify();
//! }
//! ```
//! </details>
//!
//! <details>
//! <summary><b>Pattern 1: Single Actor Test</b></summary>
//!
//! Spawn a `ReplicaActor` with a context built from fakes and drive it through its
//! client. See `tests/integration_test.rs` in this crate.
//! </details>
//!
//! <details>
//! <summary><b>Pattern 2: Actor with Faked Dependencies</b></summary>
//!
//! ```text
//! The kitchen-app crate's tests/board_actor_test.rs runs the board actor against
//! an in-memory API and a captured notifier.
//! ```
//! </details>
//!
//! <details>
//! <summary><b>Pattern 3: Full System Integration Test</b></summary>
//!
//! The kitchen-app crate's tests/integration_test.rs wires every actor, the
//! in-memory API and a live event feed together.
//! </details>
//!
//! ## Mocking Utilities
//!
//! Use [`create_mock_client`] to get a client and a receiver, or use the fluent
//! [`MockClient`] API.

use crate::client::ReplicaClient;
use crate::entity::ReplicaEntity;
use crate::error::FrameworkError;
use crate::message::{ReplicaRequest, UpdateOutcome};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the reply scripted for it.
enum Expectation<T: ReplicaEntity> {
    Load(Result<usize, FrameworkError>),
    Insert(Result<(), FrameworkError>),
    Get(T::Id, Result<Option<T>, FrameworkError>),
    Update(T::Id, Result<UpdateOutcome<T>, FrameworkError>),
    Remove(T::Id, Result<Option<T>, FrameworkError>),
    Snapshot(Result<Vec<T>, FrameworkError>),
    Action(T::Id, Result<T::ActionResult, FrameworkError>),
}

impl<T: ReplicaEntity> Expectation<T> {
    fn name(&self) -> &'static str {
        match self {
            Expectation::Load(_) => "Load",
            Expectation::Insert(_) => "Insert",
            Expectation::Get(..) => "Get",
            Expectation::Update(..) => "Update",
            Expectation::Remove(..) => "Remove",
            Expectation::Snapshot(_) => "Snapshot",
            Expectation::Action(..) => "Action",
        }
    }
}

fn request_name<T: ReplicaEntity>(request: &ReplicaRequest<T>) -> &'static str {
    match request {
        ReplicaRequest::Load { .. } => "Load",
        ReplicaRequest::Insert { .. } => "Insert",
        ReplicaRequest::Get { .. } => "Get",
        ReplicaRequest::Update { .. } => "Update",
        ReplicaRequest::Remove { .. } => "Remove",
        ReplicaRequest::Snapshot { .. } => "Snapshot",
        ReplicaRequest::Action { .. } => "Action",
    }
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// Requests must arrive in the order the expectations were queued. A request that
/// does not match the next expectation (different kind or different id) panics the
/// background responder, which surfaces in the test as `FrameworkError::ActorDropped`.
pub struct MockClient<T: ReplicaEntity> {
    client: ReplicaClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ReplicaEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn answer<R>(
    respond_to: oneshot::Sender<Result<R, FrameworkError>>,
    response: Result<R, FrameworkError>,
) {
    let _ = respond_to.send(response);
}

impl<T: ReplicaEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ReplicaRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        // Spawn background task to handle requests
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue.lock().unwrap().pop_front();

                match (request, expectation) {
                    (ReplicaRequest::Load { respond_to, .. }, Some(Expectation::Load(r))) => {
                        answer(respond_to, r)
                    }
                    (ReplicaRequest::Insert { respond_to, .. }, Some(Expectation::Insert(r))) => {
                        answer(respond_to, r)
                    }
                    (ReplicaRequest::Get { id, respond_to }, Some(Expectation::Get(want, r))) => {
                        assert_eq!(id, want, "Get for unexpected id");
                        answer(respond_to, r)
                    }
                    (
                        ReplicaRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update(want, r)),
                    ) => {
                        assert_eq!(id, want, "Update for unexpected id");
                        answer(respond_to, r)
                    }
                    (
                        ReplicaRequest::Remove { id, respond_to },
                        Some(Expectation::Remove(want, r)),
                    ) => {
                        assert_eq!(id, want, "Remove for unexpected id");
                        answer(respond_to, r)
                    }
                    (ReplicaRequest::Snapshot { respond_to }, Some(Expectation::Snapshot(r))) => {
                        answer(respond_to, r)
                    }
                    (
                        ReplicaRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action(want, r)),
                    ) => {
                        assert_eq!(id, want, "Action for unexpected id");
                        answer(respond_to, r)
                    }
                    (request, expectation) => {
                        panic!(
                            "Unexpected {} request, expected {}",
                            request_name(&request),
                            expectation.as_ref().map_or("nothing", Expectation::name)
                        );
                    }
                }
            }
        });

        Self {
            client: ReplicaClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ReplicaClient<T> {
        self.client.clone()
    }

    fn builder<R>(
        &self,
        wrap: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            wrap: Box::new(wrap),
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `load` operation.
    pub fn expect_load(&mut self) -> ExpectationBuilder<T, usize> {
        self.builder(Expectation::Load)
    }

    /// Expects an `insert` operation.
    pub fn expect_insert(&mut self) -> ExpectationBuilder<T, ()> {
        self.builder(Expectation::Insert)
    }

    /// Expects a `get` operation for `id`.
    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |r| Expectation::Get(id, r))
    }

    /// Expects an `update` operation for `id`.
    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, UpdateOutcome<T>> {
        self.builder(move |r| Expectation::Update(id, r))
    }

    /// Expects a `remove` operation for `id`.
    pub fn expect_remove(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |r| Expectation::Remove(id, r))
    }

    /// Expects a `snapshot` operation.
    pub fn expect_snapshot(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(Expectation::Snapshot)
    }

    /// Expects an `action` operation for `id`.
    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(move |r| Expectation::Action(id, r))
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

/// Builder that queues the reply for one expected request.
pub struct ExpectationBuilder<T: ReplicaEntity, R> {
    wrap: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
    expectations: Queue<T>,
}

impl<T: ReplicaEntity, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        let expectation = (self.wrap)(Ok(value));
        self.expectations.lock().unwrap().push_back(expectation);
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        let expectation = (self.wrap)(Err(error));
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

// =============================================================================
// LEGACY HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// The test plays the actor: it pulls requests off `receiver`, asserts on them and
/// answers through the enclosed oneshot sender. This lets a test hold a reply back
/// to observe what the caller does in the meantime.
pub fn create_mock_client<T: ReplicaEntity>(
    buffer_size: usize,
) -> (ReplicaClient<T>, mpsc::Receiver<ReplicaRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ReplicaClient::new(sender), receiver)
}

/// Helper to verify that the next message is an Insert request
pub async fn expect_insert<T: ReplicaEntity>(
    receiver: &mut mpsc::Receiver<ReplicaRequest<T>>,
) -> Option<(T, oneshot::Sender<Result<(), FrameworkError>>)> {
    match receiver.recv().await {
        Some(ReplicaRequest::Insert { item, respond_to }) => Some((item, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
#[allow(clippy::type_complexity)]
pub async fn expect_update<T: ReplicaEntity>(
    receiver: &mut mpsc::Receiver<ReplicaRequest<T>>,
) -> Option<(
    T::Id,
    T::Update,
    oneshot::Sender<Result<UpdateOutcome<T>, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ReplicaRequest::Update {
            id,
            update,
            respond_to,
        }) => Some((id, update, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
#[allow(clippy::type_complexity)]
pub async fn expect_action<T: ReplicaEntity>(
    receiver: &mut mpsc::Receiver<ReplicaRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ReplicaRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Ticket {
        id: u32,
        open: bool,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("Ticket error")]
    struct TicketError;

    #[async_trait]
    impl ReplicaEntity for Ticket {
        type Id = u32;
        type Update = bool;
        type Action = ();
        type ActionResult = bool;
        type Context = ();
        type Error = TicketError;

        fn id(&self) -> &u32 {
            &self.id
        }

        async fn on_update(&mut self, open: bool, _ctx: &()) -> Result<(), Self::Error> {
            self.open = open;
            Ok(())
        }

        async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<bool, Self::Error> {
            Ok(self.open)
        }
    }

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Ticket>(10);

        let insert_task = tokio::spawn(async move {
            client.insert(Ticket { id: 3, open: true }).await
        });

        let (item, responder) = expect_insert(&mut receiver)
            .await
            .expect("Expected Insert request");
        assert_eq!(item.id, 3);
        responder.send(Ok(())).unwrap();

        assert!(insert_task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Ticket>::new();

        mock.expect_load().return_ok(2);
        mock.expect_get(1)
            .return_ok(Some(Ticket { id: 1, open: true }));
        mock.expect_action(1).return_err(FrameworkError::NotFound("1".into()));

        let client = mock.client();

        assert_eq!(client.load(Vec::new()).await.unwrap(), 2);
        let fetched = client.get(1).await.unwrap();
        assert_eq!(fetched, Some(Ticket { id: 1, open: true }));
        let failed = client.perform_action(1, ()).await;
        assert!(matches!(failed, Err(FrameworkError::NotFound(id)) if id == "1"));

        mock.verify();
    }

    #[tokio::test]
    async fn test_mock_rejects_wrong_id() {
        let mut mock = MockClient::<Ticket>::new();
        mock.expect_remove(1).return_ok(None);

        let result = mock.client().remove(2).await;
        assert!(matches!(result, Err(FrameworkError::ActorDropped)));
    }
}
