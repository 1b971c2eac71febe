//! # ReplicaHandle Trait
//!
//! Provides a common interface for domain-specific replica clients, adding default
//! `get`, `snapshot` and `remove` methods built on top of a generic `ReplicaClient`.
use crate::{FrameworkError, ReplicaClient, ReplicaEntity};
use async_trait::async_trait;

/// Trait for domain clients to inherit the standard replica reads.
///
/// # Example
///
/// ```rust
/// use replica_actor::{FrameworkError, ReplicaClient, ReplicaEntity, ReplicaHandle};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)]
/// struct Table { id: u32 }
/// #[derive(Debug)] struct TableError(String);
///
/// impl std::fmt::Display for TableError {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         write!(f, "{}", self.0)
///     }
/// }
/// impl std::error::Error for TableError {}
///
/// impl From<String> for TableError {
///     fn from(s: String) -> Self { TableError(s) }
/// }
///
/// #[async_trait]
/// impl ReplicaEntity for Table {
///     type Id = u32;
///     type Update = ();
///     type Action = ();
///     type ActionResult = ();
///     type Context = ();
///     type Error = TableError;
///
///     fn id(&self) -> &u32 { &self.id }
///     async fn on_update(&mut self, _: (), _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, _: (), _: &()) -> Result<(), Self::Error> { Ok(()) }
/// }
///
/// struct FloorClient {
///     inner: ReplicaClient<Table>,
/// }
///
/// #[async_trait]
/// impl ReplicaHandle<Table> for FloorClient {
///     type Error = TableError;
///
///     fn inner(&self) -> &ReplicaClient<Table> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         TableError(e.to_string())
///     }
/// }
///
/// async fn usage(client: FloorClient) {
///     // get(), snapshot() and remove() are provided automatically
///     let _ = client.get(1).await;
///     let _ = client.snapshot().await;
///     let _ = client.remove(1).await;
/// }
/// ```
#[async_trait]
pub trait ReplicaHandle<T: ReplicaEntity>: Send + Sync {
    /// The domain-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic ReplicaClient.
    fn inner(&self) -> &ReplicaClient<T>;

    /// Map framework errors to the domain error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch the local copy of an entity.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// All retained entities in view order.
    #[tracing::instrument(skip(self))]
    async fn snapshot(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().snapshot().await.map_err(Self::map_error)
    }

    /// Drop an entity locally.
    #[tracing::instrument(skip(self))]
    async fn remove(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().remove(id).await.map_err(Self::map_error)
    }
}
