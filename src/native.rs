//! The native connection capability.
//!
//! The pooled wrapper owns exactly one live driver connection, treated as an
//! opaque capability behind this trait. The driver layer (socket handling,
//! wire protocol, SQL execution) is entirely outside this crate; only the
//! connection-level operations the wrapper delegates are modeled here.
//!
//! # Native Async Traits
//!
//! `#[async_trait]` is used (rather than native async traits) because the
//! wrapper stores the connection as `Box<dyn NativeConnection>` and needs
//! object safety.

pub use crate::error::NativeError;
use crate::metadata::{ConnectionWarning, DatabaseMetadata, TypeMap};
use crate::transaction::IsolationLevel;

/// An open driver connection, as seen by the pooling layer.
///
/// Implementations may fail or close themselves independently at any point
/// (network drop, server-side timeout); every operation is therefore
/// fallible. The wrapper never retries — failures propagate to the caller
/// holding the checked-out handle.
#[async_trait::async_trait]
pub trait NativeConnection: Send + Sync {
    /// Stable identity of the underlying physical connection.
    ///
    /// Two capability objects observing the same physical connection must
    /// report the same id; handle equality and hashing delegate to it.
    fn conn_id(&self) -> u64;

    /// Commit the current transaction.
    async fn commit(&mut self) -> Result<(), NativeError>;

    /// Roll back the current transaction.
    async fn rollback(&mut self) -> Result<(), NativeError>;

    /// Whether the connection is in auto-commit mode.
    async fn auto_commit(&mut self) -> Result<bool, NativeError>;

    /// Switch auto-commit mode on or off.
    async fn set_auto_commit(&mut self, enabled: bool) -> Result<(), NativeError>;

    /// Whether the connection is in read-only mode.
    async fn read_only(&mut self) -> Result<bool, NativeError>;

    /// Switch read-only mode on or off.
    async fn set_read_only(&mut self, read_only: bool) -> Result<(), NativeError>;

    /// The connection's current catalog, if one is selected.
    async fn catalog(&mut self) -> Result<Option<String>, NativeError>;

    /// Select a catalog.
    async fn set_catalog(&mut self, catalog: &str) -> Result<(), NativeError>;

    /// The connection's current transaction isolation level.
    async fn isolation_level(&mut self) -> Result<IsolationLevel, NativeError>;

    /// Change the transaction isolation level.
    async fn set_isolation_level(&mut self, level: IsolationLevel) -> Result<(), NativeError>;

    /// The connection's custom type map.
    async fn type_map(&mut self) -> Result<TypeMap, NativeError>;

    /// Install a custom type map.
    async fn set_type_map(&mut self, map: TypeMap) -> Result<(), NativeError>;

    /// Warnings accumulated on the connection since the last clear.
    async fn warnings(&mut self) -> Result<Vec<ConnectionWarning>, NativeError>;

    /// Discard accumulated warnings.
    async fn clear_warnings(&mut self) -> Result<(), NativeError>;

    /// Connection-level metadata facts.
    async fn metadata(&mut self) -> Result<DatabaseMetadata, NativeError>;

    /// Translate a query string into the driver's native SQL dialect.
    async fn native_sql(&mut self, sql: &str) -> Result<String, NativeError>;

    /// Close the connection, releasing driver resources.
    ///
    /// Called by [`destroy`] only; implementations should tolerate repeated
    /// close attempts.
    ///
    /// [`destroy`]: crate::lifecycle::PoolableObject::destroy
    async fn close(&mut self) -> Result<(), NativeError>;

    /// Whether the driver considers the connection closed.
    ///
    /// This may itself require driver I/O and can fail; the wrapper treats
    /// a failed probe as inconclusive.
    async fn is_closed(&self) -> Result<bool, NativeError>;
}
