//! The pooled connection handle.
//!
//! [`PooledConnection`] wraps one live native connection and presents the
//! poolable-resource contract to an external pool manager: lifecycle
//! transitions, a uniform error boundary around every delegated operation,
//! and the usage timestamps the pool reads when deciding which connections
//! to reuse or retire.

use std::fmt;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::time::Instant;

use crate::error::{ConnectionError, NativeError, Result};
use crate::lifecycle::{HandleState, PoolableObject};
use crate::metadata::{ConnectionWarning, DatabaseMetadata, TypeMap};
use crate::native::NativeConnection;
use crate::transaction::IsolationLevel;

/// A database connection wrapped for pool membership.
///
/// The handle is passive: it never initiates pool decisions, retries, or
/// reconnects. It tracks its own view of liveness (which can diverge from
/// the native handle's — the native side may fail or close itself at any
/// time), refuses delegated operations once closed, and translates every
/// native failure into [`ConnectionError::Native`].
///
/// The handle performs no internal locking; exclusive access is the
/// caller's responsibility, expressed through the `&mut self` receivers.
pub struct PooledConnection {
    native: Option<Box<dyn NativeConnection>>,
    session_id: Option<String>,
    descriptor: Option<String>,
    profiling_enabled: bool,
    closed: bool,
    state: HandleState,
    created_at: Instant,
    last_used_at: Option<Instant>,
}

impl PooledConnection {
    /// Wrap an already-open native connection.
    ///
    /// The handle starts idle, with profiling disabled.
    pub fn new(native: Box<dyn NativeConnection>) -> Self {
        Self::build(Some(native), false)
    }

    /// Wrap an already-open native connection with an explicit profiling
    /// flag for the pool's instrumentation.
    pub fn with_profiling(native: Box<dyn NativeConnection>, profiling_enabled: bool) -> Self {
        Self::build(Some(native), profiling_enabled)
    }

    /// Create a handle with no backing native connection.
    ///
    /// Every delegated operation on a detached handle fails with
    /// [`ConnectionError::Closed`], the liveness probe reports closed, and
    /// the handle is equal to nothing (see the `PartialEq` impl).
    #[must_use]
    pub fn detached() -> Self {
        Self::build(None, false)
    }

    fn build(native: Option<Box<dyn NativeConnection>>, profiling_enabled: bool) -> Self {
        Self {
            native,
            session_id: None,
            descriptor: None,
            profiling_enabled,
            closed: false,
            state: HandleState::Idle,
            created_at: Instant::now(),
            last_used_at: None,
        }
    }

    // -------------------------------------------------------------------
    // Identification and bookkeeping accessors
    // -------------------------------------------------------------------

    /// Session identifier issued by the backing service, if one was set.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Record the session identifier for this connection.
    ///
    /// Set once by the issuing collaborator after creation; the value is
    /// not expected to change for the lifetime of the handle.
    pub fn set_session_id(&mut self, session_id: impl Into<String>) {
        self.session_id = Some(session_id.into());
    }

    /// Provenance descriptor (e.g. driver URL plus credentials label).
    #[must_use]
    pub fn descriptor(&self) -> Option<&str> {
        self.descriptor.as_deref()
    }

    /// Record the provenance descriptor, used only for identification and
    /// diagnostic display.
    pub fn set_descriptor(&mut self, descriptor: impl Into<String>) {
        self.descriptor = Some(descriptor.into());
    }

    /// Whether the pool should record timing instrumentation around calls
    /// on this handle. The handle itself does not profile.
    #[must_use]
    pub fn profiling_enabled(&self) -> bool {
        self.profiling_enabled
    }

    /// When the handle was constructed. Never changes.
    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// When the handle was last stamped as in use.
    ///
    /// `None` means "not currently checked out"; the pool compares this
    /// against its idle timeout when deciding what to evict.
    #[must_use]
    pub fn last_used_at(&self) -> Option<Instant> {
        self.last_used_at
    }

    /// Re-stamp the last-used time to now.
    pub fn touch(&mut self) {
        self.last_used_at = Some(Instant::now());
    }

    /// Current logical state of the handle.
    #[must_use]
    pub fn state(&self) -> HandleState {
        self.state
    }

    // -------------------------------------------------------------------
    // Guarded delegation
    // -------------------------------------------------------------------

    /// Run one native operation behind the closed-flag precondition.
    ///
    /// If the wrapper is closed the native handle is never touched; any
    /// failure the native handle raises comes back uniformly as
    /// [`ConnectionError::Native`] with the original failure as its cause.
    /// A native failure does not change the wrapper's own state — the
    /// pool, not this layer, decides whether a failing connection gets
    /// destroyed.
    async fn guarded<'a, T, Fut>(
        &'a mut self,
        op: impl FnOnce(&'a mut dyn NativeConnection) -> Fut,
    ) -> Result<T>
    where
        Fut: Future<Output = std::result::Result<T, NativeError>> + 'a,
    {
        if self.closed {
            return Err(ConnectionError::Closed);
        }
        let native = self.native.as_deref_mut().ok_or(ConnectionError::Closed)?;
        op(native).await.map_err(ConnectionError::Native)
    }

    /// Commit the current transaction.
    pub async fn commit(&mut self) -> Result<()> {
        self.guarded(|c| c.commit()).await
    }

    /// Roll back the current transaction.
    pub async fn rollback(&mut self) -> Result<()> {
        self.guarded(|c| c.rollback()).await
    }

    /// Whether the connection is in auto-commit mode.
    pub async fn auto_commit(&mut self) -> Result<bool> {
        self.guarded(|c| c.auto_commit()).await
    }

    /// Switch auto-commit mode on or off.
    pub async fn set_auto_commit(&mut self, enabled: bool) -> Result<()> {
        self.guarded(move |c| c.set_auto_commit(enabled)).await
    }

    /// Whether the connection is in read-only mode.
    pub async fn read_only(&mut self) -> Result<bool> {
        self.guarded(|c| c.read_only()).await
    }

    /// Switch read-only mode on or off.
    pub async fn set_read_only(&mut self, read_only: bool) -> Result<()> {
        self.guarded(move |c| c.set_read_only(read_only)).await
    }

    /// The currently selected catalog, if any.
    pub async fn catalog(&mut self) -> Result<Option<String>> {
        self.guarded(|c| c.catalog()).await
    }

    /// Select a catalog.
    pub async fn set_catalog(&mut self, catalog: &str) -> Result<()> {
        self.guarded(move |c| c.set_catalog(catalog)).await
    }

    /// The current transaction isolation level.
    pub async fn isolation_level(&mut self) -> Result<IsolationLevel> {
        self.guarded(|c| c.isolation_level()).await
    }

    /// Change the transaction isolation level.
    pub async fn set_isolation_level(&mut self, level: IsolationLevel) -> Result<()> {
        self.guarded(move |c| c.set_isolation_level(level)).await
    }

    /// The connection's custom type map.
    pub async fn type_map(&mut self) -> Result<TypeMap> {
        self.guarded(|c| c.type_map()).await
    }

    /// Install a custom type map.
    pub async fn set_type_map(&mut self, map: TypeMap) -> Result<()> {
        self.guarded(move |c| c.set_type_map(map)).await
    }

    /// Warnings accumulated on the connection since the last clear.
    pub async fn warnings(&mut self) -> Result<Vec<ConnectionWarning>> {
        self.guarded(|c| c.warnings()).await
    }

    /// Discard accumulated warnings.
    pub async fn clear_warnings(&mut self) -> Result<()> {
        self.guarded(|c| c.clear_warnings()).await
    }

    /// Connection-level metadata facts.
    pub async fn metadata(&mut self) -> Result<DatabaseMetadata> {
        self.guarded(|c| c.metadata()).await
    }

    /// Translate a query string into the driver's native SQL dialect.
    pub async fn native_sql(&mut self, sql: &str) -> Result<String> {
        self.guarded(move |c| c.native_sql(sql)).await
    }
}

#[async_trait::async_trait]
impl PoolableObject for PooledConnection {
    /// Mark the handle checked out: clear the closed flag (a prior external
    /// force-close may have been speculative) and stamp the last-used time.
    ///
    /// A destroyed handle stays destroyed; activation is refused.
    fn activate(&mut self) {
        if self.state.is_destroyed() {
            tracing::trace!(descriptor = ?self.descriptor, "ignoring activate on destroyed handle");
            return;
        }
        self.closed = false;
        self.last_used_at = Some(Instant::now());
        self.state = HandleState::Active;
        tracing::trace!(descriptor = ?self.descriptor, "connection activated");
    }

    /// Return the handle to the pool's custody: clear the last-used stamp
    /// and the closed flag. Never closes the native connection — eviction
    /// goes through [`destroy`](PoolableObject::destroy) instead.
    fn passivate(&mut self) {
        if self.state.is_destroyed() {
            return;
        }
        self.last_used_at = None;
        self.closed = false;
        self.state = HandleState::Idle;
        tracing::trace!(descriptor = ?self.descriptor, "connection passivated");
    }

    /// Permanently remove the handle: normalize bookkeeping via passivate,
    /// mark the wrapper closed, then close the native connection.
    ///
    /// A native close failure is surfaced as [`ConnectionError::Native`],
    /// but the handle ends up closed and destroyed either way, so repeated
    /// destroy calls never fail on account of the handle already being
    /// gone (the native close may be re-attempted).
    async fn destroy(&mut self) -> Result<()> {
        self.passivate();
        self.closed = true;
        self.state = HandleState::Destroyed;

        let result = match self.native.as_deref_mut() {
            Some(native) => native.close().await.map_err(ConnectionError::Native),
            None => Ok(()),
        };
        match &result {
            Ok(()) => tracing::debug!(descriptor = ?self.descriptor, "connection destroyed"),
            Err(error) => tracing::debug!(
                descriptor = ?self.descriptor,
                error = %error,
                "native close failed during destroy"
            ),
        }
        result
    }

    /// Best-effort liveness probe: closed if the wrapper says so or the
    /// native handle reports itself closed.
    ///
    /// Known weak guarantee: if the native handle cannot answer, the probe
    /// assumes the connection is still open rather than propagating the
    /// failure — probing must never itself be a source of errors.
    async fn is_closed(&self) -> bool {
        if self.closed {
            return true;
        }
        match &self.native {
            Some(native) => match native.is_closed().await {
                Ok(closed) => closed,
                Err(error) => {
                    tracing::trace!(error = %error, "liveness probe failed; assuming open");
                    false
                }
            },
            None => true,
        }
    }
}

/// Equality is the underlying physical connection's identity.
///
/// Two handles are equal iff both wrap a native connection and those
/// connections report the same [`conn_id`]. A handle with no native
/// connection is equal to nothing — deliberately including itself and
/// other detached handles — so a dead wrapper can never alias a live one
/// in pool data structures.
///
/// [`conn_id`]: NativeConnection::conn_id
impl PartialEq for PooledConnection {
    fn eq(&self, other: &Self) -> bool {
        match (&self.native, &other.native) {
            (Some(a), Some(b)) => a.conn_id() == b.conn_id(),
            _ => false,
        }
    }
}

// Detached handles break reflexivity (see PartialEq); equal handles always
// share a conn_id, so equal keys still hash identically.
impl Eq for PooledConnection {}

impl Hash for PooledConnection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Detached handles hash to a fixed sentinel.
        let id = self.native.as_ref().map_or(0, |native| native.conn_id());
        id.hash(state);
    }
}

impl fmt::Display for PooledConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor.as_deref().unwrap_or("<unidentified connection>"))
    }
}

impl fmt::Debug for PooledConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledConnection")
            .field("conn_id", &self.native.as_ref().map(|n| n.conn_id()))
            .field("session_id", &self.session_id)
            .field("descriptor", &self.descriptor)
            .field("state", &self.state)
            .field("closed", &self.closed)
            .field("last_used_at", &self.last_used_at)
            .finish_non_exhaustive()
    }
}
