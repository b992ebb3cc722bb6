//! Pooled connection lifecycle behavior tests.
//!
//! These tests drive a [`PooledConnection`] over a scripted in-memory
//! native connection, covering the checkout/return/eviction cycle, the
//! closed-flag guard, error translation, and identity semantics. No
//! database is required.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use pooled_conn::{
    ConnectionError, DatabaseMetadata, IsolationLevel, NativeConnection, NativeError,
    PoolableObject, PooledConnection, TypeMap,
};

/// Scripted native connection: answers with canned values, counts close
/// attempts, and can be told to fail specific operations.
struct ScriptedNative {
    id: u64,
    catalog: Option<String>,
    auto_commit: bool,
    close_attempts: Arc<AtomicU32>,
    native_closed: Arc<AtomicBool>,
    fail_rollback: bool,
    fail_close: bool,
    fail_probe: bool,
}

/// Observer half of a [`ScriptedNative`], retained by the test after the
/// handle takes ownership of the connection.
struct NativeObserver {
    close_attempts: Arc<AtomicU32>,
    native_closed: Arc<AtomicBool>,
}

impl NativeObserver {
    fn close_attempts(&self) -> u32 {
        self.close_attempts.load(Ordering::SeqCst)
    }

    /// Simulate the driver side closing on its own (network drop,
    /// server-side timeout).
    fn drop_from_server_side(&self) {
        self.native_closed.store(true, Ordering::SeqCst);
    }
}

impl ScriptedNative {
    fn new(id: u64) -> (Self, NativeObserver) {
        let close_attempts = Arc::new(AtomicU32::new(0));
        let native_closed = Arc::new(AtomicBool::new(false));
        let observer = NativeObserver {
            close_attempts: Arc::clone(&close_attempts),
            native_closed: Arc::clone(&native_closed),
        };
        (
            Self {
                id,
                catalog: None,
                auto_commit: true,
                close_attempts,
                native_closed,
                fail_rollback: false,
                fail_close: false,
                fail_probe: false,
            },
            observer,
        )
    }

    fn failing_rollback(mut self) -> Self {
        self.fail_rollback = true;
        self
    }

    fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    fn failing_probe(mut self) -> Self {
        self.fail_probe = true;
        self
    }
}

#[async_trait::async_trait]
impl NativeConnection for ScriptedNative {
    fn conn_id(&self) -> u64 {
        self.id
    }

    async fn commit(&mut self) -> Result<(), NativeError> {
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), NativeError> {
        if self.fail_rollback {
            return Err("rollback torn down by server".into());
        }
        Ok(())
    }

    async fn auto_commit(&mut self) -> Result<bool, NativeError> {
        Ok(self.auto_commit)
    }

    async fn set_auto_commit(&mut self, enabled: bool) -> Result<(), NativeError> {
        self.auto_commit = enabled;
        Ok(())
    }

    async fn read_only(&mut self) -> Result<bool, NativeError> {
        Ok(false)
    }

    async fn set_read_only(&mut self, _read_only: bool) -> Result<(), NativeError> {
        Ok(())
    }

    async fn catalog(&mut self) -> Result<Option<String>, NativeError> {
        Ok(self.catalog.clone())
    }

    async fn set_catalog(&mut self, catalog: &str) -> Result<(), NativeError> {
        self.catalog = Some(catalog.to_owned());
        Ok(())
    }

    async fn isolation_level(&mut self) -> Result<IsolationLevel, NativeError> {
        Ok(IsolationLevel::ReadCommitted)
    }

    async fn set_isolation_level(&mut self, _level: IsolationLevel) -> Result<(), NativeError> {
        Ok(())
    }

    async fn type_map(&mut self) -> Result<TypeMap, NativeError> {
        Ok(TypeMap::new())
    }

    async fn set_type_map(&mut self, _map: TypeMap) -> Result<(), NativeError> {
        Ok(())
    }

    async fn warnings(&mut self) -> Result<Vec<pooled_conn::ConnectionWarning>, NativeError> {
        Ok(Vec::new())
    }

    async fn clear_warnings(&mut self) -> Result<(), NativeError> {
        Ok(())
    }

    async fn metadata(&mut self) -> Result<DatabaseMetadata, NativeError> {
        Ok(DatabaseMetadata {
            product_name: "ScriptedDB".into(),
            product_version: "0.0".into(),
            driver_name: "scripted".into(),
            driver_version: "0.0".into(),
            url: "scripted://localhost".into(),
            user_name: "tester".into(),
        })
    }

    async fn native_sql(&mut self, sql: &str) -> Result<String, NativeError> {
        Ok(format!("native({sql})"))
    }

    async fn close(&mut self) -> Result<(), NativeError> {
        self.close_attempts.fetch_add(1, Ordering::SeqCst);
        self.native_closed.store(true, Ordering::SeqCst);
        if self.fail_close {
            return Err("close refused by driver".into());
        }
        Ok(())
    }

    async fn is_closed(&self) -> Result<bool, NativeError> {
        if self.fail_probe {
            return Err("probe lost".into());
        }
        Ok(self.native_closed.load(Ordering::SeqCst))
    }
}

fn handle(id: u64) -> (PooledConnection, NativeObserver) {
    let (native, observer) = ScriptedNative::new(id);
    (PooledConnection::new(Box::new(native)), observer)
}

fn assert_closed_err<T: std::fmt::Debug>(result: pooled_conn::Result<T>) {
    assert!(
        matches!(result, Err(ConnectionError::Closed)),
        "expected ConnectionError::Closed, got {result:?}"
    );
}

// =============================================================================
// Checkout / return cycle
// =============================================================================

#[tokio::test]
async fn test_activate_then_probe_reports_open() {
    let (mut conn, _observer) = handle(1);
    conn.activate();
    assert!(!conn.is_closed().await);
}

#[tokio::test]
async fn test_activate_passivate_timestamp_cycle() {
    let (mut conn, _observer) = handle(1);

    conn.activate();
    let stamped = conn.last_used_at().expect("active handle has a last-used stamp");
    assert!(stamped >= conn.created_at());

    conn.passivate();
    assert!(conn.last_used_at().is_none());
}

#[tokio::test]
async fn test_passivate_never_closes_the_native_connection() {
    let (mut conn, observer) = handle(1);

    conn.activate();
    conn.passivate();
    conn.activate();
    conn.passivate();

    assert_eq!(observer.close_attempts(), 0);
    assert!(!conn.is_closed().await);
}

#[tokio::test]
async fn test_delegated_operations_pass_values_through() {
    let (mut conn, _observer) = handle(1);
    conn.activate();

    conn.set_catalog("reporting").await.expect("set_catalog");
    assert_eq!(conn.catalog().await.expect("catalog").as_deref(), Some("reporting"));

    conn.set_auto_commit(false).await.expect("set_auto_commit");
    assert!(!conn.auto_commit().await.expect("auto_commit"));

    assert_eq!(
        conn.native_sql("SELECT 1").await.expect("native_sql"),
        "native(SELECT 1)"
    );
    assert_eq!(
        conn.metadata().await.expect("metadata").product_name,
        "ScriptedDB"
    );
}

// =============================================================================
// Destroy
// =============================================================================

#[tokio::test]
async fn test_destroy_closes_native_and_blocks_every_operation() {
    let (mut conn, observer) = handle(1);
    conn.activate();

    conn.destroy().await.expect("destroy");
    assert!(observer.close_attempts() >= 1);
    assert!(conn.state().is_destroyed());
    assert!(conn.is_closed().await);
    assert!(conn.last_used_at().is_none());

    assert_closed_err(conn.commit().await);
    assert_closed_err(conn.rollback().await);
    assert_closed_err(conn.auto_commit().await);
    assert_closed_err(conn.set_auto_commit(true).await);
    assert_closed_err(conn.read_only().await);
    assert_closed_err(conn.set_read_only(true).await);
    assert_closed_err(conn.catalog().await);
    assert_closed_err(conn.set_catalog("x").await);
    assert_closed_err(conn.isolation_level().await);
    assert_closed_err(conn.set_isolation_level(IsolationLevel::Serializable).await);
    assert_closed_err(conn.type_map().await);
    assert_closed_err(conn.set_type_map(TypeMap::new()).await);
    assert_closed_err(conn.warnings().await);
    assert_closed_err(conn.clear_warnings().await);
    assert_closed_err(conn.metadata().await);
    assert_closed_err(conn.native_sql("SELECT 1").await);
}

#[tokio::test]
async fn test_destroy_is_idempotent() {
    let (mut conn, observer) = handle(1);

    conn.destroy().await.expect("first destroy");
    conn.destroy().await.expect("second destroy");

    // Both calls may attempt the native close; neither fails because the
    // handle was already destroyed.
    assert_eq!(observer.close_attempts(), 2);
    assert!(conn.state().is_destroyed());
}

#[tokio::test]
async fn test_destroy_surfaces_native_close_failure_but_marks_closed() {
    let (native, observer) = ScriptedNative::new(1);
    let mut conn = PooledConnection::new(Box::new(native.failing_close()));
    conn.activate();

    let err = conn.destroy().await.expect_err("close failure must surface");
    assert_eq!(
        err.native_cause().expect("cause preserved").to_string(),
        "close refused by driver"
    );

    // The handle ends up closed regardless of the close outcome.
    assert!(observer.close_attempts() >= 1);
    assert!(conn.is_closed().await);
    assert_closed_err(conn.commit().await);
}

#[tokio::test]
async fn test_activate_cannot_resurrect_a_destroyed_handle() {
    let (mut conn, _observer) = handle(1);
    conn.destroy().await.expect("destroy");

    conn.activate();
    assert!(conn.state().is_destroyed());
    assert!(conn.last_used_at().is_none());
    assert_closed_err(conn.commit().await);
}

// =============================================================================
// Error translation
// =============================================================================

#[tokio::test]
async fn test_native_failure_is_wrapped_with_cause_and_does_not_close_the_handle() {
    let (native, _observer) = ScriptedNative::new(1);
    let mut conn = PooledConnection::new(Box::new(native.failing_rollback()));
    conn.activate();

    let err = conn.rollback().await.expect_err("rollback must fail");
    match &err {
        ConnectionError::Native(cause) => {
            assert_eq!(cause.to_string(), "rollback torn down by server");
        }
        other => panic!("expected Native, got {other:?}"),
    }

    // An arbitrary operation failure does not flip the closed flag.
    assert!(!conn.is_closed().await);
    conn.commit().await.expect("handle stays usable");
}

// =============================================================================
// Liveness probe
// =============================================================================

#[tokio::test]
async fn test_server_side_close_is_visible_to_the_probe() {
    let (mut conn, observer) = handle(1);
    conn.activate();
    assert!(!conn.is_closed().await);

    observer.drop_from_server_side();
    assert!(conn.is_closed().await);
}

#[tokio::test]
async fn test_failed_probe_degrades_to_open() {
    let (native, _observer) = ScriptedNative::new(1);
    let mut conn = PooledConnection::new(Box::new(native.failing_probe()));
    conn.activate();

    // Probing must never itself fail; an unanswerable probe reads as open.
    assert!(!conn.is_closed().await);
}

// =============================================================================
// Identity
// =============================================================================

#[tokio::test]
async fn test_handles_over_the_same_physical_connection_deduplicate() {
    let (a, _oa) = handle(7);
    let (b, _ob) = handle(7);
    let (c, _oc) = handle(8);

    assert_eq!(a, b);
    assert_ne!(a, c);

    let mut seen = HashSet::new();
    seen.insert(a);
    seen.insert(b);
    seen.insert(c);
    assert_eq!(seen.len(), 2);
}
