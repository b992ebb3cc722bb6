//! Pooled connection lifecycle walkthrough.
//!
//! Drives a [`PooledConnection`] through the full checkout/return/eviction
//! cycle a pool manager would: activate, delegated work, passivate, and
//! finally destroy. The native connection is a small in-memory stand-in,
//! so the example runs without a database.
//!
//! # Running
//!
//! ```bash
//! RUST_LOG=trace cargo run --example connection_lifecycle
//! ```

// Allow common patterns in example code
#![allow(clippy::unwrap_used, clippy::expect_used)]

use pooled_conn::{
    ConnectionWarning, DatabaseMetadata, IsolationLevel, NativeConnection, NativeError,
    PoolableObject, PooledConnection, TypeMap,
};

/// In-memory native connection with just enough state to demonstrate the
/// wrapper's delegation and close behavior.
struct DemoNative {
    id: u64,
    catalog: Option<String>,
    auto_commit: bool,
    closed: bool,
}

impl DemoNative {
    fn open(id: u64) -> Self {
        Self {
            id,
            catalog: None,
            auto_commit: true,
            closed: false,
        }
    }
}

#[async_trait::async_trait]
impl NativeConnection for DemoNative {
    fn conn_id(&self) -> u64 {
        self.id
    }

    async fn commit(&mut self) -> Result<(), NativeError> {
        println!("  [driver] COMMIT");
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), NativeError> {
        println!("  [driver] ROLLBACK");
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

    async fn warnings(&mut self) -> Result<Vec<ConnectionWarning>, NativeError> {
        Ok(vec![ConnectionWarning::new(1007, "cursor converted").with_sql_state("01000")])
    }

    async fn clear_warnings(&mut self) -> Result<(), NativeError> {
        Ok(())
    }

    async fn metadata(&mut self) -> Result<DatabaseMetadata, NativeError> {
        Ok(DatabaseMetadata {
            product_name: "DemoDB".into(),
            product_version: "1.0".into(),
            driver_name: "demo-driver".into(),
            driver_version: "1.0".into(),
            url: "demo://localhost/demo".into(),
            user_name: "demo".into(),
        })
    }

    async fn native_sql(&mut self, sql: &str) -> Result<String, NativeError> {
        Ok(format!("/* demo dialect */ {sql}"))
    }

    async fn close(&mut self) -> Result<(), NativeError> {
        println!("  [driver] connection closed");
        self.closed = true;
        Ok(())
    }

    async fn is_closed(&self) -> Result<bool, NativeError> {
        Ok(self.closed)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== Pooled Connection Lifecycle Example ===\n");

    // The factory opens a native connection and wraps it; the issuing
    // service assigns the session id afterwards.
    let mut conn = PooledConnection::with_profiling(Box::new(DemoNative::open(42)), true);
    conn.set_descriptor("demo://localhost/demo (demo user)");
    conn.set_session_id("session-42");

    println!("1. Fresh handle:");
    println!("  Display: {conn}");
    println!("  State: {:?}", conn.state());
    println!("  Profiling enabled: {}", conn.profiling_enabled());

    // Checkout: the pool activates the handle before lending it out.
    println!("\n2. Checkout (activate):");
    conn.activate();
    println!("  State: {:?}", conn.state());
    println!("  Last used: {:?}", conn.last_used_at());

    // The caller works through the handle; failures would surface as
    // ConnectionError with the driver failure as cause.
    println!("\n3. Caller work:");
    conn.set_catalog("orders").await?;
    println!("  Catalog: {:?}", conn.catalog().await?);
    println!("  Translated: {}", conn.native_sql("SELECT 1").await?);
    conn.commit().await?;
    for warning in conn.warnings().await? {
        println!("  Warning {}: {}", warning.code, warning.message);
    }
    println!("  Metadata: {}", conn.metadata().await?.product_name);
    println!("  Probe says closed: {}", conn.is_closed().await);

    // Return: passivation detaches the in-use bookkeeping but keeps the
    // native connection open for reuse.
    println!("\n4. Return (passivate):");
    conn.passivate();
    println!("  State: {:?}", conn.state());
    println!("  Last used: {:?}", conn.last_used_at());
    println!("  Probe says closed: {}", conn.is_closed().await);

    // Eviction: destroy is the only path that closes the native handle.
    println!("\n5. Eviction (destroy):");
    conn.destroy().await?;
    println!("  State: {:?}", conn.state());
    println!("  Probe says closed: {}", conn.is_closed().await);
    match conn.commit().await {
        Err(err) => println!("  Post-destroy commit refused: {err}"),
        Ok(()) => println!("  Unexpected: commit succeeded after destroy"),
    }

    Ok(())
}
