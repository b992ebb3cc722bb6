//! # pooled-conn
//!
//! Lifecycle wrapper presenting a single database connection as a poolable
//! resource.
//!
//! An external pool manager wraps a freshly opened driver connection in a
//! [`PooledConnection`], then drives it through the [`PoolableObject`]
//! hooks: [`activate`] on checkout, [`passivate`] on return, [`destroy`] on
//! eviction. Callers holding a checked-out handle perform connection-level
//! operations (commit, rollback, isolation level, catalog, warnings,
//! metadata) through it; every native failure comes back as the single
//! [`ConnectionError`] kind with the driver failure preserved as its cause.
//!
//! What this crate is **not**: a pool (no sizing, queueing, or eviction
//! policy), a SQL execution layer, or a wire protocol. The driver
//! connection is an opaque capability behind the [`NativeConnection`]
//! trait.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pooled_conn::{PoolableObject, PooledConnection};
//!
//! let mut conn = PooledConnection::new(Box::new(driver_connection));
//! conn.set_descriptor("db://primary (svc account)");
//!
//! conn.activate();                 // pool checkout
//! conn.commit().await?;            // caller work
//! conn.passivate();                // pool return
//! // ... later, on eviction:
//! conn.destroy().await?;
//! ```
//!
//! [`activate`]: PoolableObject::activate
//! [`passivate`]: PoolableObject::passivate
//! [`destroy`]: PoolableObject::destroy

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod connection;
pub mod error;
pub mod lifecycle;
pub mod metadata;
pub mod native;
pub mod transaction;

pub use connection::PooledConnection;
pub use error::{ConnectionError, NativeError, Result};
pub use lifecycle::{HandleState, PoolableObject};
pub use metadata::{ConnectionWarning, DatabaseMetadata, TypeMap};
pub use native::NativeConnection;
pub use transaction::IsolationLevel;
