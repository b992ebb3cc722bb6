//! Connection-level value types returned by delegated accessors.

use std::collections::HashMap;

/// Mapping from database type names to host type names.
///
/// Drivers that support custom type mapping consult this when materializing
/// values; the wrapper passes it through unchanged.
pub type TypeMap = HashMap<String, String>;

/// Connection-level facts reported by the native handle.
///
/// This is the subset of driver metadata that is meaningful at the
/// connection-lifecycle layer; statement- and schema-level metadata belong
/// to the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseMetadata {
    /// Database product name (e.g. server vendor and edition).
    pub product_name: String,
    /// Database product version string.
    pub product_version: String,
    /// Driver name as reported by the driver layer.
    pub driver_name: String,
    /// Driver version string.
    pub driver_version: String,
    /// Connection URL the native handle was opened against.
    pub url: String,
    /// User name the session was established as.
    pub user_name: String,
}

/// A warning reported by the native connection.
///
/// Warnings accumulate on the native handle between [`clear_warnings`]
/// calls; the driver's warning chain is rendered as a `Vec` of these.
///
/// [`clear_warnings`]: crate::connection::PooledConnection::clear_warnings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionWarning {
    /// Vendor-specific warning code.
    pub code: i32,
    /// SQLSTATE associated with the warning, if the driver provides one.
    pub sql_state: Option<String>,
    /// Human-readable warning message.
    pub message: String,
}

impl ConnectionWarning {
    /// Create a warning with a code and message.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            sql_state: None,
            message: message.into(),
        }
    }

    /// Attach a SQLSTATE to the warning.
    #[must_use]
    pub fn with_sql_state(mut self, state: impl Into<String>) -> Self {
        self.sql_state = Some(state.into());
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_construction() {
        let warning = ConnectionWarning::new(1007, "cursor converted");
        assert_eq!(warning.code, 1007);
        assert_eq!(warning.message, "cursor converted");
        assert!(warning.sql_state.is_none());
    }

    #[test]
    fn test_warning_with_sql_state() {
        let warning = ConnectionWarning::new(0, "connection reset advised").with_sql_state("01002");
        assert_eq!(warning.sql_state.as_deref(), Some("01002"));
    }
}
