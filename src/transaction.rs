//! Transaction isolation levels.

/// Transaction isolation level for a pooled connection.
///
/// These are the four ANSI isolation levels carried through to the native
/// handle; this layer does not interpret them beyond passing them along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
    /// Read uncommitted (dirty reads allowed).
    ///
    /// Lowest isolation - transactions can read uncommitted changes from
    /// other transactions.
    ReadUncommitted,

    /// Read committed.
    ///
    /// Transactions can only read committed data. Prevents dirty reads
    /// but allows non-repeatable reads and phantom reads.
    #[default]
    ReadCommitted,

    /// Repeatable read.
    ///
    /// Ensures rows read by a transaction don't change during the
    /// transaction, but allows phantom reads.
    RepeatableRead,

    /// Serializable (highest isolation).
    ///
    /// Transactions are completely isolated from each other.
    Serializable,
}

impl IsolationLevel {
    /// Get the isolation level name in its conventional SQL spelling.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReadUncommitted => "READ UNCOMMITTED",
            Self::ReadCommitted => "READ COMMITTED",
            Self::RepeatableRead => "REPEATABLE READ",
            Self::Serializable => "SERIALIZABLE",
        }
    }
}
