//! The poolable-resource contract.
//!
//! A pool manager drives checked-out resources through a fixed set of hooks:
//! activate on checkout, passivate on return, destroy on eviction, plus a
//! liveness probe. This module defines that contract and the logical state
//! a handle moves through.

use crate::error::Result;

/// Lifecycle hooks a pool manager calls on a pooled resource.
///
/// The pool is responsible for serializing calls: a handle is held by at
/// most one owner at a time, which the `&mut self` receivers enforce at the
/// type level within a single process.
#[async_trait::async_trait]
pub trait PoolableObject: Send {
    /// Mark the resource checked out and usable.
    ///
    /// Valid from any state except destroyed; idempotent when already
    /// active.
    fn activate(&mut self);

    /// Return the resource to the pool's custody.
    ///
    /// Detaches the handle from in-use bookkeeping without releasing the
    /// underlying resource, so the pool can recycle it later.
    fn passivate(&mut self);

    /// Permanently remove the resource, releasing what it owns.
    ///
    /// After this returns — successfully or not — the resource is terminal
    /// and no further operations are valid on it.
    async fn destroy(&mut self) -> Result<()>;

    /// Best-effort liveness probe.
    ///
    /// Total by contract: probing never fails, it only answers. An
    /// implementation that cannot determine liveness answers optimistically.
    async fn is_closed(&self) -> bool;
}

/// Logical state of a pooled handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    /// Checked out and usable for delegated operations.
    Active,
    /// Held by the pool; not expected to receive delegated operations
    /// until reactivated.
    Idle,
    /// Permanently removed; terminal.
    Destroyed,
}

impl HandleState {
    /// Check if the handle is checked out.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Check if the handle is parked in the pool.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Check if the handle has been permanently removed.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        matches!(self, Self::Destroyed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_state_predicates() {
        assert!(HandleState::Active.is_active());
        assert!(!HandleState::Active.is_idle());
        assert!(!HandleState::Active.is_destroyed());

        assert!(HandleState::Idle.is_idle());
        assert!(!HandleState::Idle.is_active());

        assert!(HandleState::Destroyed.is_destroyed());
        assert!(!HandleState::Destroyed.is_active());
    }
}
