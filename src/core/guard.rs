// ============================================================================
// spark-observable - Reentrancy Guard
// Fail-fast "mutation in progress" flag with scoped release
// ============================================================================
//
// A collection holds one ReentrancyGuard. Every mutating operation calls
// `enter()` before touching the store and keeps the returned MutationScope
// alive until its notifications have been dispatched. The scope clears the
// flag in Drop, so the flag is released on every exit path, including an
// observer panicking mid-dispatch.
//
// This is a single-owner lock: acquisition never blocks or queues, it fails.
// ============================================================================

use std::cell::Cell;

use super::error::{ObservableError, Result};

// =============================================================================
// REENTRANCY GUARD
// =============================================================================

/// Tracks whether a mutation of the owning instance is in flight.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    busy: Cell<bool>,
}

impl ReentrancyGuard {
    pub const fn new() -> Self {
        Self {
            busy: Cell::new(false),
        }
    }

    /// True between `enter()` and the drop of the returned scope.
    pub fn is_active(&self) -> bool {
        self.busy.get()
    }

    /// Fails with [`ObservableError::Reentrancy`] if a mutation is already in
    /// flight.
    pub fn check(&self) -> Result<()> {
        if self.busy.get() {
            tracing::debug!(
                target: crate::core::constants::LOG_TARGET,
                "rejected reentrant mutation"
            );
            return Err(ObservableError::Reentrancy);
        }
        Ok(())
    }

    /// Mark a mutation as in flight until the returned scope is dropped.
    pub fn enter(&self) -> Result<MutationScope<'_>> {
        self.check()?;
        self.busy.set(true);
        Ok(MutationScope { guard: self })
    }
}

// =============================================================================
// MUTATION SCOPE
// =============================================================================

/// Proof that the owning instance is mid-mutation. Releases on drop.
#[must_use = "the mutation is only guarded while the scope is alive"]
pub struct MutationScope<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for MutationScope<'_> {
    fn drop(&mut self) {
        self.guard.busy.set(false);
    }
}

impl std::fmt::Debug for MutationScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationScope").finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================
