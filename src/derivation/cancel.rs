//! Cooperative cancellation for long-running derivations.
//!
//! Neither Argon2 nor scrypt can be interrupted inside a block without
//! corrupting the output, so the token is only polled between whole work
//! units: before every `(pass, slice)` step for Argon2 and before every lane
//! for scrypt.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::error::DerivationError;

/// A cloneable flag shared between the caller and a running derivation.
///
/// All clones observe the same state: cancelling one cancels them all.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Work already inside a block runs to the end
    /// of its current unit.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn check(&self) -> Result<(), DerivationError> {
        if self.is_cancelled() {
            tracing::debug!("derivation cancelled at a work-unit boundary");
            return Err(DerivationError::Cancelled);
        }
        Ok(())
    }
}
