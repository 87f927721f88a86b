//! Fallible allocation of zero-filled working buffers.
//!
//! Memory-hard functions allocate on the order of the configured cost. A
//! failed reservation is reported to the caller instead of aborting, and is
//! never answered by quietly using less memory.

use zeroize::{Zeroize, Zeroizing};

use super::error::DerivationError;

/// Allocates `len` copies of `fill`, or fails with
/// [`DerivationError::AllocationFailed`].
pub(crate) fn try_filled<T: Clone>(len: usize, fill: T) -> Result<Vec<T>, DerivationError> {
    let mut buf = Vec::new();
    if buf.try_reserve_exact(len).is_err() {
        let bytes = (len as u128) * (core::mem::size_of::<T>() as u128);
        tracing::warn!(bytes = %bytes, "working memory allocation failed");
        return Err(DerivationError::AllocationFailed { bytes });
    }
    buf.resize(len, fill);
    Ok(buf)
}

/// Allocates a zeroed buffer that is wiped again when dropped.
pub(crate) fn try_zeroed<T>(len: usize) -> Result<Zeroizing<Vec<T>>, DerivationError>
where
    T: Clone + Default + Zeroize,
{
    try_filled(len, T::default()).map(Zeroizing::new)
}
