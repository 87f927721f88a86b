//! Error types shared by the key derivation engines.
//!
//! Failures fall in two groups. [`ParamError`] covers configuration
//! problems and is only ever raised while an engine is being constructed.
//! [`DerivationError`] is what the engine operations return: it wraps
//! configuration errors and adds the per-call conditions (output length,
//! cancellation, allocation, use after clearing).

use thiserror::Error;

/// An invalid parameter combination, detected before any memory is
/// allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParamError {
    /// Argon2 needs at least one lane.
    #[error("lane count must be at least 1")]
    TooFewLanes,
    /// Argon2 lane count above `2^24 - 1`.
    #[error("lane count {0} exceeds the maximum of 16777215")]
    TooManyLanes(u32),
    /// Argon2 memory below `8 × lanes` KiB.
    #[error("memory of {memory_kib} KiB is below the minimum of {minimum} KiB")]
    MemoryTooSmall { memory_kib: u32, minimum: u64 },
    /// Argon2 needs at least one pass.
    #[error("iteration count must be at least 1")]
    TooFewIterations,
    /// A numeric Argon2 type outside 0..=2.
    #[error("unknown Argon2 type {0}")]
    UnknownType(u32),
    /// A numeric Argon2 version other than 0x10 or 0x13.
    #[error("unknown Argon2 version {0:#x}")]
    UnknownVersion(u32),
    /// An input whose length cannot be encoded as a 32-bit prefix.
    #[error("{0} is longer than 4294967295 bytes")]
    InputTooLong(&'static str),
    /// Scrypt cost that is not a power of two greater than one.
    #[error("cost {0} must be a power of two greater than 1")]
    CostNotPowerOfTwo(u64),
    /// Scrypt cost too large for the configured block size.
    #[error("cost {cost} is too large for block size {block_size}")]
    CostTooLarge { cost: u64, block_size: u32 },
    /// Scrypt block size of zero.
    #[error("block size must be at least 1")]
    BlockSizeTooSmall,
    /// Scrypt parallelism outside `1..=maximum`.
    #[error("parallelism {parallelism} is outside 1..={maximum}")]
    ParallelismOutOfRange { parallelism: u32, maximum: u32 },
}

/// Errors returned by the derivation engines.
#[derive(Debug, Error)]
pub enum DerivationError {
    /// The parameters were rejected at construction.
    #[error("invalid parameters: {0}")]
    InvalidParams(#[from] ParamError),
    /// Requested output is shorter than the algorithm allows.
    #[error("requested {requested} output bytes, the minimum is {minimum}")]
    OutputTooShort { requested: usize, minimum: usize },
    /// Requested output is longer than the algorithm can produce.
    #[error("requested {requested} output bytes, the maximum is {maximum}")]
    OutputTooLong { requested: usize, maximum: u64 },
    /// The caller cancelled the derivation between two work units.
    #[error("derivation was cancelled")]
    Cancelled,
    /// Working memory could not be reserved.
    #[error("failed to allocate {bytes} bytes of working memory")]
    AllocationFailed { bytes: u128 },
    /// The engine was cleared and no longer holds its inputs.
    #[error("engine has been cleared")]
    Cleared,
    /// The background task running an async derivation did not complete.
    #[error("background derivation task failed: {0}")]
    WorkerFailed(String),
}
