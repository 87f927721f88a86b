//! Scrypt memory-hard key derivation (RFC 7914).
//!
//! Scrypt stretches a password in three steps:
//!
//! 1. **Expansion**: `B = PBKDF2-HMAC-SHA-256(P, S, 1, p × 128 × r)`.
//! 2. **Mixing**: each of the `p` lanes of `B` goes through ROMix, which
//!    first fills a table of `N` blocks sequentially with BlockMix and then
//!    reads it back `N` times at data-dependent positions.
//! 3. **Contraction**: `DK = PBKDF2-HMAC-SHA-256(P, B, 1, dkLen)`.
//!
//! Unlike Argon2, lanes never read each other's memory, so they run fully
//! in parallel without any barrier.

pub mod core;
pub mod params;
pub(crate) mod romix;
pub(crate) mod salsa;

pub use self::core::{MAX_OUTPUT_LEN, MIN_OUTPUT_LEN, Scrypt, scrypt};
pub use params::{ScryptParameters, ScryptParametersBuilder};
