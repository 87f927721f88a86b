//! Hash primitives consumed by the key derivation functions.
//!
//! Both hashes are external collaborators: BLAKE2b drives Argon2's initial
//! hashing and tag extraction, PBKDF2-HMAC-SHA-256 wraps scrypt's mixing
//! stage.

mod blake2b;
mod pbkdf;

pub(crate) use blake2b::{blake2b, blake2b_long};
pub(crate) use pbkdf::pbkdf2_sha256;
