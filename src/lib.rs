//! Memory-hard key derivation for Nebula
//!
//! This crate provides the password-stretching building blocks used
//! throughout the Nebula ecosystem: the Argon2 family and scrypt, behind a
//! single configure-once, derive-many interface.
//!
//! The focus is on **clarity, predictability, and auditability**. Both
//! algorithms reproduce their published test vectors byte for byte,
//! including the version-dependent behaviour of Argon2.
//!
//! # Module overview
//!
//! - `derivation`
//!   The key derivation engines and their parameters.
//!
//!   [`derivation::Argon2`] implements Argon2d, Argon2i and Argon2id in
//!   versions 0x10 and 0x13. Its memory matrix is filled lane-parallel,
//!   with a join after every slice so that lanes only ever read blocks
//!   that other lanes have finished.
//!
//!   [`derivation::Scrypt`] implements scrypt. Its lanes are fully
//!   independent and fan out without synchronization.
//!
//!   Both engines validate their parameters at construction, derive keys of
//!   any supported length with `get_bytes`, support cancellation between
//!   work units, and wipe their sensitive state with `clear`.
//!
//! - `hash`
//!   Adapters over the hash primitives the engines consume: BLAKE2b with
//!   variable output (and the Argon2 H' construction on top of it), and
//!   PBKDF2-HMAC-SHA-256. The primitives themselves come from the RustCrypto
//!   crates and are treated as black boxes.
//!
//! # Design goals
//!
//! - Bit-exact conformance with RFC 9106 and RFC 7914
//! - Sensitive buffers zeroed on clear, drop, failure and cancellation
//! - Allocation failures reported, never silently downgraded
//! - Minimal and explicit APIs
//!
//! # Cargo features
//!
//! - `parallel` (default): fill Argon2 lanes and scrypt lanes on the rayon
//!   thread pool.
//! - `async` (default): `get_bytes_async`, which runs a derivation on a
//!   Tokio blocking worker.

pub mod derivation;
pub(crate) mod hash;
