//! Argon2 memory-hard key derivation (RFC 9106).
//!
//! Argon2 is a memory-hard password hashing function designed to resist
//! GPU-based brute-force attacks. All three variants are provided:
//!
//! - **Argon2d** ([`Argon2Type::DataDependent`]): block addresses depend on
//!   memory contents. Strongest against time-memory trade-offs, but the
//!   access pattern leaks through timing.
//! - **Argon2i** ([`Argon2Type::DataIndependent`]): block addresses come
//!   from a counter-driven generator, so the access pattern reveals nothing
//!   about the password.
//! - **Argon2id** ([`Argon2Type::Hybrid`]): data-independent for the first
//!   half of the first pass, data-dependent afterwards.
//!
//! Both published versions are supported. Version 0x10 overwrites blocks on
//! every pass; version 0x13 XORs new blocks into the old ones after the
//! first pass.
//!
//! # Steps
//!
//! 1. Hash every input and parameter into the 64-byte seed H0.
//! 2. Expand H0 with H' into the first two blocks of every lane.
//! 3. Fill the rest of the matrix pass by pass, each new block being
//!    `G(previous, reference)`.
//! 4. XOR the last column of the matrix into one block and stretch it with
//!    H' into the tag.
//!
//! # Layout
//!
//! The matrix is made of 1 KiB blocks:
//! - **Lanes**: rows that are filled in parallel.
//! - **Slices**: each lane is divided into 4 slices (sync points). All lanes
//!   finish a slice before any lane starts the next one.
//! - **Segments**: the blocks of one lane within one slice.

pub(crate) mod block;
pub(crate) mod boundary;
pub mod core;
pub(crate) mod memory;
pub mod params;
pub(crate) mod reference;

pub use self::core::{Argon2, MAX_OUTPUT_LEN, MIN_OUTPUT_LEN, argon2};
pub use params::{
    Argon2Parameters, Argon2ParametersBuilder, Argon2Type, Argon2Version, MAX_LANES,
    MIN_MEMORY_PER_LANE,
};
