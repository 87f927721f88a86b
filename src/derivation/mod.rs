//! Memory-hard key derivation functions.
//!
//! Two algorithms share one contract:
//!
//! - [`argon2`](mod@argon2): Argon2d, Argon2i and Argon2id (RFC 9106), versions 0x10
//!   and 0x13.
//! - [`scrypt`](mod@scrypt): scrypt (RFC 7914).
//!
//! Each engine is configured once (`new(password, &params)`), which is the
//! only place parameters are validated. It then derives any number of keys
//! with `get_bytes(len)`, optionally cancellable or offloaded to a blocking
//! worker, and scrubs its sensitive buffers with `clear()`.
//!
//! ```rust
//! use cryptal::derivation::{Argon2, Argon2Parameters, Argon2Type};
//!
//! let params = Argon2Parameters::builder()
//!     .with_type(Argon2Type::Hybrid)
//!     .with_salt(b"somesaltsomesalt")
//!     .with_memory_kib(256)
//!     .with_parallelism(2)
//!     .with_iterations(2)
//!     .build();
//!
//! let mut engine = Argon2::new(b"hunter2", &params).unwrap();
//! let short = engine.get_bytes(16).unwrap();
//! let long = engine.get_bytes(64).unwrap();
//! assert_eq!((short.len(), long.len()), (16, 64));
//! engine.clear();
//! ```

pub mod argon2;
pub(crate) mod buffer;
pub mod cancel;
pub mod error;
pub mod scrypt;

pub use self::argon2::{
    Argon2, Argon2Parameters, Argon2ParametersBuilder, Argon2Type, Argon2Version, argon2,
};
pub use self::cancel::CancellationToken;
pub use self::error::{DerivationError, ParamError};
pub use self::scrypt::{Scrypt, ScryptParameters, ScryptParametersBuilder, scrypt};
