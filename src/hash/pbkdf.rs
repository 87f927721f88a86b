//! PBKDF2-HMAC-SHA-256 as consumed by scrypt.
//!
//! Scrypt only ever calls PBKDF2 with a single iteration, once to expand the
//! password into the lane matrix and once to contract the mixed matrix into
//! the derived key. Both HMAC and SHA-256 come from their RustCrypto crates.

use hmac::Hmac;
use sha2::Sha256;

/// Fills `out` with `PBKDF2-HMAC-SHA-256(password, salt, rounds)`.
pub(crate) fn pbkdf2_sha256(password: &[u8], salt: &[u8], rounds: u32, out: &mut [u8]) {
    // HMAC accepts keys of any length, so this can only fail on a broken PRF.
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, rounds, out)
        .expect("HMAC-SHA-256 accepts keys of any length");
}
