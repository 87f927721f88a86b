//! BLAKE2b with caller-chosen digest length, and the Argon2 variable-length
//! construction H' built on top of it.
//!
//! The compression function itself is provided by the `blake2` crate. This
//! module only drives it through its incremental interface (new, update,
//! finalize) and never looks inside.

use blake2::Blake2bVar;
use blake2::digest::{Update, VariableOutput};
use zeroize::Zeroize;

/// Largest digest BLAKE2b can produce in a single call.
const BLAKE2B_OUTBYTES: usize = 64;

/// Half of a full digest: the stride H' advances by between chained calls.
const HALF_OUTBYTES: usize = BLAKE2B_OUTBYTES / 2;

/// Hashes the concatenation of `parts` into `out`.
///
/// The digest length is `out.len()`, which must be in `1..=64`.
pub(crate) fn blake2b(out: &mut [u8], parts: &[&[u8]]) {
    let mut hasher =
        Blake2bVar::new(out.len()).expect("BLAKE2b digest length must be in 1..=64");

    for part in parts {
        hasher.update(part);
    }

    hasher
        .finalize_variable(out)
        .expect("output buffer has the configured digest length");
}

/// Variable-length hash H' (RFC 9106 §3.3).
///
/// Fills `out` with `H'(parts, out.len())`:
///
/// ```text
/// T <= 64:  BLAKE2b-T(LE32(T) || X)
/// T >  64:  V1 = BLAKE2b-64(LE32(T) || X)
///           Vi = BLAKE2b-64(Vi-1)              for 2 <= i <= r
///           Vr+1 = BLAKE2b-(T - 32r)(Vr)
///           out = V1[..32] || ... || Vr[..32] || Vr+1
/// ```
///
/// with `r = ceil(T / 32) - 2`.
pub(crate) fn blake2b_long(out: &mut [u8], parts: &[&[u8]]) {
    let out_len = out.len();
    let len_prefix = (out_len as u32).to_le_bytes();

    if out_len <= BLAKE2B_OUTBYTES {
        let mut hasher =
            Blake2bVar::new(out_len).expect("BLAKE2b digest length must be in 1..=64");
        hasher.update(&len_prefix);
        for part in parts {
            hasher.update(part);
        }
        hasher
            .finalize_variable(out)
            .expect("output buffer has the configured digest length");
        return;
    }

    let mut current = [0u8; BLAKE2B_OUTBYTES];
    let mut next = [0u8; BLAKE2B_OUTBYTES];

    let mut hasher = Blake2bVar::new(BLAKE2B_OUTBYTES).expect("64 is a valid BLAKE2b length");
    hasher.update(&len_prefix);
    for part in parts {
        hasher.update(part);
    }
    hasher
        .finalize_variable(&mut current)
        .expect("output buffer has the configured digest length");

    out[..HALF_OUTBYTES].copy_from_slice(&current[..HALF_OUTBYTES]);
    let mut written = HALF_OUTBYTES;

    while out_len - written > BLAKE2B_OUTBYTES {
        blake2b(&mut next, &[&current[..]]);
        out[written..written + HALF_OUTBYTES].copy_from_slice(&next[..HALF_OUTBYTES]);
        written += HALF_OUTBYTES;
        core::mem::swap(&mut current, &mut next);
    }

    blake2b(&mut out[written..], &[&current[..]]);

    current.zeroize();
    next.zeroize();
}
