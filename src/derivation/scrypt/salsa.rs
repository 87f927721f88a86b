//! Salsa20 core as used by scrypt's BlockMix.
//!
//! Only the core function is needed: 16 little-endian words in, the
//! permuted words added back to the input out. Scrypt uses the 8-round
//! reduction.

use zeroize::Zeroize;

/// Salsa20/8 core, applied in place.
#[inline]
pub(crate) fn salsa20_8(block: &mut [u32; 16]) {
    salsa_core::<8>(block);
}

/// Salsa20 core with `ROUNDS` rounds.
///
/// Rounds alternate between columns and rows, so the count must be even.
fn salsa_core<const ROUNDS: usize>(block: &mut [u32; 16]) {
    const { assert!(ROUNDS % 2 == 0, "Salsa20 round count must be even") };

    let mut x = *block;

    for _ in 0..ROUNDS / 2 {
        // Column round
        quarter_round(&mut x, 0, 4, 8, 12);
        quarter_round(&mut x, 5, 9, 13, 1);
        quarter_round(&mut x, 10, 14, 2, 6);
        quarter_round(&mut x, 15, 3, 7, 11);

        // Row round
        quarter_round(&mut x, 0, 1, 2, 3);
        quarter_round(&mut x, 5, 6, 7, 4);
        quarter_round(&mut x, 10, 11, 8, 9);
        quarter_round(&mut x, 15, 12, 13, 14);
    }

    block
        .iter_mut()
        .zip(x.iter())
        .for_each(|(out, mixed)| *out = out.wrapping_add(*mixed));

    x.zeroize();
}

#[inline(always)]
fn quarter_round(x: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    x[b] ^= x[a].wrapping_add(x[d]).rotate_left(7);
    x[c] ^= x[b].wrapping_add(x[a]).rotate_left(9);
    x[d] ^= x[c].wrapping_add(x[b]).rotate_left(13);
    x[a] ^= x[d].wrapping_add(x[c]).rotate_left(18);
}
