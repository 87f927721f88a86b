//! BlockMix and ROMix (SMix), the memory-hard part of scrypt.
//!
//! A scrypt block is `2r` sub-blocks of 16 little-endian words (64 bytes).
//! Each lane runs SMix over its own block with its own table `V` of `N`
//! blocks; lanes never look at each other's memory.

use zeroize::Zeroize;

use super::salsa::salsa20_8;
use crate::derivation::buffer::try_zeroed;
use crate::derivation::cancel::CancellationToken;
use crate::derivation::error::DerivationError;

/// Words per 64-byte sub-block.
const SUB_BLOCK_WORDS: usize = 16;

/// Words in one scrypt block for block size `r`.
#[inline]
pub(crate) fn block_words(r: usize) -> usize {
    2 * r * SUB_BLOCK_WORDS
}

/// BlockMix with Salsa20/8 (RFC 7914 §4).
///
/// `X` starts as the last sub-block of the input; each input sub-block is
/// XORed into it and mixed. Even-numbered results land in the first half of
/// `output`, odd-numbered ones in the second half.
pub(crate) fn block_mix(input: &[u32], output: &mut [u32], r: usize) {
    let mut x = [0u32; SUB_BLOCK_WORDS];
    x.copy_from_slice(&input[(2 * r - 1) * SUB_BLOCK_WORDS..]);

    for (i, sub_block) in input.chunks_exact(SUB_BLOCK_WORDS).enumerate() {
        x.iter_mut()
            .zip(sub_block.iter())
            .for_each(|(w, v)| *w ^= v);
        salsa20_8(&mut x);

        let slot = if i % 2 == 0 { i / 2 } else { r + i / 2 };
        output[slot * SUB_BLOCK_WORDS..(slot + 1) * SUB_BLOCK_WORDS].copy_from_slice(&x);
    }

    x.zeroize();
}

/// First word of the last sub-block, reduced modulo `n` (a power of two).
#[inline]
fn integerify(block: &[u32], r: usize, n: usize) -> usize {
    block[(2 * r - 1) * SUB_BLOCK_WORDS] as usize & (n - 1)
}

/// ROMix (RFC 7914 §5), applied in place to one lane's block.
///
/// `v` must hold `n` blocks and `scratch` one block.
pub(crate) fn smix(block: &mut [u32], n: usize, r: usize, v: &mut [u32], scratch: &mut [u32]) {
    let words = block_words(r);

    for chunk in v.chunks_exact_mut(words).take(n) {
        chunk.copy_from_slice(block);
        block_mix(block, scratch, r);
        block.copy_from_slice(scratch);
    }

    for _ in 0..n {
        let j = integerify(block, r, n);
        block
            .iter_mut()
            .zip(v[j * words..(j + 1) * words].iter())
            .for_each(|(b, t)| *b ^= t);
        block_mix(block, scratch, r);
        block.copy_from_slice(scratch);
    }
}

/// Runs SMix over every lane of `words` (`p` consecutive blocks).
///
/// Lanes share nothing, so with the `parallel` feature they fan out across
/// the rayon pool with no synchronization beyond the final join. Each lane
/// allocates its own table, which is zeroed when the lane finishes or fails.
/// The token, if any, is checked before each lane starts.
pub(crate) fn mix_lanes(
    words: &mut [u32],
    n: usize,
    r: usize,
    cancel: Option<&CancellationToken>,
) -> Result<(), DerivationError> {
    #[cfg(feature = "parallel")]
    use rayon::prelude::*;

    let lane_words = block_words(r);

    #[cfg(feature = "parallel")]
    let lanes = words.par_chunks_mut(lane_words);
    #[cfg(not(feature = "parallel"))]
    let mut lanes = words.chunks_mut(lane_words);

    lanes.try_for_each(|lane| mix_lane(lane, n, r, cancel))
}

fn mix_lane(
    lane: &mut [u32],
    n: usize,
    r: usize,
    cancel: Option<&CancellationToken>,
) -> Result<(), DerivationError> {
    if let Some(token) = cancel {
        token.check()?;
    }

    let words = block_words(r);
    let table_words = n
        .checked_mul(words)
        .ok_or(DerivationError::AllocationFailed {
            bytes: (n as u128) * (words as u128) * 4,
        })?;

    let mut v = try_zeroed::<u32>(table_words)?;
    let mut scratch = try_zeroed::<u32>(words)?;

    smix(lane, n, r, &mut v, &mut scratch);
    Ok(())
}
