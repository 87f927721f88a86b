//! The 1 KiB block, the compression function G and the per-worker scratch
//! state used to fill memory.
//!
//! G runs the BLAKE2b round structure over a whole block, with the additions
//! replaced by the BlaMka multiply-add.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of a block in bytes.
pub(crate) const BLOCK_SIZE: usize = 1024;

/// Number of 64-bit words in a block.
pub(crate) const QWORDS_IN_BLOCK: usize = BLOCK_SIZE / 8;

/// One cell of the memory matrix: 128 little-endian 64-bit words.
///
/// Zeroed on drop.
#[derive(Debug, Clone, Zeroize, ZeroizeOnDrop)]
pub(crate) struct Block(pub(crate) [u64; QWORDS_IN_BLOCK]);

impl Block {
    pub(crate) const ZERO: Self = Self([0u64; QWORDS_IN_BLOCK]);

    /// `self ^= other`
    #[inline]
    pub(crate) fn xor_assign(&mut self, other: &Block) {
        self.0
            .iter_mut()
            .zip(other.0.iter())
            .for_each(|(a, b)| *a ^= b);
    }

    /// `self = a ^ b`
    #[inline]
    pub(crate) fn xor_of(&mut self, a: &Block, b: &Block) {
        self.0
            .iter_mut()
            .zip(a.0.iter().zip(b.0.iter()))
            .for_each(|(out, (x, y))| *out = x ^ y);
    }

    #[inline]
    pub(crate) fn copy_from(&mut self, other: &Block) {
        self.0.copy_from_slice(&other.0);
    }

    pub(crate) fn clear(&mut self) {
        self.0.zeroize();
    }

    pub(crate) fn load_bytes(&mut self, bytes: &[u8; BLOCK_SIZE]) {
        self.0
            .iter_mut()
            .zip(bytes.chunks_exact(8))
            .for_each(|(word, chunk)| {
                let mut le = [0u8; 8];
                le.copy_from_slice(chunk);
                *word = u64::from_le_bytes(le);
            });
    }

    pub(crate) fn store_bytes(&self, out: &mut [u8; BLOCK_SIZE]) {
        out.chunks_exact_mut(8)
            .zip(self.0.iter())
            .for_each(|(chunk, word)| chunk.copy_from_slice(&word.to_le_bytes()));
    }

    /// Applies the permutation P to the 8 rows of 16 consecutive words,
    /// then to the 8 columns formed by interleaved word pairs.
    fn permute(&mut self) {
        let z = &mut self.0;

        for i in 0..8 {
            let base = 16 * i;
            let mut v = [0u64; 16];
            v.copy_from_slice(&z[base..base + 16]);
            permute_p(&mut v);
            z[base..base + 16].copy_from_slice(&v);
        }

        for i in 0..8 {
            let mut v = [0u64; 16];
            for (row, pair) in v.chunks_exact_mut(2).enumerate() {
                let at = 2 * i + 16 * row;
                pair[0] = z[at];
                pair[1] = z[at + 1];
            }

            permute_p(&mut v);

            for (row, pair) in v.chunks_exact(2).enumerate() {
                let at = 2 * i + 16 * row;
                z[at] = pair[0];
                z[at + 1] = pair[1];
            }
        }
    }
}

/// Scratch space for the compression function G.
///
/// G is evaluated once per memory block, so its two temporaries live here
/// and are reused instead of being rebuilt on every call.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub(crate) struct Compressor {
    r: Block,
    z: Block,
}

impl Compressor {
    pub(crate) fn new() -> Self {
        Self {
            r: Block::ZERO,
            z: Block::ZERO,
        }
    }

    /// Compression function G (RFC 9106 §3.5).
    ///
    /// Computes `G(X, Y) = P(R) ⊕ R` with `R = X ⊕ Y`, where P is the
    /// row-then-column permutation built on the BlaMka round. The result is
    /// left in the scratch space and borrowed back to the caller, who either
    /// copies it over the destination block or XORs it in.
    pub(crate) fn compress(&mut self, x: &Block, y: &Block) -> &Block {
        self.r.xor_of(x, y);
        self.z.copy_from(&self.r);
        self.z.permute();
        self.z.xor_assign(&self.r);
        &self.z
    }
}

/// Per-worker state for filling one segment at a time.
///
/// Owns the compression scratch and, for data-independent addressing, the
/// address generator blocks. A filler is never shared between lanes that
/// run at the same time.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub(crate) struct BlockFiller {
    compressor: Compressor,
    zero: Block,
    input: Block,
    address: Block,
}

impl BlockFiller {
    pub(crate) fn new() -> Self {
        Self {
            compressor: Compressor::new(),
            zero: Block::ZERO,
            input: Block::ZERO,
            address: Block::ZERO,
        }
    }

    #[inline]
    pub(crate) fn compress(&mut self, x: &Block, y: &Block) -> &Block {
        self.compressor.compress(x, y)
    }

    /// Prepares the address generator for a new segment.
    ///
    /// The input block holds `[pass, lane, slice, memory_blocks, iterations,
    /// type, counter]` followed by zeros; the counter restarts at zero.
    pub(crate) fn start_addressing(&mut self, words: [u64; 6]) {
        self.input.clear();
        self.input.0[..6].copy_from_slice(&words);
        self.address.clear();
    }

    /// Advances the counter and regenerates the address block as
    /// `G(0, G(0, input))`.
    pub(crate) fn next_addresses(&mut self) {
        self.input.0[6] = self.input.0[6].wrapping_add(1);

        let once = self.compressor.compress(&self.zero, &self.input);
        self.address.copy_from(once);

        let twice = self.compressor.compress(&self.zero, &self.address);
        self.address.copy_from(twice);
    }

    #[inline]
    pub(crate) fn address(&self, index: usize) -> u64 {
        self.address.0[index % QWORDS_IN_BLOCK]
    }
}

/// BLAKE2b's quarter round with every `x + y` replaced by
/// `x + y + 2 · lo32(x) · lo32(y)`. Rotations are 32, 24, 16 and 63.
#[inline(always)]
fn gb(a: u64, b: u64, c: u64, d: u64) -> (u64, u64, u64, u64) {
    let a = blamka(a, b);
    let d = (d ^ a).rotate_right(32);

    let c = blamka(c, d);
    let b = (b ^ c).rotate_right(24);

    let a = blamka(a, b);
    let d = (d ^ a).rotate_right(16);

    let c = blamka(c, d);
    let b = (b ^ c).rotate_right(63);

    (a, b, c, d)
}

#[inline(always)]
fn blamka(x: u64, y: u64) -> u64 {
    let product = (x & 0xFFFF_FFFF).wrapping_mul(y & 0xFFFF_FFFF);
    x.wrapping_add(y).wrapping_add(product.wrapping_mul(2))
}

/// Round function P over 16 words viewed as a 4×4 matrix: columns, then
/// diagonals.
#[inline(always)]
fn permute_p(v: &mut [u64; 16]) {
    (v[0], v[4], v[8], v[12]) = gb(v[0], v[4], v[8], v[12]);
    (v[1], v[5], v[9], v[13]) = gb(v[1], v[5], v[9], v[13]);
    (v[2], v[6], v[10], v[14]) = gb(v[2], v[6], v[10], v[14]);
    (v[3], v[7], v[11], v[15]) = gb(v[3], v[7], v[11], v[15]);

    (v[0], v[5], v[10], v[15]) = gb(v[0], v[5], v[10], v[15]);
    (v[1], v[6], v[11], v[12]) = gb(v[1], v[6], v[11], v[12]);
    (v[2], v[7], v[8], v[13]) = gb(v[2], v[7], v[8], v[13]);
    (v[3], v[4], v[9], v[14]) = gb(v[3], v[4], v[9], v[14]);
}
