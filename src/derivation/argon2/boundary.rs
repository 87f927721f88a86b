//! What happens before and after the fill: the seed H0, the first two
//! columns of the matrix, and the tag.

use zeroize::{Zeroize, Zeroizing};

use super::block::{BLOCK_SIZE, Block};
use super::memory::{Memory, MemoryLayout};
use super::params::Argon2Parameters;
use crate::hash::{blake2b, blake2b_long};

/// Length of H0 in bytes.
pub(crate) const PREHASH_DIGEST_LEN: usize = 64;

/// BLAKE2b-512 over the little-endian parameters and the length-prefixed
/// inputs (RFC 9106 §3.2):
///
/// ```text
/// lanes | tag_len | memory_kib | iterations | version | type
///   | len(P) | P | len(S) | S | len(K) | K | len(X) | X
/// ```
///
/// `m` is the requested memory size, before rounding.
pub(crate) fn initial_hash(
    password: &[u8],
    params: &Argon2Parameters,
    tag_len: u32,
) -> Zeroizing<[u8; PREHASH_DIGEST_LEN]> {
    let header = [
        params.lanes(),
        tag_len,
        params.memory_kib(),
        params.iterations(),
        params.version().as_u32(),
        params.argon2_type().as_u32(),
    ]
    .map(u32::to_le_bytes);

    let password_len = (password.len() as u32).to_le_bytes();
    let salt_len = (params.salt().len() as u32).to_le_bytes();
    let secret_len = (params.secret().len() as u32).to_le_bytes();
    let additional_len = (params.additional().len() as u32).to_le_bytes();

    let mut h0 = Zeroizing::new([0u8; PREHASH_DIGEST_LEN]);
    blake2b(
        h0.as_mut_slice(),
        &[
            &header[0][..],
            &header[1][..],
            &header[2][..],
            &header[3][..],
            &header[4][..],
            &header[5][..],
            &password_len[..],
            password,
            &salt_len[..],
            params.salt(),
            &secret_len[..],
            params.secret(),
            &additional_len[..],
            params.additional(),
        ],
    );
    h0
}

/// Initializes the first two blocks of each lane:
/// `B[i][j] = H'^(1024)(H0 || LE32(j) || LE32(i))` for `j ∈ {0, 1}`.
pub(crate) fn seed_lanes(
    memory: &mut Memory,
    layout: &MemoryLayout,
    h0: &[u8; PREHASH_DIGEST_LEN],
) {
    let mut bytes = [0u8; BLOCK_SIZE];

    for lane in 0..layout.lanes {
        for column in 0..2u32 {
            blake2b_long(
                &mut bytes,
                &[&h0[..], &column.to_le_bytes()[..], &lane.to_le_bytes()[..]],
            );
            memory.block_mut(layout.index(lane, column)).load_bytes(&bytes);
        }
    }

    bytes.zeroize();
}

/// XORs the last block of every lane and stretches the result with H'
/// into `out`.
pub(crate) fn finalize(memory: &Memory, layout: &MemoryLayout, out: &mut [u8]) {
    let mut final_block = Block::ZERO;
    final_block.copy_from(memory.block(layout.last_in_lane(0)));

    for lane in 1..layout.lanes {
        final_block.xor_assign(memory.block(layout.last_in_lane(lane)));
    }

    let mut bytes = [0u8; BLOCK_SIZE];
    final_block.store_bytes(&mut bytes);
    blake2b_long(out, &[&bytes[..]]);

    bytes.zeroize();
}
