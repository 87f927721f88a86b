//! The Argon2 memory matrix and the pass/slice/lane fill schedule.
//!
//! Within one slice the lanes never write the same block, so each slice is
//! filled by one worker per lane.
//!
//! # Sharing discipline
//!
//! During one `(pass, slice)` step every lane worker writes only the blocks
//! of its own segment. It reads its own lane freely, and reads other lanes
//! only outside their current segment, which were completed before the
//! previous step joined. The join at the end of every step is therefore the
//! only synchronization needed: a block at index `k` written during step `s`
//! is read by another lane no earlier than step `s + 1`.

use core::marker::PhantomData;

use tracing::trace;

use super::block::{Block, BlockFiller, QWORDS_IN_BLOCK};
use super::params::{Argon2Parameters, Argon2Type, Argon2Version};
use super::reference::{Position, compute_reference_position};
use crate::derivation::buffer::try_filled;
use crate::derivation::cancel::CancellationToken;
use crate::derivation::error::DerivationError;

/// Number of synchronization points (slices) per pass.
pub(crate) const SYNC_POINTS: u32 = 4;

/// Geometry of the matrix: `lanes` rows of `lane_len` blocks, each row cut
/// into [`SYNC_POINTS`] segments of `segment_len` blocks.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MemoryLayout {
    pub lanes: u32,
    pub lane_len: u32,
    pub segment_len: u32,
    pub total_blocks: u32,
}

impl MemoryLayout {
    pub(crate) fn new(params: &Argon2Parameters) -> Self {
        let lanes = params.lanes();
        let total_blocks = params.memory_blocks();
        let lane_len = total_blocks / lanes;
        let segment_len = lane_len / SYNC_POINTS;

        Self {
            lanes,
            lane_len,
            segment_len,
            total_blocks,
        }
    }

    #[inline]
    pub(crate) fn index(&self, lane: u32, index_in_lane: u32) -> usize {
        lane as usize * self.lane_len as usize + index_in_lane as usize
    }

    /// Index of the last block of `lane`.
    #[inline]
    pub(crate) fn last_in_lane(&self, lane: u32) -> usize {
        self.index(lane, self.lane_len - 1)
    }
}

/// How the pseudo-random value for a block is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AddressingMode {
    /// Taken from the address generator, independent of memory contents.
    DataIndependent,
    /// Taken from the first word of the previous block.
    DataDependent,
}

impl AddressingMode {
    /// Hybrid addressing is data-independent only for the first two slices
    /// of the first pass.
    pub(crate) fn select(kind: Argon2Type, pass: u32, slice: u32) -> Self {
        match kind {
            Argon2Type::DataIndependent => AddressingMode::DataIndependent,
            Argon2Type::Hybrid if pass == 0 && slice < SYNC_POINTS / 2 => {
                AddressingMode::DataIndependent
            }
            Argon2Type::Hybrid | Argon2Type::DataDependent => AddressingMode::DataDependent,
        }
    }
}

/// Everything the fill loop needs besides the memory itself. Fixed at
/// engine construction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Schedule {
    pub layout: MemoryLayout,
    pub iterations: u32,
    pub kind: Argon2Type,
    pub version: Argon2Version,
}

impl Schedule {
    pub(crate) fn new(params: &Argon2Parameters) -> Self {
        Self {
            layout: MemoryLayout::new(params),
            iterations: params.iterations(),
            kind: params.argon2_type(),
            version: params.version(),
        }
    }

    /// Version 1.0 always overwrites. From 1.3 on, passes after the first
    /// XOR the new block into what is already there.
    #[inline]
    fn xors_into_existing(&self, pass: u32) -> bool {
        match self.version {
            Argon2Version::V10 => false,
            Argon2Version::V13 => pass != 0,
        }
    }
}

/// The memory matrix: `lanes × lane_len` blocks stored lane after lane.
#[derive(Clone)]
pub(crate) struct Memory {
    blocks: Vec<Block>,
}

impl Memory {
    /// Reserves and zeroes the whole matrix up front.
    pub(crate) fn allocate(layout: &MemoryLayout) -> Result<Self, DerivationError> {
        let blocks = try_filled(layout.total_blocks as usize, Block::ZERO)?;
        Ok(Self { blocks })
    }

    pub(crate) fn block(&self, index: usize) -> &Block {
        &self.blocks[index]
    }

    pub(crate) fn block_mut(&mut self, index: usize) -> &mut Block {
        &mut self.blocks[index]
    }

    /// Zeroes every block in place, keeping the allocation.
    pub(crate) fn wipe(&mut self) {
        self.blocks.iter_mut().for_each(Block::clear);
    }

    #[cfg(test)]
    pub(crate) fn is_zeroed(&self) -> bool {
        self.blocks.iter().all(|b| b.0.iter().all(|w| *w == 0))
    }

    /// Runs every pass over the seeded matrix.
    ///
    /// Slices are processed in order and every lane finishes its segment
    /// before the next slice starts. With the `parallel` feature the lanes
    /// of a slice run on the rayon pool.
    ///
    /// The token, if any, is checked before every slice.
    pub(crate) fn fill(
        &mut self,
        schedule: &Schedule,
        cancel: Option<&CancellationToken>,
    ) -> Result<(), DerivationError> {
        for pass in 0..schedule.iterations {
            trace!(pass, "argon2 pass");
            for slice in 0..SYNC_POINTS {
                if let Some(token) = cancel {
                    token.check()?;
                }
                self.fill_slice(schedule, pass, slice);
            }
        }
        Ok(())
    }

    #[cfg(feature = "parallel")]
    fn fill_slice(&mut self, schedule: &Schedule, pass: u32, slice: u32) {
        use rayon::prelude::*;

        let view = SegmentView::new(&mut self.blocks);
        if schedule.layout.lanes == 1 {
            let mut filler = BlockFiller::new();
            // SAFETY: single lane, nothing runs concurrently.
            unsafe { fill_segment(view, schedule, pass, slice, 0, &mut filler) };
            return;
        }

        // `for_each_init` hands each worker its own filler; the call returns
        // only after every lane is done, which is the slice barrier.
        (0..schedule.layout.lanes)
            .into_par_iter()
            .for_each_init(BlockFiller::new, |filler, lane| {
                // SAFETY: each lane writes only its own segment of this
                // slice and reads only blocks completed before it, see the
                // module documentation.
                unsafe { fill_segment(view, schedule, pass, slice, lane, filler) }
            });
    }

    #[cfg(not(feature = "parallel"))]
    fn fill_slice(&mut self, schedule: &Schedule, pass: u32, slice: u32) {
        let view = SegmentView::new(&mut self.blocks);
        let mut filler = BlockFiller::new();
        for lane in 0..schedule.layout.lanes {
            // SAFETY: lanes run one after another.
            unsafe { fill_segment(view, schedule, pass, slice, lane, &mut filler) };
        }
    }
}

/// Raw view of the matrix shared by the lane workers of one slice.
///
/// The view itself enforces nothing: callers uphold the sharing discipline
/// described in the module documentation, which guarantees that no block is
/// read and written by different workers during the same step.
#[derive(Clone, Copy)]
struct SegmentView<'a> {
    base: *mut Block,
    len: usize,
    _memory: PhantomData<&'a mut [Block]>,
}

// SAFETY: access is partitioned per lane by the fill schedule.
unsafe impl Send for SegmentView<'_> {}
unsafe impl Sync for SegmentView<'_> {}

impl<'a> SegmentView<'a> {
    fn new(blocks: &'a mut [Block]) -> Self {
        Self {
            base: blocks.as_mut_ptr(),
            len: blocks.len(),
            _memory: PhantomData,
        }
    }

    /// # Safety
    ///
    /// No other worker may be writing block `index` during this step.
    #[inline]
    unsafe fn block(&self, index: usize) -> &'a Block {
        assert!(index < self.len);
        unsafe { &*self.base.add(index) }
    }

    /// # Safety
    ///
    /// The calling worker must own block `index` for this step, and no other
    /// reference to it may be alive.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    unsafe fn block_mut(&self, index: usize) -> &'a mut Block {
        assert!(index < self.len);
        unsafe { &mut *self.base.add(index) }
    }
}

/// Produces the blocks of `lane` in `slice`.
///
/// Every block takes its J from the address generator or from the previous
/// block, maps it to a reference block, and stores `G(previous, reference)`
/// either over the old contents or XORed into them.
///
/// # Safety
///
/// The caller must guarantee that no other worker writes to lane `lane`'s
/// segment in `slice`, and that every segment of other lanes in `slice` is
/// left alone by this worker (which the reference selection ensures).
unsafe fn fill_segment(
    memory: SegmentView<'_>,
    schedule: &Schedule,
    pass: u32,
    slice: u32,
    lane: u32,
    filler: &mut BlockFiller,
) {
    let layout = &schedule.layout;
    let mode = AddressingMode::select(schedule.kind, pass, slice);
    let with_xor = schedule.xors_into_existing(pass);

    if mode == AddressingMode::DataIndependent {
        filler.start_addressing([
            u64::from(pass),
            u64::from(lane),
            u64::from(slice),
            u64::from(layout.total_blocks),
            u64::from(schedule.iterations),
            u64::from(schedule.kind.as_u32()),
        ]);
    }

    // The first two blocks of each lane come from H0.
    let start_index = if pass == 0 && slice == 0 {
        if mode == AddressingMode::DataIndependent {
            filler.next_addresses();
        }
        2
    } else {
        0
    };

    let mut current = layout.index(lane, slice * layout.segment_len + start_index);
    let mut previous = if current % layout.lane_len as usize == 0 {
        current + layout.lane_len as usize - 1
    } else {
        current - 1
    };

    for index in start_index..layout.segment_len {
        let pseudo_rand = match mode {
            AddressingMode::DataIndependent => {
                if index as usize % QWORDS_IN_BLOCK == 0 {
                    filler.next_addresses();
                }
                filler.address(index as usize)
            }
            // SAFETY: the previous block belongs to this lane.
            AddressingMode::DataDependent => unsafe { memory.block(previous).0[0] },
        };

        let position = Position {
            pass,
            lane,
            slice,
            index,
        };
        let (ref_lane, ref_index) = compute_reference_position(&position, layout, pseudo_rand);

        // SAFETY: `previous` is in this lane, the reference block lies in a
        // region no worker writes during this step, and `current` is owned
        // by this worker and distinct from both.
        unsafe {
            let prev_block = memory.block(previous);
            let ref_block = memory.block(layout.index(ref_lane, ref_index));
            let compressed = filler.compress(prev_block, ref_block);
            let next_block = memory.block_mut(current);

            if with_xor {
                next_block.xor_assign(compressed);
            } else {
                next_block.copy_from(compressed);
            }
        }

        previous = current;
        current += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hybrid_switches_after_half_of_first_pass() {
        let select = |pass, slice| AddressingMode::select(Argon2Type::Hybrid, pass, slice);

        assert_eq!(select(0, 0), AddressingMode::DataIndependent);
        assert_eq!(select(0, 1), AddressingMode::DataIndependent);
        assert_eq!(select(0, 2), AddressingMode::DataDependent);
        assert_eq!(select(1, 0), AddressingMode::DataDependent);

        for pass in 0..3 {
            for slice in 0..SYNC_POINTS {
                assert_eq!(
                    AddressingMode::select(Argon2Type::DataIndependent, pass, slice),
                    AddressingMode::DataIndependent
                );
                assert_eq!(
                    AddressingMode::select(Argon2Type::DataDependent, pass, slice),
                    AddressingMode::DataDependent
                );
            }
        }
    }
}
