//! Mapping a pseudo-random word to the block a new block is mixed with.
//!
//! The high half of J picks the lane, the low half picks a column inside the
//! window of blocks that are already final at the current [`Position`].

use super::memory::{MemoryLayout, SYNC_POINTS};

/// Scheduling coordinate of the block currently being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Position {
    pub pass: u32,
    pub lane: u32,
    pub slice: u32,
    /// Offset inside the current segment.
    pub index: u32,
}

/// Returns `(lane, column)` of the reference block for `position`
/// (RFC 9106 §3.4.1.3).
///
/// During the first slice of the first pass only the own lane is eligible.
/// Afterwards any lane is, minus the segments other lanes are writing in
/// the current slice. The squared mapping favours recent blocks.
pub(crate) fn compute_reference_position(
    position: &Position,
    layout: &MemoryLayout,
    pseudo_rand: u64,
) -> (u32, u32) {
    let segment_len = u64::from(layout.segment_len);
    let lane_len = u64::from(layout.lane_len);
    let index = u64::from(position.index);
    let slice = u64::from(position.slice);

    let j1 = pseudo_rand & 0xFFFF_FFFF;
    let j2 = pseudo_rand >> 32;

    let ref_lane = if position.pass == 0 && position.slice == 0 {
        position.lane
    } else {
        (j2 % u64::from(layout.lanes)) as u32
    };

    let same_lane = ref_lane == position.lane;

    // Blocks finished and visible from here. The block right before the
    // current one is excluded unless it belongs to this lane.
    let reference_area_size = if position.pass == 0 {
        if position.slice == 0 {
            index - 1
        } else if same_lane {
            slice * segment_len + index - 1
        } else if index == 0 {
            slice * segment_len - 1
        } else {
            slice * segment_len
        }
    } else if same_lane {
        lane_len - segment_len + index - 1
    } else if index == 0 {
        lane_len - segment_len - 1
    } else {
        lane_len - segment_len
    };

    debug_assert!(reference_area_size > 0, "empty reference area at {position:?}");

    // relative = area - 1 - area · (J1² / 2³²) / 2³²
    let x = (j1 * j1) >> 32;
    let relative_position = reference_area_size - 1 - ((reference_area_size * x) >> 32);

    let start_position = if position.pass == 0 || position.slice == SYNC_POINTS - 1 {
        0
    } else {
        (slice + 1) * segment_len
    };

    let ref_index = ((start_position + relative_position) % lane_len) as u32;

    (ref_lane, ref_index)
}
