//! Parameter definitions and validation for scrypt.

use core::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::derivation::error::ParamError;

/// Bytes in one scrypt block per unit of block size (`128 × r`).
pub(crate) const BLOCK_UNIT: usize = 128;

/// Configuration parameters for scrypt.
///
/// - `cost` (N): number of blocks in the random-access table, a power of
///   two greater than one. Memory per lane is `128 × r × N` bytes.
/// - `block_size` (r): size multiplier of each block.
/// - `parallelism` (p): number of independent lanes.
///
/// Build instances with [`ScryptParametersBuilder`]. The salt is copied in
/// and wiped when the parameters are dropped or cleared.
#[derive(Clone)]
pub struct ScryptParameters {
    salt: Vec<u8>,
    cost: u64,
    block_size: u32,
    parallelism: u32,
}

impl ScryptParameters {
    /// Starts a builder with the default configuration.
    pub fn builder() -> ScryptParametersBuilder {
        ScryptParametersBuilder::default()
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn cost(&self) -> u64 {
        self.cost
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    /// Size of the random-access table one lane allocates, in bytes, or
    /// `None` if it does not fit in a `u128`.
    pub fn lane_memory_bytes(&self) -> Option<u128> {
        (BLOCK_UNIT as u128)
            .checked_mul(u128::from(self.block_size))?
            .checked_mul(u128::from(self.cost))
    }

    /// Largest accepted parallelism for the configured block size.
    pub fn max_parallelism(&self) -> u32 {
        max_parallelism(self.block_size)
    }

    /// Zeroes the salt in place.
    pub fn clear(&mut self) {
        self.salt.as_mut_slice().zeroize();
    }

    pub(crate) fn validate(&self) -> Result<(), ParamError> {
        if self.cost <= 1 || !self.cost.is_power_of_two() {
            return Err(ParamError::CostNotPowerOfTwo(self.cost));
        }

        if self.block_size < 1 {
            return Err(ParamError::BlockSizeTooSmall);
        }

        // Integerify reads 32 bits, and with r = 1 the block only carries
        // 16 bits worth of index (N < 2^(128 r / 8)).
        if (self.block_size == 1 && self.cost >= 1 << 16) || self.cost > u64::from(u32::MAX) {
            return Err(ParamError::CostTooLarge {
                cost: self.cost,
                block_size: self.block_size,
            });
        }

        let maximum = self.max_parallelism();
        if self.parallelism < 1 || self.parallelism > maximum {
            return Err(ParamError::ParallelismOutOfRange {
                parallelism: self.parallelism,
                maximum,
            });
        }

        Ok(())
    }
}

fn max_parallelism(block_size: u32) -> u32 {
    let per_lane = (BLOCK_UNIT as u64) * u64::from(block_size.max(1)) * 8;
    (i32::MAX as u64 / per_lane) as u32
}

/// Same as [`ScryptParameters::clear`]: the salt keeps its length.
impl Zeroize for ScryptParameters {
    fn zeroize(&mut self) {
        self.clear();
    }
}

impl Drop for ScryptParameters {
    fn drop(&mut self) {
        self.clear();
    }
}

impl ZeroizeOnDrop for ScryptParameters {}

impl Default for ScryptParameters {
    /// Default parameters: N = 16384, r = 8, p = 1, empty salt.
    fn default() -> Self {
        Self {
            salt: Vec::new(),
            cost: 16384,
            block_size: 8,
            parallelism: 1,
        }
    }
}

impl fmt::Debug for ScryptParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScryptParameters")
            .field("salt_len", &self.salt.len())
            .field("cost", &self.cost)
            .field("block_size", &self.block_size)
            .field("parallelism", &self.parallelism)
            .finish()
    }
}

/// Builder for [`ScryptParameters`].
///
/// Nothing is validated here; the engine checks the final combination when
/// it is constructed.
#[derive(Debug, Clone, Default)]
pub struct ScryptParametersBuilder {
    params: ScryptParameters,
}

impl ScryptParametersBuilder {
    pub fn with_salt(mut self, salt: &[u8]) -> Self {
        self.params.salt.zeroize();
        self.params.salt.extend_from_slice(salt);
        self
    }

    /// Sets N.
    pub fn with_cost(mut self, cost: u64) -> Self {
        self.params.cost = cost;
        self
    }

    /// Sets r.
    pub fn with_block_size(mut self, block_size: u32) -> Self {
        self.params.block_size = block_size;
        self
    }

    /// Sets p.
    pub fn with_parallelism(mut self, parallelism: u32) -> Self {
        self.params.parallelism = parallelism;
        self
    }

    pub fn build(self) -> ScryptParameters {
        self.params
    }
}
