//! Parameter definitions and validation for Argon2.
//!
//! This module defines the configurable parameters for Argon2d, Argon2i and
//! Argon2id, a builder with the documented defaults, and the validation the
//! engine runs before it allocates any memory.

use core::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::memory::SYNC_POINTS;
use crate::derivation::error::ParamError;

/// Largest lane count the algorithm allows, inclusive: `2^24 - 1` is
/// accepted and `2^24` is rejected.
pub const MAX_LANES: u32 = 0x00FF_FFFF;

/// Minimum memory per lane, in KiB (blocks).
pub const MIN_MEMORY_PER_LANE: u32 = 2 * SYNC_POINTS;

/// How reference blocks are selected while filling memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Argon2Type {
    /// Argon2d: addresses depend on block contents.
    DataDependent,
    /// Argon2i: addresses come from a counter-driven generator.
    #[default]
    DataIndependent,
    /// Argon2id: independent for the first half of the first pass,
    /// dependent afterwards.
    Hybrid,
}

impl Argon2Type {
    /// Numeric identifier hashed into H0 and the address generator input.
    pub const fn as_u32(self) -> u32 {
        match self {
            Argon2Type::DataDependent => 0,
            Argon2Type::DataIndependent => 1,
            Argon2Type::Hybrid => 2,
        }
    }
}

impl TryFrom<u32> for Argon2Type {
    type Error = ParamError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Argon2Type::DataDependent),
            1 => Ok(Argon2Type::DataIndependent),
            2 => Ok(Argon2Type::Hybrid),
            other => Err(ParamError::UnknownType(other)),
        }
    }
}

/// Algorithm revision.
///
/// The two versions differ in a single place: from 0x13 on, passes after the
/// first XOR the new block into the existing one instead of overwriting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Argon2Version {
    /// Version 1.0 (0x10).
    V10,
    /// Version 1.3 (0x13).
    #[default]
    V13,
}

impl Argon2Version {
    /// Numeric identifier hashed into H0.
    pub const fn as_u32(self) -> u32 {
        match self {
            Argon2Version::V10 => 0x10,
            Argon2Version::V13 => 0x13,
        }
    }
}

impl TryFrom<u32> for Argon2Version {
    type Error = ParamError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0x10 => Ok(Argon2Version::V10),
            0x13 => Ok(Argon2Version::V13),
            other => Err(ParamError::UnknownVersion(other)),
        }
    }
}

/// Configuration parameters for the Argon2 algorithm.
///
/// These parameters control the memory and time cost of the function,
/// the addressing type and the algorithm version, plus the salt and the
/// optional keyed inputs. Instances are immutable: build them with
/// [`Argon2ParametersBuilder`]. Every byte string is copied on the way in
/// and wiped when the parameters are dropped or cleared.
///
/// # Recommended Values
///
/// For password hashing, OWASP recommends Argon2id with:
/// - `memory_kib`: 19456 (19 MiB) minimum, 47104 (46 MiB) for higher security
/// - `iterations`: 2 passes minimum
/// - `lanes`: 1 (single-threaded) or number of available cores
#[derive(Clone)]
pub struct Argon2Parameters {
    salt: Vec<u8>,
    secret: Vec<u8>,
    additional: Vec<u8>,
    iterations: u32,
    memory_kib: u32,
    lanes: u32,
    kind: Argon2Type,
    version: Argon2Version,
}

impl Argon2Parameters {
    /// Starts a builder with the default configuration.
    pub fn builder() -> Argon2ParametersBuilder {
        Argon2ParametersBuilder::default()
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Optional key (`K` in RFC 9106); empty when unset.
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// Optional associated data (`X` in RFC 9106); empty when unset.
    pub fn additional(&self) -> &[u8] {
        &self.additional
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Requested memory in KiB. This is a lower bound: see
    /// [`memory_blocks`](Self::memory_blocks) for what is actually used.
    pub fn memory_kib(&self) -> u32 {
        self.memory_kib
    }

    pub fn lanes(&self) -> u32 {
        self.lanes
    }

    pub fn argon2_type(&self) -> Argon2Type {
        self.kind
    }

    pub fn version(&self) -> Argon2Version {
        self.version
    }

    /// Number of 1 KiB blocks the memory matrix will hold.
    ///
    /// The requested memory is raised to `8 × lanes` if needed, then rounded
    /// down to a multiple of `4 × lanes` so every lane splits evenly into
    /// four segments.
    pub fn memory_blocks(&self) -> u32 {
        let lanes = u64::from(self.lanes.max(1));
        let minimum = u64::from(MIN_MEMORY_PER_LANE) * lanes;
        let requested = u64::from(self.memory_kib).max(minimum);
        let granule = u64::from(SYNC_POINTS) * lanes;

        ((requested / granule) * granule).min(u64::from(u32::MAX)) as u32
    }

    /// Zeroes the salt, secret and associated data in place.
    pub fn clear(&mut self) {
        self.salt.as_mut_slice().zeroize();
        self.secret.as_mut_slice().zeroize();
        self.additional.as_mut_slice().zeroize();
    }

    pub(crate) fn validate(&self) -> Result<(), ParamError> {
        if self.lanes < 1 {
            return Err(ParamError::TooFewLanes);
        }

        if self.lanes > MAX_LANES {
            return Err(ParamError::TooManyLanes(self.lanes));
        }

        if self.iterations < 1 {
            return Err(ParamError::TooFewIterations);
        }

        let minimum = u64::from(MIN_MEMORY_PER_LANE) * u64::from(self.lanes);
        if u64::from(self.memory_kib) < minimum {
            return Err(ParamError::MemoryTooSmall {
                memory_kib: self.memory_kib,
                minimum,
            });
        }

        for (name, input) in [
            ("salt", &self.salt),
            ("secret", &self.secret),
            ("associated data", &self.additional),
        ] {
            if u32::try_from(input.len()).is_err() {
                return Err(ParamError::InputTooLong(name));
            }
        }

        Ok(())
    }
}

/// Same as [`Argon2Parameters::clear`]: lengths are kept, contents zeroed.
impl Zeroize for Argon2Parameters {
    fn zeroize(&mut self) {
        self.clear();
    }
}

impl Drop for Argon2Parameters {
    fn drop(&mut self) {
        self.clear();
    }
}

impl ZeroizeOnDrop for Argon2Parameters {}

impl Default for Argon2Parameters {
    /// Default parameters: 4 MiB memory, 3 passes, 1 lane, Argon2i v1.3.
    fn default() -> Self {
        Self {
            salt: Vec::new(),
            secret: Vec::new(),
            additional: Vec::new(),
            iterations: 3,
            memory_kib: 4096,
            lanes: 1,
            kind: Argon2Type::DataIndependent,
            version: Argon2Version::V13,
        }
    }
}

impl fmt::Debug for Argon2Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argon2Parameters")
            .field("salt_len", &self.salt.len())
            .field("secret_len", &self.secret.len())
            .field("additional_len", &self.additional.len())
            .field("iterations", &self.iterations)
            .field("memory_kib", &self.memory_kib)
            .field("lanes", &self.lanes)
            .field("type", &self.kind)
            .field("version", &self.version)
            .finish()
    }
}

/// Builder for [`Argon2Parameters`].
///
/// Starts from the defaults (3 iterations, 4096 KiB, 1 lane,
/// [`Argon2Type::DataIndependent`], [`Argon2Version::V13`]). Nothing is
/// validated here; the engine checks the final combination when it is
/// constructed.
#[derive(Debug, Clone, Default)]
pub struct Argon2ParametersBuilder {
    params: Argon2Parameters,
}

impl Argon2ParametersBuilder {
    /// Starts a builder for the given addressing type.
    pub fn new(kind: Argon2Type) -> Self {
        Self::default().with_type(kind)
    }

    pub fn with_salt(mut self, salt: &[u8]) -> Self {
        replace_bytes(&mut self.params.salt, salt);
        self
    }

    pub fn with_secret(mut self, secret: &[u8]) -> Self {
        replace_bytes(&mut self.params.secret, secret);
        self
    }

    pub fn with_additional(mut self, additional: &[u8]) -> Self {
        replace_bytes(&mut self.params.additional, additional);
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.params.iterations = iterations;
        self
    }

    pub fn with_memory_kib(mut self, memory_kib: u32) -> Self {
        self.params.memory_kib = memory_kib;
        self
    }

    /// Sets the memory to `2^exponent` KiB, saturating at `u32::MAX`.
    pub fn with_memory_power_of_two(mut self, exponent: u32) -> Self {
        self.params.memory_kib = 1u32.checked_shl(exponent).unwrap_or(u32::MAX);
        self
    }

    /// Sets the number of lanes.
    pub fn with_parallelism(mut self, lanes: u32) -> Self {
        self.params.lanes = lanes;
        self
    }

    pub fn with_type(mut self, kind: Argon2Type) -> Self {
        self.params.kind = kind;
        self
    }

    pub fn with_version(mut self, version: Argon2Version) -> Self {
        self.params.version = version;
        self
    }

    pub fn build(self) -> Argon2Parameters {
        self.params
    }
}

fn replace_bytes(slot: &mut Vec<u8>, bytes: &[u8]) {
    slot.zeroize();
    slot.extend_from_slice(bytes);
}
