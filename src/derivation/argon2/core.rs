use core::fmt;

use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use super::boundary::{finalize, initial_hash, seed_lanes};
use super::memory::{Memory, Schedule};
use super::params::Argon2Parameters;
use crate::derivation::buffer::try_zeroed;
use crate::derivation::cancel::CancellationToken;
use crate::derivation::error::{DerivationError, ParamError};

/// Smallest tag Argon2 will produce, in bytes. Requests must exceed 4.
pub const MIN_OUTPUT_LEN: usize = 5;

/// Largest tag Argon2 will produce, in bytes (the length is hashed as a
/// 32-bit value).
pub const MAX_OUTPUT_LEN: u64 = u32::MAX as u64;

/// An Argon2 key derivation engine.
///
/// The engine validates its parameters and allocates the whole memory
/// matrix when it is built, so a successful [`Argon2::new`] means every
/// later derivation has the memory it needs. Each call to
/// [`get_bytes`](Argon2::get_bytes) runs the full algorithm and wipes the
/// matrix afterwards; the engine can then be reused with a different output
/// length.
///
/// Cloning deep-copies the password, the parameters and the matrix, so
/// clones never share sensitive state.
#[derive(Clone)]
pub struct Argon2 {
    password: Zeroizing<Vec<u8>>,
    params: Argon2Parameters,
    schedule: Schedule,
    memory: Memory,
    cleared: bool,
}

impl Argon2 {
    /// Validates `params` and allocates the memory matrix.
    ///
    /// Fails with [`DerivationError::InvalidParams`] on a bad parameter
    /// combination and with [`DerivationError::AllocationFailed`] if the
    /// matrix cannot be reserved.
    pub fn new(password: &[u8], params: &Argon2Parameters) -> Result<Self, DerivationError> {
        params.validate()?;

        if u32::try_from(password.len()).is_err() {
            return Err(ParamError::InputTooLong("password").into());
        }

        let schedule = Schedule::new(params);
        let memory = Memory::allocate(&schedule.layout)?;

        debug!(
            kind = ?schedule.kind,
            version = ?schedule.version,
            lanes = schedule.layout.lanes,
            lane_len = schedule.layout.lane_len,
            segment_len = schedule.layout.segment_len,
            iterations = schedule.iterations,
            "argon2 engine ready"
        );

        Ok(Self {
            password: Zeroizing::new(password.to_vec()),
            params: params.clone(),
            schedule,
            memory,
            cleared: false,
        })
    }

    /// The parameters this engine was built with.
    pub fn parameters(&self) -> &Argon2Parameters {
        &self.params
    }

    /// Derives `len` bytes.
    ///
    /// `len` must be at least [`MIN_OUTPUT_LEN`].
    pub fn get_bytes(&mut self, len: usize) -> Result<Zeroizing<Vec<u8>>, DerivationError> {
        self.derive(len, None)
    }

    /// Like [`get_bytes`](Self::get_bytes), but gives up with
    /// [`DerivationError::Cancelled`] once `token` is cancelled. The token
    /// is checked before every slice of every pass.
    pub fn get_bytes_cancellable(
        &mut self,
        len: usize,
        token: &CancellationToken,
    ) -> Result<Zeroizing<Vec<u8>>, DerivationError> {
        self.derive(len, Some(token))
    }

    /// Runs the derivation on a blocking worker of the current Tokio
    /// runtime.
    ///
    /// The worker gets the password and parameters only and reserves its
    /// own matrix, so a failed reservation comes back as
    /// [`DerivationError::AllocationFailed`]. `self` stays usable while the
    /// derivation is in flight.
    #[cfg(feature = "async")]
    pub async fn get_bytes_async(
        &self,
        len: usize,
        token: CancellationToken,
    ) -> Result<Zeroizing<Vec<u8>>, DerivationError> {
        if self.cleared {
            return Err(DerivationError::Cleared);
        }

        let password = self.password.clone();
        let params = self.params.clone();
        tokio::task::spawn_blocking(move || {
            Argon2::new(&password, &params)?.get_bytes_cancellable(len, &token)
        })
        .await
        .map_err(|e| DerivationError::WorkerFailed(e.to_string()))?
    }

    /// Zeroes the password, the salt/secret/associated data and the memory
    /// matrix. Derivations fail with [`DerivationError::Cleared`]
    /// afterwards. Calling it again is a no-op.
    pub fn clear(&mut self) {
        self.password.as_mut_slice().zeroize();
        self.params.clear();
        self.memory.wipe();
        self.cleared = true;
    }

    fn derive(
        &mut self,
        len: usize,
        cancel: Option<&CancellationToken>,
    ) -> Result<Zeroizing<Vec<u8>>, DerivationError> {
        if self.cleared {
            return Err(DerivationError::Cleared);
        }

        if len < MIN_OUTPUT_LEN {
            return Err(DerivationError::OutputTooShort {
                requested: len,
                minimum: MIN_OUTPUT_LEN,
            });
        }

        if len as u64 > MAX_OUTPUT_LEN {
            return Err(DerivationError::OutputTooLong {
                requested: len,
                maximum: MAX_OUTPUT_LEN,
            });
        }

        let mut out = try_zeroed::<u8>(len)?;

        let h0 = initial_hash(&self.password, &self.params, len as u32);
        seed_lanes(&mut self.memory, &self.schedule.layout, &h0);

        let filled = self.memory.fill(&self.schedule, cancel);
        if filled.is_ok() {
            finalize(&self.memory, &self.schedule.layout, &mut out);
        }

        self.memory.wipe();
        filled.map(|()| out)
    }
}

impl fmt::Debug for Argon2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argon2")
            .field("params", &self.params)
            .field("memory_blocks", &self.schedule.layout.total_blocks)
            .field("cleared", &self.cleared)
            .finish_non_exhaustive()
    }
}

/// Computes an Argon2 tag of `len` bytes in one call.
///
/// # Arguments
///
/// * `password` - The password to hash
/// * `params` - Argon2 parameters (type, version, salt, memory, time,
///   parallelism)
/// * `len` - Length of the derived key in bytes (more than 4)
///
/// # Example
///
/// ```rust
/// use cryptal::derivation::{Argon2Parameters, Argon2Type, argon2};
///
/// let params = Argon2Parameters::builder()
///     .with_type(Argon2Type::Hybrid)
///     .with_salt(b"random_salt_16b!")
///     .with_memory_kib(64)
///     .with_iterations(1)
///     .build();
///
/// let key = argon2(b"my_password", &params, 32).unwrap();
/// assert_eq!(key.len(), 32);
/// ```
pub fn argon2(
    password: &[u8],
    params: &Argon2Parameters,
    len: usize,
) -> Result<Zeroizing<Vec<u8>>, DerivationError> {
    Argon2::new(password, params)?.get_bytes(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::argon2::params::Argon2Type;

    fn engine() -> Argon2 {
        let params = Argon2Parameters::builder()
            .with_type(Argon2Type::Hybrid)
            .with_salt(&[0x02; 16])
            .with_secret(&[0x03; 8])
            .with_additional(&[0x04; 12])
            .with_memory_kib(32)
            .with_parallelism(4)
            .with_iterations(3)
            .build();
        Argon2::new(&[0x01; 32], &params).unwrap()
    }

    #[test]
    fn matrix_is_wiped_after_derivation() {
        let mut argon2 = engine();
        argon2.get_bytes(32).unwrap();
        assert!(argon2.memory.is_zeroed());
    }

    #[test]
    fn clear_twice_leaves_buffers_zeroed() {
        let mut argon2 = engine();
        argon2.get_bytes(32).unwrap();

        argon2.clear();
        argon2.clear();

        assert_eq!(argon2.password.len(), 32);
        assert!(argon2.password.iter().all(|b| *b == 0));
        assert!(argon2.params.salt().iter().all(|b| *b == 0));
        assert!(argon2.params.secret().iter().all(|b| *b == 0));
        assert!(argon2.params.additional().iter().all(|b| *b == 0));
        assert!(argon2.memory.is_zeroed());
        assert!(matches!(argon2.get_bytes(32), Err(DerivationError::Cleared)));
    }

    #[test]
    fn cancelled_derivation_wipes_matrix() {
        let mut argon2 = engine();
        let token = CancellationToken::new();
        token.cancel();

        let result = argon2.get_bytes_cancellable(32, &token);
        assert!(matches!(result, Err(DerivationError::Cancelled)));
        assert!(argon2.memory.is_zeroed());

        // The engine is still usable after a cancelled run.
        assert_eq!(argon2.get_bytes(32).unwrap().len(), 32);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn async_worker_leaves_engine_matrix_alone() {
        let mut argon2 = engine();
        let expected = argon2.get_bytes(32).unwrap();

        let from_worker = argon2
            .get_bytes_async(32, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(from_worker, expected);
        assert!(argon2.memory.is_zeroed());

        argon2.clear();
        assert!(matches!(
            argon2.get_bytes_async(32, CancellationToken::new()).await,
            Err(DerivationError::Cleared)
        ));
    }

    #[test]
    fn clone_does_not_share_password() {
        let mut original = engine();
        let mut copy = original.clone();

        original.clear();
        assert!(copy.password.iter().all(|b| *b == 0x01));
        assert_eq!(copy.get_bytes(16).unwrap().len(), 16);
    }
}
