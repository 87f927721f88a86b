use core::fmt;

use tracing::{debug, trace};
use zeroize::{Zeroize, Zeroizing};

use super::params::{BLOCK_UNIT, ScryptParameters};
use super::romix::mix_lanes;
use crate::derivation::buffer::try_zeroed;
use crate::derivation::cancel::CancellationToken;
use crate::derivation::error::DerivationError;
use crate::hash::pbkdf2_sha256;

/// Smallest key scrypt will produce, in bytes.
pub const MIN_OUTPUT_LEN: usize = 1;

/// Largest key PBKDF2-HMAC-SHA-256 can produce: `(2^32 - 1) × 32` bytes.
pub const MAX_OUTPUT_LEN: u64 = (u32::MAX as u64) * 32;

/// A scrypt key derivation engine.
///
/// Parameters are validated when the engine is built. The working memory
/// (`p` lane blocks plus one `N`-block table per lane) is allocated for each
/// derivation and zeroed as soon as it is no longer needed.
///
/// Cloning deep-copies the password and the parameters.
#[derive(Clone)]
pub struct Scrypt {
    password: Zeroizing<Vec<u8>>,
    params: ScryptParameters,
    cleared: bool,
}

impl Scrypt {
    /// Validates `params` and takes a private copy of the password.
    pub fn new(password: &[u8], params: &ScryptParameters) -> Result<Self, DerivationError> {
        params.validate()?;

        debug!(
            cost = params.cost(),
            block_size = params.block_size(),
            parallelism = params.parallelism(),
            "scrypt engine ready"
        );

        Ok(Self {
            password: Zeroizing::new(password.to_vec()),
            params: params.clone(),
            cleared: false,
        })
    }

    /// The parameters this engine was built with.
    pub fn parameters(&self) -> &ScryptParameters {
        &self.params
    }

    /// Derives `len` bytes. `len` must be at least [`MIN_OUTPUT_LEN`].
    pub fn get_bytes(&self, len: usize) -> Result<Zeroizing<Vec<u8>>, DerivationError> {
        self.derive(len, None)
    }

    /// Like [`get_bytes`](Self::get_bytes), but gives up with
    /// [`DerivationError::Cancelled`] once `token` is cancelled. The token
    /// is checked before each lane starts mixing.
    pub fn get_bytes_cancellable(
        &self,
        len: usize,
        token: &CancellationToken,
    ) -> Result<Zeroizing<Vec<u8>>, DerivationError> {
        self.derive(len, Some(token))
    }

    /// Runs the derivation on a blocking worker of the current Tokio
    /// runtime.
    #[cfg(feature = "async")]
    pub async fn get_bytes_async(
        &self,
        len: usize,
        token: CancellationToken,
    ) -> Result<Zeroizing<Vec<u8>>, DerivationError> {
        let engine = self.clone();
        tokio::task::spawn_blocking(move || engine.get_bytes_cancellable(len, &token))
            .await
            .map_err(|e| DerivationError::WorkerFailed(e.to_string()))?
    }

    /// Zeroes the password and the salt. Derivations fail with
    /// [`DerivationError::Cleared`] afterwards. Calling it again is a no-op.
    pub fn clear(&mut self) {
        self.password.as_mut_slice().zeroize();
        self.params.clear();
        self.cleared = true;
    }

    fn derive(
        &self,
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

        // Validation bounds N below 2^32 and p × 128 × r below 2^31.
        let n = self.params.cost() as usize;
        let r = self.params.block_size() as usize;
        let p = self.params.parallelism() as usize;
        let lane_bytes = BLOCK_UNIT * r;

        trace!(n, r, p, len, "scrypt derivation");

        let mut expanded = try_zeroed::<u8>(lane_bytes * p)?;
        pbkdf2_sha256(&self.password, self.params.salt(), 1, &mut expanded);

        let mut words = try_zeroed::<u32>(expanded.len() / 4)?;
        for (word, chunk) in words.iter_mut().zip(expanded.chunks_exact(4)) {
            let mut le = [0u8; 4];
            le.copy_from_slice(chunk);
            *word = u32::from_le_bytes(le);
        }

        mix_lanes(&mut words, n, r, cancel)?;

        for (chunk, word) in expanded.chunks_exact_mut(4).zip(words.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }

        let mut out = try_zeroed::<u8>(len)?;
        pbkdf2_sha256(&self.password, &expanded, 1, &mut out);

        Ok(out)
    }
}

impl fmt::Debug for Scrypt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scrypt")
            .field("params", &self.params)
            .field("cleared", &self.cleared)
            .finish_non_exhaustive()
    }
}

/// Computes a scrypt key of `len` bytes in one call.
///
/// # Example
///
/// ```rust
/// use cryptal::derivation::{ScryptParameters, scrypt};
///
/// let params = ScryptParameters::builder()
///     .with_salt(b"NaCl")
///     .with_cost(16)
///     .with_block_size(1)
///     .with_parallelism(1)
///     .build();
///
/// let key = scrypt(b"password", &params, 64).unwrap();
/// assert_eq!(key.len(), 64);
/// ```
pub fn scrypt(
    password: &[u8],
    params: &ScryptParameters,
    len: usize,
) -> Result<Zeroizing<Vec<u8>>, DerivationError> {
    Scrypt::new(password, params)?.get_bytes(len)
}
