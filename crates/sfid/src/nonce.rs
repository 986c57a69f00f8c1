use rand::{Rng, rng};

use crate::Sfid;

/// Draws a uniformly random 40-bit nonce from the thread-local RNG.
///
/// Pick one per process (or per generator) when nonces are not assigned
/// centrally. Two generators sharing a node id then still produce distinct
/// ids with high probability.
///
/// # Example
///
/// ```
/// use sfid::{Sfid, SfidGenerator, SystemClock, random_nonce};
///
/// let nonce = random_nonce();
/// assert!(nonce <= Sfid::MAX_NONCE);
/// let generator = SfidGenerator::new(1, nonce, SystemClock)?;
/// # Ok::<(), sfid::Error>(())
/// ```
#[must_use]
pub fn random_nonce() -> u64 {
    rng().random::<u64>() & Sfid::MAX_NONCE
}
