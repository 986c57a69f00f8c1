use core::fmt;

use crate::base32::Base32Error;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The bounded fields of an [`Sfid`](crate::Sfid).
///
/// The node field spans the full `u16` range and can never be out of range,
/// so it has no variant here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// The 48-bit millisecond timestamp.
    Timestamp,
    /// The 40-bit per-generator nonce.
    Nonce,
    /// The 24-bit per-millisecond sequence number.
    Sequence,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Timestamp => "timestamp",
            Self::Nonce => "nonce",
            Self::Sequence => "sequence",
        })
    }
}

/// All error variants that `sfid` can emit.
///
/// Every variant is a deterministic function of its input. None of them are
/// worth retrying.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The text form could not be decoded or encoded.
    #[error(transparent)]
    Base32(#[from] Base32Error),

    /// A binary buffer handed to [`Sfid::from_slice`] is not exactly 16 bytes.
    ///
    /// [`Sfid::from_slice`]: crate::Sfid::from_slice
    #[error("bad data size: expected 16 bytes, got {len}")]
    InvalidLen {
        /// Length of the rejected input.
        len: usize,
    },

    /// A destination buffer for the binary form is not exactly 16 bytes.
    #[error("bad buffer size: expected 16 bytes, got {len}")]
    BufferLen {
        /// Length of the rejected buffer.
        len: usize,
    },

    /// A field value does not fit its bit width.
    #[error("{field} {value} exceeds maximum {max}")]
    OutOfRange {
        /// The field being written.
        field: Field,
        /// The rejected value.
        value: u64,
        /// The largest value the field can hold.
        max: u64,
    },

    /// [`Sfid::scan`] was handed something other than text or bytes.
    ///
    /// [`Sfid::scan`]: crate::Sfid::scan
    #[error("unsupported scan source {kind}: expected a string or byte slice")]
    UnsupportedSource {
        /// Name of the rejected source kind.
        kind: &'static str,
    },

    /// The generator lock was poisoned by a panicking thread.
    ///
    /// `parking_lot` mutexes do not poison, so this variant only exists when
    /// the generator uses the standard library mutex.
    #[cfg_attr(docsrs, doc(cfg(all(feature = "std", not(feature = "parking-lot")))))]
    #[cfg(all(feature = "std", not(feature = "parking-lot")))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

impl Error {
    pub(crate) const fn out_of_range(field: Field, value: u64, max: u64) -> Self {
        Self::OutOfRange { field, value, max }
    }
}

#[cfg(all(feature = "std", not(feature = "parking-lot")))]
use std::sync::{MutexGuard, PoisonError};

#[cfg(all(feature = "std", not(feature = "parking-lot")))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
