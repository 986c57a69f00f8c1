//! # sfid
//!
//! Sortable 128-bit identifiers with a lock-based monotonic generator.
//!
//! An [`Sfid`] packs four fields, most significant first:
//!
//! | Field       | Bits | Meaning                                         |
//! |-------------|------|-------------------------------------------------|
//! | `timestamp` | 48   | milliseconds since the Unix epoch               |
//! | `node`      | 16   | id of the machine or process                    |
//! | `nonce`     | 40   | per-generator value, usually random             |
//! | `sequence`  | 24   | counter within one millisecond                  |
//!
//! Ids compare byte-wise, so sorting by id sorts by creation time. The
//! 26-character text form uses the alphabet
//! `0123456789ABCDEFGHJKMNPQRSTVWXYZ` and sorts the same way as the ids.
//!
//! ## Generating
//!
//! ```
//! # #[cfg(feature = "parking-lot")] {
//! use sfid::{MonotonicClock, SfidGenerator, random_nonce};
//!
//! let generator = SfidGenerator::new(7, random_nonce(), MonotonicClock::new()).unwrap();
//! let a = generator.next_id();
//! let b = generator.next_id();
//! assert!(a < b);
//! assert!(a.encode().as_str() < b.encode().as_str());
//! # }
//! ```
//!
//! ## Encoding
//!
//! ```
//! use sfid::Sfid;
//!
//! let id = Sfid::from_components(1_700_000_000_000, 7, 42, 0)?;
//! let text = id.encode();
//! assert_eq!(text.len(), 26);
//! assert_eq!(text.parse::<Sfid>()?, id);
//! assert_eq!(Sfid::from_slice(&id.to_bytes())?, id);
//! # Ok::<(), sfid::Error>(())
//! ```
//!
//! ## Features
//!
//! - `std` (default): generator, time sources, [`random_nonce`].
//! - `parking-lot` (default): `parking_lot` mutex and infallible
//!   `next_id`. Without it the generator uses `std::sync::Mutex` and only
//!   `try_next_id` is available.
//! - `tracing`: spans and events in the generator.
//! - `serde`: `Serialize` / `Deserialize` for [`Sfid`].
//!
//! Without `std` the codec and [`sql`] binding are `no_std`.
#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod base32;
mod error;
#[cfg(feature = "std")]
mod generator;
mod id;
#[cfg(feature = "std")]
mod nonce;
#[cfg(feature = "serde")]
mod serde;
pub mod sql;
mod time;

pub use crate::base32::{ALPHABET, Base32Error, SfidStr};
pub use crate::error::*;
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[cfg(feature = "std")]
pub use crate::generator::*;
pub use crate::id::*;
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[cfg(feature = "std")]
pub use crate::nonce::*;
pub use crate::sql::ScanSource;
pub use crate::time::*;
