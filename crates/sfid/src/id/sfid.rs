use core::{fmt, ops::Range};

use crate::{Error, Field, Result};

/// Length of the binary form, in bytes.
pub const BYTE_LEN: usize = 16;

/// Length of the text form, in characters.
pub const ENCODED_LEN: usize = 26;

const TIMESTAMP: Range<usize> = 0..6;
const NODE: Range<usize> = 6..8;
const NONCE: Range<usize> = 8..13;
const SEQUENCE: Range<usize> = 13..16;

/// A 128-bit sortable identifier.
///
/// Fields are packed most significant first (network byte order):
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       timestamp (high 32)                     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     timestamp (low 16)        |             node              |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         nonce (high 32)                       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// | nonce (low 8) |                  sequence                     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The in-memory bytes are the wire bytes, so ordering is plain byte-wise
/// comparison. That is the same as comparing the values as big-endian `u128`s
/// and the same as comparing their text forms as strings.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Sfid([u8; BYTE_LEN]);

impl Sfid {
    /// Length of the binary form, in bytes.
    pub const BYTE_LEN: usize = BYTE_LEN;

    /// Length of the text form, in characters.
    pub const ENCODED_LEN: usize = ENCODED_LEN;

    /// Largest timestamp, in milliseconds since the Unix epoch (year 10889).
    pub const MAX_TIMESTAMP: u64 = (1 << 48) - 1;

    /// Largest nonce (40 bits).
    pub const MAX_NONCE: u64 = (1 << 40) - 1;

    /// Largest sequence number (24 bits).
    pub const MAX_SEQUENCE: u32 = (1 << 24) - 1;

    /// The all-zero identifier.
    pub const NIL: Self = Self([0x00; BYTE_LEN]);

    /// The all-ones identifier, `7ZZZZZZZZZZZZZZZZZZZZZZZZZ` as text.
    pub const MAX: Self = Self([0xFF; BYTE_LEN]);

    /// Wraps 16 raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; BYTE_LEN]) -> Self {
        Self(bytes)
    }

    /// Builds an identifier from its four fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] for the first of `timestamp`, `nonce` or
    /// `sequence` that does not fit its bit width.
    ///
    /// # Example
    ///
    /// ```
    /// use sfid::Sfid;
    ///
    /// let id = Sfid::from_components(1_700_000_000_000, 100, 123_456_789, 7)?;
    /// assert_eq!(id.node(), 100);
    /// assert_eq!(id.sequence(), 7);
    /// # Ok::<(), sfid::Error>(())
    /// ```
    pub fn from_components(timestamp: u64, node: u16, nonce: u64, sequence: u32) -> Result<Self> {
        let mut id = Self::NIL;
        id.set_timestamp(timestamp)?;
        id.set_node(node);
        id.set_nonce(nonce)?;
        id.set_sequence(sequence)?;
        Ok(id)
    }

    /// Packs already validated fields. Bits above each field's width are
    /// dropped.
    #[cfg(any(feature = "std", test))]
    pub(crate) const fn from_parts(timestamp: u64, node: u16, nonce: u64, sequence: u32) -> Self {
        let mut bytes = [0_u8; BYTE_LEN];
        write_be(&mut bytes, TIMESTAMP, timestamp);
        write_be(&mut bytes, NODE, node as u64);
        write_be(&mut bytes, NONCE, nonce);
        write_be(&mut bytes, SEQUENCE, sequence as u64);
        Self(bytes)
    }

    /// Copies an identifier out of a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLen`] unless `bytes` is exactly 16 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        <[u8; BYTE_LEN]>::try_from(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidLen { len: bytes.len() })
    }

    /// Returns a reference to the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; BYTE_LEN] {
        &self.0
    }

    /// Returns a copy of the underlying bytes.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; BYTE_LEN] {
        self.0
    }

    /// Writes the binary form into `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferLen`] unless `buf` is exactly 16 bytes long.
    pub fn encode_binary_to(&self, buf: &mut [u8]) -> Result<()> {
        if buf.len() != BYTE_LEN {
            return Err(Error::BufferLen { len: buf.len() });
        }
        buf.copy_from_slice(&self.0);
        Ok(())
    }

    /// Milliseconds since the Unix epoch.
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        read_be(&self.0, TIMESTAMP)
    }

    /// The node id.
    #[must_use]
    pub const fn node(&self) -> u16 {
        read_be(&self.0, NODE) as u16
    }

    /// The 40-bit nonce.
    #[must_use]
    pub const fn nonce(&self) -> u64 {
        read_be(&self.0, NONCE)
    }

    /// The 24-bit sequence number.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        read_be(&self.0, SEQUENCE) as u32
    }

    /// Sets the timestamp, leaving the other fields untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `ms` exceeds [`Self::MAX_TIMESTAMP`].
    pub fn set_timestamp(&mut self, ms: u64) -> Result<()> {
        if ms > Self::MAX_TIMESTAMP {
            return Err(Error::out_of_range(
                Field::Timestamp,
                ms,
                Self::MAX_TIMESTAMP,
            ));
        }
        write_be(&mut self.0, TIMESTAMP, ms);
        Ok(())
    }

    /// Sets the node id, leaving the other fields untouched.
    pub fn set_node(&mut self, node: u16) {
        write_be(&mut self.0, NODE, u64::from(node));
    }

    /// Sets the nonce, leaving the other fields untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `nonce` exceeds [`Self::MAX_NONCE`].
    pub fn set_nonce(&mut self, nonce: u64) -> Result<()> {
        if nonce > Self::MAX_NONCE {
            return Err(Error::out_of_range(Field::Nonce, nonce, Self::MAX_NONCE));
        }
        write_be(&mut self.0, NONCE, nonce);
        Ok(())
    }

    /// Sets the sequence number, leaving the other fields untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `sequence` exceeds
    /// [`Self::MAX_SEQUENCE`].
    pub fn set_sequence(&mut self, sequence: u32) -> Result<()> {
        if sequence > Self::MAX_SEQUENCE {
            return Err(Error::out_of_range(
                Field::Sequence,
                u64::from(sequence),
                u64::from(Self::MAX_SEQUENCE),
            ));
        }
        write_be(&mut self.0, SEQUENCE, u64::from(sequence));
        Ok(())
    }

    /// Returns the timestamp as a [`std::time::SystemTime`].
    ///
    /// Precision is whole milliseconds.
    #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
    #[cfg(feature = "std")]
    #[must_use]
    pub fn datetime(&self) -> std::time::SystemTime {
        std::time::UNIX_EPOCH + core::time::Duration::from_millis(self.timestamp())
    }
}

const fn read_be(bytes: &[u8; BYTE_LEN], range: Range<usize>) -> u64 {
    let mut acc = 0_u64;
    let mut i = range.start;
    while i < range.end {
        acc = (acc << 8) | bytes[i] as u64;
        i += 1;
    }
    acc
}

const fn write_be(bytes: &mut [u8; BYTE_LEN], range: Range<usize>, mut value: u64) {
    let mut i = range.end;
    while i > range.start {
        i -= 1;
        bytes[i] = value as u8;
        value >>= 8;
    }
}

impl fmt::Debug for Sfid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sfid")
            .field("timestamp", &self.timestamp())
            .field("node", &self.node())
            .field("nonce", &self.nonce())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl From<[u8; BYTE_LEN]> for Sfid {
    fn from(bytes: [u8; BYTE_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<Sfid> for [u8; BYTE_LEN] {
    fn from(id: Sfid) -> Self {
        id.0
    }
}

impl From<u128> for Sfid {
    fn from(raw: u128) -> Self {
        Self(raw.to_be_bytes())
    }
}

impl From<Sfid> for u128 {
    fn from(id: Sfid) -> Self {
        Self::from_be_bytes(id.0)
    }
}

impl TryFrom<&[u8]> for Sfid {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_slice(bytes)
    }
}

impl AsRef<[u8]> for Sfid {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
