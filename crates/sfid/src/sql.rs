//! Binding to database drivers.
//!
//! Drivers hand scanners a loosely typed column value. [`ScanSource`] models
//! the shapes such a value can take, so a driver adapter only has to map its
//! own value type onto it and call [`Sfid::scan`]. Identifiers are stored as
//! their 16-byte binary form.

use crate::{Error, Result, Sfid};

/// A column value read from a database row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScanSource<'a> {
    /// SQL `NULL`.
    Null,
    /// A text column.
    Text(&'a str),
    /// A binary column.
    Bytes(&'a [u8]),
    /// An integer column. Not a valid source for an [`Sfid`].
    Integer(i64),
    /// A floating point column. Not a valid source for an [`Sfid`].
    Float(f64),
    /// A boolean column. Not a valid source for an [`Sfid`].
    Bool(bool),
}

impl ScanSource<'_> {
    /// Short name of the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
        }
    }
}

impl<'a> From<&'a str> for ScanSource<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<&'a [u8]> for ScanSource<'a> {
    fn from(b: &'a [u8]) -> Self {
        Self::Bytes(b)
    }
}

impl<'a, T> From<Option<T>> for ScanSource<'a>
where
    T: Into<ScanSource<'a>>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl Sfid {
    /// Overwrites `self` with a value read from the database.
    ///
    /// - `Null` leaves `self` unchanged.
    /// - `Text` goes through the lenient [`Sfid::parse`].
    /// - `Bytes` goes through [`Sfid::from_slice`].
    ///
    /// On error `self` is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedSource`] for any other kind of value, or the
    /// decoding error from the text or binary path.
    ///
    /// # Example
    ///
    /// ```
    /// use sfid::{ScanSource, Sfid};
    ///
    /// let mut id = Sfid::NIL;
    /// id.scan(ScanSource::Text("0000000000000000000000000A"))?;
    /// assert_eq!(id.sequence(), 10);
    ///
    /// id.scan(ScanSource::Null)?;
    /// assert_eq!(id.sequence(), 10);
    /// # Ok::<(), sfid::Error>(())
    /// ```
    pub fn scan(&mut self, src: ScanSource<'_>) -> Result<()> {
        *self = match src {
            ScanSource::Null => return Ok(()),
            ScanSource::Text(s) => Self::parse(s)?,
            ScanSource::Bytes(b) => Self::from_slice(b)?,
            other => return Err(Error::UnsupportedSource { kind: other.kind() }),
        };
        Ok(())
    }

    /// The value to bind when writing to the database: always the 16-byte
    /// binary form, [`Sfid::NIL`] included.
    #[must_use]
    pub const fn to_storage_value(&self) -> [u8; crate::BYTE_LEN] {
        self.to_bytes()
    }
}
