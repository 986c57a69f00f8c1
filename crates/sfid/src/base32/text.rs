use core::{fmt, ops::Deref, str::FromStr};

use super::{Base32Error, decode_base32, encode_base32, first_invalid};
use crate::{ENCODED_LEN, Error, Result, Sfid};

/// The largest first character a 26-symbol text form may start with. The two
/// high bits of the leading symbol fall outside 128 bits and must be zero.
const MAX_FIRST: u8 = b'7';

impl Sfid {
    /// Parses the 26-character text form.
    ///
    /// This is the lenient decoder: bytes outside the alphabet are not
    /// rejected. They decode through a sentinel value so the same input
    /// always gives the same identifier. Use [`Sfid::parse_strict`] for
    /// untrusted input.
    ///
    /// # Errors
    ///
    /// - [`Base32Error::DecodeInvalidLen`] if `s` is not 26 bytes long.
    /// - [`Base32Error::DecodeOverflow`] if the first byte is greater than
    ///   `'7'`.
    ///
    /// # Example
    ///
    /// ```
    /// use sfid::Sfid;
    ///
    /// let id = Sfid::parse("0000000000000000000000000A")?;
    /// assert_eq!(id.sequence(), 10);
    /// # Ok::<(), sfid::Error>(())
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let encoded = fixed_len(s)?;
        check_overflow(encoded)?;
        Ok(Self::from_bytes(decode_base32(encoded)))
    }

    /// Parses the 26-character text form, rejecting any byte outside the
    /// alphabet.
    ///
    /// Lower-case letters are accepted and decode like their upper-case form.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    ///
    /// - [`Base32Error::DecodeInvalidLen`] if `s` is not 26 bytes long.
    /// - [`Base32Error::DecodeInvalidAscii`] for the first byte outside the
    ///   alphabet.
    /// - [`Base32Error::DecodeOverflow`] if the first byte is greater than
    ///   `'7'`.
    pub fn parse_strict(s: &str) -> Result<Self> {
        let encoded = fixed_len(s)?;
        if let Some((index, byte)) = first_invalid(encoded) {
            return Err(Base32Error::DecodeInvalidAscii { byte, index }.into());
        }
        check_overflow(encoded)?;
        Ok(Self::from_bytes(decode_base32(encoded)))
    }

    /// Like [`Sfid::parse`] but panics on error.
    ///
    /// Meant for identifiers hard-coded in source or tests.
    ///
    /// # Panics
    ///
    /// Panics with the error message if `s` cannot be parsed.
    #[track_caller]
    #[must_use]
    pub fn must_parse(s: &str) -> Self {
        match Self::parse(s) {
            Ok(id) => id,
            Err(e) => panic!("{e}"),
        }
    }

    /// Like [`Sfid::parse_strict`] but panics on error.
    ///
    /// # Panics
    ///
    /// Panics with the error message if `s` cannot be parsed.
    #[track_caller]
    #[must_use]
    pub fn must_parse_strict(s: &str) -> Self {
        match Self::parse_strict(s) {
            Ok(id) => id,
            Err(e) => panic!("{e}"),
        }
    }

    /// Returns the 26 ASCII bytes of the text form.
    #[must_use]
    pub fn to_text_bytes(&self) -> [u8; ENCODED_LEN] {
        let mut buf = [0_u8; ENCODED_LEN];
        encode_base32(self.as_bytes(), &mut buf);
        buf
    }

    /// Returns the text form as a stack-allocated string.
    ///
    /// # Example
    ///
    /// ```
    /// use sfid::Sfid;
    ///
    /// assert_eq!(Sfid::MAX.encode(), "7ZZZZZZZZZZZZZZZZZZZZZZZZZ");
    /// assert_eq!(Sfid::NIL.encode().len(), 26);
    /// ```
    #[must_use]
    pub fn encode(&self) -> SfidStr {
        SfidStr(self.to_text_bytes())
    }

    /// Writes the text form into `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`Base32Error::EncodeInvalidLen`] unless `buf` is exactly 26
    /// bytes long.
    pub fn encode_to_buf(&self, buf: &mut [u8]) -> Result<()> {
        let len = buf.len();
        let out: &mut [u8; ENCODED_LEN] = buf
            .try_into()
            .map_err(|_| Base32Error::EncodeInvalidLen { len })?;
        encode_base32(self.as_bytes(), out);
        Ok(())
    }
}

#[inline]
fn fixed_len(s: &str) -> Result<&[u8; ENCODED_LEN]> {
    s.as_bytes()
        .try_into()
        .map_err(|_| Base32Error::DecodeInvalidLen { len: s.len() }.into())
}

#[inline]
fn check_overflow(encoded: &[u8; ENCODED_LEN]) -> Result<(), Base32Error> {
    if encoded[0] > MAX_FIRST {
        return Err(Base32Error::DecodeOverflow { byte: encoded[0] });
    }
    Ok(())
}

/// The text form of an [`Sfid`], held on the stack.
///
/// Dereferences to [`str`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SfidStr([u8; ENCODED_LEN]);

impl SfidStr {
    /// Returns a `&str` view of the text form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // SAFETY: `self.0` only ever holds bytes from the ASCII alphabet
        unsafe { core::str::from_utf8_unchecked(&self.0) }
    }

    /// Returns the underlying ASCII bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ENCODED_LEN] {
        &self.0
    }
}

impl Deref for SfidStr {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for SfidStr {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SfidStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for SfidStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl PartialEq<str> for SfidStr {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for SfidStr {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<SfidStr> for str {
    fn eq(&self, other: &SfidStr) -> bool {
        self == other.as_str()
    }
}

impl PartialEq<SfidStr> for &str {
    fn eq(&self, other: &SfidStr) -> bool {
        *self == other.as_str()
    }
}

impl fmt::Display for Sfid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encode().as_str())
    }
}

impl FromStr for Sfid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_strict(s)
    }
}

impl TryFrom<&str> for Sfid {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse_strict(s)
    }
}
