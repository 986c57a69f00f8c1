/// Errors produced while converting an [`Sfid`](crate::Sfid) to or from its
/// 26-character text form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Base32Error {
    /// The input is not exactly 26 characters long.
    #[error("bad data size: expected 26 characters, got {len}")]
    DecodeInvalidLen {
        /// Length of the rejected input, in bytes.
        len: usize,
    },

    /// The input contains a byte outside the alphabet. Only reported by the
    /// strict parsers.
    #[error("bad data character {byte:#04x} at index {index}")]
    DecodeInvalidAscii {
        /// The offending byte.
        byte: u8,
        /// Its position in the input.
        index: usize,
    },

    /// The leading character sets one of the two bits above bit 128.
    #[error("overflow: leading character {byte:#04x} is larger than '7'")]
    DecodeOverflow {
        /// The leading byte of the input.
        byte: u8,
    },

    /// The destination buffer for the text form is not exactly 26 bytes.
    #[error("bad buffer size: expected 26 bytes, got {len}")]
    EncodeInvalidLen {
        /// Length of the rejected buffer.
        len: usize,
    },
}
