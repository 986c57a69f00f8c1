use crate::id::{BYTE_LEN, ENCODED_LEN};

/// The 32-symbol sortable alphabet. A symbol's position is its value.
///
/// `I`, `L`, `O` and `U` are left out to avoid visual ambiguity.
pub const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Sentinel for bytes outside the alphabet.
pub(crate) const NO_VALUE: u8 = 0xFF;

const BITS_PER_CHAR: usize = 5;

/// 26 symbols carry 130 bits; the two leading ones are always zero.
const PAD_BITS: usize = ENCODED_LEN * BITS_PER_CHAR - BYTE_LEN * 8;

/// Byte to symbol value table. Lower-case letters decode like their
/// upper-case form.
pub(crate) const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    while i < 32 {
        let c = ALPHABET[i as usize];
        lut[c as usize] = i;
        if c.is_ascii_uppercase() {
            lut[c.to_ascii_lowercase() as usize] = i;
        }
        i += 1;
    }
    lut
};

/// Packs 16 bytes into 26 symbols, most significant first.
#[inline]
pub(crate) fn encode_base32(input: &[u8; BYTE_LEN], out: &mut [u8; ENCODED_LEN]) {
    let mut bits = PAD_BITS;
    let mut acc = 0_u16;
    let mut chars = out.iter_mut();

    for &b in input {
        acc = (acc << 8) | u16::from(b);
        bits += 8;
        while bits >= BITS_PER_CHAR {
            bits -= BITS_PER_CHAR;
            if let Some(c) = chars.next() {
                *c = ALPHABET[usize::from((acc >> bits) & 0x1F)];
            }
        }
    }
    debug_assert_eq!(bits, 0);
}

/// Unpacks 26 symbols into 16 bytes without validating the input.
///
/// Bytes outside the alphabet contribute the [`NO_VALUE`] sentinel to every
/// output byte their five bits overlap, so malformed input still decodes to
/// the same identifier every time.
#[inline]
pub(crate) fn decode_base32(encoded: &[u8; ENCODED_LEN]) -> [u8; BYTE_LEN] {
    let mut out = [0_u8; BYTE_LEN];

    for (i, &c) in encoded.iter().enumerate() {
        let val = LOOKUP[usize::from(c)];

        // Symbol `i` spans stream bits [5i, 5i + 5). Output byte `k` spans
        // [8k + 2, 8k + 10).
        let start = i * BITS_PER_CHAR;
        let end = start + BITS_PER_CHAR;
        let first = start.saturating_sub(PAD_BITS) / 8;
        let last = (end - 1 - PAD_BITS) / 8;

        for (k, byte) in out.iter_mut().enumerate().take(last + 1).skip(first) {
            let byte_end = 8 * k + 8 + PAD_BITS;
            if byte_end >= end {
                *byte |= val << (byte_end - end);
            } else {
                *byte |= val >> (end - byte_end);
            }
        }
    }

    out
}

/// Returns the index and value of the first byte outside the alphabet.
#[inline]
pub(crate) fn first_invalid(encoded: &[u8]) -> Option<(usize, u8)> {
    encoded
        .iter()
        .position(|&b| LOOKUP[usize::from(b)] == NO_VALUE)
        .map(|i| (i, encoded[i]))
}
