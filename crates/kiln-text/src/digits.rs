//! Integer to decimal digits.
//!
//! Digits are produced least-significant first into an inline scratch
//! sequence, then flipped into the destination:
//!
//! ```text
//! dest_index(i) = scratch_count + sign_offset - i
//! sign_offset   = 0 if value < 0 else -1
//! ```
//!
//! where `i = 0` is the least significant digit. The most significant
//! digit lands first, and a negative value leaves index 0 for the `'-'`.
//! Indices at or past the destination's capacity are skipped, so a short
//! buffer keeps the *leading* digits: `123456` into two slots gives
//! `"12"`. Fixed-width display fields depend on exactly which digits
//! survive, so keep this shape.

use smallvec::SmallVec;

/// Most digits a 64-bit magnitude can have (`u64::MAX` has 20).
pub const MAX_DIGITS: usize = 20;

/// A character unit that can hold an ASCII digit or sign.
pub trait DigitUnit: Copy {
    /// Convert an ASCII byte (`b'0'..=b'9'` or `b'-'`).
    fn from_ascii(byte: u8) -> Self;
}

impl DigitUnit for u8 {
    #[inline]
    fn from_ascii(byte: u8) -> Self {
        byte
    }
}

impl DigitUnit for u16 {
    #[inline]
    fn from_ascii(byte: u8) -> Self {
        byte as u16
    }
}

impl DigitUnit for char {
    #[inline]
    fn from_ascii(byte: u8) -> Self {
        byte as char
    }
}

/// Write the decimal form of `value` into `dest`.
///
/// Returns the number of digits plus one for a `'-'` sign. That count is
/// independent of `dest.len()`: when the buffer is too short, only the
/// leading characters that fit are written and the count still reports
/// the full length. Slots of `dest` past the written range are left
/// untouched.
///
/// ```
/// use kiln_text::encode_digits;
///
/// let mut buf = [b' '; 6];
/// assert_eq!(encode_digits(-12345, &mut buf), 6);
/// assert_eq!(&buf, b"-12345");
///
/// let mut short = [b' '; 2];
/// assert_eq!(encode_digits(123456, &mut short), 6);
/// assert_eq!(&short, b"12");
/// ```
pub fn encode_digits<U: DigitUnit>(value: i64, dest: &mut [U]) -> usize {
    let negative = value < 0;
    let mut magnitude = value.unsigned_abs();

    let mut scratch: SmallVec<[u8; MAX_DIGITS]> = SmallVec::new();
    loop {
        scratch.push(b'0' + (magnitude % 10) as u8);
        magnitude /= 10;
        if magnitude == 0 {
            break;
        }
    }

    // scratch_count + sign_offset, with sign_offset folded in so the
    // arithmetic stays unsigned (scratch is never empty).
    let top = if negative {
        scratch.len()
    } else {
        scratch.len() - 1
    };
    for (i, &digit) in scratch.iter().enumerate() {
        if let Some(slot) = dest.get_mut(top - i) {
            *slot = U::from_ascii(digit);
        }
    }

    if negative {
        if let Some(slot) = dest.first_mut() {
            *slot = U::from_ascii(b'-');
        }
        scratch.len() + 1
    } else {
        scratch.len()
    }
}

/// The count [`encode_digits`] would return for `value`.
pub fn digit_count(value: i64) -> usize {
    let mut magnitude = value.unsigned_abs();
    let mut count = 1;
    while magnitude >= 10 {
        magnitude /= 10;
        count += 1;
    }
    count + usize::from(value < 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_into<const N: usize>(value: i64) -> ([u8; N], usize) {
        let mut buf = [b'.'; N];
        let count = encode_digits(value, &mut buf);
        (buf, count)
    }

    #[test]
    fn ten_digits_exact_fit() {
        let (buf, count) = encode_into::<10>(1234567890);
        assert_eq!(&buf, b"1234567890");
        assert_eq!(count, 10);
    }

    #[test]
    fn positive_in_wide_buffer() {
        let (buf, count) = encode_into::<15>(12345);
        assert_eq!(&buf, b"12345..........");
        assert_eq!(count, 5);
    }

    #[test]
    fn negative_exact_fit() {
        let (buf, count) = encode_into::<6>(-12345);
        assert_eq!(&buf, b"-12345");
        assert_eq!(count, 6);
    }

    #[test]
    fn negative_in_wide_buffer() {
        let (buf, count) = encode_into::<15>(-1234569);
        assert_eq!(&buf[..8], b"-1234569");
        assert_eq!(&buf[8..], b".......");
        assert_eq!(count, 8);
    }

    #[test]
    fn zero_is_one_digit() {
        let (buf, count) = encode_into::<1>(0);
        assert_eq!(&buf, b"0");
        assert_eq!(count, 1);

        let (buf, count) = encode_into::<4>(0);
        assert_eq!(&buf, b"0...");
        assert_eq!(count, 1);
    }

    #[test]
    fn short_buffer_keeps_leading_digits() {
        // Flip indices for 123456 are 5,4,3,2,1,0 for digits 6,5,4,3,2,1;
        // only indices 1 ('2') and 0 ('1') fit.
        let (buf, count) = encode_into::<2>(123456);
        assert_eq!(&buf, b"12");
        assert_eq!(count, 6);
    }

    #[test]
    fn short_buffer_negative_keeps_sign_and_leading_digits() {
        let (buf, count) = encode_into::<3>(-1234569);
        assert_eq!(&buf, b"-12");
        assert_eq!(count, 8);
    }

    #[test]
    fn empty_buffer_writes_nothing_but_counts() {
        let mut buf: [u8; 0] = [];
        assert_eq!(encode_digits(-987, &mut buf), 4);
    }

    #[test]
    fn single_slot_negative_is_sign_only() {
        let (buf, count) = encode_into::<1>(-5);
        assert_eq!(&buf, b"-");
        assert_eq!(count, 2);
    }

    #[test]
    fn extremes() {
        let (buf, count) = encode_into::<20>(i64::MIN);
        assert_eq!(&buf, b"-9223372036854775808");
        assert_eq!(count, 20);

        let (buf, count) = encode_into::<19>(i64::MAX);
        assert_eq!(&buf, b"9223372036854775807");
        assert_eq!(count, 19);
    }

    #[test]
    fn utf16_and_char_units() {
        let mut wide = [0u16; 4];
        assert_eq!(encode_digits(-42, &mut wide), 3);
        assert_eq!(wide, [b'-' as u16, b'4' as u16, b'2' as u16, 0]);

        let mut chars = [' '; 3];
        assert_eq!(encode_digits(907, &mut chars), 3);
        assert_eq!(chars, ['9', '0', '7']);
    }

    #[test]
    fn digit_count_matches_encoder() {
        for v in [0, 9, 10, -1, -10, 99_999, i64::MIN, i64::MAX] {
            let mut buf = [0u8; 0];
            assert_eq!(digit_count(v), encode_digits(v, &mut buf), "value {v}");
        }
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn matches_std_formatting(value in any::<i64>()) {
                let mut buf = [0u8; MAX_DIGITS + 1];
                let count = encode_digits(value, &mut buf);
                let expected = value.to_string();
                prop_assert_eq!(count, expected.len());
                prop_assert_eq!(&buf[..count], expected.as_bytes());
            }

            #[test]
            fn truncation_keeps_prefix_and_stays_in_bounds(
                value in any::<i64>(),
                capacity in 0usize..24,
            ) {
                let mut buf = vec![b'.'; capacity];
                let count = encode_digits(value, &mut buf);
                let expected = value.to_string();
                prop_assert_eq!(count, expected.len());
                prop_assert_eq!(buf.len(), capacity);
                let written = count.min(capacity);
                prop_assert_eq!(&buf[..written], &expected.as_bytes()[..written]);
                prop_assert!(buf[written..].iter().all(|&b| b == b'.'));
            }
        }
    }
}
