//! Fixed-width numeric display fields.

use crate::digits::encode_digits;

/// A fixed-capacity decimal readout (score, ammo, frame counter).
///
/// Owns an `N`-byte buffer and re-encodes only when [`set`](Self::set)
/// receives a different value. A value wider than `N` keeps its leading
/// characters, exactly as [`encode_digits`] truncates.
///
/// ```
/// use kiln_text::DigitField;
///
/// let mut ammo = DigitField::<3>::new();
/// assert!(ammo.set(42));
/// assert_eq!(ammo.as_str(), "42");
/// assert!(!ammo.set(42)); // unchanged, no re-encode
///
/// ammo.set(12345);
/// assert_eq!(ammo.as_str(), "123");
/// assert!(ammo.is_truncated());
/// ```
#[derive(Clone, Debug)]
pub struct DigitField<const N: usize> {
    buf: [u8; N],
    value: Option<i64>,
    reported: usize,
}

impl<const N: usize> DigitField<N> {
    /// An empty field with no value.
    pub const fn new() -> Self {
        Self {
            buf: [b' '; N],
            value: None,
            reported: 0,
        }
    }

    /// Display `value`. Returns `true` if the buffer was re-encoded.
    pub fn set(&mut self, value: i64) -> bool {
        if self.value == Some(value) {
            return false;
        }
        self.reported = encode_digits(value, &mut self.buf);
        self.value = Some(value);
        true
    }

    /// The value currently displayed.
    pub fn value(&self) -> Option<i64> {
        self.value
    }

    /// Full length of the current value, sign included.
    pub fn reported_len(&self) -> usize {
        self.reported
    }

    /// Characters actually present in the buffer.
    pub fn written_len(&self) -> usize {
        self.reported.min(N)
    }

    /// Whether the current value did not fit.
    pub fn is_truncated(&self) -> bool {
        self.reported > N
    }

    /// Buffer capacity.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// The written characters as ASCII bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.written_len()]
    }

    /// The written characters.
    pub fn as_str(&self) -> &str {
        // Only ASCII digits and '-' are ever written.
        std::str::from_utf8(self.as_bytes()).unwrap_or_default()
    }
}

impl<const N: usize> Default for DigitField<N> {
    fn default() -> Self {
        Self::new()
    }
}
