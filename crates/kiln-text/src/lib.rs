//! Allocation-free integer formatting for Kiln.
//!
//! [`encode_digits`] writes the decimal form of an `i64` into a
//! caller-owned buffer of fixed capacity. It never allocates and never
//! writes past the buffer: digits that would land outside it are
//! dropped silently, and the return value still reports the full
//! length. [`DigitField`] wraps a fixed-width buffer for UI counters
//! that re-encode only when their value changes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod digits;
pub mod field;

pub use digits::{digit_count, encode_digits, DigitUnit, MAX_DIGITS};
pub use field::DigitField;
