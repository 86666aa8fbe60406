//! # Error Types
//!
//! Errors raised while validating credential fields and producing or
//! parsing packed messages. All errors use `thiserror` for derive-based
//! `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Width violations name the field, its declared byte width, and the
//!   offending value so a failing batch run can be diagnosed from the log
//!   line alone.
//! - Negative inputs are reported separately from oversized ones.

use thiserror::Error;

/// Error while encoding (or decoding) a packed credential message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// A fixed-width numeric field does not fit in its declared width.
    #[error("{field} value {value} does not fit in {width} bytes")]
    FieldOutOfRange {
        /// Field name as it appears in the packed layout.
        field: &'static str,
        /// Declared width in bytes.
        width: usize,
        /// Decimal rendering of the rejected value.
        value: String,
    },

    /// A fixed-width numeric field was given a negative value.
    #[error("{field} must be non-negative, got {value}")]
    NegativeValue {
        /// Field name as it appears in the packed layout.
        field: &'static str,
        /// Decimal rendering of the rejected value.
        value: String,
    },

    /// The trading address did not decode to exactly 20 bytes.
    #[error("invalid trading address: {0}")]
    InvalidAddress(String),

    /// A hex string could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A decimal integer string could not be parsed.
    #[error("invalid integer for {field}: {input:?}")]
    InvalidInteger {
        /// Field being parsed.
        field: &'static str,
        /// The raw input.
        input: String,
    },

    /// A packed message is shorter than the fixed-width prefix.
    #[error("packed message truncated: expected at least {expected} bytes, got {actual}")]
    Truncated {
        /// Minimum length of a packed message.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// The reserved discriminator byte held something other than `0x00`.
    #[error("reserved type byte must be 0x00, got {0:#04x}")]
    ReservedByte(u8),
}
