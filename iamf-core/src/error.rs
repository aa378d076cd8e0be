//! Error types for the core data model.

use thiserror::Error;

/// Errors produced by the core data model.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A metadata value does not fit the fixed-width field it targets.
    #[error("Value out of range for {field}: {value}")]
    ValueOutOfRange {
        /// Name of the target field.
        field: &'static str,
        /// The offending value.
        value: i64,
    },

    /// Channel counts outside the valid scalable-layout sets.
    #[error(
        "Invalid channel numbers: surround {surround}, lfe {lfe}, height {height}"
    )]
    InvalidChannelNumbers {
        /// Surround channel count (valid: 1, 2, 3, 5, 7).
        surround: u32,
        /// LFE channel count (valid: 0, 1).
        lfe: u32,
        /// Height channel count (valid: 0, 2, 4).
        height: u32,
    },

    /// A ULEB128 value decoded to more than 32 bits.
    #[error("ULEB128 value exceeds 32 bits")]
    Leb128Overflow,

    /// A ULEB128 encoding ran past the 8-byte limit.
    #[error("ULEB128 encoding exceeds 8 bytes")]
    Leb128TooLong,

    /// Ran out of input bytes mid-value.
    #[error("Unexpected end of data")]
    UnexpectedEnd,

    /// I/O failure while reading or writing coded data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::ValueOutOfRange {
            field: "start_point_value",
            value: 32768,
        };
        assert_eq!(
            err.to_string(),
            "Value out of range for start_point_value: 32768"
        );
    }

    #[test]
    fn test_invalid_channel_numbers_display() {
        let err = CoreError::InvalidChannelNumbers {
            surround: 9,
            lfe: 1,
            height: 4,
        };
        assert!(err.to_string().contains("surround 9"));
    }
}
