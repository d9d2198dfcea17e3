//! Error types for ferro-genemodel
//!
//! Every fallible operation returns [`FerroError`]. Variants carry an
//! [`ErrorCode`] for programmatic handling and documentation lookup.
//!
//! Validation errors ([`FerroError::InvalidBase`], [`FerroError::OutOfRange`],
//! [`FerroError::InvalidInterval`]) are raised before a gene is touched.
//! [`FerroError::NoStopFound`] is the exception: the edit has already been
//! applied when it is returned, and the full prediction travels with it.

use crate::effect::EffectPrediction;
use std::fmt;
use thiserror::Error;

/// Error codes for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Input errors (E1xxx)
    /// Invalid base/nucleotide
    InvalidBase = 1007,

    // Reference errors (E2xxx)
    /// Reference/chromosome not found
    ReferenceNotFound = 2001,

    // Validation errors (E3xxx)
    /// Position out of bounds
    PositionOutOfBounds = 3001,
    /// Invalid coordinate range
    InvalidRange = 3003,
    /// Malformed transcript annotation
    InvalidAnnotation = 3006,

    // Effect errors (E4xxx)
    /// Frameshift read-through found no stop codon
    NoStopFound = 4003,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// JSON parsing error
    JsonError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1007")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidBase => "invalid nucleotide base",
            ErrorCode::ReferenceNotFound => "reference not found",
            ErrorCode::PositionOutOfBounds => "position out of bounds",
            ErrorCode::InvalidRange => "invalid coordinate range",
            ErrorCode::InvalidAnnotation => "invalid transcript annotation",
            ErrorCode::NoStopFound => "no stop codon found",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::JsonError => "JSON parsing error",
            ErrorCode::ConfigError => "configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for ferro-genemodel operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FerroError {
    /// Base is not one of A, C, G, T
    #[error("Invalid base: {base:?} (expected A, C, G or T)")]
    InvalidBase { base: char },

    /// Position lies outside the gene or the coding sequence
    #[error("Position {pos} out of range: {msg}")]
    OutOfRange { pos: i64, msg: String },

    /// Interval with start >= end
    #[error("Invalid interval: start {start} must be less than end {end}")]
    InvalidInterval { start: i64, end: i64 },

    /// Frameshift read-through exhausted the transcript without a stop.
    ///
    /// The edit has been applied; `prediction` describes it.
    #[error("No stop codon found after frameshift at amino acid {}", .prediction.aa_pos.unwrap_or_default())]
    NoStopFound { prediction: Box<EffectPrediction> },

    /// Transcript annotation cannot be turned into a gene model
    #[error("Invalid annotation: {msg}")]
    InvalidAnnotation { msg: String },

    /// Reference sequence not found or too short
    #[error("Reference not found: {id}")]
    ReferenceNotFound { id: String },

    /// Configuration error
    #[error("Configuration error: {msg}")]
    Config { msg: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// JSON parsing error
    #[error("JSON error: {msg}")]
    Json { msg: String },
}

impl FerroError {
    /// Shorthand for an [`FerroError::OutOfRange`] error
    pub fn out_of_range(pos: i64, msg: impl Into<String>) -> Self {
        FerroError::OutOfRange {
            pos,
            msg: msg.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            FerroError::InvalidBase { .. } => ErrorCode::InvalidBase,
            FerroError::OutOfRange { .. } => ErrorCode::PositionOutOfBounds,
            FerroError::InvalidInterval { .. } => ErrorCode::InvalidRange,
            FerroError::NoStopFound { .. } => ErrorCode::NoStopFound,
            FerroError::InvalidAnnotation { .. } => ErrorCode::InvalidAnnotation,
            FerroError::ReferenceNotFound { .. } => ErrorCode::ReferenceNotFound,
            FerroError::Config { .. } => ErrorCode::ConfigError,
            FerroError::Io { .. } => ErrorCode::IoError,
            FerroError::Json { .. } => ErrorCode::JsonError,
        }
    }

    /// Get a message prefixed with the error code, e.g. `[E3001] ...`
    pub fn detailed_message(&self) -> String {
        format!("[{}] {}", self.code(), self)
    }

    /// Whether the gene was modified before this error was returned
    pub fn edit_applied(&self) -> bool {
        matches!(self, FerroError::NoStopFound { .. })
    }
}

impl From<std::io::Error> for FerroError {
    fn from(err: std::io::Error) -> Self {
        FerroError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for FerroError {
    fn from(err: serde_json::Error) -> Self {
        FerroError::Json {
            msg: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::Consequence;

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::InvalidBase.as_str(), "E1007");
        assert_eq!(ErrorCode::ReferenceNotFound.as_str(), "E2001");
        assert_eq!(ErrorCode::PositionOutOfBounds.as_str(), "E3001");
        assert_eq!(ErrorCode::NoStopFound.as_str(), "E4003");
        assert_eq!(ErrorCode::IoError.as_str(), "E9001");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(
            ErrorCode::InvalidBase.description(),
            "invalid nucleotide base"
        );
        assert_eq!(
            ErrorCode::InvalidRange.description(),
            "invalid coordinate range"
        );
        assert_eq!(ErrorCode::NoStopFound.description(), "no stop codon found");
    }

    #[test]
    fn test_ferro_error_code() {
        assert_eq!(
            FerroError::InvalidBase { base: 'N' }.code(),
            ErrorCode::InvalidBase
        );
        assert_eq!(
            FerroError::out_of_range(-1, "negative").code(),
            ErrorCode::PositionOutOfBounds
        );
        assert_eq!(
            FerroError::InvalidInterval { start: 5, end: 5 }.code(),
            ErrorCode::InvalidRange
        );
        assert_eq!(
            FerroError::Config {
                msg: "bad".to_string()
            }
            .code(),
            ErrorCode::ConfigError
        );
    }

    #[test]
    fn test_detailed_message() {
        let err = FerroError::InvalidInterval { start: 10, end: 3 };
        let msg = err.detailed_message();
        assert!(msg.starts_with("[E3003]"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn test_no_stop_found_marks_edit_applied() {
        let prediction = EffectPrediction::new(Consequence::Frameshift, 3, 0);
        let err = FerroError::NoStopFound {
            prediction: Box::new(prediction),
        };
        assert!(err.edit_applied());
        assert!(!FerroError::InvalidBase { base: 'X' }.edit_applied());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FerroError = io_err.into();
        assert!(matches!(err, FerroError::Io { .. }));
        assert!(err.to_string().contains("not found"));
    }
}
