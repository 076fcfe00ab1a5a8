//! Versioned byte encoding for persisted diagnostic results.
//!
//! The recheck engine stores the previous run's [`DiagnosticResult`] on
//! disk and reads it back on the next run. The encoding is a one-byte
//! format version followed by a bincode payload; bincode's output is
//! deterministic for a given value, so encode → decode → encode is byte
//! for byte stable.

use std::fmt;

use crate::DiagnosticResult;

/// Current persisted format version.
pub const FORMAT_VERSION: u8 = 1;

/// Error when encoding or decoding a persisted diagnostic result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Input was empty (not even a version byte).
    Truncated,
    /// The version byte names a format this build does not understand.
    UnsupportedVersion(u8),
    /// The payload failed to serialize.
    Encode(String),
    /// The payload failed to deserialize.
    Decode(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Truncated => write!(f, "persisted diagnostic data is truncated"),
            CodecError::UnsupportedVersion(version) => write!(
                f,
                "persisted diagnostic format version {version} is unsupported (expected {FORMAT_VERSION})"
            ),
            CodecError::Encode(msg) => write!(f, "failed to encode diagnostic result: {msg}"),
            CodecError::Decode(msg) => write!(f, "failed to decode diagnostic result: {msg}"),
        }
    }
}

impl std::error::Error for CodecError {}

/// Encode a result as version byte + bincode payload.
pub fn encode(result: &DiagnosticResult) -> Result<Vec<u8>, CodecError> {
    let payload =
        bincode::serialize(result).map_err(|e| CodecError::Encode(e.to_string()))?;
    let mut bytes = Vec::with_capacity(payload.len() + 1);
    bytes.push(FORMAT_VERSION);
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode a result, rejecting truncated input and unknown versions.
pub fn decode(bytes: &[u8]) -> Result<DiagnosticResult, CodecError> {
    let (&version, payload) = bytes.split_first().ok_or(CodecError::Truncated)?;
    if version != FORMAT_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }
    bincode::deserialize(payload).map_err(|e| CodecError::Decode(e.to_string()))
}
