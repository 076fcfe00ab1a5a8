//! Recheck engine errors.

use std::fmt;
use std::path::PathBuf;

use vera_diagnostic::CodecError;

/// Error raised by the incremental recheck pipeline.
#[derive(Debug)]
pub enum RecheckError {
    /// A binding group has no locatable sub-expression anywhere in its
    /// bodies. Fatal for the incremental path: an empty definition range
    /// would corrupt seeding, slicing, and reconciliation, so the caller
    /// must fall back to full analysis instead.
    MissingSpan { name: String },
    /// Snapshot I/O failed in a case where the artifact was expected to be
    /// present and readable. Never conflated with "no prior snapshot".
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The persisted diagnostic result failed to encode or decode.
    Codec(CodecError),
}

impl fmt::Display for RecheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecheckError::MissingSpan { name } => write!(
                f,
                "definition group containing `{name}` has no source locations; \
                 incremental recheck cannot proceed"
            ),
            RecheckError::Io { path, source } => {
                write!(f, "snapshot I/O failed at {}: {source}", path.display())
            }
            RecheckError::Codec(err) => write!(f, "persisted diagnostics unreadable: {err}"),
        }
    }
}

impl std::error::Error for RecheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecheckError::MissingSpan { .. } => None,
            RecheckError::Io { source, .. } => Some(source),
            RecheckError::Codec(err) => Some(err),
        }
    }
}

impl From<CodecError> for RecheckError {
    fn from(err: CodecError) -> Self {
        RecheckError::Codec(err)
    }
}
