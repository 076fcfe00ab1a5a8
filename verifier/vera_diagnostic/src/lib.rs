//! Diagnostic system for the Vera verifier.
//!
//! The verification backend reports its findings as a [`DiagnosticResult`]:
//! a closed tagged union of *safe* (no findings), *unsafe* (a list of
//! diagnostics), or *crash* (diagnostics plus the crash context). Results
//! are persisted between runs by the recheck engine, so the encoding is
//! versioned and round-trips byte for byte.

pub mod codec;
mod diagnostic;
mod result;

pub use codec::{decode, encode, CodecError, FORMAT_VERSION};
pub use diagnostic::{Diagnostic, Severity, SourceSpan};
pub use result::DiagnosticResult;
