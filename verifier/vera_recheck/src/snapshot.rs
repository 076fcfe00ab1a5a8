//! Snapshot store: the last-checked text and diagnostic result per unit.
//!
//! The store is an injected resource, not ambient global state, so tests
//! and embedders can substitute an in-memory implementation. The on-disk
//! layout is two artifacts per unit:
//!
//! ```text
//! <root>/
//! ├── <stem>-<hash>.src    # verbatim previous text
//! └── <stem>-<hash>.diag   # versioned codec bytes of the previous result
//! ```
//!
//! A missing `.src` means "no prior run". A missing `.diag` with `.src`
//! present means "no prior diagnostics recorded" and loads as the empty
//! default, not an error. Any other I/O failure is surfaced as a hard
//! error; once the text artifact is known to exist, an unreadable pair
//! must never be silently treated as a first run.

use std::fs;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use rustc_hash::{FxHashMap, FxHasher};
use vera_diagnostic::{codec, DiagnosticResult};

use crate::error::RecheckError;

/// A unit's previous text paired with its previous result.
///
/// The pair is written together and read together; a load never observes
/// text from one run with a result from another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub text: String,
    pub result: DiagnosticResult,
}

/// Persistence boundary for per-unit snapshots.
///
/// The snapshot for one unit is a single-writer resource: concurrent runs
/// against the same unit must be serialized by the caller. Runs against
/// different units are independent.
pub trait SnapshotStore {
    /// Load the snapshot for a unit, or `None` if it has never been run.
    fn load(&self, unit: &str) -> Result<Option<Snapshot>, RecheckError>;

    /// Persist the unit's new text and result together.
    fn save(&self, unit: &str, text: &str, result: &DiagnosticResult) -> Result<(), RecheckError>;
}

/// Filesystem-backed snapshot store.
pub struct FsSnapshotStore {
    root: PathBuf,
}

impl FsSnapshotStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, RecheckError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| RecheckError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(FsSnapshotStore { root })
    }

    /// Stable file key for a unit id: a readable stem plus a content hash,
    /// so distinct units never collide and unit ids containing path
    /// separators stay flat.
    fn unit_key(unit: &str) -> String {
        let mut hasher = FxHasher::default();
        unit.hash(&mut hasher);
        let stem = Path::new(unit)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .unwrap_or("unit");
        format!("{stem}-{:016x}", hasher.finish())
    }

    fn src_path(&self, unit: &str) -> PathBuf {
        self.root.join(format!("{}.src", Self::unit_key(unit)))
    }

    fn diag_path(&self, unit: &str) -> PathBuf {
        self.root.join(format!("{}.diag", Self::unit_key(unit)))
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn load(&self, unit: &str) -> Result<Option<Snapshot>, RecheckError> {
        let src_path = self.src_path(unit);
        let text = match fs::read_to_string(&src_path) {
            Ok(text) => text,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(RecheckError::Io {
                    path: src_path,
                    source,
                })
            }
        };

        let diag_path = self.diag_path(unit);
        let result = match fs::read(&diag_path) {
            Ok(bytes) => codec::decode(&bytes)?,
            // Text without a recorded result: nothing to reconcile.
            Err(source) if source.kind() == io::ErrorKind::NotFound => DiagnosticResult::Safe,
            Err(source) => {
                return Err(RecheckError::Io {
                    path: diag_path,
                    source,
                })
            }
        };

        Ok(Some(Snapshot { text, result }))
    }

    fn save(&self, unit: &str, text: &str, result: &DiagnosticResult) -> Result<(), RecheckError> {
        let bytes = codec::encode(result)?;
        // Result first, text last: the text artifact's presence marks a
        // complete pair, and each rename is atomic on its own.
        write_atomic(&self.diag_path(unit), &bytes)?;
        write_atomic(&self.src_path(unit), text.as_bytes())?;
        Ok(())
    }
}

/// Write through a temp file and rename into place. The temp handle is
/// released on every exit path before the rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), RecheckError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes).map_err(|source| RecheckError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| RecheckError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// In-memory snapshot store for tests and embedding.
///
/// Stores the encoded result bytes so the codec path is exercised exactly
/// as with the filesystem store.
#[derive(Default)]
pub struct MemorySnapshotStore {
    units: Mutex<FxHashMap<String, (String, Vec<u8>)>>,
}

impl MemorySnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, unit: &str) -> Result<Option<Snapshot>, RecheckError> {
        let units = self.units.lock().unwrap_or_else(PoisonError::into_inner);
        match units.get(unit) {
            None => Ok(None),
            Some((text, bytes)) => Ok(Some(Snapshot {
                text: text.clone(),
                result: codec::decode(bytes)?,
            })),
        }
    }

    fn save(&self, unit: &str, text: &str, result: &DiagnosticResult) -> Result<(), RecheckError> {
        let bytes = codec::encode(result)?;
        let mut units = self.units.lock().unwrap_or_else(PoisonError::into_inner);
        units.insert(unit.to_owned(), (text.to_owned(), bytes));
        Ok(())
    }
}
