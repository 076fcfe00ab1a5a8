//! String interner for identifier storage.
//!
//! Provides O(1) interning and lookup. Unlike a compiler that interns from
//! many parser threads at once, a recheck run is single-threaded per unit,
//! so there is no sharding or locking here.

use rustc_hash::FxHashMap;

use crate::Name;

/// Interns identifier strings, handing out compact [`Name`] ids.
///
/// The empty string is pre-interned as [`Name::EMPTY`].
#[derive(Clone, Debug)]
pub struct StringInterner {
    map: FxHashMap<String, u32>,
    strings: Vec<String>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned.
    pub fn new() -> Self {
        let mut map = FxHashMap::default();
        map.insert(String::new(), 0);
        StringInterner {
            map,
            strings: vec![String::new()],
        }
    }

    /// Intern a string, returning its [`Name`].
    ///
    /// Interning the same string twice returns the same id.
    pub fn intern(&mut self, s: &str) -> Name {
        if let Some(&ix) = self.map.get(s) {
            return Name::from_raw(ix);
        }
        debug_assert!(self.strings.len() < u32::MAX as usize);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "table length is bounded by the u32 id space"
        )]
        let ix = self.strings.len() as u32;
        self.map.insert(s.to_owned(), ix);
        self.strings.push(s.to_owned());
        Name::from_raw(ix)
    }

    /// Look up the string for a [`Name`].
    ///
    /// # Panics
    /// Panics if `name` was not produced by this interner.
    #[track_caller]
    pub fn lookup(&self, name: Name) -> &str {
        &self.strings[name.index()]
    }

    /// Number of interned strings (including the pre-interned empty string).
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns `true` if only the empty string is interned.
    pub fn is_empty(&self) -> bool {
        self.strings.len() == 1
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
