//! String interning for type and parameter names.
//!
//! Names are interned once and referred to by a copyable [`Atom`] afterwards,
//! so definitions and parameters can be compared and hashed without touching
//! the string data.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Handle to an interned string.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// The empty string is always interned first.
    pub const EMPTY: Self = Self(0);
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Thread-safe string interner.
///
/// Lookups by string go through a sharded `DashMap`; lookups by `Atom` go
/// through an append-only vector, so resolving never contends with other
/// resolvers.
pub struct Interner {
    map: DashMap<Arc<str>, Atom, FxBuildHasher>,
    strings: RwLock<Vec<Arc<str>>>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    pub fn new() -> Self {
        let empty: Arc<str> = Arc::from("");
        let map = DashMap::with_hasher(FxBuildHasher);
        map.insert(empty.clone(), Atom::EMPTY);
        Self {
            map,
            strings: RwLock::new(vec![empty]),
        }
    }

    /// Intern `text`, returning the existing atom if it was seen before.
    pub fn intern(&self, text: &str) -> Atom {
        if let Some(atom) = self.map.get(text) {
            return *atom;
        }

        match self.map.entry(Arc::from(text)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                // The shard lock is held while appending, so two threads
                // interning the same string cannot both allocate an atom.
                let mut strings = self.strings.write().unwrap_or_else(PoisonError::into_inner);
                let atom = Atom(strings.len() as u32);
                strings.push(entry.key().clone());
                entry.insert(atom);
                atom
            }
        }
    }

    /// Resolve an atom back to its string, if it was produced by this interner.
    pub fn resolve(&self, atom: Atom) -> Option<Arc<str>> {
        self.strings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(atom.0 as usize)
            .cloned()
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.strings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
