//! Hash-consing arena for [`TypeData`].

use crate::def::DefId;
use crate::types::{ParamRef, TypeData, TypeId};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxBuildHasher;
use std::sync::{PoisonError, RwLock};

/// Interns type expressions into stable [`TypeId`]s.
///
/// A node is always interned after its arguments, so every argument of an
/// application has a smaller `TypeId` than the application itself. Type
/// expressions are therefore finite trees and plain structural recursion over
/// them terminates.
pub struct TypeInterner {
    map: DashMap<TypeData, TypeId, FxBuildHasher>,
    types: RwLock<Vec<TypeData>>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    pub fn new() -> Self {
        Self {
            map: DashMap::with_hasher(FxBuildHasher),
            types: RwLock::new(Vec::new()),
        }
    }

    /// Intern `data`, returning the existing id for structurally equal data.
    pub fn intern(&self, data: TypeData) -> TypeId {
        let data = match data {
            TypeData::Application { def, args } if args.is_empty() => TypeData::Named(def),
            other => other,
        };

        if let Some(id) = self.map.get(&data) {
            return *id;
        }

        match self.map.entry(data) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
                let id = TypeId(types.len() as u32);
                types.push(entry.key().clone());
                entry.insert(id);
                id
            }
        }
    }

    /// Look up the structure behind `id`.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id.0 as usize)
            .cloned()
    }

    pub fn named(&self, def: DefId) -> TypeId {
        self.intern(TypeData::Named(def))
    }

    pub fn application(&self, def: DefId, args: &[TypeId]) -> TypeId {
        self.intern(TypeData::Application {
            def,
            args: args.iter().copied().collect(),
        })
    }

    pub fn param(&self, param: ParamRef) -> TypeId {
        self.intern(TypeData::Param(param))
    }

    /// Number of distinct interned types.
    pub fn len(&self) -> usize {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
