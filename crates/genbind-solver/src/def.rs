//! Definition identifiers and storage for the solver.
//!
//! A definition is a declared class, interface or struct together with its
//! generic parameters, base class and implemented interfaces. Types refer to
//! definitions through `DefId`; the parameter constraints and base types are
//! themselves interned type expressions that may mention the definition's own
//! parameters, which is how self-referential constraints
//! (`class Node<T> where T : Node<T>`) are represented without infinite terms.
//!
//! Definitions are registered first and completed afterwards, so that the
//! `DefId` is available when building the constraint and base-type
//! expressions that refer back to it.

use crate::types::{SpecialConstraints, TypeId, TypeParamInfo, Variance};
use dashmap::DashMap;
use genbind_common::Atom;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::trace;

/// Global counter for assigning unique instance IDs to `DefinitionStore` instances.
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// DefId
// =============================================================================

/// Definition identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub u32);

impl DefId {
    /// Sentinel value for invalid `DefId`.
    pub const INVALID: Self = Self(0);

    /// First valid `DefId`.
    pub const FIRST_VALID: u32 = 1;

    /// Check if this `DefId` is valid.
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

// =============================================================================
// DefKind
// =============================================================================

/// Kind of type definition.
///
/// | Kind | Reference type | Default constructor | Example |
/// |------|----------------|---------------------|---------|
/// | Class | Yes | When declared (and not abstract) | `class Repository<T>` |
/// | Interface | Yes | Never | `interface IHandler<in T>` |
/// | Struct | No | Always | `struct Money` |
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefKind {
    Class,
    Interface,
    Struct,
}

// =============================================================================
// DefinitionInfo
// =============================================================================

/// Complete information about a type definition.
#[derive(Clone, Debug)]
pub struct DefinitionInfo {
    /// Kind of definition
    pub kind: DefKind,

    /// Name of the definition (for formatting and logs)
    pub name: Atom,

    /// Generic parameters, in declaration order
    pub type_params: Vec<TypeParamInfo>,

    /// Base class, expressed over this definition's own parameters
    pub extends: Option<TypeId>,

    /// Implemented (or, for interfaces, inherited) interfaces
    pub implements: Vec<TypeId>,

    /// Abstract classes cannot satisfy a `new()` constraint
    pub is_abstract: bool,

    /// Whether a public parameterless constructor exists
    pub has_default_constructor: bool,
}

impl DefinitionInfo {
    fn with_kind(kind: DefKind, name: Atom, type_params: Vec<TypeParamInfo>) -> Self {
        Self {
            kind,
            name,
            type_params,
            extends: None,
            implements: Vec::new(),
            is_abstract: false,
            has_default_constructor: kind != DefKind::Interface,
        }
    }

    /// Create a new class definition.
    pub fn class(name: Atom, type_params: Vec<TypeParamInfo>) -> Self {
        Self::with_kind(DefKind::Class, name, type_params)
    }

    /// Create a new interface definition.
    pub fn interface(name: Atom, type_params: Vec<TypeParamInfo>) -> Self {
        Self::with_kind(DefKind::Interface, name, type_params)
    }

    /// Create a new struct definition.
    pub fn structure(name: Atom, type_params: Vec<TypeParamInfo>) -> Self {
        Self::with_kind(DefKind::Struct, name, type_params)
    }

    /// Mark a class as abstract.
    pub const fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Remove the parameterless constructor.
    pub const fn without_default_constructor(mut self) -> Self {
        self.has_default_constructor = false;
        self
    }

    /// Set the base class.
    pub const fn with_extends(mut self, base: TypeId) -> Self {
        self.extends = Some(base);
        self
    }

    /// Set implemented interfaces.
    pub fn with_implements(mut self, interfaces: Vec<TypeId>) -> Self {
        self.implements = interfaces;
        self
    }

    /// Number of generic parameters.
    pub fn arity(&self) -> usize {
        self.type_params.len()
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// Direct base class followed by directly implemented interfaces.
    pub fn direct_supertypes(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.extends.iter().chain(self.implements.iter()).copied()
    }
}

// =============================================================================
// DefinitionStore
// =============================================================================

/// Thread-safe storage for type definitions.
///
/// Uses `DashMap` so a container can keep registering types while other
/// threads resolve against already-completed definitions.
pub struct DefinitionStore {
    /// Unique instance ID for debugging (tracks which store instance this is)
    instance_id: u64,

    /// `DefId` -> `DefinitionInfo` mapping
    definitions: DashMap<DefId, Arc<DefinitionInfo>, FxBuildHasher>,

    /// Next available `DefId`
    next_id: AtomicU32,
}

impl Default for DefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionStore {
    /// Create a new definition store.
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "DefinitionStore::new - creating new instance");
        Self {
            instance_id,
            definitions: DashMap::with_hasher(FxBuildHasher),
            next_id: AtomicU32::new(DefId::FIRST_VALID),
        }
    }

    /// Allocate a fresh `DefId`.
    fn allocate(&self) -> DefId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        trace!(
            instance_id = self.instance_id,
            allocated_def_id = %id,
            "DefinitionStore::allocate"
        );
        DefId(id)
    }

    /// Register a new definition and return its `DefId`.
    pub fn register(&self, info: DefinitionInfo) -> DefId {
        let id = self.allocate();
        trace!(
            instance_id = self.instance_id,
            def_id = %id.0,
            kind = ?info.kind,
            arity = info.arity(),
            "DefinitionStore::register"
        );
        self.definitions.insert(id, Arc::new(info));
        id
    }

    /// Get definition info by `DefId`.
    pub fn get(&self, id: DefId) -> Option<Arc<DefinitionInfo>> {
        self.definitions.get(&id).map(|r| Arc::clone(r.value()))
    }

    /// Check if a `DefId` exists.
    pub fn contains(&self, id: DefId) -> bool {
        self.definitions.contains_key(&id)
    }

    /// Get the kind of a definition.
    pub fn get_kind(&self, id: DefId) -> Option<DefKind> {
        self.definitions.get(&id).map(|r| r.kind)
    }

    /// Get the name of a definition.
    pub fn get_name(&self, id: DefId) -> Option<Atom> {
        self.definitions.get(&id).map(|r| r.name)
    }

    /// Apply `f` to a definition in place. Returns `false` for unknown ids.
    ///
    /// Readers holding an `Arc` from [`get`](Self::get) keep seeing the
    /// previous snapshot.
    pub fn update(&self, id: DefId, f: impl FnOnce(&mut DefinitionInfo)) -> bool {
        match self.definitions.get_mut(&id) {
            Some(mut entry) => {
                f(Arc::make_mut(&mut *entry));
                true
            }
            None => false,
        }
    }

    /// Set the base class of a definition.
    pub fn set_extends(&self, id: DefId, base: TypeId) -> bool {
        self.update(id, |info| info.extends = Some(base))
    }

    /// Add an implemented interface to a definition.
    pub fn add_implements(&self, id: DefId, interface: TypeId) -> bool {
        self.update(id, |info| info.implements.push(interface))
    }

    /// Replace the type constraints of one generic parameter.
    pub fn set_param_constraints(&self, id: DefId, index: usize, constraints: Vec<TypeId>) -> bool {
        self.update_param(id, index, |param| param.constraints = constraints)
    }

    /// Add special constraints (`class`, `struct`, `new()`) to one parameter.
    pub fn add_special_constraints(
        &self,
        id: DefId,
        index: usize,
        special: SpecialConstraints,
    ) -> bool {
        self.update_param(id, index, |param| param.special |= special)
    }

    /// Set the declared variance of one parameter.
    pub fn set_variance(&self, id: DefId, index: usize, variance: Variance) -> bool {
        self.update_param(id, index, |param| param.variance = variance)
    }

    fn update_param(&self, id: DefId, index: usize, f: impl FnOnce(&mut TypeParamInfo)) -> bool {
        let mut found = false;
        self.update(id, |info| {
            if let Some(param) = info.type_params.get_mut(index) {
                f(param);
                found = true;
            }
        });
        found
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[path = "../tests/def_tests.rs"]
mod tests;
