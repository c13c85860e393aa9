//! Type representation for the resolution engine.
//!
//! Every type reference is a [`TypeId`] handle into the [`TypeInterner`]
//! arena. Nodes are hash-consed, so two structurally equal type expressions
//! always share a `TypeId` and equality is a single integer comparison.
//!
//! Three shapes exist:
//!
//! | Shape | Meaning | Example |
//! |-------|---------|---------|
//! | `Named(def)` | non-generic type | `Customer` |
//! | `Application { def, args }` | generic type, open or closed | `Repository<T>`, `Repository<Customer>` |
//! | `Param(ParamRef)` | unbound generic parameter | `T` of `Repository<T>` |
//!
//! A generic type *definition* is the application of a definition to its own
//! parameters, in declaration order (`Repository<T>` where `T` is
//! `Repository`'s parameter 0).
//!
//! [`TypeInterner`]: crate::TypeInterner

use crate::def::DefId;
use bitflags::bitflags;
use genbind_common::Atom;
use smallvec::SmallVec;

/// Interned type handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

/// Generic argument list. Most generic types take at most a handful of
/// arguments, so they stay inline.
pub type TypeArgs = SmallVec<[TypeId; 4]>;

/// Reference to the `index`-th generic parameter declared by `owner`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamRef {
    pub owner: DefId,
    pub index: u32,
}

impl ParamRef {
    pub const fn new(owner: DefId, index: u32) -> Self {
        Self { owner, index }
    }
}

/// Structural data behind a [`TypeId`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    /// A non-generic class, interface or struct.
    Named(DefId),
    /// A generic definition applied to arguments. `args` is never empty;
    /// zero-argument applications are interned as `Named`.
    Application { def: DefId, args: TypeArgs },
    /// An unbound generic parameter.
    Param(ParamRef),
}

impl TypeData {
    /// The definition this type is an instance of, if any.
    pub fn definition(&self) -> Option<DefId> {
        match self {
            TypeData::Named(def) | TypeData::Application { def, .. } => Some(*def),
            TypeData::Param(_) => None,
        }
    }

    /// Generic arguments (empty for non-generic types and parameters).
    pub fn args(&self) -> &[TypeId] {
        match self {
            TypeData::Application { args, .. } => args,
            TypeData::Named(_) | TypeData::Param(_) => &[],
        }
    }
}

bitflags! {
    /// Special (non-type) constraints on a generic parameter.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SpecialConstraints: u8 {
        /// `where T : class`
        const REFERENCE_TYPE = 1 << 0;
        /// `where T : struct`
        const VALUE_TYPE = 1 << 1;
        /// `where T : new()`
        const DEFAULT_CONSTRUCTOR = 1 << 2;
    }
}

/// Declared variance of an interface parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Variance {
    #[default]
    Invariant,
    /// `out T`
    Covariant,
    /// `in T`
    Contravariant,
}

/// Declaration of one generic parameter.
///
/// Constraints are type expressions that may mention any parameter of the
/// owning definition, including this one (`where T : IComparable<T>`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamInfo {
    pub name: Atom,
    pub constraints: Vec<TypeId>,
    pub special: SpecialConstraints,
    pub variance: Variance,
}

impl TypeParamInfo {
    pub fn new(name: Atom) -> Self {
        Self {
            name,
            constraints: Vec::new(),
            special: SpecialConstraints::empty(),
            variance: Variance::Invariant,
        }
    }
}
