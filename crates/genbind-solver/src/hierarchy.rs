//! Base type and interface enumeration.
//!
//! Responsibilities:
//! - Walk a type's base classes and interfaces transitively, specialising
//!   each declared supertype for the type's own arguments
//! - Select the supertypes that instantiate the requested abstraction's
//!   generic definition (the candidates the unifier works on)
//!
//! Inheritance cycles are not rejected at declaration time, so the walk
//! dedupes by `TypeId` and bounds its depth with a [`RecursionGuard`].

use crate::db::TypeDatabase;
use crate::instantiate::{TypeSubstitution, instantiate_type};
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::type_queries::{FxIndexSet, is_generic_definition_of, type_args};
use crate::types::{TypeArgs, TypeData, TypeId};
use tracing::{debug, trace};

/// A supertype of the implementation that instantiates the abstraction's
/// generic definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateBaseType {
    pub ty: TypeId,
    pub args: TypeArgs,
}

/// The type itself, its transitive base classes and all interfaces it
/// implements, deduplicated, in discovery order.
///
/// For a generic parameter the set is the parameter plus everything reachable
/// from its constraints.
pub fn base_types_and_interfaces(db: &dyn TypeDatabase, ty: TypeId) -> FxIndexSet<TypeId> {
    let mut out = FxIndexSet::default();
    let mut guard = RecursionGuard::with_profile(RecursionProfile::Hierarchy);
    collect_supertypes(db, ty, &mut out, &mut guard);
    if guard.is_exceeded() {
        debug!(
            ty = ty.0,
            collected = out.len(),
            "base type enumeration truncated at recursion limit"
        );
    }
    out
}

fn collect_supertypes(
    db: &dyn TypeDatabase,
    ty: TypeId,
    out: &mut FxIndexSet<TypeId>,
    guard: &mut RecursionGuard<TypeId>,
) {
    if !out.insert(ty) {
        return;
    }
    if !guard.enter(ty).is_entered() {
        return;
    }

    match db.lookup(ty) {
        Some(TypeData::Param(param)) => {
            if let Some(info) = db.param_info(param) {
                for constraint in info.constraints {
                    collect_supertypes(db, constraint, out, guard);
                }
            }
        }
        Some(data) => {
            let info = data.definition().and_then(|def| Some((def, db.definition(def)?)));
            if let Some((def, info)) = info {
                let subst = TypeSubstitution::from_args(def, data.args());
                for supertype in info.direct_supertypes() {
                    let supertype = instantiate_type(db, supertype, &subst);
                    collect_supertypes(db, supertype, out, guard);
                }
            }
        }
        None => {}
    }

    guard.leave(ty);
}

/// Finds the supertypes of an implementation that can be matched against a
/// requested abstraction.
pub struct BaseTypeEnumerator<'a> {
    db: &'a dyn TypeDatabase,
}

impl<'a> BaseTypeEnumerator<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self { db }
    }

    /// Candidates of `implementation` for `abstraction`, in discovery order.
    ///
    /// A generic abstraction matches every supertype that instantiates the
    /// same definition, whatever its arguments. A non-generic abstraction has
    /// no arguments to unify, so it matches only a supertype equal to it.
    pub fn candidates(&self, implementation: TypeId, abstraction: TypeId) -> Vec<CandidateBaseType> {
        let Some(requested) = self.db.lookup(abstraction) else {
            return Vec::new();
        };
        let supertypes = base_types_and_interfaces(self.db, implementation);

        let candidates: Vec<CandidateBaseType> = match requested {
            TypeData::Application { def, .. } => supertypes
                .iter()
                .filter(|ty| is_generic_definition_of(self.db, def, **ty))
                .map(|ty| CandidateBaseType {
                    ty: *ty,
                    args: type_args(self.db, *ty),
                })
                .collect(),
            TypeData::Named(_) => supertypes
                .iter()
                .filter(|ty| **ty == abstraction)
                .map(|ty| CandidateBaseType {
                    ty: *ty,
                    args: TypeArgs::new(),
                })
                .collect(),
            TypeData::Param(_) => Vec::new(),
        };

        trace!(
            implementation = implementation.0,
            abstraction = abstraction.0,
            supertypes = supertypes.len(),
            candidates = candidates.len(),
            "BaseTypeEnumerator::candidates"
        );
        candidates
    }
}

#[cfg(test)]
#[path = "../tests/hierarchy_tests.rs"]
mod tests;
