//! Classification queries over type expressions.
//!
//! These answer the questions the resolver asks about a single type: which
//! definition it instantiates, which parameters it still mentions, and which
//! special constraints (`class`, `struct`, `new()`) it can satisfy.

use crate::db::TypeDatabase;
use crate::def::{DefId, DefKind};
use crate::types::{ParamRef, SpecialConstraints, TypeArgs, TypeData, TypeId};
use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashSet};

/// Insertion-ordered hash set.
pub type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// The definition `ty` instantiates, if it is not a bare parameter.
pub fn definition_of(db: &dyn TypeDatabase, ty: TypeId) -> Option<DefId> {
    db.lookup(ty)?.definition()
}

/// Generic arguments of `ty` (empty for non-generic types and parameters).
pub fn type_args(db: &dyn TypeDatabase, ty: TypeId) -> TypeArgs {
    match db.lookup(ty) {
        Some(TypeData::Application { args, .. }) => args,
        _ => TypeArgs::new(),
    }
}

pub fn is_type_parameter(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    matches!(db.lookup(ty), Some(TypeData::Param(_)))
}

/// `true` for any application, open or closed.
pub fn is_generic_type(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    matches!(db.lookup(ty), Some(TypeData::Application { .. }))
}

/// `true` if `ty` is its definition applied to its own parameters in order.
pub fn is_generic_definition(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    let Some(TypeData::Application { def, args }) = db.lookup(ty) else {
        return false;
    };
    args.iter().enumerate().all(|(index, arg)| {
        db.lookup(*arg) == Some(TypeData::Param(ParamRef::new(def, index as u32)))
    })
}

/// `true` if `other` is an application of `def`.
pub fn is_generic_definition_of(db: &dyn TypeDatabase, def: DefId, other: TypeId) -> bool {
    matches!(db.lookup(other), Some(TypeData::Application { def: d, .. }) if d == def)
}

/// Generic parameters mentioned anywhere in `ty`, in order of first occurrence.
///
/// Shared subterms are visited once, so the cost is linear in the number of
/// distinct nodes rather than in the size of the unfolded tree.
pub fn collect_params(db: &dyn TypeDatabase, ty: TypeId, out: &mut FxIndexSet<ParamRef>) {
    let mut visited = FxHashSet::default();
    collect_params_inner(db, ty, out, &mut visited);
}

fn collect_params_inner(
    db: &dyn TypeDatabase,
    ty: TypeId,
    out: &mut FxIndexSet<ParamRef>,
    visited: &mut FxHashSet<TypeId>,
) {
    if !visited.insert(ty) {
        return;
    }
    match db.lookup(ty) {
        Some(TypeData::Param(param)) => {
            out.insert(param);
        }
        Some(TypeData::Application { args, .. }) => {
            for arg in args {
                collect_params_inner(db, arg, out, visited);
            }
        }
        Some(TypeData::Named(_)) | None => {}
    }
}

/// Parameters owned by `owner` that are still unbound in `ty`.
pub fn free_params_of(db: &dyn TypeDatabase, ty: TypeId, owner: DefId) -> FxIndexSet<ParamRef> {
    let mut all = FxIndexSet::default();
    collect_params(db, ty, &mut all);
    all.retain(|param| param.owner == owner);
    all
}

/// `true` if `ty` mentions any parameter in `params`.
pub fn mentions_any(db: &dyn TypeDatabase, ty: TypeId, params: &FxIndexSet<ParamRef>) -> bool {
    if params.is_empty() {
        return false;
    }
    let mut clean = FxHashSet::default();
    mentions_any_inner(db, ty, params, &mut clean)
}

/// `clean` holds nodes already known not to mention `params`.
fn mentions_any_inner(
    db: &dyn TypeDatabase,
    ty: TypeId,
    params: &FxIndexSet<ParamRef>,
    clean: &mut FxHashSet<TypeId>,
) -> bool {
    if clean.contains(&ty) {
        return false;
    }
    let found = match db.lookup(ty) {
        Some(TypeData::Param(param)) => params.contains(&param),
        Some(TypeData::Application { args, .. }) => args
            .iter()
            .any(|arg| mentions_any_inner(db, *arg, params, clean)),
        Some(TypeData::Named(_)) | None => false,
    };
    if !found {
        clean.insert(ty);
    }
    found
}

/// `true` if `ty` still mentions its own definition's parameters but is not
/// the open definition itself (`Impl<int, U>` for `Impl<T, U>`).
pub fn is_partially_closed(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    let Some(def) = definition_of(db, ty) else {
        return false;
    };
    !free_params_of(db, ty, def).is_empty() && !is_generic_definition(db, ty)
}

// =============================================================================
// Special constraint satisfaction
// =============================================================================

/// Whether `ty` can satisfy a `class` constraint.
pub fn is_reference_type(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    let mut visited = FxHashSet::default();
    satisfies_special_inner(db, ty, SpecialConstraints::REFERENCE_TYPE, &mut visited)
}

/// Whether `ty` can satisfy a `struct` constraint.
pub fn is_value_type(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    let mut visited = FxHashSet::default();
    satisfies_special_inner(db, ty, SpecialConstraints::VALUE_TYPE, &mut visited)
}

/// Whether `ty` can satisfy a `new()` constraint.
pub fn has_default_constructor(db: &dyn TypeDatabase, ty: TypeId) -> bool {
    let mut visited = FxHashSet::default();
    satisfies_special_inner(db, ty, SpecialConstraints::DEFAULT_CONSTRUCTOR, &mut visited)
}

/// The subset of `required` that `ty` does not satisfy.
pub fn missing_special_constraints(
    db: &dyn TypeDatabase,
    ty: TypeId,
    required: SpecialConstraints,
) -> SpecialConstraints {
    let mut missing = SpecialConstraints::empty();
    for flag in required.iter() {
        let mut visited = FxHashSet::default();
        if !satisfies_special_inner(db, ty, flag, &mut visited) {
            missing |= flag;
        }
    }
    missing
}

fn satisfies_special_inner(
    db: &dyn TypeDatabase,
    ty: TypeId,
    flag: SpecialConstraints,
    visited: &mut FxHashSet<ParamRef>,
) -> bool {
    match db.lookup(ty) {
        Some(TypeData::Named(def)) | Some(TypeData::Application { def, .. }) => {
            let Some(info) = db.definition(def) else {
                return false;
            };
            if flag == SpecialConstraints::REFERENCE_TYPE {
                info.kind != DefKind::Struct
            } else if flag == SpecialConstraints::VALUE_TYPE {
                info.kind == DefKind::Struct
            } else {
                match info.kind {
                    DefKind::Struct => true,
                    DefKind::Class => info.has_default_constructor && !info.is_abstract,
                    DefKind::Interface => false,
                }
            }
        }
        Some(TypeData::Param(param)) => {
            // A parameter promises only what its own declaration promises.
            if !visited.insert(param) {
                return false;
            }
            let Some(info) = db.param_info(param) else {
                return false;
            };
            if info.special.contains(flag) {
                return true;
            }
            if flag == SpecialConstraints::DEFAULT_CONSTRUCTOR
                && info.special.contains(SpecialConstraints::VALUE_TYPE)
            {
                return true;
            }
            if flag == SpecialConstraints::REFERENCE_TYPE {
                // A class constraint makes the parameter a reference type;
                // an interface constraint does not (structs implement interfaces).
                return info.constraints.iter().any(|constraint| {
                    match db.lookup(*constraint) {
                        Some(TypeData::Param(_)) => {
                            satisfies_special_inner(db, *constraint, flag, visited)
                        }
                        Some(data) => data
                            .definition()
                            .and_then(|def| db.definition(def))
                            .is_some_and(|def| def.kind == DefKind::Class),
                        None => false,
                    }
                });
            }
            if flag == SpecialConstraints::VALUE_TYPE {
                return info
                    .constraints
                    .iter()
                    .any(|constraint| satisfies_special_inner(db, *constraint, flag, visited));
            }
            false
        }
        None => false,
    }
}

#[cfg(test)]
#[path = "../tests/type_queries_tests.rs"]
mod tests;
