//! Generic parameter substitution.
//!
//! `instantiate_type` replaces parameters in a type expression with the types
//! a [`TypeSubstitution`] maps them to. It is how base types declared over a
//! definition's own parameters (`class Repo<T> : IRepo<T>`) are specialised
//! for a particular instantiation (`Repo<Customer>` implements
//! `IRepo<Customer>`), and how unified bindings are applied to a partially
//! closed implementation.

use crate::db::TypeDatabase;
use crate::def::DefId;
use crate::types::{ParamRef, TypeArgs, TypeData, TypeId};
use rustc_hash::FxHashMap;

/// Mapping from generic parameters to the types that replace them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeSubstitution {
    map: FxHashMap<ParamRef, TypeId>,
}

impl TypeSubstitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map each parameter of `owner` to the argument at the same position.
    pub fn from_args(owner: DefId, args: &[TypeId]) -> Self {
        let map = args
            .iter()
            .enumerate()
            .map(|(index, arg)| (ParamRef::new(owner, index as u32), *arg))
            .collect();
        Self { map }
    }

    pub fn insert(&mut self, param: ParamRef, ty: TypeId) {
        self.map.insert(param, ty);
    }

    pub fn get(&self, param: ParamRef) -> Option<TypeId> {
        self.map.get(&param).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamRef, TypeId)> + '_ {
        self.map.iter().map(|(param, ty)| (*param, *ty))
    }
}

impl FromIterator<(ParamRef, TypeId)> for TypeSubstitution {
    fn from_iter<I: IntoIterator<Item = (ParamRef, TypeId)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

/// Replace every parameter in `ty` that `subst` maps.
///
/// Unmapped parameters are left in place, so applying a partial substitution
/// yields a partially closed type. Each distinct subterm is rewritten once.
pub fn instantiate_type(db: &dyn TypeDatabase, ty: TypeId, subst: &TypeSubstitution) -> TypeId {
    if subst.is_empty() {
        return ty;
    }
    let mut memo = FxHashMap::default();
    instantiate_inner(db, ty, subst, &mut memo)
}

fn instantiate_inner(
    db: &dyn TypeDatabase,
    ty: TypeId,
    subst: &TypeSubstitution,
    memo: &mut FxHashMap<TypeId, TypeId>,
) -> TypeId {
    if let Some(&done) = memo.get(&ty) {
        return done;
    }

    let result = match db.lookup(ty) {
        Some(TypeData::Param(param)) => subst.get(param).unwrap_or(ty),
        Some(TypeData::Application { def, args }) => {
            let new_args: TypeArgs = args
                .iter()
                .map(|arg| instantiate_inner(db, *arg, subst, memo))
                .collect();
            if new_args == args {
                ty
            } else {
                db.intern(TypeData::Application {
                    def,
                    args: new_args,
                })
            }
        }
        Some(TypeData::Named(_)) | None => ty,
    };
    memo.insert(ty, result);
    result
}

#[cfg(test)]
#[path = "../tests/instantiate_tests.rs"]
mod tests;
