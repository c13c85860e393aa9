//! Generic argument unification.
//!
//! Given the argument list of one candidate supertype of the implementation
//! (the *pattern*, which mentions the implementation's free parameters,
//! possibly nested: `IRepository<IValidator<T>>`) and the argument list of
//! the requested abstraction (the *concrete* side:
//! `IRepository<IValidator<Customer>>`), find a binding for every free
//! parameter that makes the two structurally equal.
//!
//! Unification runs in two phases:
//!
//! 1. **Structural.** The pattern and concrete trees are walked in parallel.
//!    Every occurrence of a free parameter binds it; all occurrences must
//!    agree or the candidate fails with [`UnifyError::AmbiguousBinding`].
//! 2. **Constraints.** For every bound parameter, each of its constraints
//!    that still mentions free parameters is matched against the supertypes
//!    of the bound type. This binds parameters that only occur in
//!    constraints:
//!
//!    ```text
//!    class Handler<TModel, TItem> : IHandler<TModel> where TModel : IList<TItem>
//!    IHandler<List<int>>  =>  TModel = List<int>, and List<int> : IList<int> gives TItem = int
//!    ```
//!
//!    This phase only fills unbound parameters. A constraint that disagrees
//!    with an existing binding is left for construction to reject, since
//!    variance can make such a binding valid.
//!
//! Constraint expansion can loop (`where T : IComparable<T>`, or
//! `where T : INode<U> where U : IEdge<T>`). A [`RecursionGuard`] keyed by
//! parameter marks the parameters currently being expanded, and re-entry is
//! treated as already satisfied.

use crate::db::TypeDatabase;
use crate::hierarchy::base_types_and_interfaces;
use crate::instantiate::{TypeSubstitution, instantiate_type};
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::type_queries::{FxIndexSet, mentions_any};
use crate::types::{ParamRef, TypeData, TypeId};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use thiserror::Error;
use tracing::trace;

/// Why a candidate's arguments cannot be unified with the requested ones.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UnifyError {
    #[error("pattern has {pattern} type arguments but the requested type has {concrete}")]
    ArityMismatch { pattern: usize, concrete: usize },

    #[error("{pattern:?} does not structurally match {concrete:?}")]
    StructureMismatch { pattern: TypeId, concrete: TypeId },

    #[error("{param:?} is bound to both {first:?} and {second:?}")]
    AmbiguousBinding {
        param: ParamRef,
        first: TypeId,
        second: TypeId,
    },

    #[error("{concrete:?} has no supertype matching constraint {constraint:?} on {param:?}")]
    UnsatisfiedConstraint {
        param: ParamRef,
        constraint: TypeId,
        concrete: TypeId,
    },

    #[error("constraint expansion exceeded its recursion limits")]
    LimitExceeded,
}

/// Parameter bindings in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParamBindings {
    map: IndexMap<ParamRef, TypeId, FxBuildHasher>,
}

impl ParamBindings {
    pub fn get(&self, param: ParamRef) -> Option<TypeId> {
        self.map.get(&param).copied()
    }

    pub fn contains(&self, param: ParamRef) -> bool {
        self.map.contains_key(&param)
    }

    fn insert(&mut self, param: ParamRef, ty: TypeId) {
        self.map.insert(param, ty);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn params(&self) -> impl Iterator<Item = ParamRef> + '_ {
        self.map.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamRef, TypeId)> + '_ {
        self.map.iter().map(|(param, ty)| (*param, *ty))
    }

    pub fn to_substitution(&self) -> TypeSubstitution {
        self.iter().collect()
    }
}

/// Unifies candidate supertype arguments with requested arguments.
pub struct ArgumentUnifier<'a> {
    db: &'a dyn TypeDatabase,
    /// Implementation parameters still open for binding.
    free: FxIndexSet<ParamRef>,
    /// Maps the implementation definition's parameters to the arguments the
    /// implementation type carries; applied to constraints before matching.
    closure: TypeSubstitution,
    guard: RecursionGuard<ParamRef>,
}

impl<'a> ArgumentUnifier<'a> {
    pub fn new(
        db: &'a dyn TypeDatabase,
        free: FxIndexSet<ParamRef>,
        closure: TypeSubstitution,
    ) -> Self {
        Self {
            db,
            free,
            closure,
            guard: RecursionGuard::with_profile(RecursionProfile::Unification),
        }
    }

    pub fn with_profile(mut self, profile: RecursionProfile) -> Self {
        self.guard = RecursionGuard::with_profile(profile);
        self
    }

    /// Bind the free parameters so that `pattern` equals `concrete`
    /// position by position.
    pub fn unify_arguments(
        &mut self,
        pattern: &[TypeId],
        concrete: &[TypeId],
    ) -> Result<ParamBindings, UnifyError> {
        if pattern.len() != concrete.len() {
            return Err(UnifyError::ArityMismatch {
                pattern: pattern.len(),
                concrete: concrete.len(),
            });
        }

        let mut bindings = ParamBindings::default();
        for (pattern, concrete) in pattern.iter().zip(concrete) {
            self.unify(*pattern, *concrete, &mut bindings)?;
        }

        let structural: Vec<ParamRef> = bindings.params().collect();
        for param in structural {
            self.expand_constraints(param, &mut bindings)?;
        }

        trace!(bound = bindings.len(), free = self.free.len(), "unify_arguments");
        Ok(bindings)
    }

    fn unify(
        &self,
        pattern: TypeId,
        concrete: TypeId,
        bindings: &mut ParamBindings,
    ) -> Result<(), UnifyError> {
        let mut seen = FxHashSet::default();
        self.unify_inner(pattern, concrete, bindings, &mut seen)
    }

    /// `seen` holds pairs already matched; shared subterms are walked once.
    fn unify_inner(
        &self,
        pattern: TypeId,
        concrete: TypeId,
        bindings: &mut ParamBindings,
        seen: &mut FxHashSet<(TypeId, TypeId)>,
    ) -> Result<(), UnifyError> {
        if !seen.insert((pattern, concrete)) {
            return Ok(());
        }
        match self.db.lookup(pattern) {
            Some(TypeData::Param(param)) if self.free.contains(&param) => {
                match bindings.get(param) {
                    None => {
                        bindings.insert(param, concrete);
                        Ok(())
                    }
                    Some(first) if first == concrete => Ok(()),
                    Some(first) => Err(UnifyError::AmbiguousBinding {
                        param,
                        first,
                        second: concrete,
                    }),
                }
            }
            Some(TypeData::Application { def, args }) => match self.db.lookup(concrete) {
                Some(TypeData::Application {
                    def: concrete_def,
                    args: concrete_args,
                }) if concrete_def == def && concrete_args.len() == args.len() => {
                    for (pattern, concrete) in args.iter().zip(&concrete_args) {
                        self.unify_inner(*pattern, *concrete, bindings, seen)?;
                    }
                    Ok(())
                }
                _ => Err(UnifyError::StructureMismatch { pattern, concrete }),
            },
            _ if pattern == concrete => Ok(()),
            _ => Err(UnifyError::StructureMismatch { pattern, concrete }),
        }
    }

    fn expand_constraints(
        &mut self,
        param: ParamRef,
        bindings: &mut ParamBindings,
    ) -> Result<(), UnifyError> {
        match self.guard.enter(param) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => return Ok(()),
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                return Err(UnifyError::LimitExceeded);
            }
        }
        let result = self.expand_constraints_inner(param, bindings);
        self.guard.leave(param);
        result
    }

    fn expand_constraints_inner(
        &mut self,
        param: ParamRef,
        bindings: &mut ParamBindings,
    ) -> Result<(), UnifyError> {
        let Some(bound) = bindings.get(param) else {
            return Ok(());
        };
        let Some(info) = self.db.param_info(param) else {
            return Ok(());
        };

        for constraint in &info.constraints {
            let constraint = instantiate_type(self.db, *constraint, &self.closure);
            if !mentions_any(self.db, constraint, &self.free) {
                continue;
            }
            let newly_bound = self.infer_from_constraint(param, constraint, bound, bindings)?;
            for next in newly_bound {
                self.expand_constraints(next, bindings)?;
            }
        }
        Ok(())
    }

    /// Bind free parameters of `constraint` from the supertypes of `bound`.
    /// Returns the parameters that received a binding.
    fn infer_from_constraint(
        &self,
        param: ParamRef,
        constraint: TypeId,
        bound: TypeId,
        bindings: &mut ParamBindings,
    ) -> Result<Vec<ParamRef>, UnifyError> {
        match self.db.lookup(constraint) {
            // `where T : U`: the type bound to T is the best evidence for U.
            Some(TypeData::Param(target)) => {
                if self.free.contains(&target) && !bindings.contains(target) {
                    bindings.insert(target, bound);
                    return Ok(vec![target]);
                }
                Ok(Vec::new())
            }
            Some(TypeData::Application { def, args }) => {
                let mut same_definition = false;
                for supertype in base_types_and_interfaces(self.db, bound) {
                    let Some(TypeData::Application {
                        def: super_def,
                        args: super_args,
                    }) = self.db.lookup(supertype)
                    else {
                        continue;
                    };
                    if super_def != def || super_args.len() != args.len() {
                        continue;
                    }
                    same_definition = true;

                    let mut scratch = bindings.clone();
                    let unified = args
                        .iter()
                        .zip(&super_args)
                        .all(|(pattern, concrete)| self.unify(*pattern, *concrete, &mut scratch).is_ok());
                    if unified {
                        let newly_bound: Vec<ParamRef> =
                            scratch.params().filter(|p| !bindings.contains(*p)).collect();
                        *bindings = scratch;
                        return Ok(newly_bound);
                    }
                }

                if same_definition {
                    Ok(Vec::new())
                } else {
                    Err(UnifyError::UnsatisfiedConstraint {
                        param,
                        constraint,
                        concrete: bound,
                    })
                }
            }
            Some(TypeData::Named(_)) | None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unify_tests.rs"]
mod tests;
