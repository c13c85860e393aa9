//! Validation of unified bindings for one candidate.
//!
//! Unification runs against the open definition, so it yields one binding
//! per definition parameter. Those bindings are then matched against the
//! arguments the implementation type actually carries:
//!
//! ```text
//! class Impl<T, U> : IMap<T, U>      registered as Impl<int, U>
//! IMap<int, string>     T = int (fixed: int, agrees), U = string   -> Impl<int, string>
//! IMap<string, string>  T = string (fixed: int, disagrees)         -> rejected
//! ```
//!
//! A candidate has to pass three checks before it yields a closed
//! implementation type:
//!
//! 1. **Argument count**: every free parameter of the implementation is bound.
//! 2. **Partial closure**: a position the implementation fixed to a concrete
//!    type keeps it, and the binding for that position must be the same type.
//!    A fixed position unification never reached keeps its argument.
//! 3. **Final closure**: the closed type can be constructed (declared
//!    constraints hold) and is assignable to the requested abstraction.

use crate::assignability::is_assignable_from;
use crate::construct::{ConstructError, construct};
use crate::db::TypeDatabase;
use crate::def::DefId;
use crate::instantiate::{TypeSubstitution, instantiate_type};
use crate::recursion::RecursionProfile;
use crate::type_queries::{FxIndexSet, mentions_any};
use crate::types::{ParamRef, TypeArgs, TypeId};
use crate::unify::{ArgumentUnifier, ParamBindings, UnifyError};
use thiserror::Error;

/// Why a candidate supertype did not produce a closed implementation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CandidateRejection {
    #[error(transparent)]
    Unify(#[from] UnifyError),

    #[error("resolved {resolved} of {expected} open implementation parameters")]
    ArgumentCount { expected: usize, resolved: usize },

    #[error("argument {position} is fixed to {fixed:?} but resolved to {candidate:?}")]
    FixedArgumentMismatch {
        position: usize,
        fixed: TypeId,
        candidate: Option<TypeId>,
    },

    #[error(transparent)]
    Construct(#[from] ConstructError),

    #[error("{closed:?} is not assignable to {abstraction:?}")]
    NotAssignable { closed: TypeId, abstraction: TypeId },
}

/// The resolved argument for one position of the implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgumentMapping {
    pub position: usize,
    /// What the implementation type carries at this position: a concrete
    /// type fixed by a partial closure, or something mentioning a free
    /// parameter.
    pub fixed: TypeId,
    /// The type unification bound the definition's parameter at this
    /// position to. A concrete fixed argument stands in when unification
    /// left the parameter unbound.
    pub candidate: Option<TypeId>,
}

impl ArgumentMapping {
    /// A mapping is satisfied when it is bound and, for a fixed position,
    /// the binding is the fixed argument itself. A position still holding a
    /// free parameter accepts any binding.
    pub fn is_satisfied(&self, db: &dyn TypeDatabase, free: &FxIndexSet<ParamRef>) -> bool {
        match self.candidate {
            None => false,
            Some(candidate) => candidate == self.fixed || mentions_any(db, self.fixed, free),
        }
    }
}

pub struct ConstraintChecker<'a> {
    db: &'a dyn TypeDatabase,
    implementation_def: DefId,
    fixed_args: TypeArgs,
    /// Parameters the implementation type still mentions.
    free: &'a FxIndexSet<ParamRef>,
    profile: RecursionProfile,
}

impl<'a> ConstraintChecker<'a> {
    pub fn new(
        db: &'a dyn TypeDatabase,
        implementation_def: DefId,
        fixed_args: TypeArgs,
        free: &'a FxIndexSet<ParamRef>,
    ) -> Self {
        Self {
            db,
            implementation_def,
            fixed_args,
            free,
            profile: RecursionProfile::Unification,
        }
    }

    pub fn with_profile(mut self, profile: RecursionProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Run all three checks on bindings of the definition's parameters and
    /// produce the closed implementation type.
    pub fn validate(
        &self,
        abstraction: TypeId,
        definition_bindings: &ParamBindings,
    ) -> Result<TypeId, CandidateRejection> {
        let mut mappings = self.map_arguments(definition_bindings);
        let bindings = self.bind_free_params(&mappings)?;
        self.check_argument_count(&bindings)?;
        self.fill_open_positions(&mut mappings, &bindings);
        let args = self.check_partial_closure(&mappings)?;
        self.check_closed(abstraction, &args)
    }

    /// Pair each argument of the implementation with the binding of the
    /// definition parameter at the same position.
    pub fn map_arguments(&self, definition_bindings: &ParamBindings) -> Vec<ArgumentMapping> {
        self.fixed_args
            .iter()
            .enumerate()
            .map(|(position, fixed)| {
                let param = ParamRef::new(self.implementation_def, position as u32);
                let candidate = definition_bindings.get(param).or_else(|| {
                    (!mentions_any(self.db, *fixed, self.free)).then_some(*fixed)
                });
                ArgumentMapping {
                    position,
                    fixed: *fixed,
                    candidate,
                }
            })
            .collect()
    }

    /// Bind the implementation's free parameters by matching each open
    /// argument against its mapped candidate (`Impl<List<U>>` against
    /// `List<string>` binds `U = string`).
    pub fn bind_free_params(
        &self,
        mappings: &[ArgumentMapping],
    ) -> Result<ParamBindings, CandidateRejection> {
        let (pattern, concrete): (Vec<TypeId>, Vec<TypeId>) = mappings
            .iter()
            .filter(|mapping| mentions_any(self.db, mapping.fixed, self.free))
            .filter_map(|mapping| Some((mapping.fixed, mapping.candidate?)))
            .unzip();
        let closure = TypeSubstitution::from_args(self.implementation_def, &self.fixed_args);
        let bindings = ArgumentUnifier::new(self.db, self.free.clone(), closure)
            .with_profile(self.profile)
            .unify_arguments(&pattern, &concrete)?;
        Ok(bindings)
    }

    /// Close open positions unification never reached from the free
    /// parameters bound elsewhere (`Impl<U, List<U>>`).
    fn fill_open_positions(&self, mappings: &mut [ArgumentMapping], bindings: &ParamBindings) {
        let subst = bindings.to_substitution();
        for mapping in mappings.iter_mut().filter(|mapping| mapping.candidate.is_none()) {
            let closed = instantiate_type(self.db, mapping.fixed, &subst);
            if !mentions_any(self.db, closed, self.free) {
                mapping.candidate = Some(closed);
            }
        }
    }

    pub fn check_argument_count(&self, bindings: &ParamBindings) -> Result<(), CandidateRejection> {
        let resolved = self
            .free
            .iter()
            .filter(|param| bindings.contains(**param))
            .count();
        if resolved == self.free.len() {
            Ok(())
        } else {
            Err(CandidateRejection::ArgumentCount {
                expected: self.free.len(),
                resolved,
            })
        }
    }

    /// The closed argument list, or the first position whose binding
    /// contradicts the partial closure.
    pub fn check_partial_closure(
        &self,
        mappings: &[ArgumentMapping],
    ) -> Result<TypeArgs, CandidateRejection> {
        mappings
            .iter()
            .map(|mapping| match mapping.candidate {
                Some(candidate) if mapping.is_satisfied(self.db, self.free) => Ok(candidate),
                _ => Err(CandidateRejection::FixedArgumentMismatch {
                    position: mapping.position,
                    fixed: mapping.fixed,
                    candidate: mapping.candidate,
                }),
            })
            .collect()
    }

    pub fn check_closed(
        &self,
        abstraction: TypeId,
        args: &[TypeId],
    ) -> Result<TypeId, CandidateRejection> {
        let closed = construct(self.db, self.implementation_def, args)?;
        if is_assignable_from(self.db, abstraction, closed) {
            Ok(closed)
        } else {
            Err(CandidateRejection::NotAssignable {
                closed,
                abstraction,
            })
        }
    }
}

#[cfg(test)]
#[path = "../tests/constraints_tests.rs"]
mod tests;
