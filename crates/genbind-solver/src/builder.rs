//! Closed implementation builder.
//!
//! [`GenericTypeBuilder`] answers one question for the container: can this
//! implementation serve this abstraction, and if so, which closed type should
//! be instantiated?
//!
//! ```text
//! Start
//!   -> EnumerateCandidates   supertypes of the implementation that
//!                            instantiate the abstraction's definition
//!   -> UnifyPerCandidate     bind the definition's parameters
//!   -> Validate              argument count, partial closure, construct,
//!                            assignability
//!   -> Valid(closed) | Invalid
//! ```
//!
//! An implementation without free parameters skips straight to an
//! assignability check. An implementation may only mention its own
//! definition's parameters. Every per-candidate failure is logged and the next
//! candidate is tried; only malformed input is reported as an error.

use crate::assignability::is_assignable_from;
use crate::constraints::{CandidateRejection, ConstraintChecker};
use crate::db::TypeDatabase;
use crate::error::ResolveError;
use crate::format::TypeFormatter;
use crate::hierarchy::{BaseTypeEnumerator, CandidateBaseType};
use crate::instantiate::TypeSubstitution;
use crate::options::{AmbiguityPolicy, ResolverOptions};
use crate::type_queries::{
    FxIndexSet, collect_params, definition_of, free_params_of, type_args,
};
use crate::types::{ParamRef, TypeData, TypeId};
use crate::unify::ArgumentUnifier;
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

/// Outcome of a resolution attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuildResult {
    Invalid,
    /// The closed implementation type. Never mentions an unresolved
    /// parameter; only parameters carried in by the requested abstraction
    /// itself can appear in it.
    Valid(TypeId),
}

impl BuildResult {
    pub fn is_valid(self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn closed_type(self) -> Option<TypeId> {
        match self {
            Self::Valid(ty) => Some(ty),
            Self::Invalid => None,
        }
    }
}

pub struct GenericTypeBuilder<'a> {
    db: &'a dyn TypeDatabase,
    abstraction: TypeId,
    implementation: TypeId,
    options: ResolverOptions,
}

impl<'a> GenericTypeBuilder<'a> {
    pub fn new(db: &'a dyn TypeDatabase, abstraction: TypeId, implementation: TypeId) -> Self {
        Self {
            db,
            abstraction,
            implementation,
            options: ResolverOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(&self) -> Result<BuildResult, ResolveError> {
        validate_type(self.db, self.abstraction)?;
        validate_type(self.db, self.implementation)?;

        if matches!(self.db.lookup(self.abstraction), Some(TypeData::Param(_))) {
            return Err(ResolveError::AbstractionIsParameter(self.abstraction));
        }
        let implementation = self
            .db
            .lookup(self.implementation)
            .ok_or(ResolveError::UnknownType(self.implementation))?;
        let Some(implementation_def) = implementation.definition() else {
            return Err(ResolveError::ImplementationIsParameter(self.implementation));
        };

        let mut mentioned = FxIndexSet::default();
        collect_params(self.db, self.implementation, &mut mentioned);
        if let Some(param) = mentioned.iter().find(|param| param.owner != implementation_def) {
            return Err(ResolveError::ForeignParameter {
                ty: self.implementation,
                param: *param,
            });
        }

        let free = mentioned;
        if free.is_empty() {
            let valid = is_assignable_from(self.db, self.abstraction, self.implementation);
            debug!(
                abstraction = %self.format(self.abstraction),
                implementation = %self.format(self.implementation),
                valid,
                "closed implementation, skipping unification"
            );
            return Ok(if valid {
                BuildResult::Valid(self.implementation)
            } else {
                BuildResult::Invalid
            });
        }

        // Candidates come from the open definition, so the bindings cover
        // every position and can be checked against what a partial closure
        // fixed.
        let open = self
            .db
            .definition_type(implementation_def)
            .ok_or(ResolveError::UnknownDefinition(implementation_def))?;
        let open_params = free_params_of(self.db, open, implementation_def);

        let candidates = BaseTypeEnumerator::new(self.db).candidates(open, self.abstraction);
        if candidates.is_empty() {
            debug!(
                abstraction = %self.format(self.abstraction),
                implementation = %self.format(self.implementation),
                "no supertype instantiates the abstraction"
            );
            return Ok(BuildResult::Invalid);
        }

        let requested = type_args(self.db, self.abstraction);
        let checker = ConstraintChecker::new(
            self.db,
            implementation_def,
            implementation.args().iter().copied().collect(),
            &free,
        )
        .with_profile(self.options.unification_profile());

        let mut closed_types: Vec<TypeId> = Vec::new();
        for candidate in &candidates {
            match self.close_candidate(candidate, &requested, &open_params, &checker) {
                Ok(closed) => {
                    trace!(
                        candidate = %self.format(candidate.ty),
                        closed = %self.format(closed),
                        "candidate accepted"
                    );
                    if !closed_types.contains(&closed) {
                        closed_types.push(closed);
                    }
                    if self.options.ambiguity == AmbiguityPolicy::FirstMatch {
                        break;
                    }
                }
                Err(rejection) => {
                    debug!(
                        candidate = %self.format(candidate.ty),
                        reason = %rejection,
                        "candidate rejected"
                    );
                }
            }
        }

        match closed_types.as_slice() {
            [] => Ok(BuildResult::Invalid),
            [closed] => Ok(BuildResult::Valid(*closed)),
            _ => {
                debug!(
                    abstraction = %self.format(self.abstraction),
                    implementation = %self.format(self.implementation),
                    closings = closed_types.len(),
                    "implementation closes to several types, rejecting"
                );
                Ok(BuildResult::Invalid)
            }
        }
    }

    fn close_candidate(
        &self,
        candidate: &CandidateBaseType,
        requested: &[TypeId],
        open_params: &FxIndexSet<ParamRef>,
        checker: &ConstraintChecker<'_>,
    ) -> Result<TypeId, CandidateRejection> {
        let bindings =
            ArgumentUnifier::new(self.db, open_params.clone(), TypeSubstitution::new())
                .with_profile(self.options.unification_profile())
                .unify_arguments(&candidate.args, requested)?;
        checker.validate(self.abstraction, &bindings)
    }

    fn format(&self, ty: TypeId) -> String {
        TypeFormatter::new(self.db).format(ty)
    }
}

/// Check that `ty` and everything it mentions is known to the store, and
/// that the structure behind it is finite.
pub fn validate_type(db: &dyn TypeDatabase, ty: TypeId) -> Result<(), ResolveError> {
    let mut visiting = FxHashSet::default();
    let mut valid = FxHashSet::default();
    validate_inner(db, ty, &mut visiting, &mut valid)
}

fn validate_inner(
    db: &dyn TypeDatabase,
    ty: TypeId,
    visiting: &mut FxHashSet<TypeId>,
    valid: &mut FxHashSet<TypeId>,
) -> Result<(), ResolveError> {
    if valid.contains(&ty) {
        return Ok(());
    }
    if !visiting.insert(ty) {
        return Err(ResolveError::CyclicType(ty));
    }

    match db.lookup(ty).ok_or(ResolveError::UnknownType(ty))? {
        TypeData::Param(param) => {
            db.param_info(param)
                .ok_or(ResolveError::UnknownParameter(param))?;
        }
        data @ (TypeData::Named(_) | TypeData::Application { .. }) => {
            let def = data.definition().ok_or(ResolveError::UnknownType(ty))?;
            let info = db
                .definition(def)
                .ok_or(ResolveError::UnknownDefinition(def))?;
            if info.arity() != data.args().len() {
                return Err(ResolveError::ArityMismatch {
                    ty,
                    expected: info.arity(),
                    found: data.args().len(),
                });
            }
            for argument in data.args() {
                validate_inner(db, *argument, visiting, valid)?;
            }
        }
    }

    visiting.remove(&ty);
    valid.insert(ty);
    Ok(())
}

// =============================================================================
// Entry points
// =============================================================================

/// Close `implementation` for a requested `closed_abstraction`.
///
/// Returns `Ok(None)` when the implementation cannot serve the abstraction.
pub fn make_closed_implementation(
    db: &dyn TypeDatabase,
    closed_abstraction: TypeId,
    implementation: TypeId,
) -> Result<Option<TypeId>, ResolveError> {
    Ok(GenericTypeBuilder::new(db, closed_abstraction, implementation)
        .build()?
        .closed_type())
}

/// Decide at registration time whether `open_implementation` can serve
/// every closed version of `open_abstraction`.
///
/// The abstraction's own parameters stand in for an arbitrary closing: they
/// satisfy exactly the constraints the abstraction declares, so the probe
/// succeeds only if the implementation demands nothing more.
pub fn is_implementation_applicable_to_every_generic_type(
    db: &dyn TypeDatabase,
    open_abstraction: TypeId,
    open_implementation: TypeId,
) -> Result<bool, ResolveError> {
    validate_type(db, open_abstraction)?;
    let def = definition_of(db, open_abstraction)
        .ok_or(ResolveError::AbstractionIsParameter(open_abstraction))?;
    let representative = db
        .definition_type(def)
        .ok_or(ResolveError::UnknownDefinition(def))?;

    let result = GenericTypeBuilder::new(db, representative, open_implementation).build()?;
    trace!(
        abstraction = representative.0,
        implementation = open_implementation.0,
        applicable = result.is_valid(),
        "applicability probe"
    );
    Ok(result.is_valid())
}

#[cfg(test)]
#[path = "../tests/builder_tests.rs"]
mod tests;
