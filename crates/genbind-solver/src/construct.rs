//! Construction of generic instantiations with constraint checking.
//!
//! `construct` is the engine's equivalent of materialising a closed generic
//! type from a definition and an argument list: it refuses argument lists
//! that break the definition's declared parameter constraints. The resolver
//! treats every refusal as "this candidate does not match".

use crate::assignability::AssignabilityChecker;
use crate::db::TypeDatabase;
use crate::def::DefId;
use crate::instantiate::{TypeSubstitution, instantiate_type};
use crate::type_queries::missing_special_constraints;
use crate::types::{ParamRef, SpecialConstraints, TypeId};
use thiserror::Error;
use tracing::trace;

/// Why an argument list cannot instantiate a definition.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConstructError {
    #[error("definition {0:?} is not registered")]
    UnknownDefinition(DefId),

    #[error("expected {expected} type arguments, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("argument {argument:?} does not satisfy constraint {constraint:?} on {param:?}")]
    ConstraintViolation {
        param: ParamRef,
        argument: TypeId,
        constraint: TypeId,
    },

    #[error("argument {argument:?} does not satisfy {missing:?} on {param:?}")]
    SpecialConstraintViolation {
        param: ParamRef,
        argument: TypeId,
        missing: SpecialConstraints,
    },
}

/// Instantiate `def` with `args`, enforcing every parameter constraint.
///
/// Constraints are specialised with the full argument list before checking,
/// so constraints that mention other parameters (or the constrained
/// parameter itself) are checked against the actual arguments. Arguments
/// may themselves be parameters; those satisfy exactly what their own
/// declarations promise.
pub fn construct(
    db: &dyn TypeDatabase,
    def: DefId,
    args: &[TypeId],
) -> Result<TypeId, ConstructError> {
    let info = db
        .definition(def)
        .ok_or(ConstructError::UnknownDefinition(def))?;
    if info.arity() != args.len() {
        return Err(ConstructError::ArityMismatch {
            expected: info.arity(),
            found: args.len(),
        });
    }

    let subst = TypeSubstitution::from_args(def, args);
    let mut checker = AssignabilityChecker::new(db);

    for (index, (param, argument)) in info.type_params.iter().zip(args).enumerate() {
        let param_ref = ParamRef::new(def, index as u32);

        let missing = missing_special_constraints(db, *argument, param.special);
        if !missing.is_empty() {
            return Err(ConstructError::SpecialConstraintViolation {
                param: param_ref,
                argument: *argument,
                missing,
            });
        }

        for constraint in &param.constraints {
            let constraint = instantiate_type(db, *constraint, &subst);
            if !checker.is_assignable_from(constraint, *argument) {
                return Err(ConstructError::ConstraintViolation {
                    param: param_ref,
                    argument: *argument,
                    constraint,
                });
            }
        }
    }

    let ty = db.application(def, args);
    trace!(def = def.0, ty = ty.0, "construct: constraints satisfied");
    Ok(ty)
}

#[cfg(test)]
#[path = "../tests/construct_tests.rs"]
mod tests;
