//! Assignability between type expressions.
//!
//! `target.is_assignable_from(source)` holds when a value of `source` can be
//! used where `target` is expected:
//! - identity
//! - `target` is a base class or implemented interface of `source`
//!   (through parameter constraints when `source` is a parameter)
//! - `target` and a supertype of `source` instantiate the same interface and
//!   every argument pair is compatible under the parameter's declared
//!   variance; variant conversions only apply to reference-type arguments
//!
//! Variance can make the check recurse through arguments that mention the
//! types being compared. Pairs already under evaluation are assumed to hold
//! (coinductive semantics), and a [`RecursionGuard`] bounds the depth.

use crate::db::TypeDatabase;
use crate::def::DefKind;
use crate::hierarchy::base_types_and_interfaces;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::type_queries::is_reference_type;
use crate::types::{TypeData, TypeId, Variance};

pub struct AssignabilityChecker<'a> {
    db: &'a dyn TypeDatabase,
    guard: RecursionGuard<(TypeId, TypeId)>,
}

impl<'a> AssignabilityChecker<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self {
            db,
            guard: RecursionGuard::with_profile(RecursionProfile::Assignability),
        }
    }

    /// Whether a `source` value can be used where `target` is expected.
    pub fn is_assignable_from(&mut self, target: TypeId, source: TypeId) -> bool {
        if target == source {
            return true;
        }

        match self.guard.enter((target, source)) {
            RecursionResult::Entered => {
                let result = self.check(target, source);
                self.guard.leave((target, source));
                result
            }
            RecursionResult::Cycle => true,
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => false,
        }
    }

    fn check(&mut self, target: TypeId, source: TypeId) -> bool {
        let supertypes = base_types_and_interfaces(self.db, source);
        if supertypes.contains(&target) {
            return true;
        }

        let Some(TypeData::Application { def, args: target_args }) = self.db.lookup(target) else {
            return false;
        };
        let Some(info) = self.db.definition(def) else {
            return false;
        };
        if info.kind != DefKind::Interface
            || info
                .type_params
                .iter()
                .all(|param| param.variance == Variance::Invariant)
        {
            return false;
        }

        supertypes.iter().any(|supertype| {
            let Some(TypeData::Application {
                def: source_def,
                args: source_args,
            }) = self.db.lookup(*supertype)
            else {
                return false;
            };
            source_def == def
                && source_args.len() == target_args.len()
                && info
                    .type_params
                    .iter()
                    .zip(source_args.iter().zip(target_args.iter()))
                    .all(|(param, (source_arg, target_arg))| {
                        self.is_argument_compatible(param.variance, *target_arg, *source_arg)
                    })
        })
    }

    fn is_argument_compatible(&mut self, variance: Variance, target: TypeId, source: TypeId) -> bool {
        if target == source {
            return true;
        }
        match variance {
            Variance::Invariant => false,
            Variance::Covariant => {
                is_reference_type(self.db, source) && self.is_assignable_from(target, source)
            }
            Variance::Contravariant => {
                is_reference_type(self.db, target) && self.is_assignable_from(source, target)
            }
        }
    }
}

/// One-shot assignability check.
pub fn is_assignable_from(db: &dyn TypeDatabase, target: TypeId, source: TypeId) -> bool {
    AssignabilityChecker::new(db).is_assignable_from(target, source)
}

#[cfg(test)]
#[path = "../tests/assignability_tests.rs"]
mod tests;
