//! Generic Type Resolution Engine
//!
//! Decides whether an implementation type registered in a dependency-injection
//! container can serve a requested abstraction, and computes the closed type
//! to instantiate:
//!
//! ```text
//! register  Repository<T> : IRepository<IValidator<T>>
//! request   IRepository<IValidator<Customer>>
//! resolve   Repository<Customer>
//! ```
//!
//! It uses:
//!
//! - **Interned `TypeData`**: hash-consed type expressions, so equality is a
//!   `TypeId` comparison and self-referential constraints are finite
//! - **Two-phase unification**: structural binding, then constraint expansion
//!   for parameters that only appear in constraints
//! - **Cycle Detection**: `RecursionGuard` bounds every recursive walk
//!
//! The engine is a pure function of its inputs over a shared, thread-safe
//! [`TypeStore`]; repeated calls intern to the same `TypeId`.

mod assignability;
mod builder;
mod cache;
mod constraints;
mod construct;
mod db;
pub mod def;
mod error;
mod format;
pub mod hierarchy;
mod instantiate;
mod intern;
mod options;
pub mod recursion;
pub mod type_queries;
pub mod types;
mod unify;

pub use assignability::{AssignabilityChecker, is_assignable_from};
pub use builder::{
    BuildResult, GenericTypeBuilder, is_implementation_applicable_to_every_generic_type,
    make_closed_implementation, validate_type,
};
pub use cache::ClosureCache;
pub use constraints::{ArgumentMapping, CandidateRejection, ConstraintChecker};
pub use construct::{ConstructError, construct};
pub use db::{TypeDatabase, TypeStore};
pub use def::{DefId, DefKind, DefinitionInfo, DefinitionStore};
pub use error::ResolveError;
pub use format::TypeFormatter;
pub use hierarchy::{BaseTypeEnumerator, CandidateBaseType, base_types_and_interfaces};
pub use instantiate::{TypeSubstitution, instantiate_type};
pub use intern::TypeInterner;
pub use options::{AmbiguityPolicy, ResolverOptions};
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
pub use types::{
    ParamRef, SpecialConstraints, TypeArgs, TypeData, TypeId, TypeParamInfo, Variance,
};
pub use unify::{ArgumentUnifier, ParamBindings, UnifyError};

#[cfg(test)]
#[path = "../tests/fixtures.rs"]
pub(crate) mod fixtures;
