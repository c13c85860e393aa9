//! Contract violations reported to the caller.
//!
//! Everything that can go wrong *while resolving* (no candidate, ambiguous
//! bindings, constraint violations) is a normal `Invalid` outcome. A
//! `ResolveError` means the caller handed the engine something the type store
//! does not know about, which is a bug on the caller's side.

use crate::def::DefId;
use crate::types::{ParamRef, TypeId};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("type {0:?} is not known to the type store")]
    UnknownType(TypeId),

    #[error("definition {0:?} is not known to the type store")]
    UnknownDefinition(DefId),

    #[error("parameter {0:?} is not declared by its owner")]
    UnknownParameter(ParamRef),

    #[error("type {ty:?} passes {found} arguments to a definition with {expected} parameters")]
    ArityMismatch {
        ty: TypeId,
        expected: usize,
        found: usize,
    },

    #[error("type {0:?} contains itself")]
    CyclicType(TypeId),

    #[error("implementation {ty:?} mentions {param:?}, which belongs to another definition")]
    ForeignParameter { ty: TypeId, param: ParamRef },

    #[error("the requested abstraction {0:?} is a bare generic parameter")]
    AbstractionIsParameter(TypeId),

    #[error("the implementation {0:?} is a bare generic parameter")]
    ImplementationIsParameter(TypeId),
}
