//! genbind: generic-type resolution for dependency-injection containers.
//!
//! A container registers open or partially closed implementations
//! (`Repository<T>`, `Handler<int, U>`) against abstractions and later asks
//! for closed abstractions (`IRepository<Customer>`). This crate answers
//! whether a registration can serve a request and which closed type to
//! instantiate.
//!
//! ```text
//! let store = TypeStore::new();
//! let irepo = store.declare_interface("IRepository", &["T"]);
//! let repo = store.declare_class("Repository", &["T"]);
//! store.add_implements(repo, store.apply(irepo, &[store.param(repo, 0)]));
//!
//! let customer = store.named(store.declare_class("Customer", &[]));
//! let closed = make_closed_implementation(
//!     &store,
//!     store.apply(irepo, &[customer]),
//!     store.open(repo),
//! )?;
//! // closed == Some(Repository<Customer>)
//! ```
//!
//! The engine lives in `genbind-solver`; this crate re-exports it.

pub use genbind_common::{Atom, Interner};
pub use genbind_solver::*;
