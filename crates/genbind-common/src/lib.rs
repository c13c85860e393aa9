//! Common types and utilities for the genbind resolution engine.
//!
//! This crate provides foundational types shared by the genbind crates:
//! - String interning (`Atom`, `Interner`) for type and parameter names

// String interning for name deduplication
pub mod interner;
pub use interner::{Atom, Interner};
