//! Recursion guard for cycle detection, depth limiting and iteration
//! bounding in the resolver's recursive walks.
//!
//! Three walks need it:
//! 1. **Constraint expansion** in the unifier, where a parameter's constraint
//!    can mention the parameter itself or another parameter whose constraint
//!    leads back (`where T : IComparable<T>`, `where T : IEdge<U> where U : INode<T>`).
//! 2. **Hierarchy enumeration**, where a generic base class can grow without
//!    bound (`class Grow<T> : Grow<List<T>>`).
//! 3. **Assignability** through variant interface parameters.
//!
//! [`RecursionProfile`] names the limit presets so every call site states why
//! it is guarded instead of repeating magic numbers.

use rustc_hash::FxHashSet;
use std::hash::Hash;

// ---------------------------------------------------------------------------
// RecursionProfile
// ---------------------------------------------------------------------------

/// Named recursion limit presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Parameter constraint expansion during unification.
    ///
    /// depth = 50, iterations = 100,000
    Unification,

    /// Base type and interface enumeration.
    ///
    /// Bounds the depth of a base-class chain; real hierarchies are far
    /// shallower, so hitting it means the chain keeps generating new types.
    ///
    /// depth = 64, iterations = 100,000
    Hierarchy,

    /// Assignability checks through variant generic arguments.
    ///
    /// depth = 100, iterations = 100,000
    Assignability,

    /// Custom limits for configuration overrides and tests.
    Custom { max_depth: u32, max_iterations: u32 },
}

impl RecursionProfile {
    /// Maximum recursion depth for this profile.
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::Unification => 50,
            Self::Hierarchy => 64,
            Self::Assignability => 100,
            Self::Custom { max_depth, .. } => max_depth,
        }
    }

    /// Maximum iteration count for this profile.
    pub const fn max_iterations(self) -> u32 {
        match self {
            Self::Unification => 100_000,
            Self::Hierarchy => 100_000,
            Self::Assignability => 100_000,
            Self::Custom { max_iterations, .. } => max_iterations,
        }
    }
}

// ---------------------------------------------------------------------------
// RecursionResult
// ---------------------------------------------------------------------------

/// Result of attempting to enter a recursive computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    /// Proceed with the computation.
    Entered,
    /// This key is already being visited.
    Cycle,
    /// Maximum recursion depth exceeded.
    DepthExceeded,
    /// Maximum iteration count exceeded.
    IterationExceeded,
}

impl RecursionResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }
}

// ---------------------------------------------------------------------------
// RecursionGuard
// ---------------------------------------------------------------------------

/// Tracks recursion state for cycle detection, depth limiting,
/// and iteration bounding.
///
/// ```ignore
/// let mut guard = RecursionGuard::with_profile(RecursionProfile::Unification);
///
/// match guard.enter(param) {
///     RecursionResult::Entered => {
///         let result = expand(param);
///         guard.leave(param);
///         result
///     }
///     RecursionResult::Cycle => Ok(()),
///     RecursionResult::DepthExceeded
///     | RecursionResult::IterationExceeded => Err(UnifyError::LimitExceeded),
/// }
/// ```
///
/// In debug builds dropping a guard with entries still in the visiting set
/// panics, as does leaving a key that was never entered.
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    visiting: FxHashSet<K>,
    depth: u32,
    iterations: u32,
    max_depth: u32,
    max_iterations: u32,
    exceeded: bool,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    /// Create a guard with explicit limits.
    ///
    /// Prefer [`with_profile`](Self::with_profile) for standard use cases.
    pub fn new(max_depth: u32, max_iterations: u32) -> Self {
        Self {
            visiting: FxHashSet::default(),
            depth: 0,
            iterations: 0,
            max_depth,
            max_iterations,
            exceeded: false,
        }
    }

    /// Create a guard from a named [`RecursionProfile`].
    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_iterations())
    }

    /// Try to enter a recursive computation for `key`.
    ///
    /// On [`RecursionResult::Entered`] the caller **must** call
    /// [`leave`](Self::leave) with the same key when done.
    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.iterations = self.iterations.saturating_add(1);

        if self.iterations > self.max_iterations {
            self.exceeded = true;
            return RecursionResult::IterationExceeded;
        }
        if self.visiting.contains(&key) {
            return RecursionResult::Cycle;
        }
        if self.depth >= self.max_depth {
            self.exceeded = true;
            return RecursionResult::DepthExceeded;
        }

        self.visiting.insert(key);
        self.depth += 1;
        RecursionResult::Entered
    }

    /// Leave a recursive computation for `key`.
    pub fn leave(&mut self, key: K) {
        let was_present = self.visiting.remove(&key);

        debug_assert!(
            was_present,
            "RecursionGuard::leave() called with a key that is not in the visiting set. \
             This indicates a double-leave or a leave without a matching enter()."
        );

        self.depth = self.depth.saturating_sub(1);
    }

    /// Returns `true` if any limit was previously exceeded.
    #[inline]
    pub fn is_exceeded(&self) -> bool {
        self.exceeded
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for RecursionGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "RecursionGuard dropped with {} active entries still in the visiting set. \
                 This indicates leaked enter() calls without matching leave() calls.",
                self.visiting.len(),
            );
        }
    }
}

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod tests;
