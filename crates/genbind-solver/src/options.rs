//! Resolver configuration.
//!
//! Options deserialize from camelCase JSON (or any serde format) with every
//! field optional:
//!
//! ```json
//! { "ambiguity": "firstMatch", "maxDepth": 32 }
//! ```

use crate::recursion::RecursionProfile;
use serde::{Deserialize, Serialize};

/// What to do when two candidate supertypes close the implementation to
/// different types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AmbiguityPolicy {
    /// Resolution fails.
    #[default]
    Reject,
    /// The candidate discovered first wins.
    FirstMatch,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverOptions {
    pub ambiguity: AmbiguityPolicy,
    /// Maximum nesting of constraint expansion during unification.
    pub max_depth: u32,
    /// Maximum number of constraint expansion steps per candidate.
    pub max_iterations: u32,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        let profile = RecursionProfile::Unification;
        Self {
            ambiguity: AmbiguityPolicy::default(),
            max_depth: profile.max_depth(),
            max_iterations: profile.max_iterations(),
        }
    }
}

impl ResolverOptions {
    /// Recursion limits for the unifier.
    pub fn unification_profile(&self) -> RecursionProfile {
        RecursionProfile::Custom {
            max_depth: self.max_depth,
            max_iterations: self.max_iterations,
        }
    }

    pub fn with_ambiguity(mut self, ambiguity: AmbiguityPolicy) -> Self {
        self.ambiguity = ambiguity;
        self
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
