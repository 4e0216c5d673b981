//! Project-wide merge of every target's function profiles.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::profile::{FunctionProfile, FuzzerProfile};

/// Union of all targets' functions plus the shared spelling cache.
///
/// Built single-threaded after every target finished accumulating; this
/// is the one cross-target synchronization point of the pipeline. The
/// propagator mutates the branch aggregates stored in here, one target's
/// coverage at a time.
#[derive(Debug, Default)]
pub struct MergedProjectProfile {
    /// Every known function keyed by canonical name.
    pub all_functions: FxHashMap<String, FunctionProfile>,
    dst_to_name_cache: FxHashMap<String, String>,
}

impl MergedProjectProfile {
    /// Merges accumulated targets into one project view.
    ///
    /// The first target to mention a function wins; later duplicates are
    /// dropped so the map holds exactly one entry per distinct name.
    pub fn from_profiles(profiles: &[FuzzerProfile]) -> Self {
        let mut merged = Self::default();
        for profile in profiles {
            for function in &profile.functions {
                let name = &function.function_name;
                if merged.all_functions.contains_key(name) {
                    continue;
                }
                merged
                    .all_functions
                    .insert(name.clone(), function.clone());
                for spelling in super::function_spellings(function, profile.target_lang) {
                    merged
                        .dst_to_name_cache
                        .entry(spelling)
                        .or_insert_with(|| name.clone());
                }
            }
        }
        debug!(
            functions = merged.all_functions.len(),
            spellings = merged.dst_to_name_cache.len(),
            "merged project profile"
        );
        merged
    }

    /// Resolves the first candidate spelling known to the project.
    pub fn resolve_function(&self, candidates: &[String]) -> Option<&FunctionProfile> {
        super::resolve_in_cache(&self.dst_to_name_cache, &self.all_functions, candidates)
    }
}
