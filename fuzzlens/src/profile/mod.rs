//! Data model: per-function, per-target and merged project profiles.

mod function;
mod fuzzer;
mod project;

pub use function::{BranchProfile, BranchSide, FunctionProfile};
pub use fuzzer::{FuzzerProfile, Language};
pub use project::MergedProjectProfile;

use rustc_hash::FxHashMap;

use crate::utils;

/// Every spelling a destination lookup may use for `function`.
///
/// Raw first, then demangled forms, then the whitespace-normalized copy
/// of each. Candidate order matters: the caches keep the first owner of
/// a spelling.
pub(crate) fn function_spellings(function: &FunctionProfile, lang: Language) -> Vec<String> {
    let raw = function.function_name.clone();
    let mut spellings = vec![raw.clone(), utils::demangle_native(&raw)];
    if lang == Language::Jvm {
        spellings.push(utils::demangle_jvm(&function.function_source_file, &raw));
    }
    let normalized: Vec<String> = spellings
        .iter()
        .map(|spelling| utils::normalize_spelling(spelling))
        .collect();
    spellings.extend(normalized);
    spellings.dedup();
    spellings
}

/// Ordered candidate lookup against one spelling cache.
///
/// Each candidate is tried as given, then whitespace-normalized; the
/// first spelling the cache knows wins.
pub(crate) fn resolve_in_cache<'a>(
    cache: &FxHashMap<String, String>,
    functions: &'a FxHashMap<String, FunctionProfile>,
    candidates: &[String],
) -> Option<&'a FunctionProfile> {
    for candidate in candidates {
        let canonical = cache
            .get(candidate)
            .or_else(|| cache.get(&utils::normalize_spelling(candidate)));
        if let Some(name) = canonical {
            if let Some(function) = functions.get(name) {
                return Some(function);
            }
        }
    }
    None
}
