//! Per-target profile: calltree, functions, coverage and derived lookups.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::FuzzBranchBlocker;
use crate::calltree::CallsiteNode;
use crate::constants::{JVM_ENTRYPOINTS, NATIVE_ENTRYPOINTS, PYTHON_ENTRYPOINTS};
use crate::coverage::CoverageProfile;
use crate::profile::FunctionProfile;

/// Source language of a fuzz target.
///
/// Drives demangling, entrypoint recognition and coverage-report link
/// anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    /// Clang-built native targets.
    #[serde(rename = "c-cpp")]
    CCpp,
    /// Jazzer-style JVM targets.
    #[serde(rename = "jvm")]
    Jvm,
    /// Atheris-style interpreted targets.
    #[serde(rename = "python")]
    Python,
}

impl Language {
    /// Entrypoint name markers recognized for this language.
    pub fn entrypoint_markers(self) -> &'static [&'static str] {
        match self {
            Self::CCpp => NATIVE_ENTRYPOINTS,
            Self::Jvm => JVM_ENTRYPOINTS,
            Self::Python => PYTHON_ENTRYPOINTS,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CCpp => "c-cpp",
            Self::Jvm => "jvm",
            Self::Python => "python",
        };
        f.write_str(label)
    }
}

/// Everything known about one fuzz target.
///
/// The lookup maps at the bottom are derived state, filled by
/// [`accumulate`](Self::accumulate) and skipped when serializing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzerProfile {
    /// Target name, typically the fuzzer binary name.
    pub identifier: String,
    /// Language flavor of the target.
    pub target_lang: Language,
    /// Flattened calltree rooted at the entrypoint callsite.
    pub calltree: Vec<CallsiteNode>,
    /// Static profiles of every function the frontend saw for this target.
    pub functions: Vec<FunctionProfile>,
    /// Runtime coverage, present once the target has been run.
    pub coverage: Option<CoverageProfile>,
    /// Ranked blocker records, filled by the detector.
    #[serde(default)]
    pub branch_blockers: Vec<FuzzBranchBlocker>,

    #[serde(skip)]
    all_function_profiles: FxHashMap<String, FunctionProfile>,
    #[serde(skip)]
    dst_to_name_cache: FxHashMap<String, String>,
}

impl FuzzerProfile {
    /// New target profile from frontend output.
    pub fn new(
        identifier: impl Into<String>,
        target_lang: Language,
        calltree: Vec<CallsiteNode>,
        functions: Vec<FunctionProfile>,
        coverage: Option<CoverageProfile>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            target_lang,
            calltree,
            functions,
            coverage,
            branch_blockers: Vec::new(),
            all_function_profiles: FxHashMap::default(),
            dst_to_name_cache: FxHashMap::default(),
        }
    }

    /// Builds the derived lookup state for this target.
    ///
    /// This is the expensive per-target step; the orchestrator runs it in
    /// a bounded worker pool. Every known spelling of every function, raw,
    /// demangled and whitespace-normalized, resolves to its canonical
    /// name afterwards.
    pub fn accumulate(&mut self) {
        self.all_function_profiles.clear();
        self.dst_to_name_cache.clear();
        for function in &self.functions {
            let name = &function.function_name;
            if !self.all_function_profiles.contains_key(name) {
                self.all_function_profiles
                    .insert(name.clone(), function.clone());
            }
            for spelling in super::function_spellings(function, self.target_lang) {
                self.dst_to_name_cache
                    .entry(spelling)
                    .or_insert_with(|| name.clone());
            }
        }
        debug!(
            fuzz_target = %self.identifier,
            functions = self.all_function_profiles.len(),
            spellings = self.dst_to_name_cache.len(),
            "accumulated target profile"
        );
    }

    /// Resolves the first candidate spelling known to this target.
    ///
    /// Each candidate is tried as given and whitespace-normalized, in
    /// order, against one lookup table.
    pub fn resolve_function(&self, candidates: &[String]) -> Option<&FunctionProfile> {
        super::resolve_in_cache(&self.dst_to_name_cache, &self.all_function_profiles, candidates)
    }

    /// Whether a demangled name is this target's fuzzer entrypoint.
    pub fn func_is_entrypoint(&self, demangled: &str) -> bool {
        self.target_lang
            .entrypoint_markers()
            .iter()
            .any(|marker| demangled.contains(marker))
    }

    /// Coverage-report root for this target under `base`.
    ///
    /// Native and JVM reports are published per target; interpreted
    /// targets share one project-wide report.
    pub fn target_coverage_url(&self, base: &str) -> String {
        let base = base.trim_end_matches('/');
        match self.target_lang {
            Language::CCpp | Language::Jvm => format!("{base}/{}", self.identifier),
            Language::Python => base.to_owned(),
        }
    }

    /// Clickable line link into this target's published coverage report.
    pub fn resolve_coverage_link(
        &self,
        target_url: &str,
        source_file: &str,
        linenumber: u32,
    ) -> String {
        let file = source_file.trim_start_matches('/');
        match self.target_lang {
            Language::CCpp | Language::Jvm => format!("{target_url}/{file}.html#L{linenumber}"),
            Language::Python => format!("{target_url}/{file}.html#t{linenumber}"),
        }
    }
}
