//! Runtime coverage reported for one fuzz target.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Flavor of coverage a target's runtime produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageType {
    /// Boolean line coverage keyed by file or module spelling, as
    /// interpreted runtimes report it.
    File,
    /// Per-function line hit counts, as native and JVM runtimes report.
    Func,
}

/// Line and branch coverage for one fuzz target.
///
/// Producers fill the maps through the `add_*` methods; the analysis
/// passes only ever query. For interpreted targets the file map is keyed
/// by whatever spelling the frontend uses for enclosing functions, so the
/// overlay can ask about a caller's line directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageProfile {
    coverage_type: CoverageType,
    /// Function name to `(line, hitcount)` pairs.
    covmap: FxHashMap<String, Vec<(u32, i64)>>,
    /// File or module spelling to lines proven hit.
    file_map: FxHashMap<String, Vec<u32>>,
    /// Dynamic side hit counts keyed `"function:line,col"`.
    ///
    /// Ordered so blocker detection iterates deterministically and ranking
    /// ties keep a reproducible order.
    pub branch_cov_map: BTreeMap<String, Vec<i64>>,
}

impl CoverageProfile {
    /// Empty coverage of the given flavor.
    pub fn new(coverage_type: CoverageType) -> Self {
        Self {
            coverage_type,
            covmap: FxHashMap::default(),
            file_map: FxHashMap::default(),
            branch_cov_map: BTreeMap::new(),
        }
    }

    /// Which flavor of coverage this is.
    pub fn coverage_type(&self) -> CoverageType {
        self.coverage_type
    }

    /// Records the `(line, hitcount)` pairs reported for `function`.
    pub fn add_hit_details(&mut self, function: impl Into<String>, pairs: Vec<(u32, i64)>) {
        self.covmap.insert(function.into(), pairs);
    }

    /// Marks `line` of `file` as proven hit.
    pub fn add_file_hit(&mut self, file: impl Into<String>, line: u32) {
        self.file_map.entry(file.into()).or_default().push(line);
    }

    /// Records the dynamic side hit counts of one branch site.
    pub fn add_branch_hits(&mut self, site: impl Into<String>, hits: Vec<i64>) {
        self.branch_cov_map.insert(site.into(), hits);
    }

    /// All `(line, hitcount)` pairs reported for `function`, empty when the
    /// runtime never saw it.
    pub fn hit_details(&self, function: &str) -> &[(u32, i64)] {
        self.covmap.get(function).map_or(&[], Vec::as_slice)
    }

    /// Whether boolean line coverage marks `line` of `file` hit.
    pub fn is_file_lineno_hit(&self, file: &str, line: u32) -> bool {
        self.file_map
            .get(file)
            .is_some_and(|lines| lines.contains(&line))
    }

    /// Whether `line` of `function` was executed at least once.
    pub fn is_func_lineno_hit(&self, function: &str, line: u32) -> bool {
        self.hit_details(function)
            .iter()
            .any(|&(l, hits)| l == line && hits > 0)
    }

    /// Whether any line of `function` was executed at least once.
    pub fn is_func_hit(&self, function: &str) -> bool {
        self.hit_details(function).iter().any(|&(_, hits)| hits > 0)
    }
}
