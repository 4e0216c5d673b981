//! Static per-function records produced by the frontends.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One side of a static branch site.
///
/// The four complexity aggregates are derived data. The propagator resets
/// and recomputes all of them against one target's coverage, so values
/// from a previous run never leak into the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSide {
    /// Side position `"file:line,col"`.
    pub pos: String,
    /// Functions reachable on this side, with repetition.
    pub funcs: Vec<String>,
    /// Complexity of every function reachable on this side.
    #[serde(default)]
    pub reachable_complexity: u64,
    /// Reachable complexity runtime coverage never touched.
    #[serde(default)]
    pub not_covered_complexity: u64,
    /// Complexity reachable only on this side.
    #[serde(default)]
    pub unique_reachable_complexity: u64,
    /// Unique complexity runtime coverage never touched.
    #[serde(default)]
    pub unique_not_covered_complexity: u64,
}

impl BranchSide {
    /// New side reaching `funcs`, aggregates zeroed.
    pub fn new(pos: impl Into<String>, funcs: Vec<String>) -> Self {
        Self {
            pos: pos.into(),
            funcs,
            reachable_complexity: 0,
            not_covered_complexity: 0,
            unique_reachable_complexity: 0,
            unique_not_covered_complexity: 0,
        }
    }

    /// Line number parsed out of the side position, if well formed.
    pub fn line_number(&self) -> Option<u32> {
        let (_, tail) = self.pos.rsplit_once(':')?;
        let (line, _) = tail.split_once(',')?;
        line.parse().ok()
    }
}

/// A static branch site and its sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchProfile {
    /// Branch position `"file:line,col"`, also its lookup key.
    pub branch_pos: String,
    /// The branch's sides; a well-formed site has at least two.
    pub sides: SmallVec<[BranchSide; 2]>,
}

impl BranchProfile {
    /// New branch site from its sides.
    pub fn new(branch_pos: impl Into<String>, sides: impl IntoIterator<Item = BranchSide>) -> Self {
        Self {
            branch_pos: branch_pos.into(),
            sides: sides.into_iter().collect(),
        }
    }

    /// Functions reachable on `side_idx` and on no sibling side.
    ///
    /// Repetition inside one side does not matter here; uniqueness is
    /// judged across sides.
    pub fn side_unique_reachable_funcs(&self, side_idx: usize) -> FxHashSet<String> {
        let Some(side) = self.sides.get(side_idx) else {
            return FxHashSet::default();
        };
        let mut unique: FxHashSet<String> = side.funcs.iter().cloned().collect();
        for (idx, sibling) in self.sides.iter().enumerate() {
            if idx == side_idx {
                continue;
            }
            for func in &sibling.funcs {
                unique.remove(func.as_str());
            }
        }
        unique
    }
}

/// Static profile of one function: identity, complexity and branch sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionProfile {
    /// Function name as the frontend spelled it, possibly mangled.
    pub function_name: String,
    /// File the function is defined in.
    pub function_source_file: String,
    /// Line the function is defined at.
    pub function_linenumber: u32,
    /// Cyclomatic complexity of the function plus everything it reaches.
    pub total_cyclomatic_complexity: u32,
    /// Branch sites keyed `"file:line,col"`, file being the basename of
    /// the defining source file.
    #[serde(default)]
    pub branch_profiles: FxHashMap<String, BranchProfile>,
}

impl FunctionProfile {
    /// New function profile without branch sites.
    pub fn new(
        function_name: impl Into<String>,
        function_source_file: impl Into<String>,
        function_linenumber: u32,
        total_cyclomatic_complexity: u32,
    ) -> Self {
        Self {
            function_name: function_name.into(),
            function_source_file: function_source_file.into(),
            function_linenumber,
            total_cyclomatic_complexity,
            branch_profiles: FxHashMap::default(),
        }
    }

    /// Adds a branch site, keyed by its own position.
    pub fn with_branch(mut self, branch: BranchProfile) -> Self {
        self.branch_profiles.insert(branch.branch_pos.clone(), branch);
        self
    }
}
