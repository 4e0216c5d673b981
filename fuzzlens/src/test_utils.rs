//! Fixture builders shared by unit and integration tests.
//!
//! These keep test scenarios readable: a calltree is a list of
//! [`callsite`] calls, coverage is a table of line hits, and profiles are
//! assembled from both.

use crate::calltree::CallsiteNode;
use crate::coverage::{CoverageProfile, CoverageType};
use crate::profile::{BranchProfile, BranchSide, FunctionProfile, FuzzerProfile, Language};

/// Callsite with only the frontend-supplied fields set.
pub fn callsite(depth: u32, src_file: &str, src_line: u32, dst: &str, dst_file: &str) -> CallsiteNode {
    CallsiteNode::new(depth, src_file, src_line, dst, dst_file)
}

/// Function profile without branch sites.
pub fn function(name: &str, file: &str, line: u32, complexity: u32) -> FunctionProfile {
    FunctionProfile::new(name, file, line, complexity)
}

/// Branch side at `pos` reaching `funcs`.
pub fn side(pos: &str, funcs: &[&str]) -> BranchSide {
    BranchSide::new(pos, funcs.iter().map(|&f| f.to_owned()).collect())
}

/// Branch site at `pos` with the given sides.
pub fn branch(pos: &str, sides: Vec<BranchSide>) -> BranchProfile {
    BranchProfile::new(pos, sides)
}

/// Function-flavor coverage preloaded with per-function line hits.
pub fn func_coverage(hits: &[(&str, &[(u32, i64)])]) -> CoverageProfile {
    let mut coverage = CoverageProfile::new(CoverageType::Func);
    for &(function, pairs) in hits {
        coverage.add_hit_details(function, pairs.to_vec());
    }
    coverage
}

/// File-flavor coverage preloaded with boolean line hits.
pub fn file_coverage(hits: &[(&str, &[u32])]) -> CoverageProfile {
    let mut coverage = CoverageProfile::new(CoverageType::File);
    for &(file, lines) in hits {
        for &line in lines {
            coverage.add_file_hit(file, line);
        }
    }
    coverage
}

/// Native target profile from parts.
pub fn native_profile(
    identifier: &str,
    calltree: Vec<CallsiteNode>,
    functions: Vec<FunctionProfile>,
    coverage: Option<CoverageProfile>,
) -> FuzzerProfile {
    FuzzerProfile::new(identifier, Language::CCpp, calltree, functions, coverage)
}

/// Interpreted target profile from parts.
pub fn python_profile(
    identifier: &str,
    calltree: Vec<CallsiteNode>,
    functions: Vec<FunctionProfile>,
    coverage: Option<CoverageProfile>,
) -> FuzzerProfile {
    FuzzerProfile::new(identifier, Language::Python, calltree, functions, coverage)
}
