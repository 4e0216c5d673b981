//! Branch-side complexity aggregation over the merged function map.

use rustc_hash::FxHashMap;

use crate::coverage::CoverageProfile;
use crate::profile::FunctionProfile;

/// Recomputes the four per-side complexity aggregates of every branch
/// site in `all_functions`, against one target's coverage.
///
/// Aggregates are rebuilt from zero on every call, so running the pass
/// repeatedly, or for several targets in turn, never accumulates state.
/// Functions a side names but the project never profiled contribute
/// nothing.
pub fn update_branch_complexities(
    all_functions: &mut FxHashMap<String, FunctionProfile>,
    coverage: &CoverageProfile,
) {
    // Complexity snapshot, so sides can be rewritten while sibling
    // functions are being looked up.
    let complexities: FxHashMap<String, u32> = all_functions
        .iter()
        .map(|(name, fd)| (name.clone(), fd.total_cyclomatic_complexity))
        .collect();

    for fd in all_functions.values_mut() {
        for branch in fd.branch_profiles.values_mut() {
            for side_idx in 0..branch.sides.len() {
                let unique_funcs = branch.side_unique_reachable_funcs(side_idx);

                let mut reachable = 0u64;
                let mut not_covered = 0u64;
                let mut unique_reachable = 0u64;
                let mut unique_not_covered = 0u64;
                // funcs is a list on purpose: a function reachable twice
                // on a side counts its complexity twice.
                for func_name in &branch.sides[side_idx].funcs {
                    let Some(&complexity) = complexities.get(func_name) else {
                        continue;
                    };
                    let complexity = u64::from(complexity);
                    let is_unique = unique_funcs.contains(func_name);
                    let is_hit = coverage.is_func_hit(func_name);
                    reachable += complexity;
                    if is_unique {
                        unique_reachable += complexity;
                    }
                    if !is_hit {
                        not_covered += complexity;
                    }
                    if is_unique && !is_hit {
                        unique_not_covered += complexity;
                    }
                }

                let side = &mut branch.sides[side_idx];
                side.reachable_complexity = reachable;
                side.not_covered_complexity = not_covered;
                side.unique_reachable_complexity = unique_reachable;
                side.unique_not_covered_complexity = unique_not_covered;
            }
        }
    }
}
