//! Branch blocker detection.
//!
//! Fuses the dynamic branch coverage of one target with the static branch
//! profiles of the merged project to find branch sides fuzzing never
//! took, and ranks them by how much complexity they block.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constants::MIN_BRANCH_SIDES;
use crate::coverage::CoverageType;
use crate::profile::{FunctionProfile, FuzzerProfile};
use crate::utils;

/// One branch side runtime coverage proves was never taken.
///
/// Flat record, embedded as-is in machine-readable reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzBranchBlocker {
    /// Index of the untaken side within its branch site.
    pub blocked_side: usize,
    /// Complexity reachable only through the untaken side and never covered.
    pub blocked_unique_not_covered_complexity: u64,
    /// Complexity reachable only through the untaken side.
    pub blocked_unique_reachable_complexity: u64,
    /// Not-covered complexity reachable through the untaken side.
    pub blocked_not_covered_complexity: u64,
    /// All complexity reachable through the untaken side.
    pub blocked_reachable_complexity: u64,
    /// Functions reachable only through the untaken side, sorted.
    pub blocked_unique_funcs: Vec<String>,
    /// Highest hit count seen across the branch's sides.
    pub sides_hitcount_diff: i64,
    /// File defining the branch.
    pub source_file: String,
    /// Line of the branch statement.
    pub branch_line_number: u32,
    /// Line of the untaken side.
    pub blocked_side_line_number: u32,
    /// Function containing the branch.
    pub function_name: String,
    /// Coverage-report link at the branch line.
    pub coverage_report_link: String,
}

impl FuzzBranchBlocker {
    /// Ranking key; blockers sort descending on it.
    fn ranking_key(&self) -> (u64, u64, u64, u64) {
        (
            self.blocked_unique_not_covered_complexity,
            self.blocked_unique_reachable_complexity,
            self.blocked_not_covered_complexity,
            self.blocked_reachable_complexity,
        )
    }
}

/// Splits a dynamic branch key `"function:line,col"` on the last `:`.
fn parse_branch_key(key: &str) -> Option<(&str, u32, u32)> {
    let (function_name, pos) = key.rsplit_once(':')?;
    let (line, column) = pos.split_once(',')?;
    Some((function_name, line.parse().ok()?, column.parse().ok()?))
}

/// Finds every branch side coverage never took for this target.
///
/// Expects [`update_branch_complexities`] to have run for the same
/// coverage profile, so the per-side aggregates are current. Disagreement
/// between the static and dynamic views is drift in the input data; it is
/// logged and the datum skipped, never an error. The result is sorted
/// most severe first, stable on the ranking key.
///
/// [`update_branch_complexities`]: crate::analysis::update_branch_complexities
pub fn detect_branch_level_blockers(
    all_functions: &FxHashMap<String, FunctionProfile>,
    profile: &FuzzerProfile,
    target_coverage_url: &str,
) -> Vec<FuzzBranchBlocker> {
    let Some(coverage) = profile.coverage.as_ref() else {
        info!(fuzz_target = %profile.identifier, "no coverage profile, skipping branch blockers");
        return Vec::new();
    };

    let mut blockers = Vec::new();
    for (branch_key, sides_hitcount) in &coverage.branch_cov_map {
        let Some((function_name, branch_line, column)) = parse_branch_key(branch_key) else {
            warn!(key = %branch_key, "malformed branch coverage key");
            continue;
        };
        let Some(fd) = all_functions.get(function_name) else {
            debug!(function = %function_name, "branch coverage for an unknown function");
            continue;
        };

        // Switch sites report the switch statement's own line hit counts
        // as the first two entries.
        let (branch_hitcount, side_hits) = if sides_hitcount.len() > MIN_BRANCH_SIDES {
            (sides_hitcount[0].max(sides_hitcount[1]), &sides_hitcount[2..])
        } else {
            (-1, sides_hitcount.as_slice())
        };

        let branch_pos = format!(
            "{}:{branch_line},{column}",
            utils::basename(&fd.function_source_file)
        );
        let Some(branch) = fd.branch_profiles.get(&branch_pos) else {
            debug!(branch = %branch_pos, "no static branch profile for covered branch");
            continue;
        };

        let mut taken: Vec<usize> = Vec::new();
        let mut not_taken: Vec<usize> = Vec::new();
        for (side_idx, &hits) in side_hits.iter().enumerate() {
            if hits > 0 {
                taken.push(side_idx);
            } else {
                not_taken.push(side_idx);
            }
        }
        if taken.is_empty() || not_taken.is_empty() {
            continue;
        }
        if side_hits.len() != branch.sides.len() {
            warn!(
                branch = %branch_pos,
                dynamic_sides = side_hits.len(),
                static_sides = branch.sides.len(),
                "dynamic and static side counts disagree"
            );
            continue;
        }

        for &side_idx in &not_taken {
            let side = &branch.sides[side_idx];
            let Some(side_line) = side.line_number() else {
                warn!(side = %side.pos, "unparsable branch side position");
                continue;
            };
            if branch_line > side_line {
                debug!(branch = %branch_pos, side_line, "branch line past its side line");
                continue;
            }
            // A side whose own line is covered was reached around the
            // branch, fallthrough rather than blocked.
            let side_line_hit = match coverage.coverage_type() {
                CoverageType::File => {
                    coverage.is_file_lineno_hit(&fd.function_source_file, side_line)
                }
                CoverageType::Func => coverage.is_func_lineno_hit(function_name, side_line),
            };
            if side_line_hit {
                debug!(branch = %branch_pos, side_line, "untaken side line is covered, fallthrough");
                continue;
            }

            let hitcount_diff = side_hits.iter().copied().fold(branch_hitcount, i64::max);
            let mut unique_funcs: Vec<String> = branch
                .side_unique_reachable_funcs(side_idx)
                .into_iter()
                .collect();
            unique_funcs.sort_unstable();

            blockers.push(FuzzBranchBlocker {
                blocked_side: side_idx,
                blocked_unique_not_covered_complexity: side.unique_not_covered_complexity,
                blocked_unique_reachable_complexity: side.unique_reachable_complexity,
                blocked_not_covered_complexity: side.not_covered_complexity,
                blocked_reachable_complexity: side.reachable_complexity,
                blocked_unique_funcs: unique_funcs,
                sides_hitcount_diff: hitcount_diff,
                source_file: fd.function_source_file.clone(),
                branch_line_number: branch_line,
                blocked_side_line_number: side_line,
                function_name: function_name.to_owned(),
                coverage_report_link: profile.resolve_coverage_link(
                    target_coverage_url,
                    &fd.function_source_file,
                    branch_line,
                ),
            });
        }
    }

    blockers.sort_by(|a, b| b.ranking_key().cmp(&a.ranking_key()));
    info!(fuzz_target = %profile.identifier, blockers = blockers.len(), "branch blocker detection done");
    blockers
}
