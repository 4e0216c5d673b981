//! Overlays runtime coverage onto a target's calltree.
//!
//! The overlay walks the flattened calltree once to assign hit counts,
//! colors and report links, then walks it a second time to mark runs of
//! uncovered callsites. Hit counts for a callsite come from its caller's
//! line coverage, not from the destination, so a function that is covered
//! through one path and not another shows up red where it is blocked.

use rustc_hash::FxHashMap;
use tracing::{debug, error, info};

use crate::calltree::CallsiteNode;
use crate::constants::{
    BOOLEAN_COVERED_HITCOUNT, COLOR_BUCKETS, DEFAULT_COLOR, ENTRYPOINT_PARENT, NO_BLOCKED_FUNC,
    UNRESOLVED_LINK,
};
use crate::coverage::CoverageProfile;
use crate::error::{IntrospectionError, Result};
use crate::profile::{FuzzerProfile, Language, MergedProjectProfile};
use crate::utils;

/// Depth-keyed stack of demangled caller spellings.
struct Callstack(FxHashMap<u32, String>);

impl Callstack {
    fn new() -> Self {
        Self(FxHashMap::default())
    }

    fn set(&mut self, depth: u32, demangled: &str) {
        self.0.insert(depth, demangled.to_owned());
    }

    /// Caller of a node at `depth`, if one was seen at `depth - 1`.
    fn parent_of(&self, depth: u32) -> Option<&str> {
        depth
            .checked_sub(1)
            .and_then(|parent_depth| self.0.get(&parent_depth))
            .map(String::as_str)
    }
}

/// Bucket label for a hit count; the first matching bucket wins.
pub fn hit_count_color(hitcount: i64) -> &'static str {
    for &(cmin, cmax, color) in COLOR_BUCKETS {
        if hitcount >= cmin && hitcount < cmax {
            return color;
        }
    }
    DEFAULT_COLOR
}

/// Annotates the calltree of `profile` with its runtime coverage.
///
/// A target without coverage, or with an empty calltree, is left
/// unannotated and reported as success. A structurally broken calltree
/// (a root that is not the fuzzer entrypoint, a callsite with no caller)
/// fails this target only; the caller decides what happens to siblings.
///
/// Re-running the overlay with the same inputs reproduces the same
/// annotations, nothing is derived from a previous run.
pub fn overlay_calltree_with_coverage(
    profile: &mut FuzzerProfile,
    project: &MergedProjectProfile,
    base_coverage_url: &str,
) -> Result<()> {
    if profile.coverage.is_none() {
        info!(fuzz_target = %profile.identifier, "no coverage profile, leaving calltree unannotated");
        return Ok(());
    }
    if profile.calltree.is_empty() {
        info!(fuzz_target = %profile.identifier, "empty calltree, nothing to annotate");
        return Ok(());
    }

    let target_url = profile.target_coverage_url(base_coverage_url);
    debug!(fuzz_target = %profile.identifier, coverage_url = %target_url, "overlaying coverage");

    let mut calltree = std::mem::take(&mut profile.calltree);
    let result = annotate_calltree(&mut calltree, profile, project, &target_url);
    profile.calltree = calltree;
    result
}

fn annotate_calltree(
    calltree: &mut [CallsiteNode],
    profile: &FuzzerProfile,
    project: &MergedProjectProfile,
    target_url: &str,
) -> Result<()> {
    let Some(coverage) = profile.coverage.as_ref() else {
        return Ok(());
    };

    let mut callstack = Callstack::new();
    let mut ct_idx = 0u32;
    for (idx, node) in calltree.iter_mut().enumerate() {
        node.cov_ct_idx = ct_idx;
        ct_idx += 1;

        let demangled = destination_display_name(node, profile.target_lang);
        callstack.set(node.depth, &demangled);

        node.cov_hitcount = node_hitcount(node, &demangled, &callstack, coverage, profile, idx == 0)?;
        node.cov_color = hit_count_color(node.cov_hitcount).to_owned();
        node.cov_link = destination_link(node, profile, target_url);
        node.cov_callsite_link = parent_callsite_link(node, &callstack, profile, target_url);
    }

    if profile.target_lang == Language::Python {
        promote_root_if_descendants_covered(calltree);
    }
    assign_forward_reds(calltree, project);
    Ok(())
}

/// Hit count of one callsite, taken from its caller's line coverage.
fn node_hitcount(
    node: &mut CallsiteNode,
    demangled: &str,
    callstack: &Callstack,
    coverage: &CoverageProfile,
    profile: &FuzzerProfile,
    is_root: bool,
) -> Result<i64> {
    if is_root {
        if !profile.func_is_entrypoint(demangled) {
            return Err(IntrospectionError::non_entrypoint_root(demangled));
        }
        node.cov_parent = ENTRYPOINT_PARENT.to_owned();
        let details = coverage.hit_details(demangled);
        if details.is_empty() {
            error!(
                fuzz_target = %profile.identifier,
                entrypoint = %demangled,
                "no coverage lines reported for the entrypoint"
            );
        }
        return Ok(details.iter().map(|&(_, hits)| hits).fold(0, i64::max));
    }

    let Some(parent) = callstack.parent_of(node.depth) else {
        return Err(IntrospectionError::orphaned_callsite(demangled, node.depth));
    };
    node.cov_parent = parent.to_owned();

    let hitcount = match profile.target_lang {
        Language::CCpp | Language::Jvm => coverage
            .hit_details(parent)
            .iter()
            .find(|&&(line, hits)| line == node.src_linenumber && hits > 0)
            .map_or(0, |&(_, hits)| hits),
        Language::Python => {
            if coverage.is_file_lineno_hit(parent, node.src_linenumber) {
                BOOLEAN_COVERED_HITCOUNT
            } else {
                0
            }
        }
    };
    Ok(hitcount)
}

/// Demangled display spelling for a node's destination.
fn destination_display_name(node: &CallsiteNode, lang: Language) -> String {
    match lang {
        Language::Jvm => utils::demangle_jvm(&node.dst_function_source_file, &node.dst_function_name),
        Language::CCpp | Language::Python => utils::demangle_native(&node.dst_function_name),
    }
}

/// Candidate spellings for resolving a node's destination.
fn destination_candidates(node: &CallsiteNode, lang: Language) -> Vec<String> {
    let raw = node.dst_function_name.clone();
    let mut candidates = vec![raw.clone(), utils::demangle_native(&raw)];
    if lang == Language::Jvm {
        candidates.push(utils::demangle_jvm(&node.dst_function_source_file, &raw));
    }
    candidates
}

/// Link to the destination's coverage report, `"#"` if unresolvable.
fn destination_link(node: &CallsiteNode, profile: &FuzzerProfile, target_url: &str) -> String {
    let candidates = destination_candidates(node, profile.target_lang);
    match profile.resolve_function(&candidates) {
        Some(fd) => profile.resolve_coverage_link(
            target_url,
            &fd.function_source_file,
            fd.function_linenumber,
        ),
        None => {
            debug!(dst = %node.dst_function_name, "destination has no coverage report link");
            UNRESOLVED_LINK.to_owned()
        }
    }
}

/// Link into the caller's coverage report at the calling line.
fn parent_callsite_link(
    node: &CallsiteNode,
    callstack: &Callstack,
    profile: &FuzzerProfile,
    target_url: &str,
) -> String {
    let Some(parent) = callstack.parent_of(node.depth) else {
        return UNRESOLVED_LINK.to_owned();
    };
    let candidates = vec![parent.to_owned(), utils::demangle_native(parent)];
    match profile.resolve_function(&candidates) {
        Some(fd) => {
            profile.resolve_coverage_link(target_url, &fd.function_source_file, node.src_linenumber)
        }
        None => UNRESOLVED_LINK.to_owned(),
    }
}

/// Boolean coverage cannot see the entrypoint frame itself, so a root
/// with covered descendants is forced to the covered sentinel.
fn promote_root_if_descendants_covered(calltree: &mut [CallsiteNode]) {
    let descendants_covered = calltree.iter().skip(1).any(|node| node.cov_hitcount > 0);
    if !descendants_covered {
        return;
    }
    if let Some(root) = calltree.first_mut() {
        root.cov_hitcount = BOOLEAN_COVERED_HITCOUNT;
        root.cov_color = hit_count_color(BOOLEAN_COVERED_HITCOUNT).to_owned();
    }
}

/// Marks runs of uncovered callsites.
///
/// The run is counted once, at its first node; nodes inside a run that
/// was already counted keep zero. Covered nodes always keep zero.
fn assign_forward_reds(calltree: &mut [CallsiteNode], project: &MergedProjectProfile) {
    let mut prev_end: Option<usize> = None;
    let mut idx = 0;
    while idx < calltree.len() {
        let covered = calltree[idx].cov_hitcount != 0;
        let dominated = prev_end.is_some_and(|end| idx <= end);
        if covered || dominated {
            calltree[idx].cov_forward_reds = 0;
            calltree[idx].cov_largest_blocked_func = NO_BLOCKED_FUNC.to_owned();
            idx += 1;
            continue;
        }

        let mut run_len = 0u32;
        let mut largest_name: Option<&str> = None;
        let mut largest_complexity = 0u32;
        let mut scan = idx;
        while scan < calltree.len() && calltree[scan].cov_hitcount == 0 {
            let dst = std::slice::from_ref(&calltree[scan].dst_function_name);
            if let Some(fd) = project.resolve_function(dst) {
                if fd.total_cyclomatic_complexity > largest_complexity {
                    largest_complexity = fd.total_cyclomatic_complexity;
                    largest_name = Some(&fd.function_name);
                }
            }
            run_len += 1;
            scan += 1;
        }

        prev_end = Some(scan - 1);
        calltree[idx].cov_forward_reds = run_len;
        calltree[idx].cov_largest_blocked_func =
            largest_name.unwrap_or(NO_BLOCKED_FUNC).to_owned();
        idx += 1;
    }
}
