//! Branch blocker detection: fusing dynamic side hit counts with static
//! branch profiles, drift tolerance and severity ranking.

#![allow(clippy::unwrap_used)] // Tests use unwrap for clarity

use fuzzlens::test_utils::{
    branch, file_coverage, func_coverage, function, native_profile, python_profile, side,
};
use fuzzlens::{
    detect_branch_level_blockers, update_branch_complexities, FuzzBranchBlocker, FuzzerProfile,
    MergedProjectProfile,
};

/// Helper running accumulation, propagation and detection for one target.
fn detect(profile: &mut FuzzerProfile) -> Vec<FuzzBranchBlocker> {
    profile.accumulate();
    let mut project = MergedProjectProfile::from_profiles(std::slice::from_ref(profile));
    let coverage = profile.coverage.as_ref().unwrap();
    update_branch_complexities(&mut project.all_functions, coverage);
    detect_branch_level_blockers(&project.all_functions, profile, "http://cov/fuzz_proc")
}

/// One branch in `process` whose second side was never taken.
///
/// Side 0 reaches `handle_a` (covered), side 1 reaches `handle_b` and
/// `deep_parse` (both uncovered); `shared_util` is reachable either way.
fn blocked_branch_fixture() -> FuzzerProfile {
    let process = function("process", "/src/lib/process.c", 40, 12).with_branch(branch(
        "process.c:50,3",
        vec![
            side("process.c:51,5", &["handle_a", "shared_util"]),
            side("process.c:60,5", &["handle_b", "shared_util", "deep_parse"]),
        ],
    ));
    let functions = vec![
        process,
        function("handle_a", "/src/lib/a.c", 5, 7),
        function("handle_b", "/src/lib/b.c", 5, 9),
        function("deep_parse", "/src/lib/deep.c", 5, 20),
        function("shared_util", "/src/lib/util.c", 5, 3),
    ];
    let mut coverage = func_coverage(&[
        ("process", &[(50, 4)]),
        ("handle_a", &[(6, 2)]),
        ("shared_util", &[(6, 1)]),
    ]);
    coverage.add_branch_hits("process:50,3", vec![4, 0]);
    native_profile("fuzz_proc", Vec::new(), functions, Some(coverage))
}

// =============================================================================
// BLOCKER EXTRACTION
// =============================================================================

#[test]
fn test_untaken_side_becomes_a_blocker() {
    let mut profile = blocked_branch_fixture();
    let blockers = detect(&mut profile);

    assert_eq!(blockers.len(), 1);
    let blocker = &blockers[0];
    assert_eq!(blocker.blocked_side, 1);
    assert_eq!(blocker.function_name, "process");
    assert_eq!(blocker.source_file, "/src/lib/process.c");
    assert_eq!(blocker.branch_line_number, 50);
    assert_eq!(blocker.blocked_side_line_number, 60);
    assert_eq!(blocker.sides_hitcount_diff, 4);
    assert_eq!(
        blocker.coverage_report_link,
        "http://cov/fuzz_proc/src/lib/process.c.html#L50"
    );
}

#[test]
fn test_blocker_carries_the_propagated_aggregates() {
    let mut profile = blocked_branch_fixture();
    let blockers = detect(&mut profile);

    let blocker = &blockers[0];
    // handle_b (9) + shared_util (3) + deep_parse (20) = 32
    assert_eq!(blocker.blocked_reachable_complexity, 32);
    // shared_util is also reachable through side 0.
    assert_eq!(blocker.blocked_unique_reachable_complexity, 29);
    // shared_util is covered, handle_b and deep_parse are not.
    assert_eq!(blocker.blocked_not_covered_complexity, 29);
    assert_eq!(blocker.blocked_unique_not_covered_complexity, 29);
    assert_eq!(blocker.blocked_unique_funcs, vec!["deep_parse", "handle_b"]);
}

#[test]
fn test_branch_with_both_sides_taken_yields_nothing() {
    let mut profile = blocked_branch_fixture();
    let coverage = profile.coverage.as_mut().unwrap();
    coverage.add_branch_hits("process:50,3", vec![4, 2]);

    assert!(detect(&mut profile).is_empty());
}

#[test]
fn test_branch_with_no_side_taken_yields_nothing() {
    let mut profile = blocked_branch_fixture();
    let coverage = profile.coverage.as_mut().unwrap();
    coverage.add_branch_hits("process:50,3", vec![0, 0]);

    assert!(detect(&mut profile).is_empty());
}

#[test]
fn test_switch_hitcounts_are_stripped_before_matching() {
    let mut profile = blocked_branch_fixture();
    let coverage = profile.coverage.as_mut().unwrap();
    // First two entries are the switch line's own hit counts.
    coverage.add_branch_hits("process:50,3", vec![5, 5, 3, 0]);

    let blockers = detect(&mut profile);
    assert_eq!(blockers.len(), 1);
    assert_eq!(blockers[0].blocked_side, 1);
    assert_eq!(blockers[0].sides_hitcount_diff, 5);
}

// =============================================================================
// DRIFT TOLERANCE
// =============================================================================

#[test]
fn test_malformed_branch_keys_are_skipped() {
    let mut profile = blocked_branch_fixture();
    let coverage = profile.coverage.as_mut().unwrap();
    coverage.branch_cov_map.clear();
    coverage.add_branch_hits("nocolon", vec![1, 0]);
    coverage.add_branch_hits("process:xx,3", vec![1, 0]);

    assert!(detect(&mut profile).is_empty());
}

#[test]
fn test_unknown_function_is_skipped() {
    let mut profile = blocked_branch_fixture();
    let coverage = profile.coverage.as_mut().unwrap();
    coverage.branch_cov_map.clear();
    coverage.add_branch_hits("ghost:10,2", vec![1, 0]);

    assert!(detect(&mut profile).is_empty());
}

#[test]
fn test_branch_without_a_static_profile_is_skipped() {
    let mut profile = blocked_branch_fixture();
    let coverage = profile.coverage.as_mut().unwrap();
    coverage.branch_cov_map.clear();
    coverage.add_branch_hits("process:77,1", vec![1, 0]);

    assert!(detect(&mut profile).is_empty());
}

#[test]
fn test_side_count_mismatch_is_skipped() {
    let process = function("process", "/src/lib/process.c", 40, 12).with_branch(branch(
        "process.c:50,3",
        vec![
            side("process.c:51,5", &["handle_a"]),
            side("process.c:60,5", &["handle_b"]),
            side("process.c:70,5", &["handle_c"]),
        ],
    ));
    let mut coverage = func_coverage(&[("process", &[(50, 4)])]);
    coverage.add_branch_hits("process:50,3", vec![1, 0]);
    let mut profile = native_profile("fuzz_proc", Vec::new(), vec![process], Some(coverage));

    assert!(detect(&mut profile).is_empty());
}

#[test]
fn test_side_recorded_before_its_branch_line_is_skipped() {
    let process = function("process", "/src/lib/process.c", 40, 12).with_branch(branch(
        "process.c:50,3",
        vec![
            side("process.c:51,5", &["handle_a"]),
            side("process.c:45,5", &["handle_b"]),
        ],
    ));
    let mut coverage = func_coverage(&[("process", &[(50, 4)])]);
    coverage.add_branch_hits("process:50,3", vec![4, 0]);
    let mut profile = native_profile("fuzz_proc", Vec::new(), vec![process], Some(coverage));

    assert!(detect(&mut profile).is_empty());
}

#[test]
fn test_covered_side_line_is_treated_as_fallthrough() {
    let mut profile = blocked_branch_fixture();
    let coverage = profile.coverage.as_mut().unwrap();
    // The untaken side's own line ran, so control reached it some other way.
    coverage.add_hit_details("process", vec![(50, 4), (60, 2)]);

    assert!(detect(&mut profile).is_empty());
}

// =============================================================================
// BOOLEAN COVERAGE TARGETS
// =============================================================================

fn python_branch_fixture(covered_side_lines: &[u32]) -> FuzzerProfile {
    let process = function("process", "/src/lib/process.c", 40, 12).with_branch(branch(
        "process.c:50,3",
        vec![
            side("process.c:51,5", &["handle_a"]),
            side("process.c:60,5", &["deep_parse"]),
        ],
    ));
    let functions = vec![
        process,
        function("handle_a", "/src/lib/a.c", 5, 7),
        function("deep_parse", "/src/lib/deep.c", 5, 20),
    ];
    let mut coverage = file_coverage(&[("/src/lib/process.c", covered_side_lines)]);
    coverage.add_branch_hits("process:50,3", vec![4, 0]);
    python_profile("fuzz_proc", Vec::new(), functions, Some(coverage))
}

#[test]
fn test_file_coverage_fallthrough_checks_the_source_file() {
    let mut covered = python_branch_fixture(&[60]);
    assert!(detect(&mut covered).is_empty());
}

#[test]
fn test_python_blocker_links_use_the_boolean_anchor() {
    let mut profile = python_branch_fixture(&[]);
    let blockers = detect(&mut profile);

    assert_eq!(blockers.len(), 1);
    assert_eq!(
        blockers[0].coverage_report_link,
        "http://cov/fuzz_proc/src/lib/process.c.html#t50"
    );
}

// =============================================================================
// RANKING
// =============================================================================

fn ranking_fixture() -> FuzzerProfile {
    let a_fn = function("a_fn", "/src/a.c", 1, 1).with_branch(branch(
        "a.c:10,1",
        vec![side("a.c:11,1", &[]), side("a.c:12,1", &["tiny"])],
    ));
    let z_fn = function("z_fn", "/src/z.c", 1, 1).with_branch(branch(
        "z.c:10,1",
        vec![side("z.c:11,1", &[]), side("z.c:12,1", &["huge"])],
    ));
    let functions = vec![
        a_fn,
        z_fn,
        function("tiny", "/src/t.c", 1, 2),
        function("huge", "/src/h.c", 1, 50),
    ];
    let mut coverage = func_coverage(&[("a_fn", &[(10, 1)]), ("z_fn", &[(10, 1)])]);
    coverage.add_branch_hits("a_fn:10,1", vec![1, 0]);
    coverage.add_branch_hits("z_fn:10,1", vec![1, 0]);
    native_profile("fuzz_proc", Vec::new(), functions, Some(coverage))
}

#[test]
fn test_blockers_rank_most_blocking_first() {
    let mut profile = ranking_fixture();
    let blockers = detect(&mut profile);

    assert_eq!(blockers.len(), 2);
    // huge (50) outranks tiny (2) despite z_fn sorting after a_fn.
    assert_eq!(blockers[0].function_name, "z_fn");
    assert_eq!(blockers[0].blocked_unique_funcs, vec!["huge"]);
    assert_eq!(blockers[1].function_name, "a_fn");
}

#[test]
fn test_ranking_ties_keep_site_order() {
    let m_fn = function("m_fn", "/src/m.c", 1, 1).with_branch(branch(
        "m.c:10,1",
        vec![side("m.c:11,1", &[]), side("m.c:12,1", &["blocked_m"])],
    ));
    let n_fn = function("n_fn", "/src/n.c", 1, 1).with_branch(branch(
        "n.c:10,1",
        vec![side("n.c:11,1", &[]), side("n.c:12,1", &["blocked_n"])],
    ));
    let functions = vec![
        m_fn,
        n_fn,
        function("blocked_m", "/src/m.c", 20, 5),
        function("blocked_n", "/src/n.c", 20, 5),
    ];
    let mut coverage = func_coverage(&[("m_fn", &[(10, 1)]), ("n_fn", &[(10, 1)])]);
    coverage.add_branch_hits("m_fn:10,1", vec![1, 0]);
    coverage.add_branch_hits("n_fn:10,1", vec![1, 0]);
    let mut profile = native_profile("fuzz_proc", Vec::new(), functions, Some(coverage));

    let blockers = detect(&mut profile);
    assert_eq!(blockers.len(), 2);
    assert_eq!(blockers[0].function_name, "m_fn");
    assert_eq!(blockers[1].function_name, "n_fn");
}

// =============================================================================
// SERIALIZED FORM
// =============================================================================

#[test]
fn test_blocker_records_serialize_flat() {
    let mut profile = blocked_branch_fixture();
    let blockers = detect(&mut profile);

    let value = serde_json::to_value(&blockers[0]).unwrap();
    assert_eq!(value["blocked_side"], 1);
    assert_eq!(value["blocked_side_line_number"], 60);
    assert_eq!(value["blocked_unique_not_covered_complexity"], 29);
    assert_eq!(value["sides_hitcount_diff"], 4);
    assert!(value["blocked_unique_funcs"].is_array());
}
