//! Coverage-aware introspection for fuzz targets.
//!
//! `fuzzlens` takes what a static frontend knows about a fuzz target, its
//! flattened calltree and per-function complexity and branch records, and
//! what the runtime reported, line and branch coverage, and turns them
//! into an annotated calltree plus a ranked list of branch blockers: the
//! branch sides fuzzing never managed to take, ordered by how much
//! complexity sits behind them.
//!
//! The pipeline accumulates per-target profiles in a bounded worker pool,
//! merges them into a project-wide view, overlays coverage onto each
//! calltree, then propagates branch-side complexities and detects
//! blockers per target. [`IntrospectionProject`] drives all of it;
//! the individual passes in [`analysis`] are plain functions over the
//! data model for callers that want finer control.

/// Coverage analysis passes: calltree overlay, complexity propagation and
/// branch blocker detection.
pub mod analysis;
/// Flattened calltree records.
pub mod calltree;
/// Analysis settings.
pub mod config;
/// Named sentinels and tables shared across the pipeline.
pub mod constants;
/// Runtime coverage model.
pub mod coverage;
/// Typed pipeline errors.
pub mod error;
/// Project orchestration.
pub mod introspection;
/// Static and per-target profiles.
pub mod profile;
/// Fixture builders shared by tests.
pub mod test_utils;
/// Symbol and path helpers.
pub mod utils;

pub use analysis::{
    detect_branch_level_blockers, hit_count_color, overlay_calltree_with_coverage,
    update_branch_complexities, FuzzBranchBlocker,
};
pub use calltree::CallsiteNode;
pub use config::Config;
pub use coverage::{CoverageProfile, CoverageType};
pub use error::{IntrospectionError, Result};
pub use introspection::IntrospectionProject;
pub use profile::{
    BranchProfile, BranchSide, FunctionProfile, FuzzerProfile, Language, MergedProjectProfile,
};
