//! Coverage analysis passes over accumulated profiles.
//!
//! Three passes, run per target after the project merge: the calltree
//! overlay, the branch-side complexity propagation, and branch blocker
//! detection. Propagation rewrites aggregates in the shared merged map,
//! so propagation and detection run serially, one target at a time.

mod blockers;
mod overlay;
mod propagation;

pub use blockers::{detect_branch_level_blockers, FuzzBranchBlocker};
pub use overlay::{hit_count_color, overlay_calltree_with_coverage};
pub use propagation::update_branch_complexities;
