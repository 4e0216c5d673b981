//! Flattened calltree records produced by the static frontends.

use serde::{Deserialize, Serialize};

use crate::constants::{NO_BLOCKED_FUNC, UNKNOWN_HITCOUNT, UNRESOLVED_LINK};

/// One callsite in the flattened, depth-ordered calltree of a fuzz target.
///
/// Frontends fill the source fields; the overlay engine fills every
/// `cov_*` field. A node that has never been overlaid keeps the
/// documented defaults, so consumers can tell annotated trees apart from
/// raw ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallsiteNode {
    /// Nesting depth in the calltree; the root callsite sits at depth 0.
    pub depth: u32,
    /// Line in `src_file` the call is made from.
    pub src_linenumber: u32,
    /// Source file the call is made from.
    pub src_file: String,
    /// Destination function as the frontend spelled it, possibly mangled.
    pub dst_function_name: String,
    /// Source file defining the destination function.
    pub dst_function_source_file: String,

    /// Position of this node in the flattened sequence.
    #[serde(default)]
    pub cov_ct_idx: u32,
    /// Runtime hit count, `-1` until coverage is overlaid.
    #[serde(default = "default_hitcount")]
    pub cov_hitcount: i64,
    /// Hit-count color bucket label, empty until overlaid.
    #[serde(default)]
    pub cov_color: String,
    /// Coverage-report link for the destination function.
    #[serde(default = "default_link")]
    pub cov_link: String,
    /// Coverage-report link into the caller at the calling line.
    #[serde(default = "default_link")]
    pub cov_callsite_link: String,
    /// Demangled caller spelling, `"EP"` for the root callsite.
    #[serde(default)]
    pub cov_parent: String,
    /// Length of the uncovered run anchored at this node, 0 elsewhere.
    #[serde(default)]
    pub cov_forward_reds: u32,
    /// Highest-complexity destination inside that uncovered run.
    #[serde(default = "default_blocked_func")]
    pub cov_largest_blocked_func: String,
}

fn default_hitcount() -> i64 {
    UNKNOWN_HITCOUNT
}

fn default_link() -> String {
    UNRESOLVED_LINK.to_owned()
}

fn default_blocked_func() -> String {
    NO_BLOCKED_FUNC.to_owned()
}

impl CallsiteNode {
    /// New callsite with only the frontend-supplied fields set.
    pub fn new(
        depth: u32,
        src_file: impl Into<String>,
        src_linenumber: u32,
        dst_function_name: impl Into<String>,
        dst_function_source_file: impl Into<String>,
    ) -> Self {
        Self {
            depth,
            src_linenumber,
            src_file: src_file.into(),
            dst_function_name: dst_function_name.into(),
            dst_function_source_file: dst_function_source_file.into(),
            cov_ct_idx: 0,
            cov_hitcount: default_hitcount(),
            cov_color: String::new(),
            cov_link: default_link(),
            cov_callsite_link: default_link(),
            cov_parent: String::new(),
            cov_forward_reds: 0,
            cov_largest_blocked_func: default_blocked_func(),
        }
    }

    /// Whether the overlay has annotated this node.
    pub fn is_annotated(&self) -> bool {
        self.cov_hitcount != UNKNOWN_HITCOUNT
    }
}
