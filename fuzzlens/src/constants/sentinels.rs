/// Hit count assigned to a line that boolean (interpreted) coverage marks
/// covered; such runtimes report hit-or-not, never a count.
pub const BOOLEAN_COVERED_HITCOUNT: i64 = 200;
/// Hit count of a callsite before any coverage has been overlaid.
pub const UNKNOWN_HITCOUNT: i64 = -1;
/// Placeholder link used when no coverage report can be resolved.
pub const UNRESOLVED_LINK: &str = "#";
/// Parent marker carried by the calltree root.
pub const ENTRYPOINT_PARENT: &str = "EP";
/// Name recorded when an uncovered run blocks no known function.
pub const NO_BLOCKED_FUNC: &str = "none";
/// Default coverage-report base URL when none is configured.
pub const DEFAULT_COVERAGE_URL: &str = "http://localhost:8008/covreport/linux";
