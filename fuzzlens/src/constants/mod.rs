mod colors;
mod entrypoints;
mod limits;
mod sentinels;

pub use colors::{ColorBucket, COLOR_BUCKETS, DEFAULT_COLOR};
pub use entrypoints::{JVM_ENTRYPOINTS, NATIVE_ENTRYPOINTS, PYTHON_ENTRYPOINTS};
pub use limits::{MAX_ACCUMULATION_WORKERS, MIN_BRANCH_SIDES};
pub use sentinels::{
    BOOLEAN_COVERED_HITCOUNT, DEFAULT_COVERAGE_URL, ENTRYPOINT_PARENT, NO_BLOCKED_FUNC,
    UNKNOWN_HITCOUNT, UNRESOLVED_LINK,
};
