/// Upper bound on worker threads used while accumulating target profiles.
pub const MAX_ACCUMULATION_WORKERS: usize = 10;
/// Minimum number of sides a well-formed branch site carries.
pub const MIN_BRANCH_SIDES: usize = 2;
