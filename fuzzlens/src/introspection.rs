//! Project orchestration: accumulate targets in parallel, merge, analyze.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::analysis::{
    detect_branch_level_blockers, overlay_calltree_with_coverage, update_branch_complexities,
};
use crate::config::Config;
use crate::constants::MAX_ACCUMULATION_WORKERS;
use crate::error::{IntrospectionError, Result};
use crate::profile::{FuzzerProfile, MergedProjectProfile};

/// All fuzz targets of a project, accumulated, merged and analyzed.
#[derive(Debug)]
pub struct IntrospectionProject {
    /// Settings for this run.
    pub config: Config,
    /// Per-target profiles; annotated once [`analyze`](Self::analyze) ran.
    pub profiles: Vec<FuzzerProfile>,
    /// Project-wide merged function view.
    pub proj_profile: MergedProjectProfile,
    /// Targets whose calltree failed structural validation.
    pub failed_targets: Vec<(String, IntrospectionError)>,
}

impl IntrospectionProject {
    /// Accumulates `profiles` in a bounded worker pool and merges them.
    ///
    /// Accumulation is independent per target, so it fans out over a pool
    /// capped by the configured job count. The merge runs after the pool
    /// joined; it is the only cross-target synchronization point.
    pub fn new(config: Config, mut profiles: Vec<FuzzerProfile>) -> Result<Self> {
        if profiles.is_empty() {
            return Err(IntrospectionError::NoProfiles);
        }
        accumulate_all(&mut profiles, config.jobs());
        let proj_profile = MergedProjectProfile::from_profiles(&profiles);
        info!(
            targets = profiles.len(),
            functions = proj_profile.all_functions.len(),
            "project profiles merged"
        );
        Ok(Self {
            config,
            profiles,
            proj_profile,
            failed_targets: Vec::new(),
        })
    }

    /// Runs the full analysis over every target.
    ///
    /// Calltree overlay first, for each target in turn; a structurally
    /// broken target lands in `failed_targets` and its siblings carry on.
    /// Then, per covered target, branch complexities are propagated
    /// through the merged map and blockers detected against them.
    pub fn analyze(&mut self) {
        let base_url = self.config.coverage_url().to_owned();

        for profile in &mut self.profiles {
            if let Err(err) = overlay_calltree_with_coverage(profile, &self.proj_profile, &base_url)
            {
                warn!(fuzz_target = %profile.identifier, %err, "calltree overlay failed");
                self.failed_targets.push((profile.identifier.clone(), err));
            }
        }

        for profile in &mut self.profiles {
            let Some(coverage) = profile.coverage.as_ref() else {
                continue;
            };
            update_branch_complexities(&mut self.proj_profile.all_functions, coverage);
            let target_url = profile.target_coverage_url(&base_url);
            let blockers =
                detect_branch_level_blockers(&self.proj_profile.all_functions, profile, &target_url);
            profile.branch_blockers = blockers;
        }
    }
}

/// Accumulates every profile, fanning out over a bounded pool.
fn accumulate_all(profiles: &mut [FuzzerProfile], jobs: usize) {
    let workers = jobs
        .min(MAX_ACCUMULATION_WORKERS)
        .min(profiles.len())
        .max(1);
    match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(|| {
            profiles.par_iter_mut().for_each(FuzzerProfile::accumulate);
        }),
        Err(err) => {
            warn!(%err, "worker pool unavailable, accumulating serially");
            for profile in profiles.iter_mut() {
                profile.accumulate();
            }
        }
    }
}
