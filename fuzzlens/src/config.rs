//! Analysis settings, optionally loaded from a `[fuzzlens]` TOML table.

use std::path::Path;

use serde::Deserialize;

use crate::constants::{DEFAULT_COVERAGE_URL, MAX_ACCUMULATION_WORKERS};
use crate::error::Result;

/// Settings file shape.
///
/// ```toml
/// [fuzzlens]
/// coverage_url = "https://cov.example.org/reports"
/// jobs = 4
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Settings under the `[fuzzlens]` table.
    #[serde(default)]
    pub fuzzlens: AnalysisSettings,
}

/// Tunables for one analysis run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisSettings {
    /// Base URL the coverage reports are published under.
    #[serde(default)]
    pub coverage_url: Option<String>,
    /// Worker cap for profile accumulation.
    #[serde(default)]
    pub jobs: Option<usize>,
}

impl Config {
    /// Parses settings from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Reads settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Coverage-report base URL, defaulting to the local report server.
    pub fn coverage_url(&self) -> &str {
        self.fuzzlens
            .coverage_url
            .as_deref()
            .unwrap_or(DEFAULT_COVERAGE_URL)
    }

    /// Accumulation worker cap.
    pub fn jobs(&self) -> usize {
        self.fuzzlens.jobs.unwrap_or(MAX_ACCUMULATION_WORKERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IntrospectionError;

    #[test]
    fn defaults_apply_without_a_file() {
        let config = Config::default();
        assert_eq!(config.coverage_url(), "http://localhost:8008/covreport/linux");
        assert_eq!(config.jobs(), 10);
    }

    #[test]
    fn toml_table_overrides_defaults() -> anyhow::Result<()> {
        let config = Config::from_toml_str(
            r#"
            [fuzzlens]
            coverage_url = "https://cov.example.org/reports"
            jobs = 4
            "#,
        )?;
        assert_eq!(config.coverage_url(), "https://cov.example.org/reports");
        assert_eq!(config.jobs(), 4);
        Ok(())
    }

    #[test]
    fn invalid_toml_is_a_settings_error() {
        let err = Config::from_toml_str("[fuzzlens").unwrap_err();
        assert!(matches!(err, IntrospectionError::Settings(_)));
    }

    #[test]
    fn settings_load_from_a_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("fuzzlens.toml");
        std::fs::write(&path, "[fuzzlens]\njobs = 2\n")?;
        let config = Config::from_file(&path)?;
        assert_eq!(config.jobs(), 2);
        Ok(())
    }
}
