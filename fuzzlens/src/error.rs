//! Typed errors for the introspection pipeline.

use thiserror::Error;

/// Errors raised while loading or analyzing fuzz-target profiles.
///
/// Structural calltree errors are fatal to the target that produced them,
/// never to its siblings. The orchestrator records them per target and
/// keeps going.
#[derive(Error, Debug)]
pub enum IntrospectionError {
    /// The first calltree node does not call a recognized fuzzer entrypoint.
    #[error("first calltree node `{0}` is not a fuzzer entrypoint")]
    NonEntrypointRoot(String),

    /// A calltree node has no caller on the callstack at `depth - 1`.
    #[error("callsite `{name}` at depth {depth} has no parent on the callstack")]
    OrphanedCallsite {
        /// Demangled destination of the orphaned callsite.
        name: String,
        /// Depth the callsite claimed.
        depth: u32,
    },

    /// No fuzz-target profiles were supplied to the project.
    #[error("no fuzz-target profiles to analyze")]
    NoProfiles,

    /// Settings file could not be read.
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid TOML.
    #[error("invalid settings: {0}")]
    Settings(#[from] toml::de::Error),
}

impl IntrospectionError {
    /// Structural error for a calltree whose root is not an entrypoint.
    pub fn non_entrypoint_root(name: impl Into<String>) -> Self {
        Self::NonEntrypointRoot(name.into())
    }

    /// Structural error for a callsite with no caller at `depth - 1`.
    pub fn orphaned_callsite(name: impl Into<String>, depth: u32) -> Self {
        Self::OrphanedCallsite {
            name: name.into(),
            depth,
        }
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, IntrospectionError>;
