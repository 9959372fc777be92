//! Prover configuration.
//!
//! Read from environment variables, then overridden by command-line flags.
//!
//! Variables:
//! - `TPROOF_CACHE_DIR` (default: `circuits`): where compiled circuits live.
//! - `TPROOF_OUTPUT_DIR` (default: `.`): where artifacts are written.
//! - `TPROOF_BACKEND` (default: `groth16`): `groth16` or `mock`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which proving backend to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BackendKind {
    #[default]
    Groth16,
    Mock,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Groth16 => "groth16",
            Self::Mock => "mock",
        })
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groth16" => Ok(Self::Groth16),
            "mock" => Ok(Self::Mock),
            other => Err(ConfigError::InvalidBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProverConfig {
    pub cache_dir: PathBuf,
    pub output_dir: PathBuf,
    pub backend: BackendKind,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("circuits"),
            output_dir: PathBuf::from("."),
            backend: BackendKind::Groth16,
        }
    }
}

impl ProverConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            cache_dir: env_path(&lookup, "TPROOF_CACHE_DIR")?.unwrap_or(defaults.cache_dir),
            output_dir: env_path(&lookup, "TPROOF_OUTPUT_DIR")?.unwrap_or(defaults.output_dir),
            backend: match lookup("TPROOF_BACKEND") {
                Some(raw) => raw.parse()?,
                None => defaults.backend,
            },
        })
    }

    /// Apply command-line overrides.
    pub fn with_overrides(
        mut self,
        cache_dir: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        backend: Option<BackendKind>,
    ) -> Self {
        if let Some(dir) = cache_dir {
            self.cache_dir = dir;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        if let Some(kind) = backend {
            self.backend = kind;
        }
        self
    }
}

fn env_path(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<PathBuf>, ConfigError> {
    match lookup(var) {
        Some(raw) if raw.trim().is_empty() => Err(ConfigError::EmptyPath(var)),
        Some(raw) => Ok(Some(PathBuf::from(raw))),
        None => Ok(None),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown proving backend {0:?}: expected `groth16` or `mock`")]
    InvalidBackend(String),
    #[error("{0} is set but empty")]
    EmptyPath(&'static str),
}
