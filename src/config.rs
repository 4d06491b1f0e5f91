//! Run configuration loaded from TOML.
//!
//! ```toml
//! k = 20
//! metrics = ["jaccard", "katz"]
//!
//! [katz]
//! beta = 0.05
//!
//! [convergence]
//! max_iterations = 30
//!
//! [output]
//! directory = "results"
//! format = "json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::LinkError;
use crate::output::OutputFormat;
use crate::scoring::{Metric, ScoringParams};

/// Where and how rankings are written.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Directory receiving one file per metric; the working directory when
    /// unset.
    pub directory: Option<PathBuf>,
    /// Encoding of the ranking files.
    pub format: OutputFormat,
}

/// Edge-list handling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSection {
    /// Sort the edge list instead of requiring `(v, u)` order.
    pub sort: bool,
}

/// Complete configuration of a scoring run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Links reported per metric.
    pub k: usize,
    /// Metrics to run, in order.
    pub metrics: Vec<Metric>,
    /// Per-metric parameters (`[katz]`, `[commute]`, `[convergence]`).
    #[serde(flatten)]
    pub params: ScoringParams,
    /// Input handling.
    pub input: InputSection,
    /// Output handling.
    pub output: OutputSection,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            k: 10,
            metrics: Metric::ALL.to_vec(),
            params: ScoringParams::default(),
            input: InputSection::default(),
            output: OutputSection::default(),
        }
    }
}

impl ScoringConfig {
    /// Loads the configuration.
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// when present and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => read_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => read_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Parses a configuration document.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Checks every value is in range.
    pub fn validate(&self) -> Result<(), LinkError> {
        if self.k == 0 {
            return Err(LinkError::InvalidArgument("k must be at least 1".into()));
        }
        if self.metrics.is_empty() {
            return Err(LinkError::InvalidArgument(
                "at least one metric must be selected".into(),
            ));
        }
        self.params.validate()
    }
}

fn read_file(path: &Path) -> Result<ScoringConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ScoringConfig::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Error raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`ScoringConfig`].
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },
}

/// `<config dir>/linkrank/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("linkrank").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = ScoringConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, ScoringConfig::default());
        assert_eq!(cfg.params.katz.beta, 0.1);
        assert_eq!(cfg.params.convergence.max_iterations, 20);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn sections_override_defaults() {
        let cfg = ScoringConfig::from_toml_str(
            r#"
            k = 3
            metrics = ["katz", "commute-time-converged"]

            [katz]
            beta = 0.25

            [commute]
            horizon = 8

            [convergence]
            tolerance = 0.001

            [input]
            sort = true

            [output]
            directory = "out"
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.k, 3);
        assert_eq!(
            cfg.metrics,
            vec![Metric::Katz, Metric::CommuteTimeConverged]
        );
        assert_eq!(cfg.params.katz.beta, 0.25);
        assert_eq!(cfg.params.katz.max_walk_length, 6);
        assert_eq!(cfg.params.commute.horizon, 8);
        assert_eq!(cfg.params.convergence.tolerance, 0.001);
        assert_eq!(cfg.params.convergence.max_iterations, 20);
        assert!(cfg.input.sort);
        assert_eq!(cfg.output.directory, Some(PathBuf::from("out")));
        assert_eq!(cfg.output.format, OutputFormat::Json);
    }

    #[test]
    fn validation_catches_bad_values() {
        let cfg = ScoringConfig::from_toml_str("k = 0").unwrap();
        assert!(cfg.validate().is_err());
        let cfg = ScoringConfig::from_toml_str("[katz]\nbeta = 2.0").unwrap();
        assert!(cfg.validate().is_err());
        let cfg = ScoringConfig::from_toml_str("metrics = []").unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unknown_metric_is_a_parse_error() {
        assert!(ScoringConfig::from_toml_str(r#"metrics = ["pagerank"]"#).is_err());
    }

    #[test]
    fn explicit_path_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linkrank.toml");
        fs::write(&path, "k = 7\n").unwrap();
        let cfg = ScoringConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.k, 7);

        let missing = ScoringConfig::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));

        fs::write(&path, "k = \"many\"\n").unwrap();
        assert!(matches!(
            ScoringConfig::load(Some(&path)),
            Err(ConfigError::Parse { .. })
        ));
    }
}
