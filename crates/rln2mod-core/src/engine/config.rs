use crate::core::models::coordinate::TomogramDimensions;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_PARTICLE_SUFFIX: &str = "_particles.star";
pub const DEFAULT_TABLE_EXTENSION: &str = "star";
pub const DEFAULT_OUTPUT_DIR: &str = "mod";
/// Extension of the intermediate point lists; input tables may not share it.
pub const POINT_LIST_EXTENSION: &str = "txt";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {parameter}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

/// Which files in the working directory count as particle tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscoveryPolicy {
    /// Only names ending with the particle suffix.
    Strict,
    /// Names ending with the particle suffix, or every table file when none do.
    #[default]
    Fallback,
}

/// What happens to the rest of a batch after one file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    #[default]
    Continue,
    Abort,
}

impl FromStr for DiscoveryPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "fallback" => Ok(Self::Fallback),
            other => Err(ConfigError::InvalidParameter {
                parameter: "discovery",
                reason: format!("'{}' is not one of 'strict', 'fallback'", other),
            }),
        }
    }
}

impl fmt::Display for DiscoveryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Fallback => f.write_str("fallback"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "abort" => Ok(Self::Abort),
            other => Err(ConfigError::InvalidParameter {
                parameter: "on-error",
                reason: format!("'{}' is not one of 'continue', 'abort'", other),
            }),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue => f.write_str("continue"),
            Self::Abort => f.write_str("abort"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    pub policy: DiscoveryPolicy,
    pub particle_suffix: String,
    /// Extension without the leading dot.
    pub table_extension: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            policy: DiscoveryPolicy::default(),
            particle_suffix: DEFAULT_PARTICLE_SUFFIX.to_string(),
            table_extension: DEFAULT_TABLE_EXTENSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub dimensions: TomogramDimensions,
    pub working_dir: PathBuf,
    /// Always resolved against `working_dir` when given as a relative path.
    pub output_dir: PathBuf,
    pub discovery: DiscoveryConfig,
    pub failure_policy: FailurePolicy,
    pub parallel: bool,
}

#[derive(Default)]
pub struct PipelineConfigBuilder {
    dimensions: Option<TomogramDimensions>,
    working_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    discovery_policy: Option<DiscoveryPolicy>,
    particle_suffix: Option<String>,
    table_extension: Option<String>,
    failure_policy: Option<FailurePolicy>,
    parallel: bool,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimensions(mut self, dimensions: TomogramDimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }
    pub fn working_dir(mut self, path: PathBuf) -> Self {
        self.working_dir = Some(path);
        self
    }
    pub fn output_dir(mut self, path: PathBuf) -> Self {
        self.output_dir = Some(path);
        self
    }
    pub fn discovery_policy(mut self, policy: DiscoveryPolicy) -> Self {
        self.discovery_policy = Some(policy);
        self
    }
    pub fn particle_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.particle_suffix = Some(suffix.into());
        self
    }
    pub fn table_extension(mut self, extension: impl Into<String>) -> Self {
        self.table_extension = Some(extension.into());
        self
    }
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let dimensions = self
            .dimensions
            .ok_or(ConfigError::MissingParameter("dimensions"))?;
        let working_dir = self
            .working_dir
            .ok_or(ConfigError::MissingParameter("working_dir"))?;
        let output_dir = self
            .output_dir
            .ok_or(ConfigError::MissingParameter("output_dir"))?;
        if output_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidParameter {
                parameter: "output_dir",
                reason: "must not be empty".to_string(),
            });
        }
        let output_dir = if output_dir.is_relative() {
            working_dir.join(output_dir)
        } else {
            output_dir
        };

        let particle_suffix = self
            .particle_suffix
            .unwrap_or_else(|| DEFAULT_PARTICLE_SUFFIX.to_string());
        if particle_suffix.is_empty() {
            return Err(ConfigError::InvalidParameter {
                parameter: "particle_suffix",
                reason: "must not be empty".to_string(),
            });
        }
        let point_list_suffix = format!(".{POINT_LIST_EXTENSION}");
        if particle_suffix
            .to_ascii_lowercase()
            .ends_with(&point_list_suffix)
        {
            return Err(ConfigError::InvalidParameter {
                parameter: "particle_suffix",
                reason: format!("must not end with '{point_list_suffix}'"),
            });
        }
        let table_extension = self
            .table_extension
            .map(|ext| ext.trim_start_matches('.').to_string())
            .unwrap_or_else(|| DEFAULT_TABLE_EXTENSION.to_string());
        if table_extension.is_empty() {
            return Err(ConfigError::InvalidParameter {
                parameter: "table_extension",
                reason: "must not be empty".to_string(),
            });
        }
        if table_extension.eq_ignore_ascii_case(POINT_LIST_EXTENSION) {
            return Err(ConfigError::InvalidParameter {
                parameter: "table_extension",
                reason: format!("'{POINT_LIST_EXTENSION}' is reserved for point lists"),
            });
        }

        Ok(PipelineConfig {
            dimensions,
            working_dir,
            output_dir,
            discovery: DiscoveryConfig {
                policy: self.discovery_policy.unwrap_or_default(),
                particle_suffix,
                table_extension,
            },
            failure_policy: self.failure_policy.unwrap_or_default(),
            parallel: self.parallel,
        })
    }
}
