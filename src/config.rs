//! Configuration file support
//!
//! Handles parsing and applying `.cyclometry.toml` configuration files that
//! customize which vertices are analyzed and how reports are rendered.
//!
//! ## Configuration File Format
//!
//! ```toml
//! # .cyclometry.toml
//!
//! [analysis]
//! # Vertices to drop from the graph before analysis, with their arcs
//! exclude = ["gen.*", "test.*"]
//!
//! [report]
//! # Maximum components listed in the full report (0 = unlimited)
//! max_components = 25
//!
//! # Maximum members printed per cyclic component (0 = unlimited)
//! max_members = 10
//!
//! # Exit with a distinct code when any cycle exists (for CI gates)
//! fail_on_cycles = false
//! ```

use glob::Pattern;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid glob pattern: {0}")]
    PatternError(String),
}

/// Analysis configuration section
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AnalysisConfig {
    /// Vertex-name globs to drop from the graph before analysis
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Report configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Maximum components listed in the full report (0 = unlimited)
    #[serde(default = "default_max_components")]
    pub max_components: usize,

    /// Maximum members printed per cyclic component (0 = unlimited)
    #[serde(default = "default_max_members")]
    pub max_members: usize,

    /// Exit with a distinct code when any cycle exists
    #[serde(default)]
    pub fail_on_cycles: bool,
}

fn default_max_components() -> usize {
    25
}

fn default_max_members() -> usize {
    10
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_components: default_max_components(),
            max_members: default_max_members(),
            fail_on_cycles: false,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CyclometryConfig {
    /// Analysis configuration (vertex exclusion)
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Report configuration
    #[serde(default)]
    pub report: ReportConfig,
}

/// Compiled configuration with glob patterns
#[derive(Debug)]
pub struct CompiledConfig {
    /// Patterns for vertices to exclude from the graph
    exclude_patterns: Vec<Pattern>,

    /// Report configuration
    pub report: ReportConfig,
}

impl CompiledConfig {
    /// Create a compiled config from raw config
    pub fn from_config(config: CyclometryConfig) -> Result<Self, ConfigError> {
        let exclude_patterns = config
            .analysis
            .exclude
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| ConfigError::PatternError(format!("{}: {}", p, e)))
            })
            .collect::<Result<Vec<Pattern>, ConfigError>>()?;

        Ok(Self {
            exclude_patterns,
            report: config.report,
        })
    }

    /// Create an empty config (no overrides)
    pub fn empty() -> Self {
        Self {
            exclude_patterns: Vec::new(),
            report: ReportConfig::default(),
        }
    }

    /// The compiled exclusion patterns, for the graph loader
    pub fn exclude_patterns(&self) -> &[Pattern] {
        &self.exclude_patterns
    }

    /// Check if a vertex name is excluded from analysis
    pub fn should_exclude(&self, name: &str) -> bool {
        self.exclude_patterns.iter().any(|p| p.matches(name))
    }

    /// Check if config has any exclusion patterns
    pub fn has_exclusions(&self) -> bool {
        !self.exclude_patterns.is_empty()
    }
}

/// Load configuration for the given input file or directory
///
/// Searches for `.cyclometry.toml` next to the input and in parent
/// directories.
pub fn load_config(input_path: &Path) -> Result<CyclometryConfig, ConfigError> {
    match find_config_file(input_path) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: CyclometryConfig = toml::from_str(&content)?;
            Ok(config)
        }
        None => Ok(CyclometryConfig::default()),
    }
}

/// Find the config file by searching up the directory tree
fn find_config_file(start_path: &Path) -> Option<std::path::PathBuf> {
    let config_names = [".cyclometry.toml", "cyclometry.toml"];

    let mut current = if start_path.is_file() {
        start_path.parent()?.to_path_buf()
    } else {
        start_path.to_path_buf()
    };

    loop {
        for name in &config_names {
            let config_path = current.join(name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        if let Some(parent) = current.parent() {
            current = parent.to_path_buf();
        } else {
            break;
        }
    }

    None
}

/// Load and compile configuration
pub fn load_compiled_config(input_path: &Path) -> Result<CompiledConfig, ConfigError> {
    let config = load_config(input_path)?;
    CompiledConfig::from_config(config)
}
