//! postcraft configuration types and loading

use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::Platform;

/// Default export file name
pub const DEFAULT_EXPORT_FILE: &str = "content-export.json";

/// Main postcraft configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Reveal timing
    pub reveal: RevealConfig,

    /// Draft generation settings
    pub generation: GenerationConfig,

    /// Template override settings
    pub templates: TemplatesConfig,

    /// Export settings
    pub export: ExportConfig,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        if self.reveal.max_step_delay_ms < self.reveal.min_step_delay_ms {
            return Err(eyre!(
                "reveal.max-step-delay-ms ({}) must not be below reveal.min-step-delay-ms ({})",
                self.reveal.max_step_delay_ms,
                self.reveal.min_step_delay_ms
            ));
        }

        let (lo, hi) = (self.generation.confidence_min, self.generation.confidence_max);
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || hi < lo {
            return Err(eyre!(
                "generation confidence range [{}, {}) must lie within [0, 1] and not be inverted",
                lo,
                hi
            ));
        }

        self.generation.platforms()?;
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .postcraft.yml
        let local_config = PathBuf::from(".postcraft.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/postcraft/postcraft.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("postcraft").join("postcraft.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Reveal timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Lower bound of the per-step delay in milliseconds
    #[serde(rename = "min-step-delay-ms")]
    pub min_step_delay_ms: u64,

    /// Upper bound (exclusive) of the per-step delay in milliseconds
    #[serde(rename = "max-step-delay-ms")]
    pub max_step_delay_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            min_step_delay_ms: 400,
            max_step_delay_ms: 700,
        }
    }
}

/// Draft generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    #[serde(rename = "confidence-min")]
    pub confidence_min: f64,

    #[serde(rename = "confidence-max")]
    pub confidence_max: f64,

    /// Seed for reproducible confidence and timing
    pub seed: Option<u64>,

    /// Platforms used when none are given
    #[serde(rename = "default-platforms")]
    pub default_platforms: Vec<String>,
}

impl GenerationConfig {
    /// Parse the default platform list
    pub fn platforms(&self) -> Result<Vec<Platform>> {
        self.default_platforms
            .iter()
            .map(|p| Platform::parse(p).map_err(|e| eyre!("generation.default-platforms: {}", e)))
            .collect()
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            confidence_min: 0.85,
            confidence_max: 0.97,
            seed: None,
            default_platforms: vec!["twitter".to_string(), "linkedin".to_string()],
        }
    }
}

/// Template override settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Directory holding `{platform}.hbs` overrides
    pub dir: Option<PathBuf>,
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory the export file is written to
    pub dir: PathBuf,

    #[serde(rename = "file-name")]
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            file_name: DEFAULT_EXPORT_FILE.to_string(),
        }
    }
}
