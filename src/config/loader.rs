//! Configuration loading from file and environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::score::VibeWeights;
use crate::index::{builtin_points, NeighborhoodTable, ReferencePoint};
use crate::types::{
    SpotError, SpotResult, CLUSTER_THRESHOLD_DEG, LIKE_WEIGHT, NEIGHBORHOOD_RADIUS_DEG,
    REFRESH_INTERVAL_SECS, STORY_LIFETIME_MS, STORY_WEIGHT, SWEEP_INTERVAL_SECS,
};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "SPOTS_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "spots.toml";

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Anchor distance threshold for clustering, in degrees.
    #[serde(default = "default_cluster_threshold")]
    pub cluster_threshold_deg: f64,
    /// Radius for neighborhood label lookup, in degrees.
    #[serde(default = "default_neighborhood_radius")]
    pub neighborhood_radius_deg: f64,
    /// Vibe points per story.
    #[serde(default = "default_story_weight")]
    pub story_weight: u32,
    /// Vibe points per like.
    #[serde(default = "default_like_weight")]
    pub like_weight: u32,
    /// Label used when no reference point is close enough.
    #[serde(default = "default_label")]
    pub default_label: String,
    /// Expiry sweep interval in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
    /// Store refresh interval in seconds.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    /// Lifetime given to new stories, in milliseconds.
    #[serde(default = "default_story_lifetime")]
    pub story_lifetime_ms: u64,
    /// Distinct reports needed to hide a story.
    #[serde(default = "default_report_threshold")]
    pub report_threshold: usize,
    /// Reference points for neighborhood labels.
    #[serde(default = "builtin_points")]
    pub neighborhoods: Vec<ReferencePoint>,
}

fn default_cluster_threshold() -> f64 {
    CLUSTER_THRESHOLD_DEG
}

fn default_neighborhood_radius() -> f64 {
    NEIGHBORHOOD_RADIUS_DEG
}

fn default_story_weight() -> u32 {
    STORY_WEIGHT
}

fn default_like_weight() -> u32 {
    LIKE_WEIGHT
}

fn default_label() -> String {
    "Conakry".to_string()
}

fn default_sweep_interval() -> u64 {
    SWEEP_INTERVAL_SECS
}

fn default_refresh_interval() -> u64 {
    REFRESH_INTERVAL_SECS
}

fn default_story_lifetime() -> u64 {
    STORY_LIFETIME_MS
}

fn default_report_threshold() -> usize {
    3
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cluster_threshold_deg: default_cluster_threshold(),
            neighborhood_radius_deg: default_neighborhood_radius(),
            story_weight: default_story_weight(),
            like_weight: default_like_weight(),
            default_label: default_label(),
            sweep_interval_secs: default_sweep_interval(),
            refresh_interval_secs: default_refresh_interval(),
            story_lifetime_ms: default_story_lifetime(),
            report_threshold: default_report_threshold(),
            neighborhoods: builtin_points(),
        }
    }
}

impl EngineConfig {
    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> SpotResult<()> {
        if !(self.cluster_threshold_deg.is_finite() && self.cluster_threshold_deg > 0.0) {
            return Err(SpotError::InvalidConfig(format!(
                "cluster_threshold_deg must be positive, got {}",
                self.cluster_threshold_deg
            )));
        }
        if !(self.neighborhood_radius_deg.is_finite() && self.neighborhood_radius_deg >= 0.0) {
            return Err(SpotError::InvalidConfig(format!(
                "neighborhood_radius_deg must be non-negative, got {}",
                self.neighborhood_radius_deg
            )));
        }
        if self.story_lifetime_ms == 0 {
            return Err(SpotError::InvalidConfig(
                "story_lifetime_ms must be positive".to_string(),
            ));
        }
        if self.report_threshold == 0 {
            return Err(SpotError::InvalidConfig(
                "report_threshold must be at least 1".to_string(),
            ));
        }
        if let Some(p) = self
            .neighborhoods
            .iter()
            .find(|p| !p.location().is_finite())
        {
            return Err(SpotError::InvalidConfig(format!(
                "neighborhood {} has non-finite coordinates",
                p.name
            )));
        }
        Ok(())
    }

    pub fn weights(&self) -> VibeWeights {
        VibeWeights {
            story: self.story_weight,
            like: self.like_weight,
        }
    }

    pub fn neighborhood_table(&self) -> NeighborhoodTable {
        NeighborhoodTable::from_points(self.neighborhoods.clone())
    }
}

/// Parse configuration from a TOML string.
pub fn parse_config(content: &str) -> SpotResult<EngineConfig> {
    let config: EngineConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> SpotResult<EngineConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        SpotError::Io(std::io::Error::other(format!(
            "Failed to read config file {}: {e}",
            path.display()
        )))
    })?;
    parse_config(&content)
}

/// Resolve the config file path using priority order:
/// 1. Explicit path (CLI arg)
/// 2. SPOTS_CONFIG environment variable
/// 3. spots.toml in current directory
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    None
}

/// Resolve and load configuration, falling back to defaults when no file is found.
pub fn load_or_default(explicit: Option<&Path>) -> SpotResult<EngineConfig> {
    match resolve_config_path(explicit) {
        Some(path) => {
            log::debug!("Loading config from {}", path.display());
            load_config(&path)
        }
        None => Ok(EngineConfig::default()),
    }
}
