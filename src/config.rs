use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub ranking: RankingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default tracing filter when RUST_LOG is not set.
    pub log_level: String,

    /// Tokio worker threads; 0 means the runtime default.
    pub worker_threads: usize,

    pub database_path: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            worker_threads: 0,
            database_path: default_database_path(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// K-factor for Elo duel updates.
    pub k_factor: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            k_factor: crate::constants::ranking::ELO_K_FACTOR,
        }
    }
}

fn default_database_path() -> String {
    dirs::data_local_dir().map_or_else(
        || "sqlite:kiroku.db".to_string(),
        |dir| format!("sqlite:{}", dir.join("kiroku").join("kiroku.db").display()),
    )
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::default_config_path();
        self.save_to_path(&path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.log_level.trim().is_empty() {
            bail!("general.log_level must not be empty");
        }
        if self.general.database_path.trim().is_empty() {
            bail!("general.database_path must not be empty");
        }
        if self.ranking.k_factor <= 0.0 {
            bail!("ranking.k_factor must be positive");
        }
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("kiroku.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("kiroku").join("config.toml"));
        }
        paths
    }

    fn default_config_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("kiroku.toml"),
            |dir| dir.join("kiroku").join("config.toml"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.general.log_level, "info");
        assert!((config.ranking.k_factor - 32.0).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[general]\nlog_level = \"debug\"\n").unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert!((config.ranking.k_factor - 32.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bad_k_factor_fails_validation() {
        let mut config = Config::default();
        config.ranking.k_factor = 0.0;
        assert!(config.validate().is_err());
    }
}
