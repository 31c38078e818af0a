// Configuration loading and parsing (scout.toml).

use crate::scouting::outliers::OutlierConfig;
use crate::scouting::writeup::WriteupConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// scout.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire scout.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ScoutFile {
    data: DataPaths,
    outliers: OutlierSection,
    writeup: WriteupSection,
}

/// Paths to the CSV exports, relative to the working directory.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub batting: String,
    pub teams: String,
    /// The bowler-type matchup export; optional because not every data drop
    /// includes it.
    #[serde(default)]
    pub matchups: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct OutlierSection {
    threshold: f64,
    min_sample: usize,
}

#[derive(Debug, Clone, Deserialize)]
struct WriteupSection {
    max_words: usize,
    max_lines: usize,
    max_per_side: usize,
    top_shots: usize,
    top_zones: usize,
}

/// The assembled, validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub data: DataPaths,
    pub outliers: OutlierConfig,
    pub writeup: WriteupConfig,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/scout.toml` relative to the
/// given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("scout.toml");
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    let file: ScoutFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let outliers = OutlierConfig {
        threshold: file.outliers.threshold,
        min_sample: file.outliers.min_sample,
    };
    let writeup = WriteupConfig {
        max_words: file.writeup.max_words,
        max_lines: file.writeup.max_lines,
        max_per_side: file.writeup.max_per_side,
        top_shots: file.writeup.top_shots,
        top_zones: file.writeup.top_zones,
        outliers,
    };

    let config = Config {
        data: file.data,
        outliers,
        writeup,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure `config/scout.toml` exists by copying it from `defaults/` when
/// missing. Returns the copied path, or `None` when nothing needed copying.
pub fn ensure_config_files(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let defaults_path = base_dir.join("defaults").join("scout.toml");
    let config_dir = base_dir.join("config");
    let target = config_dir.join("scout.toml");

    if target.exists() {
        return Ok(None);
    }
    if !defaults_path.exists() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither {} nor defaults/scout.toml found in {}; \
                 run from the project root or ensure defaults/ is present",
                target.display(),
                base_dir.display()
            ),
        });
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;
    std::fs::copy(&defaults_path, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy defaults to {}: {e}", target.display()),
    })?;

    Ok(Some(target))
}

/// Convenience wrapper: loads config relative to the given base directory,
/// copying the default config file first if needed.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.outliers.threshold <= 0.0 {
        return Err(ConfigError::ValidationError {
            field: "outliers.threshold".into(),
            message: format!("must be > 0, got {}", config.outliers.threshold),
        });
    }
    if config.outliers.min_sample < 2 {
        return Err(ConfigError::ValidationError {
            field: "outliers.min_sample".into(),
            message: format!("must be >= 2, got {}", config.outliers.min_sample),
        });
    }

    let w = &config.writeup;
    let budget_fields: &[(&str, usize)] = &[
        ("writeup.max_words", w.max_words),
        ("writeup.max_lines", w.max_lines),
        ("writeup.max_per_side", w.max_per_side),
        ("writeup.top_shots", w.top_shots),
        ("writeup.top_zones", w.top_zones),
    ];
    for (name, val) in budget_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    if config.data.batting.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.batting".into(),
            message: "must not be empty".into(),
        });
    }
    if config.data.teams.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.teams".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
