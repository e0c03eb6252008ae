//! # Strategy Configuration
//!
//! Two strings every role reads at startup: the discovery lookup strategy
//! and the dissemination strategy (`Direct` or `Broker`).

use courier_types::DisseminationMode;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Lookup strategy used when nothing is configured.
pub const DEFAULT_LOOKUP: &str = "Centralized";

/// Source of the strategy settings.
pub trait StrategyProvider {
    /// Discovery lookup strategy name.
    fn lookup_strategy(&self) -> String;

    /// How publications reach subscribers.
    fn dissemination(&self) -> DisseminationMode;
}

/// Errors that can occur during config loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("Failed to read config {path}: {error}")]
    Io { path: String, error: String },

    /// TOML parse error.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// Dissemination strategy is neither `Direct` nor `Broker`.
    #[error("Unknown dissemination strategy: {0}")]
    UnknownDissemination(String),
}

// ============================================================================
// StaticStrategyConfig - Fixed settings for tests and embedding
// ============================================================================

/// Strategy settings held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticStrategyConfig {
    lookup: String,
    dissemination: DisseminationMode,
}

impl StaticStrategyConfig {
    /// `Centralized` lookup with `Direct` dissemination.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lookup: DEFAULT_LOOKUP.to_string(),
            dissemination: DisseminationMode::Direct,
        }
    }

    #[must_use]
    pub fn with_lookup(mut self, lookup: impl Into<String>) -> Self {
        self.lookup = lookup.into();
        self
    }

    #[must_use]
    pub fn with_dissemination(mut self, dissemination: DisseminationMode) -> Self {
        self.dissemination = dissemination;
        self
    }
}

impl Default for StaticStrategyConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyProvider for StaticStrategyConfig {
    fn lookup_strategy(&self) -> String {
        self.lookup.clone()
    }

    fn dissemination(&self) -> DisseminationMode {
        self.dissemination
    }
}

// ============================================================================
// TomlStrategyConfig - Settings from a TOML file
// ============================================================================

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    discovery: Section,
    #[serde(default)]
    dissemination: Section,
}

#[derive(Debug, Deserialize, Default)]
struct Section {
    strategy: Option<String>,
}

/// Strategy settings loaded from a TOML file.
///
/// # Config File Format
///
/// ```toml
/// [discovery]
/// strategy = "Centralized"
///
/// [dissemination]
/// strategy = "Direct"   # or "Broker"
/// ```
///
/// Missing sections fall back to `Centralized` and `Direct`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TomlStrategyConfig {
    inner: StaticStrategyConfig,
}

impl TomlStrategyConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed, or names an
    /// unknown dissemination strategy.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut inner = StaticStrategyConfig::new();
        if let Some(lookup) = file.discovery.strategy {
            inner = inner.with_lookup(lookup);
        }
        if let Some(strategy) = file.dissemination.strategy {
            let mode = strategy
                .parse::<DisseminationMode>()
                .map_err(|_| ConfigError::UnknownDissemination(strategy))?;
            inner = inner.with_dissemination(mode);
        }
        Ok(Self { inner })
    }
}

impl StrategyProvider for TomlStrategyConfig {
    fn lookup_strategy(&self) -> String {
        self.inner.lookup_strategy()
    }

    fn dissemination(&self) -> DisseminationMode {
        self.inner.dissemination()
    }
}

/// Load `path` if given, else the static defaults.
pub fn load_strategy(path: Option<&Path>) -> Result<Box<dyn StrategyProvider>, ConfigError> {
    match path {
        Some(path) => Ok(Box::new(TomlStrategyConfig::load(path)?)),
        None => Ok(Box::new(StaticStrategyConfig::new())),
    }
}
