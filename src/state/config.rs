/// Deck configuration
///
/// Loaded from JSON at startup. Every field is optional; a missing or
/// malformed file falls back to the defaults so the app always starts.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data::{Card, CardKey};
use crate::error::ConfigError;
use crate::media::AssetRegistry;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "SWIPE_MATCH_CONFIG";

/// Bounds for the number of rendered layers
pub const MIN_STACK_SIZE: usize = 1;
pub const MAX_STACK_SIZE: usize = 5;

/// What happens to a dismissed card
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeckPolicy {
    /// Dismissed cards go to the back of the queue
    #[default]
    Cycle,
    /// Dismissed cards are dropped
    Finite,
}

/// One configured card
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CardSpec {
    /// Image reference, see `ImageSource::normalize`
    pub source: Value,
    /// Opaque payload for the detail screen
    #[serde(default)]
    pub data: Value,
}

/// All deck settings
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DeckConfig {
    /// Directory scanned for local assets
    pub assets_dir: PathBuf,
    /// Number of rendered layers (clamped to 1..=5)
    pub stack_size: usize,
    pub policy: DeckPolicy,
    /// Duration of the fly-off animation
    pub exit_duration_ms: u64,
    /// Duration of the return-to-center animation
    pub settle_duration_ms: u64,
    /// Cards in initial order; empty means "every asset"
    pub cards: Vec<CardSpec>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets/images"),
            stack_size: 3,
            policy: DeckPolicy::Cycle,
            exit_duration_ms: 250,
            settle_duration_ms: 200,
            cards: Vec::new(),
        }
    }
}

impl DeckConfig {
    /// Load the config from `$SWIPE_MATCH_CONFIG` or the user config dir.
    ///
    /// Never fails: problems are logged and defaults are used.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(Self::default_path);

        let Some(path) = path else {
            tracing::info!("No config directory, using default deck");
            return Self::default();
        };

        if !path.exists() {
            tracing::info!("No config at {}, using default deck", path.display());
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded deck config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("⚠️  Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// `<config dir>/swipe-match/deck.json`
    fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("swipe-match");
        path.push("deck.json");
        Some(path)
    }

    /// Read and parse a config file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Stack size clamped to the supported range
    pub fn stack_size(&self) -> usize {
        self.stack_size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE)
    }

    pub fn exit_duration(&self) -> Duration {
        Duration::from_millis(self.exit_duration_ms)
    }

    pub fn settle_duration(&self) -> Duration {
        Duration::from_millis(self.settle_duration_ms)
    }

    /// Build the initial card queue
    pub fn cards(&self, registry: &AssetRegistry) -> Vec<Card> {
        let specs: Vec<(Value, Value)> = if self.cards.is_empty() {
            registry
                .ids()
                .map(|id| {
                    let name = registry
                        .path(id)
                        .and_then(|path| path.file_stem())
                        .map(|stem| stem.to_string_lossy().to_string())
                        .unwrap_or_default();
                    (Value::from(id.0), serde_json::json!({ "name": name }))
                })
                .collect()
        } else {
            self.cards
                .iter()
                .map(|spec| (spec.source.clone(), spec.data.clone()))
                .collect()
        };

        specs
            .into_iter()
            .enumerate()
            .map(|(index, (source, data))| Card {
                key: CardKey(index as u64),
                source,
                data,
            })
            .collect()
    }
}
