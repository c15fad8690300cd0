/// CLI configuration
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use soundwave_catalog::{CatalogConfig, SearchSlotConfig};
use soundwave_playback::{EndOfQueue, PlaybackConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "soundwave.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_catalog")]
    pub catalog: CatalogSettings,

    #[serde(default = "default_search")]
    pub search: SearchSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_url")]
    pub url: String,

    #[serde(default = "default_limit")]
    pub default_limit: usize,

    #[serde(default = "default_quick_pick_limit")]
    pub quick_pick_limit: usize,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub country: Option<String>,

    #[serde(default)]
    pub artwork_size: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    /// Initial volume, 0-100
    #[serde(default = "default_volume")]
    pub volume: u8,

    #[serde(default)]
    pub end_of_queue: EndOfQueue,

    #[serde(default = "default_seek_step_secs")]
    pub seek_step_secs: f64,

    #[serde(default = "default_resume_position")]
    pub resume_position: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `soundwave.toml` in the
    /// working directory is read if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {}", path.display());
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (SOUNDWAVE_CATALOG__URL, ...)
        settings = settings.add_source(
            config::Environment::with_prefix("SOUNDWAVE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.catalog.url.starts_with("http://") && !self.catalog.url.starts_with("https://") {
            bail!(
                "Catalog URL must start with http:// or https:// (set SOUNDWAVE_CATALOG__URL)"
            );
        }

        if self.catalog.default_limit == 0 || self.catalog.quick_pick_limit == 0 {
            bail!("Result limits must be at least 1");
        }

        if self.playback.volume > 100 {
            bail!("Volume must be between 0 and 100, got {}", self.playback.volume);
        }

        if !(self.playback.seek_step_secs.is_finite() && self.playback.seek_step_secs > 0.0) {
            bail!("Seek step must be a positive number of seconds");
        }

        Ok(())
    }

    pub fn catalog_config(&self) -> CatalogConfig {
        let mut config = CatalogConfig::new(&self.catalog.url)
            .with_limits(self.catalog.default_limit, self.catalog.quick_pick_limit)
            .with_cache_ttl(Duration::from_secs(self.catalog.cache_ttl_secs))
            .with_request_timeout(Duration::from_secs(self.catalog.timeout_secs));
        config.max_retries = self.catalog.max_retries;

        if let Some(country) = &self.catalog.country {
            config = config.with_country(country);
        }
        if let Some(size) = self.catalog.artwork_size {
            config = config.with_artwork_size(size);
        }
        config
    }

    pub fn slot_config(&self) -> SearchSlotConfig {
        SearchSlotConfig {
            debounce: Duration::from_millis(self.search.debounce_ms),
            min_query_len: self.search.min_query_len,
            limit: None,
        }
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            volume: f32::from(self.playback.volume) / 100.0,
            end_of_queue: self.playback.end_of_queue,
            resume_position: self.playback.resume_position,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            search: default_search(),
            playback: default_playback(),
            storage: default_storage(),
        }
    }
}

// Default values
fn default_catalog() -> CatalogSettings {
    CatalogSettings {
        url: default_catalog_url(),
        default_limit: default_limit(),
        quick_pick_limit: default_quick_pick_limit(),
        cache_ttl_secs: default_cache_ttl_secs(),
        max_retries: default_max_retries(),
        timeout_secs: default_timeout_secs(),
        country: None,
        artwork_size: None,
    }
}

fn default_catalog_url() -> String {
    "https://itunes.apple.com".to_string()
}

fn default_limit() -> usize {
    25
}

fn default_quick_pick_limit() -> usize {
    6
}

fn default_cache_ttl_secs() -> u64 {
    5 * 60
}

fn default_max_retries() -> u32 {
    2
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_search() -> SearchSettings {
    SearchSettings {
        debounce_ms: default_debounce_ms(),
        min_query_len: default_min_query_len(),
    }
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    2
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        volume: default_volume(),
        end_of_queue: EndOfQueue::default(),
        seek_step_secs: default_seek_step_secs(),
        resume_position: default_resume_position(),
    }
}

fn default_volume() -> u8 {
    80
}

fn default_seek_step_secs() -> f64 {
    5.0
}

fn default_resume_position() -> bool {
    true
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        state_path: default_state_path(),
    }
}

fn default_state_path() -> PathBuf {
    PathBuf::from("./data/soundwave.redb")
}
