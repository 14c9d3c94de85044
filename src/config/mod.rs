use crate::models::{builtin_presets, RawStyleConfig, StyleConfig};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Name of the persisted style configuration file.
const CONFIG_FILE_NAME: &str = "config.json";

/// Store for the persisted style configuration.
///
/// Owns both the on-disk `config.json` and the in-memory current
/// configuration; there is no ambient global. The file is written in the
/// internal (camelCase) key convention, pretty-printed with 2-space
/// indentation, but files in the external (clang-format) convention load
/// fine and are normalized on the way in.
///
/// Per-user deployment assumes a single interactive writer, so the file is
/// overwritten wholesale without locking.
#[derive(Debug)]
pub struct ConfigStore {
    config_path: Utf8PathBuf,
    current: StyleConfig,
}

impl ConfigStore {
    /// Open (load-or-default) the store rooted at the given directory.
    ///
    /// The directory is created if absent. A missing, unreadable, or
    /// unparsable config file is replaced by the default (Google) preset,
    /// which is persisted immediately so later runs see a complete record.
    pub fn open<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        let mut store = Self {
            config_path: config_dir.join(CONFIG_FILE_NAME),
            current: StyleConfig::default(),
        };
        store.current = store.load();
        Ok(store)
    }

    /// Open the store at the per-user configuration path.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_config_dir()?)
    }

    /// Per-user configuration directory (`<config_dir>/fmtbatch`).
    pub fn default_config_dir() -> Result<Utf8PathBuf> {
        let base = dirs::config_dir().context("No per-user config directory available")?;
        let base = Utf8PathBuf::try_from(base).context("Config directory is not valid UTF-8")?;
        Ok(base.join(env!("CARGO_PKG_NAME")))
    }

    /// The current configuration.
    pub fn current(&self) -> &StyleConfig {
        &self.current
    }

    /// Path of the persisted configuration file.
    pub fn config_path(&self) -> &Utf8Path {
        &self.config_path
    }

    /// Load the configuration from disk, normalized to the canonical form.
    ///
    /// Absent, unreadable, or unparsable files all fall back to the default
    /// preset. The fallback is persisted so later runs see a complete
    /// record, but load never fails: only explicit `save`/`apply_preset`
    /// calls surface write errors.
    fn load(&self) -> StyleConfig {
        if !self.config_path.exists() {
            tracing::warn!(
                "Config file not found at {}, writing defaults",
                self.config_path
            );
            return self.fall_back_to_defaults();
        }

        let file_contents = match fs::read_to_string(&self.config_path) {
            Ok(contents) => contents,
            Err(error) => {
                tracing::warn!(
                    "Config at {} is unreadable ({}), replacing with defaults",
                    self.config_path,
                    error
                );
                return self.fall_back_to_defaults();
            }
        };

        match serde_json::from_str::<RawStyleConfig>(&file_contents) {
            Ok(raw) => {
                let config = raw.normalize();
                tracing::info!("Loaded config from {}", self.config_path);
                config
            }
            Err(error) => {
                tracing::warn!(
                    "Config at {} is unparsable ({}), replacing with defaults",
                    self.config_path,
                    error
                );
                self.fall_back_to_defaults()
            }
        }
    }

    /// Best-effort persist of the default configuration during load.
    fn fall_back_to_defaults(&self) -> StyleConfig {
        let config = StyleConfig::default();
        if let Err(error) = self.persist(&config) {
            tracing::warn!("Could not persist default config: {:#}", error);
        }
        config
    }

    /// Save the given configuration, replacing any prior content.
    ///
    /// Updates the in-memory current configuration on success. A write
    /// failure propagates; nothing is silently lost.
    pub fn save(&mut self, config: StyleConfig) -> Result<()> {
        self.persist(&config)?;
        self.current = config;
        Ok(())
    }

    /// Replace the whole configuration with a named preset and persist it.
    ///
    /// Unknown names fall back to the first (Google) preset. The prior
    /// configuration does not leak into the result.
    pub fn apply_preset(&mut self, name: &str) -> Result<StyleConfig> {
        let config = crate::models::preset(name);
        self.save(config.clone())?;
        tracing::info!("Applied preset {} and saved to {}", name, self.config_path);
        Ok(config)
    }

    /// Names of the built-in presets, in selection order.
    pub fn preset_names() -> Vec<&'static str> {
        builtin_presets().keys().copied().collect()
    }

    fn persist(&self, config: &StyleConfig) -> Result<()> {
        let json_string =
            serde_json::to_string_pretty(config).context("Failed to serialize config to JSON")?;

        fs::write(&self.config_path, json_string)
            .with_context(|| format!("Failed to write config: {}", self.config_path))?;

        tracing::info!("Saved config to {}", self.config_path);
        Ok(())
    }
}
