use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{debug, info};
use regex::Regex;
use serde::Deserialize;

use crate::report::Format;

// ---------------------------------------------------------------------------
// ConfigFile — deserialized from TOML (all fields optional)
// ---------------------------------------------------------------------------

#[derive(Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub format: Option<Format>,
    pub filter: Option<String>,
    pub unique: Option<bool>,
}

// ---------------------------------------------------------------------------
// Config — resolved (all fields concrete)
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Config {
    pub format: Format,
    /// Only report URLs matching this pattern.
    pub filter: Option<Regex>,
    /// Report each distinct URL once.
    pub unique: bool,
}

impl ConfigFile {
    /// Merge CLI values (overwrites non-None fields).
    ///
    /// `unique` is a plain flag on the command line, so only `true` overrides.
    pub fn merge_cli(&mut self, format: Option<Format>, filter: Option<String>, unique: bool) {
        if let Some(v) = format {
            debug!("config: CLI override format={v:?}");
            self.format = format;
        }
        if let Some(ref v) = filter {
            debug!("config: CLI override filter={v}");
            self.filter = filter;
        }
        if unique {
            debug!("config: CLI override unique=true");
            self.unique = Some(true);
        }
    }

    /// Resolve to a Config by applying defaults to missing fields.
    ///
    /// Fails if the filter is not a valid regex.
    pub fn resolve(self) -> anyhow::Result<Config> {
        let filter = self
            .filter
            .as_deref()
            .map(Regex::new)
            .transpose()
            .context("invalid filter regex")?;
        let config = Config {
            format: self.format.unwrap_or_default(),
            filter,
            unique: self.unique.unwrap_or(false),
        };
        info!(
            "config: resolved format={:?}, filter={}, unique={}",
            config.format,
            config.filter.as_ref().map_or("<none>", Regex::as_str),
            config.unique,
        );
        Ok(config)
    }
}

/// Resolve the XDG config path for urlfind.
fn config_path() -> Option<PathBuf> {
    let config_dir = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config"))
        })?;
    Some(config_dir.join("urlfind").join("config.toml"))
}

/// Load config file. Returns `ConfigFile::default()` if no file exists.
/// Returns an error if the file exists but cannot be parsed.
pub fn load_config() -> anyhow::Result<ConfigFile> {
    match config_path() {
        Some(path) => read_config(&path),
        None => {
            info!("config: no HOME or XDG_CONFIG_HOME set, using defaults");
            Ok(ConfigFile::default())
        }
    }
}

fn read_config(path: &Path) -> anyhow::Result<ConfigFile> {
    debug!("config: looking for {}", path.display());
    match std::fs::read_to_string(path) {
        Ok(text) => {
            info!("config: loaded from {}", path.display());
            let cfg: ConfigFile = toml::from_str(&text)
                .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("config: {} not found, using defaults", path.display());
            Ok(ConfigFile::default())
        }
        Err(e) => Err(anyhow::anyhow!("failed to read {}: {e}", path.display())),
    }
}
