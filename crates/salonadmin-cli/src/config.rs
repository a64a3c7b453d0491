// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_STATUS_TIMEOUT: &str = "4s";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub ui: Ui,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            logging: Logging::default(),
            ui: Ui::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub status_timeout: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            status_timeout: Some(DEFAULT_STATUS_TIMEOUT.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("SALONADMIN_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!(
                "cannot resolve config directory; set SALONADMIN_CONFIG_PATH to the config file"
            )
        })?;

        let app_dir = config_root.join(salonadmin_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no `version`; add `version = 1` and put values under [storage], [logging], and [ui]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            salonadmin_db::validate_db_path(db_path)?;
        }

        if let Some(level) = &self.logging.level {
            EnvFilter::try_new(level).with_context(|| {
                format!(
                    "logging.level in {} is not a valid filter: {level:?}; use e.g. \"info\" or \"salonadmin_app=debug\"",
                    path.display()
                )
            })?;
        }

        if let Some(file) = &self.logging.file
            && file.trim().is_empty()
        {
            bail!(
                "logging.file in {} must not be empty; remove it to use the default",
                path.display()
            );
        }

        if let Some(timeout) = &self.ui.status_timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "ui.status_timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => salonadmin_db::default_db_path(),
        }
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        match &self.logging.file {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(salonadmin_db::data_dir()?.join("salonadmin.log")),
        }
    }

    pub fn status_timeout(&self) -> Result<Duration> {
        parse_duration(
            self.ui
                .status_timeout
                .as_deref()
                .unwrap_or(DEFAULT_STATUS_TIMEOUT),
        )
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# salonadmin config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/salonadmin/salonadmin.db)\n# db_path = \"/absolute/path/to/salonadmin.db\"\n\n[logging]\n# Any tracing filter directive; SALONADMIN_LOG overrides it.\nlevel = \"{}\"\n# file = \"/absolute/path/to/salonadmin.log\"\n\n[ui]\nstatus_timeout = \"{}\"\n",
            path.display(),
            DEFAULT_LOG_LEVEL,
            DEFAULT_STATUS_TIMEOUT,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 4s)")
}
