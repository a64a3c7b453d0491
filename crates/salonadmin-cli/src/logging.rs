// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::config::Config;
use anyhow::{Context, Result};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const LOG_ENV: &str = "SALONADMIN_LOG";

/// Installs the global subscriber, appending to the configured log file.
///
/// The dashboard owns the terminal, so nothing is written to stdout or stderr.
pub fn init(config: &Config) -> Result<PathBuf> {
    let directives = resolve_directives(env::var(LOG_ENV).ok(), config.log_level());
    let filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("invalid log filter {directives:?}; check {LOG_ENV}"))?;

    let path = config.log_file()?;
    let file = open_log_file(&path)?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("install log subscriber")?;
    Ok(path)
}

fn resolve_directives(env_value: Option<String>, configured: &str) -> String {
    match env_value {
        Some(value) if !value.trim().is_empty() => value,
        _ => configured.to_owned(),
    }
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| {
            format!(
                "open log file {}; set [logging].file to a writable path",
                path.display()
            )
        })
}
