use std::{fs, io, path::Path};

use anyhow::Context;
use client_core::{pagination::DEFAULT_PAGE_SIZE, DEFAULT_API_URL};
use serde::Deserialize;
use tracing::warn;

pub const CONFIG_FILE: &str = "roster.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub page_size: u32,
    pub paginated: bool,
    pub toast_dismiss_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            page_size: DEFAULT_PAGE_SIZE,
            paginated: true,
            toast_dismiss_secs: 5,
        }
    }
}

/// Keys accepted in `roster.toml`; anything missing keeps its default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_url: Option<String>,
    page_size: Option<u32>,
    paginated: Option<bool>,
    toast_dismiss_secs: Option<u64>,
}

pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

/// Defaults, then the file at `path` if it exists, then environment overrides.
pub fn load_settings_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?;
            if let Some(v) = file.api_url {
                settings.api_url = v;
            }
            if let Some(v) = file.page_size {
                settings.page_size = v;
            }
            if let Some(v) = file.paginated {
                settings.paginated = v;
            }
            if let Some(v) = file.toast_dismiss_secs {
                settings.toast_dismiss_secs = v;
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    if let Some(v) = env("ROSTER_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = parsed(&env, "APP__PAGE_SIZE") {
        settings.page_size = v;
    }
    if let Some(v) = parsed(&env, "APP__PAGINATED") {
        settings.paginated = v;
    }
    if let Some(v) = parsed(&env, "APP__TOAST_DISMISS_SECS") {
        settings.toast_dismiss_secs = v;
    }

    if settings.page_size == 0 {
        warn!(default = DEFAULT_PAGE_SIZE, "page size 0 is not usable; using default");
        settings.page_size = DEFAULT_PAGE_SIZE;
    }
    Ok(settings)
}

fn parsed<T: std::str::FromStr>(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}
