use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::state::ensure_fintrack_home;

/// Environment override for `api.base_url`
pub const API_URL_ENV: &str = "FINTRACK_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub chat: ChatSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatSection {
    /// Append each exchange to ~/.fintrack/chat/YYYY-MM-DD.md
    pub log_transcripts: bool,
    pub max_messages: usize,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: fintrack_client::ApiClient::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for ChatSection {
    fn default() -> Self {
        Self {
            log_transcripts: true,
            max_messages: 200,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs.max(1))
    }

    /// Flag beats environment beats file
    pub fn effective_base_url(&self, flag: Option<&str>, env: Option<&str>) -> String {
        [flag, env]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(self.api.base_url.as_str())
            .to_string()
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_fintrack_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let cfg = parse_config("[api]\nbase_url = \"http://finance.lan:9000\"\ntimeout_secs = 5\n").unwrap();
        assert_eq!(cfg.api.base_url, "http://finance.lan:9000");
        assert_eq!(cfg.timeout(), Duration::from_secs(5));
        assert_eq!(cfg.chat, ChatSection::default());
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(parse_config(&s).unwrap(), Config::default());
    }

    #[test]
    fn test_base_url_precedence() {
        let cfg = Config::default();
        assert_eq!(cfg.effective_base_url(None, None), "http://localhost:8000");
        assert_eq!(
            cfg.effective_base_url(None, Some("http://env:1")),
            "http://env:1"
        );
        assert_eq!(
            cfg.effective_base_url(Some("http://flag:2"), Some("http://env:1")),
            "http://flag:2"
        );
        assert_eq!(cfg.effective_base_url(Some(" "), None), "http://localhost:8000");
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let cfg = parse_config("[api]\nbase_url = \"http://nas:8000\"\n").unwrap();
        assert_eq!(cfg.api.timeout_secs, 30);
    }
}
