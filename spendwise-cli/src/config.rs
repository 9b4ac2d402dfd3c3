use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use spendwise_core::Currency;
use std::fs;
use std::path::Path;

use crate::state::config_path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub advisor: AdvisorSection,
    pub session: SessionSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisorSection {
    pub provider: String,
    pub model: String,
    pub image_model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSection {
    /// IANA timezone used for "today"
    pub timezone: String,
    pub default_currency: Currency,
    /// Returning users start from the demo ledger
    pub demo_data_on_login: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            advisor: AdvisorSection {
                provider: "gemini".to_string(),
                model: "gemini-2.5-flash".to_string(),
                image_model: "gemini-2.5-flash-image".to_string(),
                base_url: "https://generativelanguage.googleapis.com".to_string(),
            },
            session: SessionSection {
                timezone: "America/Chicago".to_string(),
                default_currency: Currency::Usd,
                demo_data_on_login: true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
}

impl AdvisorSection {
    pub fn provider(&self) -> Result<Provider> {
        match self.provider.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            other => bail!("unsupported advisor provider '{other}' (supported: gemini)"),
        }
    }
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config_to(cfg: &Config, p: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let p = config_path()?;
    let cfg = load_config_from(&p)?;
    println!("# {}{}", p.display(), if p.exists() { "" } else { " (defaults)" });
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.advisor.provider().unwrap(), Provider::Gemini);
    }

    #[test]
    fn test_round_trip_and_custom_values() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.session.default_currency = Currency::Gbp;
        cfg.session.timezone = "Europe/London".to_string();
        save_config_to(&cfg, &p).unwrap();

        let text = fs::read_to_string(&p).unwrap();
        assert!(text.contains("default_currency = \"GBP\""));
        assert_eq!(load_config_from(&p).unwrap(), cfg);
    }

    #[test]
    fn test_unknown_provider() {
        let mut cfg = Config::default();
        cfg.advisor.provider = "openai".to_string();
        assert!(cfg.advisor.provider().is_err());
    }
}
