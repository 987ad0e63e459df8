//! Configuration types and loading
//!
//! Config precedence: env vars > config file > defaults. Tokens are usually
//! supplied through `TELEGRAPH_TOKEN` (comma-separated) so they stay out of
//! the TOML file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use common::Secret;
use serde::Deserialize;
use telegraph_api::AccountProfile;
use telegraph_html::Footer;

use crate::account::AccountPolicy;
use crate::publisher::PublishOptions;

/// Root configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub telegraph: TelegraphConfig,
    /// Identity for accounts the pool creates, and default page author
    pub account: AccountProfile,
    pub footer: Footer,
}

/// Account pool settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TelegraphConfig {
    pub tokens: Vec<Secret<String>>,
    /// Proxy URL handed to the transport as-is
    pub proxy: Option<String>,
    pub min_request_interval_ms: u64,
    pub reprovision_threshold_secs: u64,
    pub max_retries: u32,
}

impl Default for TelegraphConfig {
    fn default() -> Self {
        Self {
            tokens: Vec::new(),
            proxy: None,
            min_request_interval_ms: 500,
            reprovision_threshold_secs: 60,
            max_retries: 3,
        }
    }
}

const PROXY_SCHEMES: &[&str] = &["http://", "https://", "socks4://", "socks5://"];

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Configuration from environment variables and defaults only.
    pub fn from_env() -> common::Result<Self> {
        let mut config = Config::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// `TELEGRAPH_TOKEN` replaces the token list, `TELEGRAPH_PROXY` the proxy.
    fn apply_env(&mut self) {
        if let Ok(raw) = std::env::var("TELEGRAPH_TOKEN") {
            self.telegraph.tokens = parse_tokens(&raw);
        }
        if let Ok(proxy) = std::env::var("TELEGRAPH_PROXY") {
            let proxy = proxy.trim().to_owned();
            self.telegraph.proxy = (!proxy.is_empty()).then_some(proxy);
        }
    }

    fn validate(&self) -> common::Result<()> {
        if self.telegraph.max_retries == 0 {
            return Err(common::Error::Config(
                "max_retries must be greater than 0".into(),
            ));
        }

        if self.telegraph.min_request_interval_ms > 60_000 {
            return Err(common::Error::Config(format!(
                "min_request_interval_ms must be at most 60000, got: {}",
                self.telegraph.min_request_interval_ms
            )));
        }

        if let Some(proxy) = &self.telegraph.proxy
            && !PROXY_SCHEMES.iter().any(|scheme| proxy.starts_with(scheme))
        {
            return Err(common::Error::Config(format!(
                "proxy must start with one of {}, got: {proxy}",
                PROXY_SCHEMES.join(", ")
            )));
        }

        Ok(())
    }

    /// Resolve config file path from CLI arg or TELEGRAPH_CONFIG env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("TELEGRAPH_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from("telegraph.toml")
    }

    /// Configured tokens, trimmed, blanks skipped.
    pub fn credentials(&self) -> Vec<Secret<String>> {
        self.telegraph
            .tokens
            .iter()
            .map(|token| token.expose().trim())
            .filter(|token| !token.is_empty())
            .map(|token| Secret::new(token.to_owned()))
            .collect()
    }

    pub fn account_policy(&self) -> AccountPolicy {
        AccountPolicy {
            min_request_interval: Duration::from_millis(self.telegraph.min_request_interval_ms),
            reprovision_threshold: Duration::from_secs(self.telegraph.reprovision_threshold_secs),
            profile: self.account.clone(),
        }
    }

    pub fn publish_options(&self) -> PublishOptions {
        PublishOptions {
            max_retries: self.telegraph.max_retries,
            footer: self.footer.clone(),
            profile: self.account.clone(),
        }
    }
}

/// Split a comma-separated token list.
pub fn parse_tokens(raw: &str) -> Vec<Secret<String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| Secret::new(token.to_owned()))
        .collect()
}
