use crate::error::Error;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::fs::File;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub type Shared = Arc<Config>;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

#[serde_as]
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub api_bind_addr: SocketAddr,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_api_timeout")]
    pub api_timeout: Duration,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_http_timeout")]
    pub http_timeout: Duration,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_zone_cache_ttl")]
    pub zone_cache_ttl: Duration,
    #[serde(default)]
    pub telegram_bot_token: String,
    #[serde(default = "default_telegram_api_base")]
    pub telegram_api_base: String,
    #[serde(default)]
    pub cloudflare_api_token: String,
    #[serde(default)]
    pub cloudflare_account_id: String,
    #[serde(default = "default_cloudflare_api_base")]
    pub cloudflare_api_base: String,
    #[serde(default)]
    pub allowed_user_id: Option<String>,
}

fn default_api_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_http_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_zone_cache_ttl() -> Duration {
    Duration::from_secs(5 * 60)
}

fn default_telegram_api_base() -> String {
    TELEGRAM_API_BASE.to_string()
}

fn default_cloudflare_api_base() -> String {
    CLOUDFLARE_API_BASE.to_string()
}

impl Config {
    pub fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let f = File::open(p)?;
        let reader = BufReader::new(f);
        let mut conf: Config = serde_json::from_reader(reader)?;
        conf.apply_overrides(|key| std::env::var(key).ok());
        conf.credentials_present()?;
        Ok(conf)
    }

    /// Overwrite credentials with non-empty values returned by `lookup`, keyed by the
    /// environment variable names the bot has always been deployed with.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(token) = lookup("TELEGRAM_BOT_TOKEN") {
            self.telegram_bot_token = token;
        }
        if let Some(token) = lookup("CLOUDFLARE_API_TOKEN") {
            self.cloudflare_api_token = token;
        }
        if let Some(account) = lookup("CLOUDFLARE_ACCOUNT_ID") {
            self.cloudflare_account_id = account;
        }
        if let Some(user_id) = lookup("ALLOWED_TELEGRAM_USER_ID") {
            self.allowed_user_id = Some(user_id);
        }
    }

    /// Returns true when no allow-list is configured, or when `user_id` is the single
    /// allowed Telegram user.
    pub fn user_permitted(&self, user_id: i64) -> bool {
        match self.allowed_user_id.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(allowed) => allowed == user_id.to_string(),
        }
    }

    fn credentials_present(&self) -> Result<(), Error> {
        if self.telegram_bot_token.is_empty() {
            return Err(Error::MissingCredential("TELEGRAM_BOT_TOKEN"));
        }
        if self.cloudflare_api_token.is_empty() {
            return Err(Error::MissingCredential("CLOUDFLARE_API_TOKEN"));
        }
        if self.cloudflare_account_id.is_empty() {
            tracing::warn!("no Cloudflare account ID configured, zone listing will be empty");
        }
        Ok(())
    }
}
