//! Configuration module for environment variables and client settings

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
const SESSION_DIR: &str = ".deals-client";
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the deals service
    pub api_url: Url,

    /// Persisted session slot
    pub session_file: PathBuf,

    /// Transport timeout; `None` waits for the transport indefinitely
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables, reading `.env` first
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let api_url = env::var("DEALS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let session_file = env::var("DEALS_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file());
        let request_timeout = match env::var("DEALS_HTTP_TIMEOUT_SECS") {
            Ok(secs) => Some(parse_timeout(&secs)?),
            Err(_) => None,
        };

        Ok(Self {
            api_url: parse_api_url(&api_url)?,
            session_file,
            request_timeout,
        })
    }

    /// Apply command-line overrides on top of the environment
    pub fn with_overrides(
        mut self,
        api_url: Option<&str>,
        session_file: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(api_url) = api_url {
            self.api_url = parse_api_url(api_url)?;
        }
        if let Some(session_file) = session_file {
            self.session_file = session_file;
        }
        Ok(self)
    }
}

fn parse_api_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("Invalid API URL: {}", raw))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("API URL must be http or https: {}", raw);
    }
    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs: u64 = raw.trim().parse().with_context(|| {
        format!("DEALS_HTTP_TIMEOUT_SECS must be a whole number of seconds, got {:?}", raw)
    })?;
    Ok(Duration::from_secs(secs))
}

fn default_session_file() -> PathBuf {
    let base = env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    base.join(SESSION_DIR).join(SESSION_FILE)
}
