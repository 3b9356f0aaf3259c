use std::env;
use anyhow::{Result, Context};
use reqwest::Url;
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";
pub const MAX_UPLOAD_CHUNK_SIZE_KB: usize = 16 * 1024;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout_seconds: u64,
    pub health_timeout_seconds: u64,
    pub upload_chunk_size_kb: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_seconds: 300,
            health_timeout_seconds: 10,
            upload_chunk_size_kb: 64,
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url` with every other setting at its default.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_request_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_seconds = seconds;
        self
    }

    pub fn with_health_timeout(mut self, seconds: u64) -> Self {
        self.health_timeout_seconds = seconds;
        self
    }

    pub fn from_env() -> Result<Self> {
        info!("Loading client configuration from environment variables");
        let defaults = Self::default();

        let config = ClientConfig {
            base_url: env::var("PDF_CONVERTER_BASE_URL").unwrap_or_else(|_| {
                info!("PDF_CONVERTER_BASE_URL not set, using default: {}", DEFAULT_BASE_URL);
                defaults.base_url.clone()
            }),
            request_timeout_seconds: Self::parse_env_var("REQUEST_TIMEOUT_SECONDS", defaults.request_timeout_seconds)
                .context("Failed to parse REQUEST_TIMEOUT_SECONDS")?,
            health_timeout_seconds: Self::parse_env_var("HEALTH_TIMEOUT_SECONDS", defaults.health_timeout_seconds)
                .context("Failed to parse HEALTH_TIMEOUT_SECONDS")?,
            upload_chunk_size_kb: Self::parse_env_var("UPLOAD_CHUNK_SIZE_KB", defaults.upload_chunk_size_kb)
                .context("Failed to parse UPLOAD_CHUNK_SIZE_KB")?,
        };

        config.validate()?;

        info!("Configuration loaded successfully: {:?}", config);
        Ok(config)
    }

    fn parse_env_var<T>(var_name: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr + Copy + std::fmt::Debug,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(val) => match val.parse() {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                    Ok(default)
                }
            },
            Err(_) => {
                info!("{} not set, using default: {:?}", var_name, default);
                Ok(default)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .with_context(|| format!("PDF_CONVERTER_BASE_URL is not a valid URL: {}", self.base_url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(anyhow::anyhow!("PDF_CONVERTER_BASE_URL must use http or https"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECONDS must be greater than 0"));
        }
        if self.health_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("HEALTH_TIMEOUT_SECONDS must be greater than 0"));
        }
        if self.upload_chunk_size_kb == 0 {
            return Err(anyhow::anyhow!("UPLOAD_CHUNK_SIZE_KB must be greater than 0"));
        }
        if self.upload_chunk_size_kb > MAX_UPLOAD_CHUNK_SIZE_KB {
            return Err(anyhow::anyhow!(
                "UPLOAD_CHUNK_SIZE_KB must be at most {}",
                MAX_UPLOAD_CHUNK_SIZE_KB
            ));
        }
        Ok(())
    }

    /// Joins `path` onto the base URL without doubling slashes.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
