//! Runtime configuration, read from the environment (a `.env` file is honoured by the binaries).
use anyhow::{anyhow, Context, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_TMDB_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_BIND: &str = "0.0.0.0:3146";
pub const DEFAULT_PAGE_SIZE: usize = 4;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub image_base: String,
    pub language: String,
    pub timeout: Duration,
}

impl TmdbConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_TMDB_BASE.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_image_base(mut self, image_base: impl Into<String>) -> Self {
        let image_base: String = image_base.into();
        self.image_base = image_base.trim_end_matches('/').to_string();
        self
    }

    pub fn from_env() -> Result<Self> {
        let api_key = env::var("TMDB_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow!("Missing required environment variable: TMDB_API_KEY"))?;
        let mut cfg = Self::new(api_key);
        if let Some(base) = optional_var("TMDB_BASE_URL") {
            cfg = cfg.with_base_url(base);
        }
        if let Some(image) = optional_var("TMDB_IMAGE_BASE_URL") {
            cfg = cfg.with_image_base(image);
        }
        if let Some(lang) = optional_var("TMDB_LANGUAGE") {
            cfg.language = lang;
        }
        if let Some(raw) = optional_var("HTTP_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("HTTP_TIMEOUT_SECS is not a number: '{raw}'"))?;
            cfg.timeout = Duration::from_secs(secs);
        }
        Ok(cfg)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb: TmdbConfig,
    pub bind: SocketAddr,
    pub page_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let tmdb = TmdbConfig::from_env()?;
        let bind_raw = optional_var("CINESCOPE_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_raw
            .parse()
            .with_context(|| format!("CINESCOPE_BIND is not a socket address: '{bind_raw}'"))?;
        let page_size = match optional_var("CAROUSEL_PAGE_SIZE") {
            Some(raw) => parse_page_size(&raw)?,
            None => DEFAULT_PAGE_SIZE,
        };
        Ok(Self {
            tmdb,
            bind,
            page_size,
        })
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub fn parse_page_size(raw: &str) -> Result<usize> {
    let size: usize = raw
        .trim()
        .parse()
        .with_context(|| format!("CAROUSEL_PAGE_SIZE is not a number: '{raw}'"))?;
    if size == 0 {
        anyhow::bail!("CAROUSEL_PAGE_SIZE must be greater than zero");
    }
    Ok(size)
}
