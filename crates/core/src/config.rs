use crate::error::{Error, Result};
use crate::types::{RenderMode, Route};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_LIST_LIMIT: usize = 20;
pub const DEFAULT_COMMENT_LIMIT: usize = 10;

/// Raw TOML configuration structure
/// This matches the site.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    site: RawSite,
    api: RawApi,
    #[serde(default)]
    revalidate: Option<RawRevalidate>,
}

#[derive(Debug, Deserialize)]
struct RawSite {
    title: String,
    #[serde(default)]
    description: Option<String>,
    mode: RenderMode,
}

#[derive(Debug, Deserialize)]
struct RawApi {
    base_url: String,
    list_limit: Option<i64>,
    comment_limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawRevalidate {
    home: Option<i64>,
    about: Option<i64>,
    blog: Option<i64>,
    post: Option<i64>,
}

/// Complete site configuration
#[derive(Debug, Clone, Serialize)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    pub mode: RenderMode,
    pub api: ApiConfig,
    pub revalidate: Revalidate,
}

/// Content API settings
#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    /// Absolute http(s) URL without a trailing slash
    pub base_url: String,
    pub list_limit: usize,
    pub comment_limit: usize,
}

/// Per-route regeneration intervals, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Revalidate {
    pub home: u64,
    pub about: u64,
    pub blog: u64,
    pub post: u64,
}

impl Default for Revalidate {
    fn default() -> Self {
        Self {
            home: 60,
            about: 3600,
            blog: 300,
            post: 600,
        }
    }
}

impl Revalidate {
    pub fn interval_for(&self, route: &Route) -> Duration {
        let secs = match route {
            Route::Home => self.home,
            Route::About => self.about,
            Route::Blog => self.blog,
            Route::Post(_) => self.post,
        };
        Duration::from_secs(secs)
    }
}

/// Parse site.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let content = fs::read_to_string(path)?;
    parse_site_toml_str(&content)
}

/// Parse site.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<SiteConfig> {
    let raw: RawConfig = toml::from_str(content)?;

    let title = raw.site.title.trim().to_string();
    if title.is_empty() {
        return Err(Error::InvalidData("site.title must not be empty".into()));
    }

    let api = ApiConfig {
        base_url: validate_base_url(&raw.api.base_url)?,
        list_limit: positive(raw.api.list_limit, DEFAULT_LIST_LIMIT as u64, "api.list_limit")?
            as usize,
        comment_limit: positive(
            raw.api.comment_limit,
            DEFAULT_COMMENT_LIMIT as u64,
            "api.comment_limit",
        )? as usize,
    };

    let defaults = Revalidate::default();
    let revalidate = match raw.revalidate {
        Some(r) => Revalidate {
            home: positive(r.home, defaults.home, "revalidate.home")?,
            about: positive(r.about, defaults.about, "revalidate.about")?,
            blog: positive(r.blog, defaults.blog, "revalidate.blog")?,
            post: positive(r.post, defaults.post, "revalidate.post")?,
        },
        None => defaults,
    };

    Ok(SiteConfig {
        title,
        description: raw.site.description.unwrap_or_default(),
        mode: raw.site.mode,
        api,
        revalidate,
    })
}

/// Apply a default to an optional count and reject zero or negative values
fn positive(value: Option<i64>, default: u64, field_name: &str) -> Result<u64> {
    match value {
        None => Ok(default),
        Some(v) if v > 0 => Ok(v as u64),
        Some(v) => Err(Error::InvalidData(format!(
            "'{}' must be greater than zero, got {}",
            field_name, v
        ))),
    }
}

/// Validate the content API base URL.
///
/// Only absolute `http://` and `https://` URLs with a host are accepted.
/// Trailing slashes are stripped so endpoint paths can be appended
/// directly.
fn validate_base_url(url: &str) -> Result<String> {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| {
            Error::ConfigParse(format!(
                "api.base_url must start with http:// or https://: '{}'",
                url
            ))
        })?;

    if rest.trim_matches('/').is_empty() {
        return Err(Error::ConfigParse(format!(
            "api.base_url has no host: '{}'",
            url
        )));
    }

    Ok(url.trim_end_matches('/').to_string())
}
