pub mod build;
pub mod init;
pub mod serve;
pub mod validate;

use anyhow::{Context, Result};
use render_kit_core::config::{SiteConfig, parse_site_toml};
use std::path::Path;

pub const CONFIG_FILE: &str = "site.toml";

/// Load site.toml from a site directory
pub fn load_site(path: &Path) -> Result<SiteConfig> {
    if !path.exists() {
        anyhow::bail!(
            "Site directory does not exist: {}\nRun 'render-kit init {}' first",
            path.display(),
            path.display()
        );
    }

    let config_path = path.join(CONFIG_FILE);
    if !config_path.exists() {
        anyhow::bail!(
            "{} not found in {}\nRun 'render-kit init {}' first",
            CONFIG_FILE,
            path.display(),
            path.display()
        );
    }

    parse_site_toml(&config_path).context("Failed to parse site.toml")
}
