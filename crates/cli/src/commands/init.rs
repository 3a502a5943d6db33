use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::CONFIG_FILE;

/// Escape a string for safe inclusion in a TOML basic string
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Derive a site title from the directory name
/// Example: "my-isr-blog" -> "My Isr Blog"
fn title_from_dir(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .trim();

    let title = name
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if title.is_empty() {
        "My Blog".to_string()
    } else {
        title
    }
}

fn generate_site_toml(title: &str) -> String {
    format!(
        r#"[site]
title = "{}"
description = "The same blog rendered three different ways"
# ssr: render every request
# ssg: render once up front
# isr: render once, regenerate in the background after the intervals below
mode = "isr"

[api]
base_url = "https://jsonplaceholder.typicode.com"
list_limit = 20
comment_limit = 10

# Seconds before a cached page is regenerated (isr only)
[revalidate]
home = 60
about = 3600
blog = 300
post = 600
"#,
        toml_escape_string(title)
    )
}

/// Initialize a new site directory.
///
/// Creates the directory if needed and writes a default site.toml. An
/// existing site.toml is never overwritten.
pub async fn run(path: PathBuf) -> Result<()> {
    println!("📁 Initializing site at: {}", path.display());

    let config_path = path.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!(
            "{} already exists in {}; refusing to overwrite",
            CONFIG_FILE,
            path.display()
        );
    }

    fs::create_dir_all(&path).context("Failed to create site directory")?;

    let title = title_from_dir(&path);
    fs::write(&config_path, generate_site_toml(&title)).context("Failed to write site.toml")?;

    println!("   ✓ Created {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("   render-kit serve {}", path.display());
    println!("   render-kit build {} --output dist", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use render_kit_core::RenderMode;
    use render_kit_core::config::parse_site_toml;
    use tempfile::TempDir;

    #[test]
    fn test_title_from_dir() {
        assert_eq!(title_from_dir(Path::new("/tmp/my-isr-blog")), "My Isr Blog");
        assert_eq!(title_from_dir(Path::new("demo_site")), "Demo Site");
        assert_eq!(title_from_dir(Path::new("/")), "My Blog");
    }

    #[test]
    fn test_generated_toml_escapes_title() {
        let toml = generate_site_toml("Quote \"here\"");
        assert!(toml.contains(r#"title = "Quote \"here\"""#));
    }

    #[tokio::test]
    async fn test_init_writes_parsable_config() {
        let dir = TempDir::new().unwrap();
        let site_dir = dir.path().join("isr-demo");

        run(site_dir.clone()).await.unwrap();

        let config = parse_site_toml(site_dir.join(CONFIG_FILE)).unwrap();
        assert_eq!(config.title, "Isr Demo");
        assert_eq!(config.mode, RenderMode::Isr);
        assert_eq!(config.api.list_limit, 20);
        assert_eq!(config.revalidate.post, 600);
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "custom").unwrap();

        let err = run(dir.path().to_path_buf()).await.unwrap_err();

        assert!(err.to_string().contains("refusing to overwrite"));
        let contents = fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(contents, "custom");
    }
}
