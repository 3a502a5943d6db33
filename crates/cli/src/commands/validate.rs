use std::path::PathBuf;

use super::load_site;

pub async fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating site at: {}", path.display());

    let site = load_site(&path)?;

    println!("✓ site.toml valid");
    println!("  Site: {}", site.title);
    println!("  Mode: {} ({})", site.mode, site.mode.label());
    println!("  Content API: {}", site.api.base_url);
    println!(
        "  Limits: {} posts, {} comments per post",
        site.api.list_limit, site.api.comment_limit
    );
    println!(
        "  Revalidate (s): home {}, about {}, blog {}, post {}",
        site.revalidate.home, site.revalidate.about, site.revalidate.blog, site.revalidate.post
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_validate_missing_directory() {
        let err = run(PathBuf::from("/nonexistent/site")).await.unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn test_validate_missing_config() {
        let dir = TempDir::new().unwrap();
        let err = run(dir.path().to_path_buf()).await.unwrap_err();
        assert!(err.to_string().contains("site.toml not found"));
    }

    #[tokio::test]
    async fn test_validate_reports_bad_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("site.toml"),
            "[site]\ntitle = \"x\"\nmode = \"ssr\"\n[api]\nbase_url = \"localhost\"\n",
        )
        .unwrap();
        let err = run(dir.path().to_path_buf()).await.unwrap_err();
        assert!(format!("{:#}", err).contains("http:// or https://"));
    }
}
