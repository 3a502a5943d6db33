use anyhow::{Context, Result};
use render_kit_aggregator::{Aggregator, ReqwestClient};
use render_kit_core::RenderMode;
use render_kit_generator::{Renderer, generate_site, write_site};
use std::path::PathBuf;
use std::sync::Arc;

use super::load_site;

/// Build static site for deployment
pub async fn run(path: PathBuf, output: PathBuf) -> Result<()> {
    println!("🔨 Building static site...");
    println!("   Source: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    let site = load_site(&path)?;
    if site.mode != RenderMode::Ssg {
        println!(
            "   ⚠ site.toml mode is '{}'; building a static snapshot anyway",
            site.mode
        );
    }

    let client = ReqwestClient::new().context("Failed to create HTTP client")?;
    let renderer = Renderer::new(Aggregator::from_config(Arc::new(client), &site.api), site);

    build_static_site(&renderer, &output).await
}

/// Render every page and write it below `output`
pub async fn build_static_site(renderer: &Renderer, output: &std::path::Path) -> Result<()> {
    println!("📄 Rendering pages from {}...", renderer.site().api.base_url);
    let generated = generate_site(renderer).await;
    println!("   ✓ Rendered {} pages", generated.pages.len());

    for route in &generated.skipped {
        eprintln!("   ⚠ Warning: skipped {} (could not be rendered)", route.path());
    }

    println!("📁 Writing files...");
    let written = write_site(&generated, output)?;
    println!("   ✓ Wrote {} files", written);

    println!();
    println!("✅ Build complete!");
    println!("   Output: {}", output.display());
    println!();
    println!("To test locally:");
    println!("   cd {} && python3 -m http.server 8000", output.display());
    println!();

    Ok(())
}
