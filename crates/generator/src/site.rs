use crate::render::Renderer;
use anyhow::{Context, Result};
use futures::future::join_all;
use render_kit_core::Route;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Output file for routes that do not exist
pub const NOT_FOUND_FILE: &str = "404.html";

/// Pre-rendered site ready to be written out or served from memory
#[derive(Debug, Default)]
pub struct GeneratedSite {
    /// (route, html) for every page that rendered successfully
    pub pages: Vec<(Route, String)>,
    pub not_found: String,
    /// Detail routes that could not be rendered
    pub skipped: Vec<Route>,
}

/// Render every page of the site once.
///
/// Home, about and the listing are always produced. One detail page is
/// rendered per post on the listing, concurrently. Detail pages that come
/// back not-found or failed are skipped.
pub async fn generate_site(renderer: &Renderer) -> GeneratedSite {
    let mut site = GeneratedSite {
        not_found: renderer.not_found().html,
        ..Default::default()
    };

    for route in [Route::Home, Route::About] {
        let page = renderer.render(&route).await;
        site.pages.push((route, page.html));
    }

    let list = renderer.listing().await;
    if list.is_empty() {
        warn!("blog listing is empty, no post pages will be generated");
    }
    site.pages.push((Route::Blog, renderer.render_listing(&list).html));

    let post_routes: Vec<Route> = list
        .posts
        .iter()
        .map(|p| Route::Post(p.id.to_string()))
        .collect();
    let rendered = join_all(post_routes.iter().map(|r| renderer.render(r))).await;

    for (route, page) in post_routes.into_iter().zip(rendered) {
        if page.is_ok() {
            site.pages.push((route, page.html));
        } else {
            warn!(path = %route.path(), status = page.status.code(), "skipping post page");
            site.skipped.push(route);
        }
    }

    site
}

/// Write a generated site below `output`, one `index.html` per route
pub fn write_site(site: &GeneratedSite, output: &Path) -> Result<usize> {
    fs::create_dir_all(output).context("Failed to create output directory")?;

    for (route, html) in &site.pages {
        let dst = output.join(route.output_file());
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&dst, html).with_context(|| format!("Failed to write {}", dst.display()))?;
    }

    fs::write(output.join(NOT_FOUND_FILE), &site.not_found)
        .context("Failed to write 404.html")?;

    Ok(site.pages.len() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::site;
    use render_kit_aggregator::Aggregator;
    use render_kit_aggregator::testing::{ScriptedClient, content_api, sample_posts};
    use render_kit_core::RenderMode;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn renderer(client: ScriptedClient) -> Renderer {
        let site = site(RenderMode::Ssg);
        Renderer::new(Aggregator::from_config(Arc::new(client), &site.api), site)
    }

    fn paths(site: &GeneratedSite) -> Vec<String> {
        site.pages.iter().map(|(r, _)| r.path()).collect()
    }

    #[tokio::test]
    async fn test_generate_site_renders_listed_posts() {
        let generated = generate_site(&renderer(content_api(&sample_posts(5), 2))).await;

        // list_limit is 3 in the test config
        assert_eq!(
            paths(&generated),
            vec!["/", "/about", "/blog", "/blog/1", "/blog/2", "/blog/3"]
        );
        assert!(generated.skipped.is_empty());
        assert!(generated.not_found.contains("Post Not Found"));
    }

    #[tokio::test]
    async fn test_generate_site_skips_failed_posts() {
        let client = content_api(&sample_posts(3), 1).status("/posts/2", 500);
        let generated = generate_site(&renderer(client)).await;

        assert_eq!(paths(&generated), vec!["/", "/about", "/blog", "/blog/1", "/blog/3"]);
        assert_eq!(generated.skipped, vec![Route::Post("2".to_string())]);
    }

    #[tokio::test]
    async fn test_generate_site_with_failed_listing() {
        let client = ScriptedClient::new().fail("/posts");
        let generated = generate_site(&renderer(client)).await;
        assert_eq!(paths(&generated), vec!["/", "/about", "/blog"]);
        let (_, blog_html) = &generated.pages[2];
        assert!(blog_html.contains("No posts available."));
    }

    #[tokio::test]
    async fn test_write_site_layout() {
        let generated = generate_site(&renderer(content_api(&sample_posts(2), 1))).await;
        let dir = TempDir::new().unwrap();

        let written = write_site(&generated, dir.path()).unwrap();

        assert_eq!(written, 6);
        for file in [
            "index.html",
            "about/index.html",
            "blog/index.html",
            "blog/1/index.html",
            "blog/2/index.html",
            "404.html",
        ] {
            assert!(dir.path().join(file).is_file(), "missing {}", file);
        }
        let post = fs::read_to_string(dir.path().join("blog/2/index.html")).unwrap();
        assert!(post.contains("Post number 2"));
    }
}
