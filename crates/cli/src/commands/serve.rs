use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use render_kit_aggregator::{Aggregator, ReqwestClient};
use render_kit_core::{RenderMode, Route};
use render_kit_generator::{Pages, RenderedPage, Renderer};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::trace::TraceLayer;

use super::load_site;

/// Serve the site with the configured (or overridden) render mode.
///
/// - `ssr` renders every request from fresh content
/// - `ssg` renders everything once at startup and serves only that
/// - `isr` caches pages and regenerates them in the background once their
///   revalidate interval has passed
pub async fn run(path: PathBuf, port: u16, mode: Option<RenderMode>) -> Result<()> {
    println!("🌐 Starting server...");
    println!("   Site: {}", path.display());

    let mut site = load_site(&path)?;
    if let Some(mode) = mode {
        site.mode = mode;
    }

    println!("   ✓ Loaded: {}", site.title);
    println!("   ✓ Mode: {}", site.mode.label());
    println!("   ✓ Content API: {}", site.api.base_url);

    let client = ReqwestClient::new().context("Failed to create HTTP client")?;
    let aggregator = Aggregator::from_config(Arc::new(client), &site.api);
    let pages = Arc::new(Pages::new(Renderer::new(aggregator, site)));

    if pages.mode() == RenderMode::Ssg {
        println!("   📄 Pre-rendering site...");
        let count = pages.prerender().await;
        println!("   ✓ Pre-rendered {} pages", count);
    }

    let app = router(pages);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("\n🚀 Ready at: http://localhost:{}", port);
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

pub fn router(pages: Arc<Pages>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/about", get(about_handler))
        .route("/blog", get(blog_handler))
        .route("/blog/{slug}", get(post_handler))
        .fallback(fallback_handler)
        .with_state(pages)
        .layer(TraceLayer::new_for_http())
}

fn respond(page: RenderedPage) -> Response {
    let status =
        StatusCode::from_u16(page.status.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Html(page.html)).into_response()
}

async fn home_handler(State(pages): State<Arc<Pages>>) -> Response {
    respond(pages.get(&Route::Home).await)
}

async fn about_handler(State(pages): State<Arc<Pages>>) -> Response {
    respond(pages.get(&Route::About).await)
}

async fn blog_handler(State(pages): State<Arc<Pages>>) -> Response {
    respond(pages.get(&Route::Blog).await)
}

async fn post_handler(State(pages): State<Arc<Pages>>, Path(slug): Path<String>) -> Response {
    respond(pages.get(&Route::Post(slug)).await)
}

/// Catches trailing-slash variants of known routes; anything else is 404
async fn fallback_handler(State(pages): State<Arc<Pages>>, uri: Uri) -> Response {
    match Route::from_path(uri.path()) {
        Some(route) => respond(pages.get(&route).await),
        None => respond(pages.not_found()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use render_kit_aggregator::testing::{BASE_URL, ScriptedClient, content_api, sample_posts};
    use render_kit_core::config::parse_site_toml_str;
    use tower::ServiceExt;

    fn app(client: ScriptedClient, mode: &str) -> (Router, Arc<Pages>) {
        let toml = format!(
            "[site]\ntitle = \"Served\"\nmode = \"{}\"\n[api]\nbase_url = \"{}\"\n",
            mode, BASE_URL
        );
        let site = parse_site_toml_str(&toml).unwrap();
        let aggregator = Aggregator::from_config(Arc::new(client), &site.api);
        let pages = Arc::new(Pages::new(Renderer::new(aggregator, site)));
        (router(pages.clone()), pages)
    }

    async fn get_page(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_static_pages() {
        let (app, _) = app(ScriptedClient::new(), "ssr");
        let (status, body) = get_page(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Server-Side Rendering"));

        let (status, body) = get_page(app, "/about").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Incremental Static Regeneration (ISR)"));
    }

    #[tokio::test]
    async fn test_blog_listing_and_post() {
        let (app, _) = app(content_api(&sample_posts(3), 2), "ssr");

        let (status, body) = get_page(app.clone(), "/blog").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"href="/blog/3""#));

        let (status, body) = get_page(app, "/blog/2").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<title>Post number 2 - Served</title>"));
        assert!(body.contains("Comments (2)"));
    }

    #[tokio::test]
    async fn test_post_status_codes() {
        let client = content_api(&sample_posts(1), 0).status("/posts/7", 502);
        let (app, _) = app(client, "ssr");

        assert_eq!(get_page(app.clone(), "/blog/abc").await.0, StatusCode::NOT_FOUND);
        assert_eq!(get_page(app.clone(), "/blog/0").await.0, StatusCode::NOT_FOUND);
        assert_eq!(get_page(app.clone(), "/blog/42").await.0, StatusCode::NOT_FOUND);
        assert_eq!(
            get_page(app.clone(), "/blog/7").await.0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        let (status, body) = get_page(app, "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Post Not Found"));
    }

    #[tokio::test]
    async fn test_trailing_slash_resolves_route() {
        let (app, _) = app(content_api(&sample_posts(2), 0), "ssr");
        assert_eq!(get_page(app.clone(), "/blog/").await.0, StatusCode::OK);
        assert_eq!(get_page(app.clone(), "/blog/1/").await.0, StatusCode::OK);
        assert_eq!(get_page(app, "/blog/1/extra").await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_failed_listing_is_still_ok() {
        let client = ScriptedClient::new()
            .ok("/posts", &sample_posts(1))
            .status("/users", 500);
        let (app, _) = app(client, "ssr");

        let (status, body) = get_page(app, "/blog").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("No posts available."));
    }

    #[tokio::test]
    async fn test_ssg_mode_serves_prerendered_pages() {
        let (app, pages) = app(content_api(&sample_posts(2), 0), "ssg");
        pages.prerender().await;

        assert_eq!(get_page(app.clone(), "/blog/1").await.0, StatusCode::OK);
        assert_eq!(get_page(app, "/blog/3").await.0, StatusCode::NOT_FOUND);
    }
}
