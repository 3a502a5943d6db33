use crate::cache::{PageCache, RegenerationSlot};
use crate::render::{RenderedPage, Renderer};
use crate::site::generate_site;
use render_kit_aggregator::parse_post_id;
use render_kit_core::{RenderMode, Route};
use std::sync::Arc;
use tracing::{info, warn};

/// Serves routes according to the configured render mode.
///
/// - SSR renders every request.
/// - SSG serves what [`Pages::prerender`] produced and nothing else.
/// - ISR renders on first request, then serves the cached copy and
///   regenerates it in the background once it is older than the route's
///   revalidate interval.
pub struct Pages {
    renderer: Arc<Renderer>,
    cache: Arc<PageCache>,
    mode: RenderMode,
}

/// Key detail routes by their numeric id, so `/blog/007` and `/blog/7` are
/// the same page. `None` for slugs that can never name a post.
fn canonical(route: &Route) -> Option<Route> {
    match route {
        Route::Post(slug) => parse_post_id(slug).ok().map(|id| Route::Post(id.to_string())),
        other => Some(other.clone()),
    }
}

impl Pages {
    pub fn new(renderer: Renderer) -> Self {
        let mode = renderer.site().mode;
        Self {
            renderer: Arc::new(renderer),
            cache: Arc::new(PageCache::new()),
            mode,
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn not_found(&self) -> RenderedPage {
        self.renderer.not_found()
    }

    /// Render the whole site into the cache. Returns the page count.
    pub async fn prerender(&self) -> usize {
        let site = generate_site(&self.renderer).await;
        for (route, html) in site.pages {
            self.cache.insert(&route.path(), html).await;
        }
        self.cache.len().await
    }

    pub async fn get(&self, route: &Route) -> RenderedPage {
        let Some(route) = canonical(route) else {
            return self.not_found();
        };

        match self.mode {
            RenderMode::Ssr => self.renderer.render(&route).await,
            RenderMode::Ssg => match self.cache.get(&route.path()).await {
                Some(cached) => RenderedPage::ok(cached.html),
                None => self.not_found(),
            },
            RenderMode::Isr => self.get_revalidating(route).await,
        }
    }

    async fn get_revalidating(&self, route: Route) -> RenderedPage {
        let path = route.path();

        if let Some(cached) = self.cache.get(&path).await {
            let max_age = self.renderer.site().revalidate.interval_for(&route);
            if cached.is_stale(max_age) {
                if let Some(slot) = self.cache.try_begin_regeneration(&path) {
                    self.spawn_regeneration(route, slot);
                }
            }
            return RenderedPage::ok(cached.html);
        }

        let page = self.renderer.render(&route).await;
        if page.is_ok() {
            self.cache.insert(&path, page.html.clone()).await;
        }
        page
    }

    fn spawn_regeneration(&self, route: Route, slot: RegenerationSlot) {
        let renderer = Arc::clone(&self.renderer);
        let cache = Arc::clone(&self.cache);

        tokio::spawn(async move {
            let page = renderer.render(&route).await;
            let path = slot.path();
            if page.is_ok() {
                cache.insert(path, page.html).await;
                info!(%path, "page regenerated");
            } else {
                warn!(
                    %path,
                    status = page.status.code(),
                    "regeneration failed, keeping stale page"
                );
            }
        });
    }
}
