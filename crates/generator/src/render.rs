use crate::templates;
use chrono::Utc;
use render_kit_aggregator::{Aggregator, Outcome};
use render_kit_core::config::SiteConfig;
use render_kit_core::{ListViewModel, Route};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Ok,
    NotFound,
    ServerError,
}

impl PageStatus {
    pub fn code(&self) -> u16 {
        match self {
            PageStatus::Ok => 200,
            PageStatus::NotFound => 404,
            PageStatus::ServerError => 500,
        }
    }
}

/// HTML for one route plus the status it should be served with
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub status: PageStatus,
    pub html: String,
}

impl RenderedPage {
    pub fn ok(html: String) -> Self {
        Self {
            status: PageStatus::Ok,
            html,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == PageStatus::Ok
    }
}

/// Turns routes into pages using fresh content for every call
pub struct Renderer {
    aggregator: Aggregator,
    site: SiteConfig,
}

impl Renderer {
    pub fn new(aggregator: Aggregator, site: SiteConfig) -> Self {
        Self { aggregator, site }
    }

    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Listing capped at the configured limit
    pub async fn listing(&self) -> ListViewModel {
        self.aggregator.list_posts(Some(self.site.api.list_limit)).await
    }

    pub fn render_listing(&self, list: &ListViewModel) -> RenderedPage {
        RenderedPage::ok(templates::blog_page(&self.site, list))
    }

    pub fn not_found(&self) -> RenderedPage {
        RenderedPage {
            status: PageStatus::NotFound,
            html: templates::not_found_page(&self.site),
        }
    }

    pub async fn render(&self, route: &Route) -> RenderedPage {
        match route {
            Route::Home => RenderedPage::ok(templates::home_page(&self.site, Utc::now())),
            Route::About => RenderedPage::ok(templates::about_page(&self.site)),
            Route::Blog => {
                let list = self.listing().await;
                self.render_listing(&list)
            }
            Route::Post(slug) => match self.aggregator.get_post(slug).await {
                Ok(detail) => RenderedPage::ok(templates::post_page(&self.site, &detail)),
                Err(e) => match e.outcome() {
                    Outcome::NotFound => self.not_found(),
                    Outcome::ServerError => {
                        warn!(slug = %slug, error = %e, "post page failed to render");
                        RenderedPage {
                            status: PageStatus::ServerError,
                            html: templates::error_page(&self.site),
                        }
                    }
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::site;
    use render_kit_aggregator::testing::{ScriptedClient, content_api, sample_posts};
    use render_kit_core::RenderMode;
    use std::sync::Arc;

    fn renderer(client: &Arc<ScriptedClient>) -> Renderer {
        let site = site(RenderMode::Ssr);
        Renderer::new(Aggregator::from_config(client.clone(), &site.api), site)
    }

    #[tokio::test]
    async fn test_static_routes_make_no_calls() {
        let client = Arc::new(ScriptedClient::new());
        let r = renderer(&client);
        assert!(r.render(&Route::Home).await.is_ok());
        assert!(r.render(&Route::About).await.is_ok());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_blog_route_applies_list_limit() {
        let client = Arc::new(content_api(&sample_posts(10), 0));
        let page = renderer(&client).render(&Route::Blog).await;
        assert!(page.is_ok());
        assert!(page.html.contains(r#"href="/blog/3""#));
        assert!(!page.html.contains(r#"href="/blog/4""#));
    }

    #[tokio::test]
    async fn test_blog_route_degrades_to_empty_page() {
        let client = Arc::new(ScriptedClient::new().status("/users", 500));
        let page = renderer(&client).render(&Route::Blog).await;
        assert_eq!(page.status, PageStatus::Ok);
        assert!(page.html.contains("No posts available."));
    }

    #[tokio::test]
    async fn test_post_route_statuses() {
        let client = Arc::new(content_api(&sample_posts(2), 1).status("/posts/50", 500));
        let r = renderer(&client);

        assert_eq!(r.render(&Route::Post("1".into())).await.status, PageStatus::Ok);
        assert_eq!(
            r.render(&Route::Post("abc".into())).await.status,
            PageStatus::NotFound
        );
        assert_eq!(
            r.render(&Route::Post("9".into())).await.status,
            PageStatus::NotFound
        );
        let page = r.render(&Route::Post("50".into())).await;
        assert_eq!(page.status, PageStatus::ServerError);
        assert_eq!(page.status.code(), 500);
    }
}
