use render_kit_aggregator::testing::BASE_URL;
use render_kit_core::RenderMode;
use render_kit_core::config::{ApiConfig, Revalidate, SiteConfig};

/// Site config pointing at the scripted content API, listing 3 posts
pub(crate) fn site(mode: RenderMode) -> SiteConfig {
    SiteConfig {
        title: "Demo Blog".to_string(),
        description: "Rendering demo".to_string(),
        mode,
        api: ApiConfig {
            base_url: BASE_URL.to_string(),
            list_limit: 3,
            comment_limit: 10,
        },
        revalidate: Revalidate::default(),
    }
}
