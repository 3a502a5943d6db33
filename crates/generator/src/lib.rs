// Page rendering for the blog: HTML templates, route rendering, static
// generation and the regenerating page cache.

pub mod cache;
pub mod pages;
pub mod render;
pub mod site;
pub mod templates;
#[cfg(test)]
mod test_support;

pub use cache::{CachedPage, PageCache, RegenerationSlot};
pub use pages::Pages;
pub use render::{PageStatus, RenderedPage, Renderer};
pub use site::{GeneratedSite, generate_site, write_site};
