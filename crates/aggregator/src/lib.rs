// Content API aggregation: fetch posts, users and comments and join them
// into render-ready view models.

pub mod aggregator;
pub mod client;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use aggregator::{Aggregator, Outcome, PostError, parse_post_id};
pub use client::{FetchError, HttpClient, HttpResponse, ReqwestClient};
