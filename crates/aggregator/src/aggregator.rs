use crate::client::{FetchError, HttpClient};
use chrono::Utc;
use render_kit_core::config::{ApiConfig, DEFAULT_COMMENT_LIMIT};
use render_kit_core::{Comment, DetailViewModel, ListViewModel, Post, User, find_author};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// How a failed detail lookup should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    NotFound,
    ServerError,
}

/// Why `get_post` produced no view model
#[derive(Debug, Error)]
pub enum PostError {
    #[error("invalid post id: '{0}'")]
    InvalidId(String),
    #[error("post {0} not found")]
    NotFound(u64),
    #[error("failed to load post {id}: {source}")]
    Upstream {
        id: u64,
        #[source]
        source: FetchError,
    },
}

impl PostError {
    pub fn outcome(&self) -> Outcome {
        match self {
            PostError::InvalidId(_) | PostError::NotFound(_) => Outcome::NotFound,
            PostError::Upstream { .. } => Outcome::ServerError,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self.outcome() {
            Outcome::NotFound => 404,
            Outcome::ServerError => 500,
        }
    }
}

/// Parse a post id from a URL segment.
///
/// Only plain decimal digits denoting a value of at least 1 are accepted.
/// Signs, whitespace and trailing garbage are rejected rather than coerced.
pub fn parse_post_id(slug: &str) -> Result<u64, PostError> {
    let invalid = || PostError::InvalidId(slug.to_string());

    if slug.is_empty() || !slug.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    match slug.parse::<u64>() {
        Ok(0) | Err(_) => Err(invalid()),
        Ok(id) => Ok(id),
    }
}

/// Builds view models from the content API.
///
/// Holds no state between calls beyond its configuration, so a single
/// instance can serve concurrent requests.
#[derive(Clone)]
pub struct Aggregator {
    client: Arc<dyn HttpClient>,
    base_url: String,
    comment_limit: usize,
}

impl Aggregator {
    pub fn new(client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            comment_limit: DEFAULT_COMMENT_LIMIT,
        }
    }

    pub fn from_config(client: Arc<dyn HttpClient>, api: &ApiConfig) -> Self {
        Self::new(client, api.base_url.clone()).with_comment_limit(api.comment_limit)
    }

    pub fn with_comment_limit(mut self, limit: usize) -> Self {
        self.comment_limit = limit;
        self
    }

    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "fetching");

        let response = self.client.get(&url).await?;
        if !response.is_success() {
            return Err(FetchError::Status {
                url,
                status: response.status,
            });
        }

        serde_json::from_str(&response.body).map_err(|source| FetchError::Decode { url, source })
    }

    /// Fetch the blog listing.
    ///
    /// Posts and users are fetched concurrently. If either request fails
    /// the listing degrades to empty. Posts keep the upstream order and
    /// are cut to `limit` when one is given.
    pub async fn list_posts(&self, limit: Option<usize>) -> ListViewModel {
        let (posts, users) = tokio::join!(
            self.fetch_json::<Vec<Post>>("/posts"),
            self.fetch_json::<Vec<User>>("/users"),
        );
        let fetched_at = Utc::now();

        match (posts, users) {
            (Ok(mut posts), Ok(users)) => {
                if let Some(limit) = limit {
                    posts.truncate(limit);
                }
                ListViewModel {
                    posts,
                    users,
                    fetched_at,
                }
            }
            (posts, users) => {
                for error in [posts.err(), users.err()].into_iter().flatten() {
                    warn!(%error, "blog listing fetch failed, serving empty listing");
                }
                ListViewModel::empty(fetched_at)
            }
        }
    }

    /// Fetch one post by its raw URL segment
    pub async fn get_post(&self, slug: &str) -> Result<DetailViewModel, PostError> {
        let id = parse_post_id(slug)?;
        self.get_post_by_id(id).await
    }

    /// Fetch one post with its author and comments.
    ///
    /// Only the post request can fail the lookup. A failed users or
    /// comments request leaves the author absent or the comments empty.
    pub async fn get_post_by_id(&self, id: u64) -> Result<DetailViewModel, PostError> {
        if id == 0 {
            return Err(PostError::InvalidId(id.to_string()));
        }

        let post: Post = match self.fetch_json(&format!("/posts/{}", id)).await {
            Ok(post) => post,
            Err(e) if e.is_not_found() => return Err(PostError::NotFound(id)),
            Err(source) => {
                warn!(post_id = id, error = %source, "post fetch failed");
                return Err(PostError::Upstream { id, source });
            }
        };

        let comments_path = format!("/posts/{}/comments", id);
        let (users, comments) = tokio::join!(
            self.fetch_json::<Vec<User>>("/users"),
            self.fetch_json::<Vec<Comment>>(&comments_path),
        );

        let author = match users {
            Ok(users) => find_author(&users, post.author_id).cloned(),
            Err(error) => {
                warn!(post_id = id, %error, "users fetch failed, author omitted");
                None
            }
        };

        let comments = match comments {
            Ok(comments) => comments
                .into_iter()
                .filter(|c| c.post_id == id)
                .take(self.comment_limit)
                .collect(),
            Err(error) => {
                warn!(post_id = id, %error, "comments fetch failed, showing none");
                Vec::new()
            }
        };

        Ok(DetailViewModel {
            post,
            author,
            comments,
        })
    }
}
