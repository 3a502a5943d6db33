//! Scripted in-memory `HttpClient` and sample content for tests.

use crate::client::{FetchError, HttpClient, HttpResponse};
use async_trait::async_trait;
use render_kit_core::{Comment, Post, User};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Base URL the scripted client answers for
pub const BASE_URL: &str = "http://content.test";

#[derive(Debug, Clone)]
enum Reply {
    Respond { status: u16, body: String },
    Fail,
}

/// Fake content API keyed by path (e.g. `/posts/1`).
///
/// Paths that were not scripted answer 404. Every call is counted and
/// recorded, including ones that fail. While an outage is set every path
/// answers 500.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    replies: HashMap<String, Reply>,
    outage: AtomicBool,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `path` with 200 and `value` as JSON
    pub fn ok<T: Serialize>(self, path: &str, value: &T) -> Self {
        let body = serde_json::to_string(value).unwrap_or_default();
        self.respond(path, 200, body)
    }

    /// Answer `path` with an empty JSON object and the given status
    pub fn status(self, path: &str, status: u16) -> Self {
        self.respond(path, status, "{}".to_string())
    }

    pub fn respond(mut self, path: &str, status: u16, body: String) -> Self {
        self.replies
            .insert(path.to_string(), Reply::Respond { status, body });
        self
    }

    /// Make `path` fail without a response, like a refused connection
    pub fn fail(mut self, path: &str) -> Self {
        self.replies.insert(path.to_string(), Reply::Fail);
        self
    }

    /// Start or stop answering every request with 500
    pub fn set_outage(&self, down: bool) {
        self.outage.store(down, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Paths requested so far, in call order
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl HttpClient for ScriptedClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let path = url.strip_prefix(BASE_URL).unwrap_or(url).to_string();
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(path.clone());
        }

        if self.outage.load(Ordering::SeqCst) {
            return Ok(HttpResponse {
                status: 500,
                body: "{}".to_string(),
            });
        }

        match self.replies.get(&path) {
            Some(Reply::Respond { status, body }) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(Reply::Fail) => Err(FetchError::Transport {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
            None => Ok(HttpResponse {
                status: 404,
                body: "{}".to_string(),
            }),
        }
    }
}

pub fn sample_post(id: u64, author_id: u64) -> Post {
    Post {
        id,
        title: format!("Post number {}", id),
        body: format!("Body of post {}.\nSecond line.", id),
        author_id,
    }
}

/// Posts 1..=n, authored round-robin by users 1..=3
pub fn sample_posts(n: u64) -> Vec<Post> {
    (1..=n).map(|id| sample_post(id, (id - 1) % 3 + 1)).collect()
}

pub fn sample_user(id: u64) -> User {
    User {
        id,
        name: format!("Author {}", id),
        username: format!("author{}", id),
        email: format!("author{}@example.com", id),
        website: None,
        phone: None,
        company: None,
    }
}

pub fn sample_users() -> Vec<User> {
    (1..=3).map(sample_user).collect()
}

/// `n` comments on `post_id`
pub fn sample_comments(post_id: u64, n: u64) -> Vec<Comment> {
    (1..=n)
        .map(|i| Comment {
            id: post_id * 100 + i,
            post_id,
            name: format!("Comment {}", i),
            email: format!("reader{}@example.com", i),
            body: format!("Reply {} to post {}", i, post_id),
        })
        .collect()
}

/// A client serving `posts`, the sample users, and `comments_per_post`
/// comments for every post
pub fn content_api(posts: &[Post], comments_per_post: u64) -> ScriptedClient {
    let mut client = ScriptedClient::new()
        .ok("/posts", &posts)
        .ok("/users", &sample_users());
    for post in posts {
        client = client
            .ok(&format!("/posts/{}", post.id), post)
            .ok(
                &format!("/posts/{}/comments", post.id),
                &sample_comments(post.id, comments_per_post),
            );
    }
    client
}
