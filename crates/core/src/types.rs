use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A blog post as served by the content API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
    /// Foreign key into the user list; may not resolve
    #[serde(rename = "userId")]
    pub author_id: u64,
}

impl Post {
    /// First `max_chars` characters of the body on a single line.
    ///
    /// Appends `...` only when something was cut off.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let flat = self.body.replace('\n', " ");
        if flat.chars().count() <= max_chars {
            return flat;
        }
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }

    /// Path of the detail page for this post
    pub fn href(&self) -> String {
        format!("/blog/{}", self.id)
    }
}

/// Post author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
}

/// Employer details, only shown on the detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catch_phrase: Option<String>,
}

/// Comment left on a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub post_id: u64,
    pub name: String,
    pub email: String,
    pub body: String,
}

/// Resolve an author by id. An unknown id is not an error.
pub fn find_author(users: &[User], author_id: u64) -> Option<&User> {
    users.iter().find(|u| u.id == author_id)
}

/// Data for the blog listing page.
///
/// Posts keep the order the API returned them in. Authors are resolved
/// against `users` at render time via [`ListViewModel::entries`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListViewModel {
    pub posts: Vec<Post>,
    pub users: Vec<User>,
    pub fetched_at: DateTime<Utc>,
}

impl ListViewModel {
    pub fn empty(fetched_at: DateTime<Utc>) -> Self {
        Self {
            posts: Vec::new(),
            users: Vec::new(),
            fetched_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn author_of(&self, post: &Post) -> Option<&User> {
        find_author(&self.users, post.author_id)
    }

    /// (post, author) pairs in listing order
    pub fn entries(&self) -> impl Iterator<Item = (&Post, Option<&User>)> {
        self.posts.iter().map(|p| (p, self.author_of(p)))
    }
}

/// Data for a single post page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailViewModel {
    pub post: Post,
    pub author: Option<User>,
    pub comments: Vec<Comment>,
}

/// How pages are produced and refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Rendered on every request
    Ssr,
    /// Rendered once up front, never refreshed
    Ssg,
    /// Rendered once, regenerated in the background after an interval
    Isr,
}

impl RenderMode {
    pub fn label(&self) -> &'static str {
        match self {
            RenderMode::Ssr => "Server-Side Rendering",
            RenderMode::Ssg => "Static Site Generation",
            RenderMode::Isr => "Incremental Static Regeneration",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RenderMode::Ssr => "ssr",
            RenderMode::Ssg => "ssg",
            RenderMode::Isr => "isr",
        };
        f.write_str(s)
    }
}

/// A page of the site
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    About,
    Blog,
    /// Detail page; the slug is kept raw and validated by the aggregator
    Post(String),
}

impl Route {
    /// Map a request path onto a route, ignoring a trailing slash
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Home),
            "/about" => Some(Route::About),
            "/blog" => Some(Route::Blog),
            _ => {
                let slug = trimmed.strip_prefix("/blog/")?;
                if slug.is_empty() || slug.contains('/') {
                    None
                } else {
                    Some(Route::Post(slug.to_string()))
                }
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Blog => "/blog".to_string(),
            Route::Post(slug) => format!("/blog/{}", slug),
        }
    }

    /// Relative output file for a pre-rendered copy of this route
    pub fn output_file(&self) -> String {
        match self {
            Route::Home => "index.html".to_string(),
            Route::About => "about/index.html".to_string(),
            Route::Blog => "blog/index.html".to_string(),
            Route::Post(slug) => format!("blog/{}/index.html", slug),
        }
    }
}
