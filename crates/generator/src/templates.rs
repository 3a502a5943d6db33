use chrono::{DateTime, Utc};
use render_kit_core::config::SiteConfig;
use render_kit_core::{Comment, DetailViewModel, ListViewModel, Post, RenderMode, User};

const EXCERPT_CHARS: usize = 100;
const DESCRIPTION_CHARS: usize = 160;

/// HTML-escape a string to prevent XSS attacks
///
/// Escapes: & < > " '
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Meta description for a post: the first 160 characters of the body on
/// one line, always followed by `...`
pub fn meta_description(post: &Post) -> String {
    let head: String = post.body.chars().take(DESCRIPTION_CHARS).collect();
    format!("{}...", head.replace('\n', " "))
}

/// Body text split into paragraphs on blank or single newlines
fn paragraphs(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| format!("<p>{}</p>", html_escape(l)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Head metadata for one page
struct PageMeta<'a> {
    title: &'a str,
    description: &'a str,
    /// OpenGraph type: `website`, or `article` for post pages
    kind: &'a str,
    author: Option<&'a str>,
}

impl<'a> PageMeta<'a> {
    fn website(title: &'a str, description: &'a str) -> Self {
        Self {
            title,
            description,
            kind: "website",
            author: None,
        }
    }
}

/// OpenGraph and Twitter card tags mirroring the page title and description
fn social_meta(site: &SiteConfig, meta: &PageMeta) -> String {
    let title = html_escape(meta.title);
    let description = html_escape(meta.description);
    let mut tags = vec![
        format!(r#"<meta property="og:site_name" content="{}">"#, html_escape(&site.title)),
        format!(r#"<meta property="og:type" content="{}">"#, meta.kind),
        format!(r#"<meta property="og:title" content="{}">"#, title),
        format!(r#"<meta property="og:description" content="{}">"#, description),
        r#"<meta name="twitter:card" content="summary_large_image">"#.to_string(),
        format!(r#"<meta name="twitter:title" content="{}">"#, title),
        format!(r#"<meta name="twitter:description" content="{}">"#, description),
    ];
    if let Some(author) = meta.author {
        let author = html_escape(author);
        tags.push(format!(r#"<meta name="author" content="{}">"#, author));
        tags.push(format!(r#"<meta property="article:author" content="{}">"#, author));
    }
    tags.join("\n    ")
}

/// Wrap page content in the shared document shell
fn layout(site: &SiteConfig, meta: &PageMeta, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <meta name="description" content="{description}">
    {social}
    <style>
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            background: #f5f5f5;
        }}
        header {{
            background: #1f2937;
            color: white;
            padding: 1rem 2rem;
            display: flex;
            justify-content: space-between;
            align-items: center;
        }}
        header a {{ color: white; text-decoration: none; margin-left: 1.5rem; }}
        header .brand {{ margin-left: 0; font-weight: bold; font-size: 1.2rem; }}
        main {{
            max-width: 800px;
            margin: 2rem auto;
            background: white;
            padding: 2rem;
            border-radius: 8px;
            box-shadow: 0 2px 8px rgba(0,0,0,0.1);
        }}
        h1 {{ font-size: 2rem; margin-bottom: 1rem; color: #222; }}
        h2 {{ font-size: 1.3rem; margin: 1.5rem 0 1rem; color: #222; }}
        p {{ margin-bottom: 0.75rem; }}
        .mode-badge {{
            background: #2563eb;
            color: white;
            padding: 0.25rem 0.75rem;
            border-radius: 4px;
            display: inline-block;
            font-size: 0.85rem;
            margin-bottom: 1rem;
        }}
        .post-card {{ padding: 1rem 0; border-bottom: 1px solid #eee; }}
        .post-card:last-child {{ border-bottom: none; }}
        .post-card a {{ color: #1d4ed8; text-decoration: none; }}
        .byline, .timestamp {{ color: #999; font-size: 0.9rem; }}
        .author {{ background: #f9f9f9; border-left: 3px solid #2563eb; padding: 1rem; margin: 1rem 0; }}
        .comment {{ padding: 0.75rem 0; border-bottom: 1px solid #eee; }}
        .comment .name {{ font-weight: 500; }}
        .empty {{ color: #999; font-style: italic; }}
        footer {{ text-align: center; color: #999; font-size: 0.9rem; padding: 2rem; }}
    </style>
</head>
<body>
    <header>
        <a class="brand" href="/">{site_title}</a>
        <nav>
            <a href="/">Home</a>
            <a href="/blog">Blog</a>
            <a href="/about">About</a>
        </nav>
    </header>
    <main>
{content}
    </main>
    <footer>Generated by render-kit &bull; {mode_label}</footer>
</body>
</html>"#,
        title = html_escape(meta.title),
        description = html_escape(meta.description),
        social = social_meta(site, meta),
        site_title = html_escape(&site.title),
        content = content,
        mode_label = site.mode.label(),
    )
}

fn page_title(site: &SiteConfig, title: &str) -> String {
    format!("{} - {}", title, site.title)
}

pub fn home_page(site: &SiteConfig, generated_at: DateTime<Utc>) -> String {
    let refresh_note = match site.mode {
        RenderMode::Ssr => "This page is rendered fresh on every request.".to_string(),
        RenderMode::Ssg => "This page was rendered once when the site was built.".to_string(),
        RenderMode::Isr => format!(
            "This page is regenerated in the background at most every {} seconds.",
            site.revalidate.home
        ),
    };

    let content = format!(
        r#"        <div class="mode-badge">{mode}</div>
        <h1>{title}</h1>
        <p>{description}</p>
        <p>{refresh_note}</p>
        <p class="timestamp">Generated at {generated_at}</p>
        <p><a href="/blog">Read the blog</a> &middot; <a href="/about">About this site</a></p>"#,
        mode = site.mode.label(),
        title = html_escape(&site.title),
        description = html_escape(&site.description),
        refresh_note = refresh_note,
        generated_at = format_timestamp(generated_at),
    );

    layout(
        site,
        &PageMeta::website(&site.title, &site.description),
        &content,
    )
}

pub fn about_page(site: &SiteConfig) -> String {
    let content = r#"        <h1>About</h1>
        <p>This site renders the same blog content with one of three strategies.</p>
        <h2>Server-Side Rendering (SSR)</h2>
        <p>Every request is rendered on the server with fresh data from the content API.</p>
        <h2>Static Site Generation (SSG)</h2>
        <p>Every page is rendered once at build time and served unchanged afterwards.</p>
        <h2>Incremental Static Regeneration (ISR)</h2>
        <p>Pages are rendered once, served from cache, and regenerated in the background
        after a configured interval. Visitors never wait for a regeneration.</p>"#;

    let title = page_title(site, "About");
    layout(
        site,
        &PageMeta::website(&title, "How this site renders its pages"),
        content,
    )
}

fn post_card(post: &Post, author: Option<&User>) -> String {
    let byline = author
        .map(|a| format!("By {}", html_escape(&a.name)))
        .unwrap_or_else(|| "Unknown author".to_string());

    format!(
        r#"        <article class="post-card">
            <h2><a href="{href}">{title}</a></h2>
            <p class="byline">{byline}</p>
            <p>{excerpt}</p>
        </article>"#,
        href = post.href(),
        title = html_escape(&post.title),
        byline = byline,
        excerpt = html_escape(&post.excerpt(EXCERPT_CHARS)),
    )
}

pub fn blog_page(site: &SiteConfig, list: &ListViewModel) -> String {
    let posts_html = if list.is_empty() {
        r#"        <p class="empty">No posts available.</p>"#.to_string()
    } else {
        list.entries()
            .map(|(post, author)| post_card(post, author))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let content = format!(
        r#"        <h1>Blog</h1>
        <p class="timestamp">Fetched at {fetched_at}</p>
{posts_html}"#,
        fetched_at = format_timestamp(list.fetched_at),
        posts_html = posts_html,
    );

    let title = page_title(site, "Blog");
    layout(site, &PageMeta::website(&title, "Latest posts"), &content)
}

fn author_block(author: Option<&User>) -> String {
    let Some(author) = author else {
        return r#"        <div class="author"><p>Unknown author</p></div>"#.to_string();
    };

    let mut details = vec![
        format!(
            "<p><strong>{}</strong> (@{})</p>",
            html_escape(&author.name),
            html_escape(&author.username)
        ),
        format!("<p>{}</p>", html_escape(&author.email)),
    ];
    if let Some(website) = &author.website {
        details.push(format!("<p>Website: {}</p>", html_escape(website)));
    }
    if let Some(company) = &author.company {
        details.push(format!("<p>Company: {}</p>", html_escape(&company.name)));
    }
    if let Some(phone) = &author.phone {
        details.push(format!("<p>Phone: {}</p>", html_escape(phone)));
    }

    format!(
        r#"        <div class="author">
            {}
        </div>"#,
        details.join("\n            ")
    )
}

fn comment_item(comment: &Comment) -> String {
    format!(
        r#"            <div class="comment">
                <p class="name">{name}</p>
                <p class="byline">{email}</p>
                {body}
            </div>"#,
        name = html_escape(&comment.name),
        email = html_escape(&comment.email),
        body = paragraphs(&comment.body),
    )
}

pub fn post_page(site: &SiteConfig, detail: &DetailViewModel) -> String {
    let comments_html = if detail.comments.is_empty() {
        r#"            <p class="empty">No comments yet.</p>"#.to_string()
    } else {
        detail
            .comments
            .iter()
            .map(comment_item)
            .collect::<Vec<_>>()
            .join("\n")
    };

    let content = format!(
        r#"        <article>
            <h1>{title}</h1>
{author}
            {body}
        </article>
        <section class="comments">
            <h2>Comments ({count})</h2>
{comments_html}
        </section>
        <p><a href="/blog">&larr; Back to blog</a></p>"#,
        title = html_escape(&detail.post.title),
        author = author_block(detail.author.as_ref()),
        body = paragraphs(&detail.post.body),
        count = detail.comments.len(),
        comments_html = comments_html,
    );

    let title = page_title(site, &detail.post.title);
    let description = meta_description(&detail.post);
    let meta = PageMeta {
        title: &title,
        description: &description,
        kind: "article",
        author: detail.author.as_ref().map(|a| a.name.as_str()),
    };
    layout(site, &meta, &content)
}

pub fn not_found_page(site: &SiteConfig) -> String {
    let content = r#"        <h1>Post Not Found</h1>
        <p>The page you are looking for could not be found.</p>
        <p><a href="/blog">&larr; Back to blog</a></p>"#;

    let title = page_title(site, "Post Not Found");
    layout(
        site,
        &PageMeta::website(
            &title,
            "The blog post you are looking for could not be found.",
        ),
        content,
    )
}

pub fn error_page(site: &SiteConfig) -> String {
    let content = r#"        <h1>Something went wrong</h1>
        <p>This page could not be loaded right now. Please try again later.</p>
        <p><a href="/">&larr; Home</a></p>"#;

    let title = page_title(site, "Error");
    layout(
        site,
        &PageMeta::website(&title, "The page could not be loaded."),
        content,
    )
}
