// Requested API resources.
// Each variant maps to exactly one endpoint and one cache key, so both are derived from here.

use std::fmt;

/// Default post status filter for list requests.
pub const DEFAULT_POST_STATUS: &str = "published";
/// Default page size for post list requests.
pub const DEFAULT_POSTS_LIMIT: u32 = 50;
/// Default page size for article list requests.
pub const DEFAULT_ARTICLES_LIMIT: u32 = 10;

/// Page-based pagination used by the articles API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_ARTICLES_LIMIT,
        }
    }
}

impl PageQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }
}

/// Status filter plus offset pagination used by the posts API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostsQuery {
    pub status: String,
    pub limit: u32,
    pub offset: u32,
}

impl Default for PostsQuery {
    fn default() -> Self {
        Self {
            status: DEFAULT_POST_STATUS.to_string(),
            limit: DEFAULT_POSTS_LIMIT,
            offset: 0,
        }
    }
}

impl PostsQuery {
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

/// A single cacheable GET against the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Posts(PostsQuery),
    PostById(u64),
    PostBySlug(String),
    Articles(PageQuery),
    Article(String),
    CategoryArticles { slug: String, page: PageQuery },
    TagArticles { slug: String, page: PageQuery },
    Categories,
    Tags,
}

impl Resource {
    /// Path segments below the base URL, unencoded.
    pub fn path_segments(&self) -> Vec<String> {
        match self {
            Resource::Posts(_) => segments(&["v1", "posts"]),
            Resource::PostById(id) => segments(&["v1", "posts", id.to_string().as_str()]),
            Resource::PostBySlug(slug) => segments(&["v1", "posts", "slug", slug.as_str()]),
            Resource::Articles(_) => segments(&["articles"]),
            Resource::Article(slug) => segments(&["articles", slug.as_str()]),
            Resource::CategoryArticles { slug, .. } => {
                segments(&["categories", slug.as_str(), "articles"])
            }
            Resource::TagArticles { slug, .. } => segments(&["tags", slug.as_str(), "articles"]),
            Resource::Categories => segments(&["categories"]),
            Resource::Tags => segments(&["tags"]),
        }
    }

    /// Query parameters, in the order they are sent.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Resource::Posts(q) => vec![
                ("status", q.status.clone()),
                ("limit", q.limit.to_string()),
                ("offset", q.offset.to_string()),
            ],
            Resource::Articles(page)
            | Resource::CategoryArticles { page, .. }
            | Resource::TagArticles { page, .. } => vec![
                ("page", page.page.to_string()),
                ("limit", page.limit.to_string()),
            ],
            _ => Vec::new(),
        }
    }

    /// Whether a 404 from this resource means "no such item" rather than an error.
    pub fn is_single_item(&self) -> bool {
        matches!(
            self,
            Resource::PostById(_) | Resource::PostBySlug(_) | Resource::Article(_)
        )
    }

    /// Human-readable path with query string, used in logs and decode errors.
    pub fn display_path(&self) -> String {
        let mut path = String::new();
        for segment in self.path_segments() {
            path.push('/');
            path.push_str(&segment);
        }
        let query = self.query();
        if !query.is_empty() {
            let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            path.push('?');
            path.push_str(&pairs.join("&"));
        }
        path
    }
}

fn segments(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}

/// Renders the string form of the cache key for this resource.
impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Posts(q) => write!(f, "posts:{}:{}:{}", q.status, q.limit, q.offset),
            Resource::PostById(id) => write!(f, "post:id:{}", id),
            Resource::PostBySlug(slug) => write!(f, "post:slug:{}", slug),
            Resource::Articles(p) => write!(f, "articles:{}:{}", p.page, p.limit),
            Resource::Article(slug) => write!(f, "article:{}", slug),
            Resource::CategoryArticles { slug, page } => {
                write!(f, "category:{}:{}:{}", slug, page.page, page.limit)
            }
            Resource::TagArticles { slug, page } => {
                write!(f, "tag:{}:{}:{}", slug, page.page, page.limit)
            }
            Resource::Categories => write!(f, "categories"),
            Resource::Tags => write!(f, "tags"),
        }
    }
}
