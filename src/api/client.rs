// Cakewalk API HTTP client.
// Handles authentication headers, URL construction, status mapping, and response memoization.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use reqwest::{
    Url,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::cache::{CacheKey, Clock, ResponseCache};
use crate::config::{ClientConfig, ClientOptions};
use crate::error::{CakewalkError, Result};

use super::resource::Resource;
use super::transport::{HttpTransport, Transport};

const ARTICLES_API_BASE: &str = "https://api.cakewalk.ai";
const POSTS_API_BASE: &str = "https://api.cakewalk.ai/api";

/// Header carrying the project scope on posts requests.
pub const PROJECT_ID_HEADER: &str = "x-project-id";

/// Which flavor of the API a client talks to.
pub trait ApiFlavor: Send + Sync + 'static {
    const NAME: &'static str;
    const DEFAULT_BASE_URL: &'static str;
    /// Scoped flavors need a project id, send it as a header and prefix cache keys with it.
    const PROJECT_SCOPED: bool;
}

/// Organization-wide articles API.
#[derive(Debug, Clone, Copy)]
pub enum Articles {}

impl ApiFlavor for Articles {
    const NAME: &'static str = "articles";
    const DEFAULT_BASE_URL: &'static str = ARTICLES_API_BASE;
    const PROJECT_SCOPED: bool = false;
}

/// Project-scoped posts API.
#[derive(Debug, Clone, Copy)]
pub enum Posts {}

impl ApiFlavor for Posts {
    const NAME: &'static str = "posts";
    const DEFAULT_BASE_URL: &'static str = POSTS_API_BASE;
    const PROJECT_SCOPED: bool = true;
}

/// Cakewalk API client with a per-instance response cache.
pub struct BlogClient<F, T = HttpTransport> {
    transport: T,
    base_url: Url,
    headers: HeaderMap,
    project_id: Option<String>,
    cache: ResponseCache,
    _flavor: PhantomData<fn() -> F>,
}

pub type ArticlesClient<T = HttpTransport> = BlogClient<Articles, T>;
pub type PostsClient<T = HttpTransport> = BlogClient<Posts, T>;

impl BlogClient<Articles> {
    /// Create an articles client with the given API key.
    pub fn new(api_key: &str, options: ClientOptions) -> Result<Self> {
        let config = ClientConfig::new(api_key).with_options(options);
        Self::with_transport(config, HttpTransport::new()?)
    }
}

impl BlogClient<Posts> {
    /// Create a posts client for one project.
    pub fn new(api_key: &str, project_id: &str, options: ClientOptions) -> Result<Self> {
        let config = ClientConfig::new(api_key)
            .with_project_id(project_id)
            .with_options(options);
        Self::with_transport(config, HttpTransport::new()?)
    }
}

impl<F: ApiFlavor> BlogClient<F> {
    /// Create a client from `CAKEWALK_*` environment variables.
    ///
    /// The project id is ignored by unscoped flavors.
    pub fn from_env() -> Result<Self> {
        let mut config = ClientConfig::from_env()?;
        if !F::PROJECT_SCOPED {
            config.project_id = None;
        }
        Self::from_config(config)
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::with_transport(config, HttpTransport::new()?)
    }
}

impl<F: ApiFlavor, T: Transport> BlogClient<F, T> {
    /// Create a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        let ClientConfig {
            api_key,
            project_id,
            options,
        } = config;

        if api_key.trim().is_empty() {
            return Err(CakewalkError::Config("API key must not be empty".to_string()));
        }

        let project_id = match (F::PROJECT_SCOPED, project_id) {
            (true, Some(id)) if !id.trim().is_empty() => Some(id),
            (true, _) => {
                return Err(CakewalkError::Config(format!(
                    "the {} API requires a project id",
                    F::NAME
                )));
            }
            (false, Some(_)) => {
                return Err(CakewalkError::Config(format!(
                    "the {} API is not project-scoped",
                    F::NAME
                )));
            }
            (false, None) => None,
        };

        let base_url = parse_base_url(options.base_url.as_deref().unwrap_or(F::DEFAULT_BASE_URL))?;
        let headers = build_headers(&api_key, project_id.as_deref())?;
        let cache = ResponseCache::new(options.cache_ttl)?;

        Ok(Self {
            transport,
            base_url,
            headers,
            project_id,
            cache,
            _flavor: PhantomData,
        })
    }

    /// Read cache time from `clock` instead of the system clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.cache.set_clock(clock);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Cache key this client uses for `resource`.
    pub fn cache_key(&self, resource: Resource) -> CacheKey {
        CacheKey {
            project: self.project_id.clone(),
            resource,
        }
    }

    /// Drop every cached response.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Drop one cached response. Missing keys are ignored.
    pub fn clear_cache_key(&self, key: &CacheKey) {
        self.cache.remove(key);
    }

    /// Keys currently held in the cache, including expired entries.
    pub fn cached_entries(&self) -> Vec<CacheKey> {
        self.cache.keys()
    }

    /// Absolute URL for `resource`, with encoded path segments and query.
    pub fn endpoint_url(&self, resource: &Resource) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CakewalkError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(resource.path_segments());

        let query = resource.query();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// GET `resource` and decode the body. Never touches the cache.
    pub async fn request<V: DeserializeOwned>(&self, resource: &Resource) -> Result<V> {
        let url = self.endpoint_url(resource)?;
        debug!(flavor = F::NAME, %url, "GET");

        let response = self.transport.get(&url, &self.headers).await?;

        if !response.status.is_success() {
            return Err(CakewalkError::Api {
                status: response.status.as_u16(),
                status_text: response.status_text().to_string(),
            });
        }

        serde_json::from_slice(&response.body).map_err(|source| CakewalkError::Decode {
            path: resource.display_path(),
            source,
        })
    }

    /// Return the fresh cached value for `key`, or run `producer` and cache its success.
    ///
    /// Failures are returned as-is and never stored. Concurrent misses on the
    /// same key each run their producer; the last to finish wins.
    pub async fn cached<V, P, Fut>(&self, key: CacheKey, producer: P) -> Result<V>
    where
        V: Clone + Send + Sync + 'static,
        P: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(value) = self.cache.get::<V>(&key) {
            debug!(%key, "cache hit");
            return Ok(value);
        }

        debug!(%key, "cache miss");
        let value = producer().await?;
        self.cache.insert(key, value.clone());
        Ok(value)
    }

    /// Cached GET of `resource`.
    pub(crate) async fn fetch<V>(&self, resource: Resource) -> Result<V>
    where
        V: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let key = self.cache_key(resource.clone());
        self.cached(key, || self.request(&resource)).await
    }

    /// Cached GET that maps a 404 on a single-item resource to `None`.
    ///
    /// The `None` is not cached. List resources propagate a 404 as an error.
    pub(crate) async fn fetch_optional<V>(&self, resource: Resource) -> Result<Option<V>>
    where
        V: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        let single_item = resource.is_single_item();
        match self.fetch(resource).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if single_item && err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

impl<F: ApiFlavor, T> fmt::Debug for BlogClient<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Headers hold the API key.
        f.debug_struct("BlogClient")
            .field("flavor", &F::NAME)
            .field("base_url", &self.base_url.as_str())
            .field("project_id", &self.project_id)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Parse and check an API origin.
fn parse_base_url(raw: &str) -> Result<Url> {
    let url =
        Url::parse(raw).map_err(|e| CakewalkError::InvalidUrl(format!("{}: {}", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(CakewalkError::InvalidUrl(format!(
            "{}: expected an http(s) base URL",
            raw
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(CakewalkError::InvalidUrl(format!(
            "{}: base URL must not carry a query or fragment",
            raw
        )));
    }
    Ok(url)
}

/// Build the headers sent with every request.
fn build_headers(api_key: &str, project_id: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|_| {
        CakewalkError::InvalidHeader("API key contains invalid characters".to_string())
    })?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(project_id) = project_id {
        headers.insert(
            HeaderName::from_static(PROJECT_ID_HEADER),
            HeaderValue::from_str(project_id)
                .map_err(|e| CakewalkError::InvalidHeader(e.to_string()))?,
        );
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::RawResponse;
    use crate::api::{Article, PageQuery, PostsQuery, Tag};
    use reqwest::StatusCode;

    /// Answers every request with 404.
    struct NotFound;

    impl Transport for NotFound {
        async fn get(&self, _url: &Url, _headers: &HeaderMap) -> Result<RawResponse> {
            Ok(RawResponse::new(StatusCode::NOT_FOUND, "{}"))
        }
    }

    fn articles_client(base_url: Option<&str>) -> ArticlesClient {
        let mut options = ClientOptions::default();
        if let Some(base_url) = base_url {
            options = options.with_base_url(base_url);
        }
        ArticlesClient::new("k1", options).unwrap()
    }

    #[test]
    fn test_default_base_urls() {
        let articles = articles_client(None);
        assert_eq!(articles.base_url().as_str(), "https://api.cakewalk.ai/");

        let posts = PostsClient::new("k1", "p1", ClientOptions::default()).unwrap();
        assert_eq!(posts.base_url().as_str(), "https://api.cakewalk.ai/api");
        assert_eq!(posts.project_id(), Some("p1"));
    }

    #[test]
    fn test_endpoint_url_articles() {
        let client = articles_client(None);
        let url = client
            .endpoint_url(&Resource::Articles(PageQuery::default()))
            .unwrap();
        assert_eq!(url.as_str(), "https://api.cakewalk.ai/articles?page=1&limit=10");

        let url = client.endpoint_url(&Resource::Categories).unwrap();
        assert_eq!(url.as_str(), "https://api.cakewalk.ai/categories");
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let client = PostsClient::new(
            "k1",
            "p1",
            ClientOptions::default().with_base_url("http://localhost:8080/api/"),
        )
        .unwrap();

        let url = client
            .endpoint_url(&Resource::Posts(PostsQuery::default()))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/v1/posts?status=published&limit=50&offset=0"
        );

        let url = client.endpoint_url(&Resource::PostById(9)).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/posts/9");
    }

    #[test]
    fn test_endpoint_url_encodes_slugs() {
        let client = articles_client(None);
        let url = client
            .endpoint_url(&Resource::Article("a b/c?".to_string()))
            .unwrap();
        assert_eq!(url.as_str(), "https://api.cakewalk.ai/articles/a%20b%2Fc%3F");
    }

    #[test]
    fn test_headers() {
        let headers = build_headers("k1", Some("proj-1")).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer k1");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[PROJECT_ID_HEADER], "proj-1");

        let headers = build_headers("k1", None).unwrap();
        assert!(!headers.contains_key(PROJECT_ID_HEADER));

        assert!(build_headers("bad\nkey", None).is_err());
    }

    #[test]
    fn test_config_validation() {
        let missing_project = PostsClient::from_config(ClientConfig::new("k1"));
        assert!(matches!(missing_project, Err(CakewalkError::Config(_))));

        let blank_project =
            PostsClient::from_config(ClientConfig::new("k1").with_project_id(" "));
        assert!(matches!(blank_project, Err(CakewalkError::Config(_))));

        let scoped_articles =
            ArticlesClient::from_config(ClientConfig::new("k1").with_project_id("p"));
        assert!(matches!(scoped_articles, Err(CakewalkError::Config(_))));

        let empty_key = ArticlesClient::new("", ClientOptions::default());
        assert!(matches!(empty_key, Err(CakewalkError::Config(_))));
    }

    #[test]
    fn test_base_url_validation() {
        assert!(parse_base_url("https://api.example.com").is_ok());
        assert!(parse_base_url("not a url").is_err());
        assert!(parse_base_url("ftp://example.com").is_err());
        assert!(parse_base_url("mailto:someone@example.com").is_err());
        assert!(parse_base_url("https://example.com/api?x=1").is_err());
    }

    #[test]
    fn test_cache_key_scoping() {
        let posts = PostsClient::new("k1", "p1", ClientOptions::default()).unwrap();
        let key = posts.cache_key(Resource::PostById(3));
        assert_eq!(key.to_string(), "p1:post:id:3");

        let articles = articles_client(None);
        let key = articles.cache_key(Resource::Tags);
        assert_eq!(key.to_string(), "tags");
    }

    #[tokio::test]
    async fn test_not_found_is_none_only_for_single_items() {
        let client =
            ArticlesClient::<NotFound>::with_transport(ClientConfig::new("k1"), NotFound).unwrap();

        let article: Option<Article> = client
            .fetch_optional(Resource::Article("gone".to_string()))
            .await
            .unwrap();
        assert!(article.is_none());

        let err = client
            .fetch_optional::<Vec<Tag>>(Resource::Tags)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(client.cached_entries().is_empty());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = ArticlesClient::new("secret-key", ClientOptions::default()).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("api.cakewalk.ai"));
    }
}
