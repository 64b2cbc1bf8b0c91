//! WordPress REST API access.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::MigrationError;

/// Header carrying the number of result pages of a collection.
const TOTAL_PAGES_HEADER: &str = "X-WP-TotalPages";

// =============================================================================
// Wire types
// =============================================================================

/// A field WordPress returns as `{ "rendered": "..." }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Rendered {
    pub rendered: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WpPost {
    pub id: u64,
    pub slug: String,
    pub date: String,
    pub title: Rendered,
    pub content: Rendered,
    /// Media id, 0 when the post has none
    #[serde(default)]
    pub featured_media: u64,
}

/// A category or tag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WpTerm {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WpMedia {
    pub slug: String,
    pub mime_type: String,
    pub guid: Rendered,
}

/// One page of the posts collection.
#[derive(Debug, Clone, Default)]
pub struct PostsPage {
    pub posts: Vec<WpPost>,
    pub total_pages: u32,
}

// =============================================================================
// API contract
// =============================================================================

/// The parts of the WordPress REST API a migration needs.
pub trait WordPressApi: Send + Sync {
    /// `GET /wp-json/wp/v2/posts?page={page}`, pages start at 1.
    fn posts_page(&self, page: u32)
    -> impl Future<Output = Result<PostsPage, MigrationError>> + Send;

    /// `GET /wp-json/wp/v2/categories?post={post_id}`
    fn post_categories(
        &self,
        post_id: u64,
    ) -> impl Future<Output = Result<Vec<WpTerm>, MigrationError>> + Send;

    /// `GET /wp-json/wp/v2/tags?post={post_id}`
    fn post_tags(
        &self,
        post_id: u64,
    ) -> impl Future<Output = Result<Vec<WpTerm>, MigrationError>> + Send;

    /// `GET /wp-json/wp/v2/media/{media_id}`
    fn media(&self, media_id: u64)
    -> impl Future<Output = Result<WpMedia, MigrationError>> + Send;

    /// Download a media file.
    fn download(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, MigrationError>> + Send;
}

// =============================================================================
// HTTP client
// =============================================================================

/// [`WordPressApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(site_url: &str) -> Result<Self, MigrationError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(MigrationError::Client)?;

        Ok(Self {
            http,
            base_url: site_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/wp-json/wp/v2/{}", self.base_url, path)
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, MigrationError> {
        debug!(url, "GET");
        let http_err = |source| MigrationError::Http {
            url: url.to_string(),
            source,
        };

        self.http
            .get(url)
            .send()
            .await
            .map_err(http_err)?
            .error_for_status()
            .map_err(http_err)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, MigrationError> {
        self.get(url)
            .await?
            .json()
            .await
            .map_err(|source| MigrationError::Http {
                url: url.to_string(),
                source,
            })
    }
}

impl WordPressApi for RestClient {
    async fn posts_page(&self, page: u32) -> Result<PostsPage, MigrationError> {
        let url = self.endpoint(&format!("posts?page={}", page));
        let response = self.get(&url).await?;

        let total_pages = response
            .headers()
            .get(TOTAL_PAGES_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(1);

        let posts = response
            .json()
            .await
            .map_err(|source| MigrationError::Http {
                url: url.clone(),
                source,
            })?;

        Ok(PostsPage { posts, total_pages })
    }

    async fn post_categories(&self, post_id: u64) -> Result<Vec<WpTerm>, MigrationError> {
        self.get_json(&self.endpoint(&format!("categories?post={}", post_id)))
            .await
    }

    async fn post_tags(&self, post_id: u64) -> Result<Vec<WpTerm>, MigrationError> {
        self.get_json(&self.endpoint(&format!("tags?post={}", post_id)))
            .await
    }

    async fn media(&self, media_id: u64) -> Result<WpMedia, MigrationError> {
        self.get_json(&self.endpoint(&format!("media/{}", media_id)))
            .await
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, MigrationError> {
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|source| MigrationError::Http {
                url: url.to_string(),
                source,
            })?;
        Ok(bytes.to_vec())
    }
}
