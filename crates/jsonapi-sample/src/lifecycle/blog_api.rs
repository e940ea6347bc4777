use crate::model::Post;
use crate::schemas::{AuthorSchema, CommentSchema, PostSchema};
use jsonapi_encoder::{
    Encoder, EncoderError, EncoderOptions, Parameters, ResourceRef, SchemaRegistry, TopLevelLinks,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Errors surfaced by the blog endpoints.
#[derive(Debug, thiserror::Error)]
pub enum BlogError {
    #[error("Post {0} not found")]
    PostNotFound(u32),

    #[error("Page {page} is out of range (1..={pages})")]
    PageOutOfRange { page: usize, pages: usize },

    #[error("Invalid configuration: {0}")]
    Config(#[source] serde_json::Error),

    #[error(transparent)]
    Encoding(#[from] EncoderError),
}

/// Startup configuration of the blog API.
///
/// Keys missing from a config file keep their [`Default`] values. An explicit
/// `"url_prefix": null` renders relative links.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "BlogConfigFile")]
pub struct BlogConfig {
    pub encoder: EncoderOptions,
    /// Posts per page in listings.
    pub page_size: usize,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            encoder: EncoderOptions {
                url_prefix: default_url_prefix(),
                ..EncoderOptions::new()
            },
            page_size: default_page_size(),
        }
    }
}

/// On-disk shape of [`BlogConfig`].
#[derive(Deserialize)]
struct BlogConfigFile {
    #[serde(default = "default_url_prefix")]
    url_prefix: Option<String>,
    #[serde(default)]
    pretty: bool,
    #[serde(default)]
    json_api_version: Option<String>,
    #[serde(default = "default_page_size")]
    page_size: usize,
}

fn default_url_prefix() -> Option<String> {
    Some("http://example.com".to_string())
}

fn default_page_size() -> usize {
    10
}

impl From<BlogConfigFile> for BlogConfig {
    fn from(file: BlogConfigFile) -> Self {
        Self {
            encoder: EncoderOptions {
                url_prefix: file.url_prefix,
                pretty: file.pretty,
                json_api_version: file.json_api_version,
            },
            page_size: file.page_size,
        }
    }
}

impl BlogConfig {
    pub fn from_json(text: &str) -> Result<Self, BlogError> {
        let config: Self = serde_json::from_str(text).map_err(BlogError::Config)?;
        if config.page_size == 0 {
            return Err(BlogError::Config(serde::de::Error::custom(
                "page_size must be at least 1",
            )));
        }
        Ok(config)
    }
}

/// Registry with the author, comment and post schemas.
pub fn blog_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry
        .register_default::<AuthorSchema>()
        .register_default::<CommentSchema>()
        .register_default::<PostSchema>();
    registry
}

/// Read endpoints over an in-memory set of posts.
#[derive(Clone)]
pub struct BlogApi {
    encoder: Arc<Encoder>,
    posts: Arc<Vec<Arc<Post>>>,
    page_size: usize,
}

impl BlogApi {
    pub fn new(config: BlogConfig, posts: Vec<Arc<Post>>) -> Self {
        Self::with_registry(blog_registry(), config, posts)
    }

    /// Uses a custom registry, e.g. one with per-registration overrides.
    pub fn with_registry(
        registry: SchemaRegistry,
        config: BlogConfig,
        posts: Vec<Arc<Post>>,
    ) -> Self {
        info!(posts = posts.len(), schemas = registry.len(), "Blog API ready");
        Self {
            encoder: Arc::new(Encoder::with_options(registry, config.encoder)),
            posts: Arc::new(posts),
            page_size: config.page_size.max(1),
        }
    }

    pub fn encoder(&self) -> &Arc<Encoder> {
        &self.encoder
    }

    /// `GET /posts/{id}`
    #[instrument(skip(self, parameters))]
    pub fn show_post(&self, id: u32, parameters: &Parameters) -> Result<String, BlogError> {
        let Some(post) = self.posts.iter().find(|p| p.id == id) else {
            warn!(id, "Post not found");
            return Err(BlogError::PostNotFound(id));
        };
        let links = TopLevelLinks::new().with_self(self.url(&format!("/posts/{id}")));
        let json = self.encoder.encode(
            ResourceRef::from(Arc::clone(post)),
            Some(links),
            None,
            Some(parameters),
        )?;
        Ok(json)
    }

    /// `GET /posts?page={page}` with pagination links and the total in `meta`.
    #[instrument(skip(self, parameters))]
    pub fn list_posts(&self, page: usize, parameters: &Parameters) -> Result<String, BlogError> {
        let total = self.posts.len();
        let pages = total.div_ceil(self.page_size).max(1);
        if page == 0 || page > pages {
            return Err(BlogError::PageOutOfRange { page, pages });
        }

        let items: Vec<ResourceRef> = self
            .posts
            .iter()
            .skip((page - 1) * self.page_size)
            .take(self.page_size)
            .map(|post| ResourceRef::from(Arc::clone(post)))
            .collect();

        let page_url = |n: usize| self.url(&format!("/posts?page={n}"));
        let links = TopLevelLinks::new().with_self(page_url(page)).with_pages(
            Some(page_url(1)),
            Some(page_url(pages)),
            (page > 1).then(|| page_url(page - 1)),
            (page < pages).then(|| page_url(page + 1)),
        );
        let json = self.encoder.encode(
            items,
            Some(links),
            Some(json!({ "total": total })),
            Some(parameters),
        )?;
        Ok(json)
    }

    fn url(&self, path: &str) -> String {
        self.encoder.options().url(path)
    }
}
