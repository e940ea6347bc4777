//! # Application Wiring
//!
//! This module assembles the blog's encoding stack: it registers the schemas, applies
//! configuration and exposes the read endpoints a web layer would call.
//!
//! ## The BlogApi Pattern
//!
//! Schemas are registered once at startup. The resulting [`Encoder`](jsonapi_encoder::Encoder)
//! is immutable, so a single [`BlogApi`] can be cloned into every request handler:
//!
//! ```rust
//! use jsonapi_encoder::Parameters;
//! use jsonapi_sample::lifecycle::{fixtures, BlogApi, BlogConfig};
//!
//! let api = BlogApi::new(BlogConfig::default(), vec![fixtures::standard_post()]);
//!
//! // GET /posts/1?include=author
//! let params = Parameters::new().with_include_paths(["author"]);
//! let json = api.show_post(1, &params).unwrap();
//! assert!(json.contains(r#""included":[{"type":"people","id":"9""#));
//! ```
//!
//! ## Configuration
//!
//! [`BlogConfig`] is `Deserialize`, so it can come from any config file. Encoder
//! options sit at the top level next to `page_size`, and missing keys keep their
//! defaults (`url_prefix` defaults to `http://example.com`):
//!
//! ```json
//! { "url_prefix": "https://blog.example.com", "json_api_version": "1.0", "page_size": 20 }
//! ```
//!
//! ## Observability & Tracing
//!
//! Call [`setup_tracing`](jsonapi_encoder::tracing::setup_tracing) once in `main`.
//! Every encode call logs one `info` line; `RUST_LOG=debug` shows each resource.

pub mod blog_api;
pub mod fixtures;

pub use blog_api::*;
