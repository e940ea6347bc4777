//! # JSON:API Blog Demo
//!
//! Encodes a small blog with the [`jsonapi_encoder`] crate.
//!
//! ## Core Components
//!
//! - **[model]**: Plain domain types ([`Post`](jsonapi_sample::model::Post), [`Author`](jsonapi_sample::model::Author), [`Comment`](jsonapi_sample::model::Comment)).
//! - **[schemas]**: How each model type maps to a JSON:API resource.
//! - **[lifecycle]**: Registry construction and the [`BlogApi`] endpoints.
//!
//! ## Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run -p jsonapi-sample
//! ```
//!
//! The demo:
//! 1. Builds the [`BlogApi`] from its default configuration.
//! 2. Renders post 1 with its author and comments included.
//! 3. Serves several listing requests concurrently from one shared encoder.

use jsonapi_encoder::tracing::setup_tracing;
use jsonapi_encoder::Parameters;
use jsonapi_sample::lifecycle::{fixtures, BlogApi, BlogConfig};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    info!("Starting blog demo");

    let config = BlogConfig {
        page_size: 2,
        ..BlogConfig::default()
    };
    let api = BlogApi::new(
        BlogConfig {
            encoder: config.encoder.clone().pretty(true).with_json_api_version("1.0"),
            ..config
        },
        fixtures::blog_posts(),
    );

    // GET /posts/1?include=author,comments.author
    let span = tracing::info_span!("show_post");
    let document = async {
        let params = Parameters::new().with_include_paths(["author", "comments.author"]);
        api.show_post(1, &params).map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;
    println!("{document}");

    // GET /posts?page=N&fields[posts]=title,author, all pages at once
    let mut handles = Vec::new();
    for page in 1..=3 {
        let api = api.clone();
        let span = tracing::info_span!("list_posts", page);
        handles.push(tokio::spawn(
            async move {
                let params = Parameters::new()
                    .with_include_paths(["author"])
                    .with_field_set("posts", ["title", "author"]);
                api.list_posts(page, &params)
            }
            .instrument(span),
        ));
    }

    for handle in handles {
        match handle.await.map_err(|e| e.to_string())? {
            Ok(page) => info!(bytes = page.len(), "Page rendered"),
            // Page 3 does not exist with two posts per page.
            Err(e) => error!(error = %e, "Listing failed"),
        }
    }

    info!("Demo completed");
    Ok(())
}
