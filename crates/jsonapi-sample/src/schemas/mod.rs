//! # Blog Schemas
//!
//! One [`ResourceSchema`](jsonapi_encoder::ResourceSchema) per model type. Self links
//! are paths (`/posts/1`); the host is added by
//! [`EncoderOptions::url_prefix`](jsonapi_encoder::EncoderOptions).
//!
//! | Model | JSON:API type | Relationships | Default includes |
//! |-------|---------------|---------------|------------------|
//! | [`Author`](crate::model::Author) | `people` | `comments` | `comments` |
//! | [`Comment`](crate::model::Comment) | `comments` | `author` | none |
//! | [`Post`](crate::model::Post) | `posts` | `author`, `comments` | none |

pub mod author;
pub mod comment;
pub mod post;

pub use author::AuthorSchema;
pub use comment::CommentSchema;
pub use post::PostSchema;
