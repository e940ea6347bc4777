//! Blog domain: people write posts and comment on them.
//!
//! These types know nothing about JSON:API. See [`crate::schemas`] for how they are
//! described to the encoder.

pub mod author;
pub mod comment;
pub mod post;

pub use author::Author;
pub use comment::Comment;
pub use post::Post;
