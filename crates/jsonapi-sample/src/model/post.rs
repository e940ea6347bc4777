use crate::model::{Author, Comment};
use std::sync::Arc;

/// A blog post with its author and comment thread.
#[derive(Debug)]
pub struct Post {
    pub id: u32,
    pub title: String,
    pub body: String,
    pub tags: Vec<String>,
    pub author: Option<Arc<Author>>,
    pub comments: Vec<Arc<Comment>>,
}

impl Post {
    /// Creates a post without tags.
    ///
    /// # Arguments
    /// * `id` - Unique identifier
    /// * `title` - Headline
    /// * `body` - Full text
    /// * `author` - Writer, if known
    /// * `comments` - Thread in display order
    pub fn new(
        id: u32,
        title: impl Into<String>,
        body: impl Into<String>,
        author: Option<Arc<Author>>,
        comments: Vec<Arc<Comment>>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            tags: Vec::new(),
            author,
            comments,
        }
    }

    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}
