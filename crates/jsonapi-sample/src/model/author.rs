use crate::model::Comment;
use std::sync::{Arc, LockResult, PoisonError, RwLock, RwLockReadGuard};

/// A person who writes posts and comments.
///
/// The comment list is filled in after the comments exist, since every comment
/// points back at its author. The resulting `Arc` cycle is fine for short-lived
/// request graphs.
#[derive(Debug)]
pub struct Author {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    comments: RwLock<Vec<Arc<Comment>>>,
}

impl Author {
    pub fn new(id: u32, first_name: impl Into<String>, last_name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            comments: RwLock::new(Vec::new()),
        })
    }

    pub fn set_comments(&self, comments: Vec<Arc<Comment>>) {
        *self
            .comments
            .write()
            .unwrap_or_else(PoisonError::into_inner) = comments;
    }

    /// Read access to the comments written by this author.
    ///
    /// # Errors
    /// If a writer panicked while holding the lock.
    pub fn comments(&self) -> LockResult<RwLockReadGuard<'_, Vec<Arc<Comment>>>> {
        self.comments.read()
    }
}
