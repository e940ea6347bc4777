use crate::model::Author;
use std::sync::Arc;

#[derive(Debug)]
pub struct Comment {
    pub id: u32,
    pub body: String,
    pub author: Option<Arc<Author>>,
}

impl Comment {
    pub fn new(id: u32, body: impl Into<String>, author: Option<Arc<Author>>) -> Arc<Self> {
        Arc::new(Self {
            id,
            body: body.into(),
            author,
        })
    }
}
