use crate::model::Post;
use jsonapi_encoder::{Attributes, Relationship, RelationshipData, ResourceSchema, SchemaError};

pub const TITLE: &str = "title";
pub const BODY: &str = "body";
pub const TAGS: &str = "tags";
pub const AUTHOR: &str = "author";
pub const COMMENTS: &str = "comments";

#[derive(Debug, Default)]
pub struct PostSchema;

impl ResourceSchema for PostSchema {
    type Resource = Post;

    fn resource_type(&self) -> &str {
        "posts"
    }

    fn id(&self, post: &Post) -> Result<String, SchemaError> {
        Ok(post.id.to_string())
    }

    fn attributes<'a>(&'a self, post: &'a Post) -> Result<Attributes<'a>, SchemaError> {
        let attributes = Attributes::new()
            .insert(TITLE, post.title.as_str())
            .insert(BODY, post.body.as_str());
        // Untagged posts keep the short form.
        if post.tags.is_empty() {
            return Ok(attributes);
        }
        Ok(attributes.insert_serialized(TAGS, &post.tags))
    }

    fn relationships(&self, post: &Post) -> Result<Vec<(String, Relationship)>, SchemaError> {
        Ok(vec![
            (
                AUTHOR.to_string(),
                RelationshipData::one(post.author.clone()).into(),
            ),
            (
                COMMENTS.to_string(),
                RelationshipData::many(post.comments.iter().cloned()).into(),
            ),
        ])
    }

    fn self_url(&self, post: &Post) -> Option<String> {
        Some(format!("/posts/{}", post.id))
    }
}
