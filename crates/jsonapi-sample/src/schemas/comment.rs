use crate::model::Comment;
use jsonapi_encoder::{Attributes, Relationship, RelationshipData, ResourceSchema, SchemaError};

pub const BODY: &str = "body";
pub const AUTHOR: &str = "author";

#[derive(Debug, Default)]
pub struct CommentSchema;

impl ResourceSchema for CommentSchema {
    type Resource = Comment;

    fn resource_type(&self) -> &str {
        "comments"
    }

    fn id(&self, comment: &Comment) -> Result<String, SchemaError> {
        Ok(comment.id.to_string())
    }

    fn attributes<'a>(&'a self, comment: &'a Comment) -> Result<Attributes<'a>, SchemaError> {
        Ok(Attributes::new().insert(BODY, comment.body.as_str()))
    }

    fn relationships(&self, comment: &Comment) -> Result<Vec<(String, Relationship)>, SchemaError> {
        Ok(vec![(
            AUTHOR.to_string(),
            RelationshipData::one(comment.author.clone()).into(),
        )])
    }

    fn self_url(&self, comment: &Comment) -> Option<String> {
        Some(format!("/comments/{}", comment.id))
    }
}
