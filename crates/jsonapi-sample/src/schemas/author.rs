use crate::model::Author;
use jsonapi_encoder::{Attributes, Relationship, RelationshipData, ResourceSchema, SchemaError};

pub const FIRST_NAME: &str = "first_name";
pub const LAST_NAME: &str = "last_name";
pub const COMMENTS: &str = "comments";

#[derive(Debug, Default)]
pub struct AuthorSchema;

impl ResourceSchema for AuthorSchema {
    type Resource = Author;

    fn resource_type(&self) -> &str {
        "people"
    }

    fn id(&self, author: &Author) -> Result<String, SchemaError> {
        Ok(author.id.to_string())
    }

    fn attributes<'a>(&'a self, author: &'a Author) -> Result<Attributes<'a>, SchemaError> {
        Ok(Attributes::new()
            .insert(FIRST_NAME, author.first_name.as_str())
            .insert(LAST_NAME, author.last_name.as_str()))
    }

    fn relationships(&self, author: &Author) -> Result<Vec<(String, Relationship)>, SchemaError> {
        let comments = author
            .comments()
            .map_err(|_| SchemaError::new(format!("comments of author {} are poisoned", author.id)))?;
        Ok(vec![(
            COMMENTS.to_string(),
            RelationshipData::many(comments.iter().cloned()).into(),
        )])
    }

    fn self_url(&self, author: &Author) -> Option<String> {
        Some(format!("/people/{}", author.id))
    }

    fn include_paths(&self) -> Vec<String> {
        vec![COMMENTS.to_string()]
    }
}
