//! # Document Model
//!
//! The output tree of an encode call, shaped after JSON:API v1.0. Every type
//! serializes with `serde`; optional members are skipped rather than emitted as
//! `null`, except relationship `data`, where `null` is meaningful.

use crate::identifier::ResourceIdentifier;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// A complete JSON:API document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<JsonApiObject>,
    pub data: PrimaryData,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<TopLevelLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl Document {
    /// Primary resources in input order (empty for `null` data).
    pub fn primary(&self) -> &[ResourceObject] {
        match &self.data {
            PrimaryData::Null => &[],
            PrimaryData::Single(resource) => std::slice::from_ref(resource.as_ref()),
            PrimaryData::Collection(resources) => resources,
        }
    }

    /// Looks up an included resource by identifier.
    pub fn find_included(&self, resource_type: &str, id: &str) -> Option<&ResourceObject> {
        self.included
            .iter()
            .find(|r| r.resource_type == resource_type && r.id == id)
    }
}

/// The top-level `data` member.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Null,
    Single(Box<ResourceObject>),
    Collection(Vec<ResourceObject>),
}

/// `{"version": "1.0"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonApiObject {
    pub version: String,
}

/// One encoded domain object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
    #[serde(skip_serializing_if = "Relationships::is_empty")]
    pub relationships: Relationships,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ResourceLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl ResourceObject {
    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.resource_type.clone(), self.id.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceLinks {
    #[serde(rename = "self")]
    pub self_link: String,
}

/// Relationships of a resource, kept in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relationships(Vec<(String, RelationshipObject)>);

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, relationship: RelationshipObject) {
        self.0.push((name.into(), relationship));
    }

    pub fn get(&self, name: &str) -> Option<&RelationshipObject> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RelationshipObject)> {
        self.0.iter().map(|(name, r)| (name.as_str(), r))
    }
}

impl Serialize for Relationships {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, relationship) in &self.0 {
            map.serialize_entry(name, relationship)?;
        }
        map.end()
    }
}

/// A rendered relationship: a bare URL in reference mode, an object otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RelationshipObject {
    Reference(String),
    Object {
        #[serde(skip_serializing_if = "Option::is_none")]
        links: Option<RelationshipLinks>,
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<IdentifierData>,
        #[serde(skip_serializing_if = "Option::is_none")]
        meta: Option<Value>,
    },
}

impl RelationshipObject {
    /// `data` of an object relationship; `None` for references or hidden data.
    pub fn data(&self) -> Option<&IdentifierData> {
        match self {
            RelationshipObject::Reference(_) => None,
            RelationshipObject::Object { data, .. } => data.as_ref(),
        }
    }

    pub fn links(&self) -> Option<&RelationshipLinks> {
        match self {
            RelationshipObject::Reference(_) => None,
            RelationshipObject::Object { links, .. } => links.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipLinks {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
}

/// Relationship `data`: identifier, identifier list, or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IdentifierData {
    Null,
    One(ResourceIdentifier),
    Many(Vec<ResourceIdentifier>),
}

/// Caller-supplied top-level links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopLevelLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl TopLevelLinks {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_self(mut self, url: impl Into<String>) -> Self {
        self.self_link = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_related(mut self, url: impl Into<String>) -> Self {
        self.related = Some(url.into());
        self
    }

    /// Pagination links; `None` leaves the member out.
    #[must_use]
    pub fn with_pages(
        mut self,
        first: Option<String>,
        last: Option<String>,
        prev: Option<String>,
        next: Option<String>,
    ) -> Self {
        self.first = first;
        self.last = last;
        self.prev = prev;
        self.next = next;
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person(id: &str) -> ResourceObject {
        let mut attributes = Map::new();
        attributes.insert("last_name".into(), json!("Gebhardt"));
        attributes.insert("first_name".into(), json!("Dan"));
        ResourceObject {
            resource_type: "people".into(),
            id: id.into(),
            attributes,
            relationships: Relationships::new(),
            links: None,
            meta: None,
        }
    }

    #[test]
    fn test_empty_members_are_omitted() {
        let mut resource = person("9");
        resource.attributes.clear();
        let json = serde_json::to_string(&resource).unwrap();
        assert_eq!(json, r#"{"type":"people","id":"9"}"#);
    }

    #[test]
    fn test_attribute_order_is_preserved() {
        let json = serde_json::to_string(&person("9")).unwrap();
        assert_eq!(
            json,
            r#"{"type":"people","id":"9","attributes":{"last_name":"Gebhardt","first_name":"Dan"}}"#
        );
    }

    #[test]
    fn test_relationship_shapes() {
        let mut relationships = Relationships::new();
        relationships.push(
            "author",
            RelationshipObject::Reference("http://example.com/posts/1/author".into()),
        );
        relationships.push(
            "editor",
            RelationshipObject::Object {
                links: None,
                data: Some(IdentifierData::Null),
                meta: None,
            },
        );
        relationships.push(
            "comments",
            RelationshipObject::Object {
                links: Some(RelationshipLinks {
                    self_link: Some("http://example.com/posts/1/relationships/comments".into()),
                    related: None,
                }),
                data: Some(IdentifierData::Many(vec![])),
                meta: None,
            },
        );

        assert_eq!(
            serde_json::to_value(&relationships).unwrap(),
            json!({
                "author": "http://example.com/posts/1/author",
                "editor": { "data": null },
                "comments": {
                    "links": { "self": "http://example.com/posts/1/relationships/comments" },
                    "data": []
                }
            })
        );
        assert_eq!(relationships.get("editor").unwrap().data(), Some(&IdentifierData::Null));
    }

    #[test]
    fn test_document_data_shapes() {
        let doc = Document {
            jsonapi: None,
            data: PrimaryData::Null,
            included: vec![],
            links: None,
            meta: None,
        };
        assert_eq!(serde_json::to_string(&doc).unwrap(), r#"{"data":null}"#);
        assert!(doc.primary().is_empty());

        let doc = Document {
            data: PrimaryData::Collection(vec![]),
            links: Some(TopLevelLinks::new().with_self("http://example.com/people")),
            ..doc
        };
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            r#"{"data":[],"links":{"self":"http://example.com/people"}}"#
        );
    }

    #[test]
    fn test_find_included() {
        let doc = Document {
            jsonapi: Some(JsonApiObject {
                version: "1.0".into(),
            }),
            data: PrimaryData::Single(Box::new(person("1"))),
            included: vec![person("9")],
            links: None,
            meta: None,
        };
        assert!(doc.find_included("people", "9").is_some());
        assert!(doc.find_included("people", "1").is_none());
        assert_eq!(doc.primary()[0].identifier(), ResourceIdentifier::new("people", "1"));
    }
}
