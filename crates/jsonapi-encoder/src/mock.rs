//! # Mock Schema & Testing Guide
//!
//! [`MockResource`] and [`MockSchema`] let you exercise the encoder without a
//! domain model. A mock resource carries its own type, id, attributes, self link
//! and relationships; one `MockSchema` per JSON:API type reads them back.
//!
//! ## When to use Mocks vs Real Schemas
//!
//! | Feature | MockSchema | Real Schema |
//! |---------|------------|-------------|
//! | **Setup** | One line per type | A domain type plus a schema impl |
//! | **Graph shape** | Rewire relationships at will, cycles included | Whatever the domain allows |
//! | **Error Injection** | Easy (`failing_attribute`) | Hard (requires broken state) |
//! | **Observability** | Records every attribute read | None |
//!
//! ## Example
//!
//! ```rust
//! use jsonapi_encoder::mock::{MockResource, MockSchema};
//! use jsonapi_encoder::{Encoder, Parameters, SchemaRegistry};
//!
//! let people = MockSchema::new("people");
//! let mut registry = SchemaRegistry::new();
//! people.clone().register(&mut registry);
//!
//! let dan = MockResource::new("people", "9")
//!     .with_attribute("first_name", "Dan")
//!     .with_attribute("last_name", "Gebhardt")
//!     .into_ref();
//! // A resource related to itself.
//! MockResource::relate(&dan, "friend", dan.clone());
//!
//! let params = Parameters::new().with_field_set("people", ["last_name", "friend"]);
//! let json = Encoder::new(registry)
//!     .encode(dan, None, None, Some(&params))
//!     .unwrap();
//!
//! assert_eq!(
//!     json,
//!     r#"{"data":{"type":"people","id":"9","attributes":{"last_name":"Gebhardt"},"relationships":{"friend":{"data":{"type":"people","id":"9"}}}}}"#
//! );
//! // `first_name` was filtered out before it was ever read.
//! assert_eq!(people.reads(), ["last_name"]);
//! ```

use crate::error::SchemaError;
use crate::registry::SchemaRegistry;
use crate::resource::ResourceRef;
use crate::schema::{Attributes, Relationship, Schema};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

/// An in-memory resource whose relationships can be rewired after creation.
#[derive(Debug, Default)]
pub struct MockResource {
    resource_type: String,
    id: String,
    attributes: Vec<(String, Value)>,
    self_url: Option<String>,
    meta: Option<Value>,
    relationships: Mutex<Vec<(String, Relationship)>>,
}

impl MockResource {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_self_url(mut self, url: impl Into<String>) -> Self {
        self.self_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn into_ref(self) -> ResourceRef {
        ResourceRef::new(self)
    }

    /// Sets (or replaces) relationship `name` on a mock resource.
    ///
    /// Takes the shared handle so relationships can point back at resources
    /// created earlier, including `resource` itself.
    ///
    /// # Panics
    /// If `resource` is not a `MockResource`.
    pub fn relate(resource: &ResourceRef, name: &str, relationship: impl Into<Relationship>) {
        let mock = resource
            .downcast_ref::<MockResource>()
            .unwrap_or_else(|| panic!("{} is not a MockResource", resource.type_name()));
        let mut relationships = mock
            .relationships
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let relationship = relationship.into();
        match relationships.iter().position(|(n, _)| n == name) {
            Some(index) => relationships[index].1 = relationship,
            None => relationships.push((name.to_string(), relationship)),
        }
    }
}

/// Schema for every [`MockResource`] of one JSON:API type.
///
/// Clones share the read log, so a test can keep one clone and hand another
/// to the registry.
#[derive(Debug, Clone)]
pub struct MockSchema {
    resource_type: String,
    failing_attributes: BTreeSet<String>,
    failing_relationships: bool,
    include_paths: Vec<String>,
    reads: Arc<Mutex<Vec<String>>>,
}

impl MockSchema {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            failing_attributes: BTreeSet::new(),
            failing_relationships: false,
            include_paths: Vec::new(),
            reads: Arc::default(),
        }
    }

    /// Reading attribute `name` fails with a [`SchemaError`].
    #[must_use]
    pub fn failing_attribute(mut self, name: impl Into<String>) -> Self {
        self.failing_attributes.insert(name.into());
        self
    }

    /// Reading relationships fails with a [`SchemaError`].
    #[must_use]
    pub fn failing_relationships(mut self) -> Self {
        self.failing_relationships = true;
        self
    }

    #[must_use]
    pub fn with_include_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.include_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Registers this schema for mock resources of its type.
    pub fn register(self, registry: &mut SchemaRegistry) {
        let resource_type = self.resource_type.clone();
        registry.register_when(
            move |resource| {
                resource
                    .downcast_ref::<MockResource>()
                    .is_some_and(|mock| mock.resource_type == resource_type)
            },
            move || self.clone(),
        );
    }

    /// Names of the attributes whose values were read, in order.
    pub fn reads(&self) -> Vec<String> {
        self.reads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn mock<'r>(&self, resource: &'r ResourceRef) -> Result<&'r MockResource, SchemaError> {
        resource
            .downcast_ref::<MockResource>()
            .ok_or_else(|| SchemaError::new(format!("{} is not a MockResource", resource.type_name())))
    }
}

impl Schema for MockSchema {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn id(&self, resource: &ResourceRef) -> Result<String, SchemaError> {
        Ok(self.mock(resource)?.id.clone())
    }

    fn attributes<'a>(&'a self, resource: &'a ResourceRef) -> Result<Attributes<'a>, SchemaError> {
        let mock = self.mock(resource)?;
        let mut attributes = Attributes::new();
        for (name, value) in &mock.attributes {
            let fails = self.failing_attributes.contains(name);
            attributes = attributes.insert_with(name.clone(), move || {
                self.reads
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(name.clone());
                if fails {
                    return Err(SchemaError::new(format!("attribute '{name}' is unreadable")));
                }
                Ok(value.clone())
            });
        }
        Ok(attributes)
    }

    fn relationships(
        &self,
        resource: &ResourceRef,
    ) -> Result<Vec<(String, Relationship)>, SchemaError> {
        if self.failing_relationships {
            return Err(SchemaError::new("relationships are unreadable"));
        }
        let mock = self.mock(resource)?;
        let relationships = mock
            .relationships
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(relationships.clone())
    }

    fn self_url(&self, resource: &ResourceRef) -> Result<Option<String>, SchemaError> {
        Ok(self.mock(resource)?.self_url.clone())
    }

    fn meta(&self, resource: &ResourceRef) -> Result<Option<Value>, SchemaError> {
        Ok(self.mock(resource)?.meta.clone())
    }

    fn include_paths(&self) -> Vec<String> {
        self.include_paths.clone()
    }
}
