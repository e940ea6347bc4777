//! # Schema Contract
//!
//! A schema tells the encoder how to read one domain type: its type name, id,
//! attributes, relationships and self link. There are two layers:
//!
//! - [`Schema`] is the dynamic contract the encoder calls. It receives the
//!   type-erased [`ResourceRef`].
//! - [`ResourceSchema`] is the typed convenience trait applications implement.
//!   It is wrapped in a [`SchemaAdapter`], which downcasts the resource and applies
//!   per-registration overrides (relationship flags, replaced data, removed
//!   relationships, default include paths).
//!
//! ```rust
//! use jsonapi_encoder::{Attributes, Relationship, ResourceSchema, SchemaError};
//!
//! struct Tag { id: u32, label: String }
//!
//! struct TagSchema;
//!
//! impl ResourceSchema for TagSchema {
//!     type Resource = Tag;
//!
//!     fn resource_type(&self) -> &str { "tags" }
//!
//!     fn id(&self, tag: &Tag) -> Result<String, SchemaError> { Ok(tag.id.to_string()) }
//!
//!     fn attributes<'a>(&'a self, tag: &'a Tag) -> Result<Attributes<'a>, SchemaError> {
//!         Ok(Attributes::new().insert("label", tag.label.as_str()))
//!     }
//! }
//!
//! // Registration-time tweaks live on the adapter, not on the schema.
//! let adapter = TagSchema.adapter().with_show_self_link("posts", true);
//! # let _ = adapter;
//! ```

use crate::error::SchemaError;
use crate::resource::ResourceRef;
use serde::Serialize;
use serde_json::Value;
use std::any::{type_name, Any};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

// =============================================================================
// ATTRIBUTES
// =============================================================================

type AttributeGetter<'a> = Box<dyn FnOnce() -> Result<Value, SchemaError> + 'a>;

/// One named attribute whose value is computed on demand.
pub struct Attribute<'a> {
    name: String,
    getter: AttributeGetter<'a>,
}

impl<'a> Attribute<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads the value. Only called for attributes that survive fieldset filtering.
    pub fn evaluate(self) -> Result<Value, SchemaError> {
        (self.getter)()
    }
}

/// Ordered list of attributes produced by a schema.
///
/// Values are not read until the encoder knows the attribute is visible, so an
/// expensive getter registered with [`Attributes::insert_with`] costs nothing when
/// the client's sparse fieldset leaves it out.
#[derive(Default)]
pub struct Attributes<'a> {
    entries: Vec<Attribute<'a>>,
}

impl<'a> Attributes<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribute with an already-known value.
    #[must_use]
    pub fn insert(self, name: impl Into<String>, value: impl Into<Value> + 'a) -> Self {
        self.insert_with(name, move || Ok(value.into()))
    }

    /// Adds an attribute whose value is computed only if it is emitted.
    #[must_use]
    pub fn insert_with<F>(mut self, name: impl Into<String>, getter: F) -> Self
    where
        F: FnOnce() -> Result<Value, SchemaError> + 'a,
    {
        self.entries.push(Attribute {
            name: name.into(),
            getter: Box::new(getter),
        });
        self
    }

    /// Adds an attribute rendered through its `Serialize` impl.
    #[must_use]
    pub fn insert_serialized<T>(self, name: impl Into<String>, value: &'a T) -> Self
    where
        T: Serialize + ?Sized,
    {
        let name = name.into();
        let context = format!("serializing attribute '{name}'");
        self.insert_with(name, move || {
            serde_json::to_value(value).map_err(|e| SchemaError::with_source(context, e))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Attribute::name)
    }
}

impl<'a> IntoIterator for Attributes<'a> {
    type Item = Attribute<'a>;
    type IntoIter = std::vec::IntoIter<Attribute<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// =============================================================================
// RELATIONSHIPS
// =============================================================================

/// What a relationship points at.
///
/// The variant decides the rendered `data`: an identifier object, an array of
/// identifiers (`[]` when empty), or `null`.
#[derive(Debug, Clone, Default)]
pub enum RelationshipData {
    #[default]
    Null,
    One(ResourceRef),
    Many(Vec<ResourceRef>),
}

impl RelationshipData {
    /// To-one relationship from an optional shared domain object.
    pub fn one<T: Any + Send + Sync>(related: Option<Arc<T>>) -> Self {
        related.map_or(RelationshipData::Null, |r| {
            RelationshipData::One(ResourceRef::from_arc(r))
        })
    }

    /// To-many relationship from shared domain objects, order preserved.
    pub fn many<T, I>(related: I) -> Self
    where
        T: Any + Send + Sync,
        I: IntoIterator<Item = Arc<T>>,
    {
        RelationshipData::Many(related.into_iter().map(ResourceRef::from_arc).collect())
    }

    pub fn resources(&self) -> &[ResourceRef] {
        match self {
            RelationshipData::Null => &[],
            RelationshipData::One(resource) => std::slice::from_ref(resource),
            RelationshipData::Many(resources) => resources,
        }
    }
}

impl From<ResourceRef> for RelationshipData {
    fn from(resource: ResourceRef) -> Self {
        RelationshipData::One(resource)
    }
}

impl From<Option<ResourceRef>> for RelationshipData {
    fn from(resource: Option<ResourceRef>) -> Self {
        resource.map_or(RelationshipData::Null, RelationshipData::One)
    }
}

impl From<Vec<ResourceRef>> for RelationshipData {
    fn from(resources: Vec<ResourceRef>) -> Self {
        RelationshipData::Many(resources)
    }
}

/// A named relationship as reported by a schema, with its display flags.
#[derive(Debug, Clone)]
pub struct Relationship {
    pub data: RelationshipData,
    /// Render `data` (identifier stubs). Default `true`.
    pub show_data: bool,
    /// Render the whole relationship as a bare URL string. Default `false`.
    pub show_as_reference: bool,
    /// Add `links.self` (`<owner>/relationships/<name>`). Default `false`.
    pub show_self_link: bool,
    /// Add `links.related` (`<owner>/<name>`). Default `false`.
    pub show_related_link: bool,
    pub meta: Option<Value>,
}

impl Relationship {
    pub fn new(data: impl Into<RelationshipData>) -> Self {
        Self {
            data: data.into(),
            show_data: true,
            show_as_reference: false,
            show_self_link: false,
            show_related_link: false,
            meta: None,
        }
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl From<RelationshipData> for Relationship {
    fn from(data: RelationshipData) -> Self {
        Relationship::new(data)
    }
}

impl From<ResourceRef> for Relationship {
    fn from(resource: ResourceRef) -> Self {
        Relationship::new(resource)
    }
}

impl From<Vec<ResourceRef>> for Relationship {
    fn from(resources: Vec<ResourceRef>) -> Self {
        Relationship::new(resources)
    }
}

/// Registration-time changes to a single relationship.
#[derive(Debug, Clone, Default)]
struct RelationshipOverride {
    data: Option<RelationshipData>,
    show_data: Option<bool>,
    show_as_reference: Option<bool>,
    show_self_link: Option<bool>,
    show_related_link: Option<bool>,
}

/// Generates the flag setters on [`Relationship`] and the per-name
/// `with_<flag>` setters on [`SchemaAdapter`] from one flag list.
macro_rules! relationship_flags {
    ($($flag:ident),* $(,)?) => {
        impl Relationship {
            $(
                #[must_use]
                pub fn $flag(mut self, value: bool) -> Self {
                    self.$flag = value;
                    self
                }
            )*
        }

        impl RelationshipOverride {
            fn apply(&self, relationship: &mut Relationship) {
                if let Some(data) = &self.data {
                    relationship.data = data.clone();
                }
                $(
                    if let Some(value) = self.$flag {
                        relationship.$flag = value;
                    }
                )*
            }
        }

        impl<S: ResourceSchema> SchemaAdapter<S> {
            $(
                paste::paste! {
                    #[must_use]
                    pub fn [<with_ $flag>](mut self, relationship: impl Into<String>, value: bool) -> Self {
                        self.overrides.entry(relationship.into()).or_default().$flag = Some(value);
                        self
                    }
                }
            )*
        }
    };
}

relationship_flags!(show_data, show_as_reference, show_self_link, show_related_link);

// =============================================================================
// THE DYNAMIC CONTRACT
// =============================================================================

/// The capability set the encoder needs from every registered type.
///
/// Implementations must be deterministic: the same resource must always yield
/// the same type, id, attribute order and relationship order.
pub trait Schema {
    /// Stable JSON:API type name (e.g. `"posts"`).
    fn resource_type(&self) -> &str;

    fn id(&self, resource: &ResourceRef) -> Result<String, SchemaError>;

    fn attributes<'a>(&'a self, resource: &'a ResourceRef) -> Result<Attributes<'a>, SchemaError>;

    fn relationships(
        &self,
        resource: &ResourceRef,
    ) -> Result<Vec<(String, Relationship)>, SchemaError>;

    /// URL of the resource, rendered as `links.self`. Relationship URLs are built from it.
    fn self_url(&self, resource: &ResourceRef) -> Result<Option<String>, SchemaError>;

    fn meta(&self, _resource: &ResourceRef) -> Result<Option<Value>, SchemaError> {
        Ok(None)
    }

    /// Include paths used when the request does not specify any.
    fn include_paths(&self) -> Vec<String> {
        Vec::new()
    }
}

// =============================================================================
// THE TYPED CONVENIENCE LAYER
// =============================================================================

/// Typed schema for one domain type.
///
/// # Provided Methods
/// Only `resource_type`, `id` and `attributes` are required. Relationships,
/// self link, meta and default include paths default to "none".
pub trait ResourceSchema: 'static {
    type Resource: Any + Send + Sync;

    fn resource_type(&self) -> &str;

    fn id(&self, resource: &Self::Resource) -> Result<String, SchemaError>;

    fn attributes<'a>(
        &'a self,
        resource: &'a Self::Resource,
    ) -> Result<Attributes<'a>, SchemaError>;

    fn relationships(
        &self,
        _resource: &Self::Resource,
    ) -> Result<Vec<(String, Relationship)>, SchemaError> {
        Ok(Vec::new())
    }

    fn self_url(&self, _resource: &Self::Resource) -> Option<String> {
        None
    }

    fn meta(&self, _resource: &Self::Resource) -> Option<Value> {
        None
    }

    fn include_paths(&self) -> Vec<String> {
        Vec::new()
    }

    /// Wraps the schema so it can be registered.
    fn adapter(self) -> SchemaAdapter<Self>
    where
        Self: Sized,
    {
        SchemaAdapter::new(self)
    }
}

/// Bridges a [`ResourceSchema`] to the dynamic [`Schema`] contract.
///
/// Besides downcasting, the adapter holds per-registration configuration. A
/// registry factory builds a fresh adapter for every encode call, so these
/// settings never leak between calls.
pub struct SchemaAdapter<S> {
    inner: S,
    overrides: BTreeMap<String, RelationshipOverride>,
    removed: BTreeSet<String>,
    include_paths: Option<Vec<String>>,
}

impl<S: ResourceSchema> SchemaAdapter<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            overrides: BTreeMap::new(),
            removed: BTreeSet::new(),
            include_paths: None,
        }
    }

    /// Replaces the data of a relationship, e.g. to force `null` or `[]`.
    #[must_use]
    pub fn with_data(
        mut self,
        relationship: impl Into<String>,
        data: impl Into<RelationshipData>,
    ) -> Self {
        self.overrides.entry(relationship.into()).or_default().data = Some(data.into());
        self
    }

    /// Drops a relationship from the output entirely.
    #[must_use]
    pub fn without_relationship(mut self, relationship: impl Into<String>) -> Self {
        self.removed.insert(relationship.into());
        self
    }

    /// Replaces the schema's default include paths. An empty list disables them.
    #[must_use]
    pub fn with_include_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.include_paths = Some(paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn downcast<'r>(&self, resource: &'r ResourceRef) -> Result<&'r S::Resource, SchemaError> {
        resource.downcast_ref::<S::Resource>().ok_or_else(|| {
            SchemaError::new(format!(
                "schema '{}' expects {}, got {}",
                self.inner.resource_type(),
                type_name::<S::Resource>(),
                resource.type_name()
            ))
        })
    }
}

impl<S: ResourceSchema> Schema for SchemaAdapter<S> {
    fn resource_type(&self) -> &str {
        self.inner.resource_type()
    }

    fn id(&self, resource: &ResourceRef) -> Result<String, SchemaError> {
        self.inner.id(self.downcast(resource)?)
    }

    fn attributes<'a>(&'a self, resource: &'a ResourceRef) -> Result<Attributes<'a>, SchemaError> {
        self.inner.attributes(self.downcast(resource)?)
    }

    fn relationships(
        &self,
        resource: &ResourceRef,
    ) -> Result<Vec<(String, Relationship)>, SchemaError> {
        let mut relationships = self.inner.relationships(self.downcast(resource)?)?;
        relationships.retain(|(name, _)| !self.removed.contains(name));
        for (name, relationship) in &mut relationships {
            if let Some(changes) = self.overrides.get(name) {
                changes.apply(relationship);
            }
        }
        Ok(relationships)
    }

    fn self_url(&self, resource: &ResourceRef) -> Result<Option<String>, SchemaError> {
        Ok(self.inner.self_url(self.downcast(resource)?))
    }

    fn meta(&self, resource: &ResourceRef) -> Result<Option<Value>, SchemaError> {
        Ok(self.inner.meta(self.downcast(resource)?))
    }

    fn include_paths(&self) -> Vec<String> {
        self.include_paths
            .clone()
            .unwrap_or_else(|| self.inner.include_paths())
    }
}
