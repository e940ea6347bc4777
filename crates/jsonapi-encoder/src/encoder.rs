//! # Encoder
//!
//! This module defines the [`Encoder`], which turns a graph of domain objects
//! into a JSON:API [`Document`].
//!
//! ## Traversal
//!
//! 1. The root is normalized into a list of primary resources. Its arity decides
//!    whether `data` renders as `null`, an object or an array. Duplicates in the
//!    root are encoded every time they appear.
//! 2. Primary resources are encoded first and their identifiers seed the
//!    visited set, so none of them can show up again in `included`.
//! 3. Relationships are followed breadth-first along the include-path tree.
//!    A related resource whose identifier was already visited is not encoded
//!    again and its relationships are not descended into. This is what makes
//!    cyclic graphs terminate.
//! 4. Independently of inclusion, every encoded resource renders identifier
//!    stubs for its relationships, per the relationship's display flags.
//!
//! All of this state lives in a per-call `Traversal`; the encoder itself is
//! immutable and may be shared between threads.

use crate::document::{
    Document, IdentifierData, JsonApiObject, PrimaryData, RelationshipLinks, RelationshipObject,
    Relationships, ResourceLinks, ResourceObject, TopLevelLinks,
};
use crate::error::{EncoderError, Result, SchemaError};
use crate::identifier::ResourceIdentifier;
use crate::options::EncoderOptions;
use crate::parameters::{IncludeTree, Parameters};
use crate::registry::{SchemaRegistry, SchemaResolver};
use crate::resource::{ResourceRef, RootData};
use crate::schema::{Relationship, RelationshipData, Schema};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Converts domain objects into JSON:API documents.
///
/// ```rust
/// use jsonapi_encoder::{Attributes, Encoder, ResourceRef, ResourceSchema, SchemaError, SchemaRegistry};
///
/// struct Tag { id: u32, label: &'static str }
///
/// #[derive(Default)]
/// struct TagSchema;
///
/// impl ResourceSchema for TagSchema {
///     type Resource = Tag;
///     fn resource_type(&self) -> &str { "tags" }
///     fn id(&self, tag: &Tag) -> Result<String, SchemaError> { Ok(tag.id.to_string()) }
///     fn attributes<'a>(&'a self, tag: &'a Tag) -> Result<Attributes<'a>, SchemaError> {
///         Ok(Attributes::new().insert("label", tag.label))
///     }
/// }
///
/// let mut registry = SchemaRegistry::new();
/// registry.register_default::<TagSchema>();
/// let encoder = Encoder::new(registry);
///
/// let json = encoder.encode_data(ResourceRef::new(Tag { id: 1, label: "rust" })).unwrap();
/// assert_eq!(json, r#"{"data":{"type":"tags","id":"1","attributes":{"label":"rust"}}}"#);
/// ```
pub struct Encoder {
    registry: Arc<SchemaRegistry>,
    options: EncoderOptions,
}

/// Result of [`Encoder::encode_document`]: the document plus non-fatal findings.
#[derive(Debug)]
pub struct EncodedDocument {
    pub document: Document,
    /// Only [`EncoderError::InvalidIncludePath`] ends up here.
    pub warnings: Vec<EncoderError>,
}

impl Encoder {
    pub fn new(registry: SchemaRegistry) -> Self {
        Self::with_options(registry, EncoderOptions::default())
    }

    pub fn with_options(registry: SchemaRegistry, options: EncoderOptions) -> Self {
        Self::from_shared(Arc::new(registry), options)
    }

    /// Builds an encoder over a registry shared with other encoders.
    pub fn from_shared(registry: Arc<SchemaRegistry>, options: EncoderOptions) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> &EncoderOptions {
        &self.options
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Encodes `data` with no links, meta or parameters.
    pub fn encode_data(&self, data: impl Into<RootData>) -> Result<String> {
        self.encode(data, None, None, None)
    }

    /// Encodes `data` and renders the document as JSON text.
    pub fn encode(
        &self,
        data: impl Into<RootData>,
        links: Option<TopLevelLinks>,
        meta: Option<Value>,
        parameters: Option<&Parameters>,
    ) -> Result<String> {
        let encoded = self.encode_document(data, links, meta, parameters)?;
        self.render(&encoded.document)
    }

    /// Renders a document according to [`EncoderOptions::pretty`].
    pub fn render(&self, document: &Document) -> Result<String> {
        let text = if self.options.pretty {
            serde_json::to_string_pretty(document)?
        } else {
            serde_json::to_string(document)?
        };
        Ok(text)
    }

    /// Encodes `data` into a document tree.
    ///
    /// # Errors
    /// Any fatal [`EncoderError`]; no partial document is returned. Include
    /// paths that matched nothing are reported in [`EncodedDocument::warnings`].
    #[instrument(level = "debug", skip_all)]
    pub fn encode_document(
        &self,
        data: impl Into<RootData>,
        links: Option<TopLevelLinks>,
        meta: Option<Value>,
        parameters: Option<&Parameters>,
    ) -> Result<EncodedDocument> {
        let defaults = Parameters::default();
        let parameters = parameters.unwrap_or(&defaults);
        let (primary, plural) = data.into().into_parts();

        let mut traversal = Traversal::new(self.registry.resolver(), parameters, &self.options);
        let mut resources = match traversal.run(&primary) {
            Ok(resources) => resources,
            Err(e) => {
                warn!(error = %e, "Encoding failed");
                return Err(e);
            }
        };

        let warnings = traversal.unmatched_include_paths();
        for warning in &warnings {
            warn!(%warning, "Include path ignored");
        }

        let data = if plural {
            PrimaryData::Collection(resources)
        } else {
            resources
                .pop()
                .map_or(PrimaryData::Null, |resource| PrimaryData::Single(Box::new(resource)))
        };

        let document = Document {
            jsonapi: self
                .options
                .json_api_version
                .clone()
                .map(|version| JsonApiObject { version }),
            data,
            included: traversal.included,
            links: links.filter(|l| !l.is_empty()),
            meta,
        };

        info!(
            primary = document.primary().len(),
            included = document.included.len(),
            warnings = warnings.len(),
            "Encoded"
        );
        Ok(EncodedDocument { document, warnings })
    }
}

// =============================================================================
// PER-CALL TRAVERSAL STATE
// =============================================================================

/// A resource already encoded, with the relationship data still to be followed.
struct EncodedResource {
    object: ResourceObject,
    related: Vec<(String, RelationshipData)>,
    schema: Rc<dyn Schema>,
}

/// Relationships of one encoded resource waiting to be matched against `node`.
struct Pending {
    related: Vec<(String, RelationshipData)>,
    tree: usize,
    node: usize,
}

struct Traversal<'a> {
    resolver: SchemaResolver<'a>,
    parameters: &'a Parameters,
    options: &'a EncoderOptions,
    trees: Vec<IncludeTree>,
    requested: Option<usize>,
    default_trees: HashMap<String, usize>,
    visited: HashSet<ResourceIdentifier>,
    included: Vec<ResourceObject>,
    queue: VecDeque<Pending>,
    reached: HashSet<(usize, usize)>,
    matched: HashSet<(usize, usize)>,
}

fn schema_failure(resource_type: &str) -> impl FnOnce(SchemaError) -> EncoderError + '_ {
    move |source| EncoderError::SchemaEvaluation {
        resource_type: resource_type.to_string(),
        source,
    }
}

/// Attribute and relationship names must be unique within a resource object.
fn duplicate_field(resource_type: &str, kind: &str, name: &str) -> EncoderError {
    EncoderError::SchemaEvaluation {
        resource_type: resource_type.to_string(),
        source: SchemaError::new(format!("duplicate {kind} '{name}'")),
    }
}

impl<'a> Traversal<'a> {
    fn new(
        resolver: SchemaResolver<'a>,
        parameters: &'a Parameters,
        options: &'a EncoderOptions,
    ) -> Self {
        let mut trees = Vec::new();
        let requested = parameters.include_paths().map(|paths| {
            trees.push(IncludeTree::parse(paths));
            0
        });
        Self {
            resolver,
            parameters,
            options,
            trees,
            requested,
            default_trees: HashMap::new(),
            visited: HashSet::new(),
            included: Vec::new(),
            queue: VecDeque::new(),
            reached: HashSet::new(),
            matched: HashSet::new(),
        }
    }

    /// Encodes the primary resources, then fills `included`.
    fn run(&mut self, primary: &[ResourceRef]) -> Result<Vec<ResourceObject>> {
        let mut data = Vec::with_capacity(primary.len());
        for resource in primary {
            let schema = self.resolver.resolve(resource)?;
            let id = schema
                .id(resource)
                .map_err(schema_failure(schema.resource_type()))?;
            let encoded = self.encode_resource(schema, resource, id)?;
            self.visited.insert(encoded.object.identifier());

            let tree = self.tree_for(encoded.schema.as_ref());
            self.enqueue(encoded.related, tree, IncludeTree::ROOT);
            data.push(encoded.object);
        }
        self.include_related()?;
        Ok(data)
    }

    fn include_related(&mut self) -> Result<()> {
        while let Some(Pending {
            related,
            tree,
            node,
        }) = self.queue.pop_front()
        {
            for (name, data) in related {
                let Some(child) = self.trees[tree].child(node, &name) else {
                    continue;
                };
                self.matched.insert((tree, child));

                for target in data.resources() {
                    let schema = self.resolver.resolve(target)?;
                    let identifier = identify(schema.as_ref(), target)?;
                    if self.visited.contains(&identifier) {
                        debug!(%identifier, path = self.trees[tree].path(child), "Already encoded");
                        continue;
                    }
                    let encoded = self.encode_resource(schema, target, identifier.id.clone())?;
                    self.visited.insert(identifier);
                    self.enqueue(encoded.related, tree, child);
                    self.included.push(encoded.object);
                }
            }
        }
        Ok(())
    }

    fn enqueue(&mut self, related: Vec<(String, RelationshipData)>, tree: usize, node: usize) {
        if self.trees[tree].has_children(node) {
            self.reached.insert((tree, node));
            self.queue.push_back(Pending {
                related,
                tree,
                node,
            });
        }
    }

    /// The requested include tree, or the schema's default one.
    fn tree_for(&mut self, schema: &dyn Schema) -> usize {
        if let Some(requested) = self.requested {
            return requested;
        }
        if let Some(&index) = self.default_trees.get(schema.resource_type()) {
            return index;
        }
        self.trees.push(IncludeTree::parse(schema.include_paths()));
        let index = self.trees.len() - 1;
        self.default_trees
            .insert(schema.resource_type().to_string(), index);
        index
    }

    fn encode_resource(
        &mut self,
        schema: Rc<dyn Schema>,
        resource: &ResourceRef,
        id: String,
    ) -> Result<EncodedResource> {
        let resource_type = schema.resource_type().to_string();
        debug!(%resource_type, %id, "Encoding resource");

        let mut attributes = Map::new();
        let candidates = schema
            .attributes(resource)
            .map_err(schema_failure(&resource_type))?;
        let mut seen = HashSet::new();
        for attribute in candidates {
            if !seen.insert(attribute.name().to_string()) {
                return Err(duplicate_field(&resource_type, "attribute", attribute.name()));
            }
            if !self.parameters.is_visible(&resource_type, attribute.name()) {
                continue;
            }
            let name = attribute.name().to_string();
            let value = attribute
                .evaluate()
                .map_err(schema_failure(&resource_type))?;
            attributes.insert(name, value);
        }

        let self_link = schema
            .self_url(resource)
            .map_err(schema_failure(&resource_type))?
            .map(|url| self.options.url(&url));

        let mut relationships = Relationships::new();
        let mut related = Vec::new();
        let declared = schema
            .relationships(resource)
            .map_err(schema_failure(&resource_type))?;
        let mut seen = HashSet::new();
        for (name, relationship) in declared {
            if !seen.insert(name.clone()) {
                return Err(duplicate_field(&resource_type, "relationship", &name));
            }
            if !self.parameters.is_visible(&resource_type, &name) {
                continue;
            }
            if let Some(rendered) = self.render_relationship(
                &resource_type,
                &name,
                &relationship,
                self_link.as_deref(),
            )? {
                relationships.push(name.clone(), rendered);
            }
            related.push((name, relationship.data));
        }

        let meta = schema
            .meta(resource)
            .map_err(schema_failure(&resource_type))?;

        let object = ResourceObject {
            resource_type,
            id,
            attributes,
            relationships,
            links: self_link.map(|self_link| ResourceLinks { self_link }),
            meta,
        };
        Ok(EncodedResource {
            object,
            related,
            schema,
        })
    }

    fn render_relationship(
        &mut self,
        owner_type: &str,
        name: &str,
        relationship: &Relationship,
        owner_link: Option<&str>,
    ) -> Result<Option<RelationshipObject>> {
        let base = || {
            owner_link.ok_or_else(|| EncoderError::MissingSelfLink {
                resource_type: owner_type.to_string(),
                relationship: name.to_string(),
            })
        };

        if relationship.show_as_reference {
            return Ok(Some(RelationshipObject::Reference(format!("{}/{name}", base()?))));
        }

        let links = if relationship.show_self_link || relationship.show_related_link {
            let base = base()?;
            Some(RelationshipLinks {
                self_link: relationship
                    .show_self_link
                    .then(|| format!("{base}/relationships/{name}")),
                related: relationship
                    .show_related_link
                    .then(|| format!("{base}/{name}")),
            })
        } else {
            None
        };

        let data = if relationship.show_data {
            Some(self.identifiers(&relationship.data)?)
        } else {
            None
        };

        if links.is_none() && data.is_none() && relationship.meta.is_none() {
            return Ok(None);
        }
        Ok(Some(RelationshipObject::Object {
            links,
            data,
            meta: relationship.meta.clone(),
        }))
    }

    fn identifiers(&mut self, data: &RelationshipData) -> Result<IdentifierData> {
        match data {
            RelationshipData::Null => Ok(IdentifierData::Null),
            RelationshipData::One(resource) => Ok(IdentifierData::One(self.identify(resource)?)),
            RelationshipData::Many(resources) => resources
                .iter()
                .map(|resource| self.identify(resource))
                .collect::<Result<Vec<_>>>()
                .map(IdentifierData::Many),
        }
    }

    fn identify(&mut self, resource: &ResourceRef) -> Result<ResourceIdentifier> {
        let schema = self.resolver.resolve(resource)?;
        identify(schema.as_ref(), resource)
    }

    /// Include paths whose parent was reached but which never matched a relationship.
    fn unmatched_include_paths(&self) -> Vec<EncoderError> {
        let Some(tree_index) = self.requested else {
            return Vec::new();
        };
        let tree = &self.trees[tree_index];
        tree.nodes()
            .filter(|&node| {
                let parent = tree.parent(node).unwrap_or(IncludeTree::ROOT);
                self.reached.contains(&(tree_index, parent))
                    && !self.matched.contains(&(tree_index, node))
            })
            .map(|node| EncoderError::InvalidIncludePath {
                path: tree.path(node).to_string(),
            })
            .collect()
    }
}

fn identify(schema: &dyn Schema, resource: &ResourceRef) -> Result<ResourceIdentifier> {
    let id = schema
        .id(resource)
        .map_err(schema_failure(schema.resource_type()))?;
    Ok(ResourceIdentifier::new(schema.resource_type(), id))
}
