//! # JSON:API Encoder
//!
//! This crate turns graphs of in-memory domain objects into documents that follow the
//! [JSON:API v1.0](https://jsonapi.org/format/1.0/) format. It owns the document shape,
//! relationship rendering, compound documents (`included`) and sparse fieldsets; your
//! code only describes how to read each domain type.
//!
//! ## Why Schemas + Type Erasure?
//!
//! Domain models rarely know anything about JSON:API, and they should not have to.
//!
//! ### Schemas
//!
//! - One schema per domain type reports its type name, id, attributes and relationships
//! - Display choices (links, reference mode, hidden data) are made per registration
//! - Attribute values are computed lazily, so sparse fieldsets skip the work
//!
//! ### Type Erasure
//!
//! - Domain objects travel as [`ResourceRef`], a shared handle that remembers its Rust type
//! - The [`SchemaRegistry`] dispatches on that type, so one encoder serves every model
//! - Object graphs may be cyclic: identity is the `(type, id)` pair, not the pointer
//!
//! **Further Reading**:
//! - [JSON:API v1.0](https://jsonapi.org/format/1.0/) - The document format
//! - [Compound Documents](https://jsonapi.org/format/1.0/#document-compound-documents) - How `included` works
//! - [Sparse Fieldsets](https://jsonapi.org/format/1.0/#fetching-sparse-fieldsets) - The `fields[type]` parameter
//!
//! ## Architecture Overview
//!
//! The crate separates concerns into three layers:
//!
//! 1. **Schema Layer** ([`ResourceSchema`], [`Schema`]) - How to read your domain types
//! 2. **Registry Layer** ([`SchemaRegistry`]) - Which schema serves which type
//! 3. **Encoding Layer** ([`Encoder`]) - Traversal, deduplication and rendering
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonapi_encoder::{
//!     Attributes, Encoder, Parameters, Relationship, RelationshipData, ResourceRef,
//!     ResourceSchema, SchemaError, SchemaRegistry,
//! };
//! use std::sync::Arc;
//!
//! // 1. Domain types know nothing about JSON:API
//! struct Person { id: u32, name: String }
//! struct Article { id: u32, title: String, author: Arc<Person> }
//!
//! // 2. One schema per type
//! #[derive(Default)]
//! struct PersonSchema;
//!
//! impl ResourceSchema for PersonSchema {
//!     type Resource = Person;
//!     fn resource_type(&self) -> &str { "people" }
//!     fn id(&self, p: &Person) -> Result<String, SchemaError> { Ok(p.id.to_string()) }
//!     fn attributes<'a>(&'a self, p: &'a Person) -> Result<Attributes<'a>, SchemaError> {
//!         Ok(Attributes::new().insert("name", p.name.as_str()))
//!     }
//! }
//!
//! #[derive(Default)]
//! struct ArticleSchema;
//!
//! impl ResourceSchema for ArticleSchema {
//!     type Resource = Article;
//!     fn resource_type(&self) -> &str { "articles" }
//!     fn id(&self, a: &Article) -> Result<String, SchemaError> { Ok(a.id.to_string()) }
//!     fn attributes<'a>(&'a self, a: &'a Article) -> Result<Attributes<'a>, SchemaError> {
//!         Ok(Attributes::new().insert("title", a.title.as_str()))
//!     }
//!     fn relationships(&self, a: &Article) -> Result<Vec<(String, Relationship)>, SchemaError> {
//!         Ok(vec![("author".into(), RelationshipData::one(Some(a.author.clone())).into())])
//!     }
//! }
//!
//! // 3. Register and encode
//! let mut registry = SchemaRegistry::new();
//! registry
//!     .register_default::<PersonSchema>()
//!     .register_default::<ArticleSchema>();
//! let encoder = Encoder::new(registry);
//!
//! let author = Arc::new(Person { id: 9, name: "Dan".into() });
//! let article = ResourceRef::new(Article { id: 1, title: "JSON:API".into(), author });
//!
//! let params = Parameters::new().with_include_paths(["author"]);
//! let json = encoder.encode(article, None, None, Some(&params)).unwrap();
//! assert_eq!(
//!     json,
//!     concat!(
//!         r#"{"data":{"type":"articles","id":"1","attributes":{"title":"JSON:API"},"#,
//!         r#""relationships":{"author":{"data":{"type":"people","id":"9"}}}},"#,
//!         r#""included":[{"type":"people","id":"9","attributes":{"name":"Dan"}}]}"#
//!     )
//! );
//! ```
//!
//! ## Concurrency Model
//!
//! - An [`Encoder`] is immutable after construction and is `Send + Sync`
//! - Every encode call builds its own traversal state and schema instances
//! - Share one encoder behind an `Arc` between threads or Tokio tasks
//!
//! ## Error Handling
//!
//! Failures are fatal and surface as [`EncoderError`]; no partial document is
//! returned. The one exception is an include path that matches nothing: it is logged
//! and reported in [`EncodedDocument::warnings`].
//!
//! ## Testing
//!
//! The [`mock`] module provides a `MockResource`/`MockSchema` pair for building
//! arbitrary resource graphs (cycles included) and observing which attributes the
//! encoder actually read.

pub mod document;
pub mod encoder;
pub mod error;
pub mod identifier;
pub mod mock;
pub mod options;
pub mod parameters;
pub mod registry;
pub mod resource;
pub mod schema;
pub mod tracing;

// Re-export core types for convenience
pub use document::{
    Document, IdentifierData, JsonApiObject, PrimaryData, RelationshipLinks, RelationshipObject,
    Relationships, ResourceLinks, ResourceObject, TopLevelLinks,
};
pub use encoder::{EncodedDocument, Encoder};
pub use error::{EncoderError, Result, SchemaError};
pub use identifier::ResourceIdentifier;
pub use options::EncoderOptions;
pub use parameters::Parameters;
pub use registry::{SchemaRegistry, SchemaResolver};
pub use resource::{ResourceRef, RootData};
pub use schema::{
    Attribute, Attributes, Relationship, RelationshipData, ResourceSchema, Schema, SchemaAdapter,
};
