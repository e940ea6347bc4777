//! # Schema Registry
//!
//! Maps domain types to schema factories. The registry itself is immutable once
//! built and can be shared across threads; every encode call asks it for a fresh
//! [`SchemaResolver`], which instantiates at most one schema per registration and
//! memoizes it for the rest of that call.

use crate::error::{EncoderError, Result};
use crate::resource::ResourceRef;
use crate::schema::{ResourceSchema, Schema, SchemaAdapter};
use std::any::TypeId;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;

type SchemaFactory = Arc<dyn Fn() -> Box<dyn Schema> + Send + Sync>;
type TypeTest = Box<dyn Fn(&ResourceRef) -> bool + Send + Sync>;

/// Explicit registrations of schema factories.
///
/// Resolution order: an exact Rust type registration wins; otherwise type tests
/// are tried in registration order.
#[derive(Default)]
pub struct SchemaRegistry {
    factories: Vec<SchemaFactory>,
    by_type: HashMap<TypeId, usize>,
    tests: Vec<(TypeTest, usize)>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a typed schema for its `Resource` type.
    ///
    /// The factory runs once per encode call, the first time a resource of the
    /// type is met. Registering the same type twice replaces the earlier entry.
    pub fn register<S, F>(&mut self, factory: F) -> &mut Self
    where
        S: ResourceSchema,
        F: Fn() -> SchemaAdapter<S> + Send + Sync + 'static,
    {
        let index = self.push(Arc::new(move || Box::new(factory()) as Box<dyn Schema>));
        self.by_type.insert(TypeId::of::<S::Resource>(), index);
        self
    }

    /// Registers a `Default`-constructible typed schema with no overrides.
    pub fn register_default<S>(&mut self) -> &mut Self
    where
        S: ResourceSchema + Default,
    {
        self.register(|| SchemaAdapter::new(S::default()))
    }

    /// Registers a schema for every resource accepted by `test`.
    ///
    /// Useful when one Rust type carries several JSON:API types, or when the
    /// schema implements [`Schema`] directly.
    pub fn register_when<P, F, T>(&mut self, test: P, factory: F) -> &mut Self
    where
        P: Fn(&ResourceRef) -> bool + Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
        T: Schema + 'static,
    {
        let index = self.push(Arc::new(move || Box::new(factory()) as Box<dyn Schema>));
        self.tests.push((Box::new(test), index));
        self
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Per-call resolver with its own schema cache.
    pub fn resolver(&self) -> SchemaResolver<'_> {
        SchemaResolver {
            registry: self,
            cache: HashMap::new(),
        }
    }

    fn push(&mut self, factory: SchemaFactory) -> usize {
        self.factories.push(factory);
        self.factories.len() - 1
    }

    fn lookup(&self, resource: &ResourceRef) -> Option<usize> {
        self.by_type.get(&resource.type_id()).copied().or_else(|| {
            self.tests
                .iter()
                .find(|(test, _)| test(resource))
                .map(|(_, index)| *index)
        })
    }
}

/// Resolves resources to schemas for the duration of one encode call.
pub struct SchemaResolver<'r> {
    registry: &'r SchemaRegistry,
    cache: HashMap<usize, Rc<dyn Schema>>,
}

impl SchemaResolver<'_> {
    /// Returns the schema for `resource`, instantiating it on first use.
    ///
    /// # Errors
    /// [`EncoderError::UnmappedType`] if nothing is registered for the resource.
    pub fn resolve(&mut self, resource: &ResourceRef) -> Result<Rc<dyn Schema>> {
        let index = self
            .registry
            .lookup(resource)
            .ok_or(EncoderError::UnmappedType {
                type_name: resource.type_name(),
            })?;

        if let Some(schema) = self.cache.get(&index) {
            return Ok(Rc::clone(schema));
        }

        let schema: Rc<dyn Schema> = Rc::from((self.registry.factories[index])());
        debug!(
            resource_type = schema.resource_type(),
            rust_type = resource.type_name(),
            "Schema instantiated"
        );
        self.cache.insert(index, Rc::clone(&schema));
        Ok(schema)
    }

    /// Number of schemas instantiated so far in this call.
    pub fn instantiated(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use crate::schema::Attributes;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Planet(&'static str);
    struct Moon(&'static str);

    #[derive(Default)]
    struct PlanetSchema;

    impl ResourceSchema for PlanetSchema {
        type Resource = Planet;

        fn resource_type(&self) -> &str {
            "planets"
        }

        fn id(&self, planet: &Planet) -> Result<String, SchemaError> {
            Ok(planet.0.to_string())
        }

        fn attributes<'a>(&'a self, _: &'a Planet) -> Result<Attributes<'a>, SchemaError> {
            Ok(Attributes::new())
        }
    }

    #[test]
    fn test_resolves_registered_type() {
        let mut registry = SchemaRegistry::new();
        registry.register_default::<PlanetSchema>();

        let mut resolver = registry.resolver();
        let schema = resolver.resolve(&ResourceRef::new(Planet("earth"))).unwrap();
        assert_eq!(schema.resource_type(), "planets");
    }

    #[test]
    fn test_unmapped_type_is_an_error() {
        let registry = SchemaRegistry::new();
        let mut resolver = registry.resolver();
        let err = resolver.resolve(&ResourceRef::new(Moon("luna"))).err().unwrap();
        assert!(matches!(err, EncoderError::UnmappedType { type_name } if type_name.ends_with("Moon")));
    }

    #[test]
    fn test_one_instance_per_call() {
        let created = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&created);

        let mut registry = SchemaRegistry::new();
        registry.register(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            PlanetSchema.adapter()
        });

        let mut first = registry.resolver();
        for name in ["mercury", "venus", "earth"] {
            first.resolve(&ResourceRef::new(Planet(name))).unwrap();
        }
        assert_eq!(first.instantiated(), 1);
        assert_eq!(created.load(Ordering::SeqCst), 1);

        // A new call gets a new instance.
        let mut second = registry.resolver();
        second.resolve(&ResourceRef::new(Planet("mars"))).unwrap();
        assert_eq!(created.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_type_test_registration() {
        let mut registry = SchemaRegistry::new();
        registry.register_when(
            |resource| resource.is::<Moon>(),
            || {
                SchemaAdapter::new(PlanetSchema)
                    .with_include_paths(["orbit"])
            },
        );
        assert_eq!(registry.len(), 1);

        let mut resolver = registry.resolver();
        let schema = resolver.resolve(&ResourceRef::new(Moon("phobos"))).unwrap();
        assert_eq!(schema.include_paths(), ["orbit"]);
    }
}
