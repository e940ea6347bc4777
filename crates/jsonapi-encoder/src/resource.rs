//! # Dynamic Resources
//!
//! Domain objects reach the encoder type-erased, as a [`ResourceRef`]. The
//! registry dispatches on the concrete Rust type captured at construction.

use std::any::{type_name, Any, TypeId};
use std::fmt::Debug;
use std::sync::Arc;

/// A shared, type-erased handle to a domain object.
///
/// Cloning is cheap (one `Arc` clone). The concrete [`TypeId`] is recorded when
/// the handle is built, so lookups never confuse the handle with its contents.
#[derive(Clone)]
pub struct ResourceRef {
    value: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl ResourceRef {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            value: value as Arc<dyn Any + Send + Sync>,
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// The [`TypeId`] of the wrapped domain object.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Full Rust type name of the wrapped domain object, used in error messages.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Returns `true` if both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &ResourceRef) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl Debug for ResourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ResourceRef").field(&self.type_name).finish()
    }
}

impl<T: Any + Send + Sync> From<Arc<T>> for ResourceRef {
    fn from(value: Arc<T>) -> Self {
        Self::from_arc(value)
    }
}

/// The root value handed to the encoder.
///
/// The variant decides the shape of the top-level `data` member: `null`, a single
/// resource object, or an array mirroring the input length.
#[derive(Debug, Clone)]
pub enum RootData {
    Null,
    Single(ResourceRef),
    Collection(Vec<ResourceRef>),
}

impl RootData {
    pub(crate) fn into_parts(self) -> (Vec<ResourceRef>, bool) {
        match self {
            RootData::Null => (Vec::new(), false),
            RootData::Single(resource) => (vec![resource], false),
            RootData::Collection(resources) => (resources, true),
        }
    }
}

impl From<ResourceRef> for RootData {
    fn from(resource: ResourceRef) -> Self {
        RootData::Single(resource)
    }
}

impl From<Option<ResourceRef>> for RootData {
    fn from(resource: Option<ResourceRef>) -> Self {
        resource.map_or(RootData::Null, RootData::Single)
    }
}

impl From<Vec<ResourceRef>> for RootData {
    fn from(resources: Vec<ResourceRef>) -> Self {
        RootData::Collection(resources)
    }
}
