use std::sync::Arc;

use super::{ReflectionStrategy, read_member, wrap_write_error, write_member};
use crate::cache::TypeRegistry;
use crate::config::MapperConfig;
use crate::core::{MapError, Result, Value};
use crate::reflect::{Entity, MemberHandle};

/// Walks the member table on every call.
///
/// Same contract as [`super::CachedReflectionStrategy`] without the cache.
/// Useful for one-off mappings and for measuring what the cache saves.
#[derive(Clone, Default)]
pub struct DirectReflectionStrategy {
    registry: Arc<TypeRegistry>,
    config: MapperConfig,
}

impl DirectReflectionStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: MapperConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_registry(mut self, registry: Arc<TypeRegistry>) -> Self {
        self.registry = registry;
        self
    }

    fn resolve(entity: &dyn Entity, field: &str) -> Result<MemberHandle> {
        let info = entity.introspect();
        info.find_member(field)
            .cloned()
            .ok_or_else(|| MapError::MemberNotFound {
                type_name: info.ident().full_name().to_string(),
                member: field.to_string(),
            })
    }

    fn try_set(&self, entity: &mut dyn Entity, field: &str, value: Value) -> Result<()> {
        let handle = Self::resolve(&*entity, field)?;
        write_member(&handle, entity, field, value, &self.config)
    }
}

impl ReflectionStrategy for DirectReflectionStrategy {
    fn set_field_value(&self, entity: &mut dyn Entity, field: &str, value: Value) -> Result<()> {
        self.try_set(entity, field, value)
            .map_err(|err| wrap_write_error(field, err))
    }

    fn get_field_value(&self, entity: &dyn Entity, field: &str) -> Result<Value> {
        let handle = Self::resolve(entity, field)?;
        read_member(&handle, entity, field)
    }

    fn create_instance(&self, type_name: &str) -> Result<Box<dyn Entity>> {
        self.registry.create_instance(type_name)
    }
}
