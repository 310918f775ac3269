use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::core::{MapError, Result};
use crate::reflect::{Entity, Reflect, TypeInfo};

/// Entity types that can be created by name.
///
/// Lookups accept the fully qualified type name or, when it is unambiguous,
/// the short name (`Person` for `app::models::Person`).
#[derive(Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<&'static str, Arc<TypeInfo>>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Reflect>(&self) -> Result<()> {
        let info = TypeInfo::of::<T>();
        let full_name = info.ident().full_name();
        debug!(type_name = full_name, constructible = info.can_construct(), "registered entity type");
        self.types.write()?.insert(full_name, Arc::new(info));
        Ok(())
    }

    pub fn get(&self, type_name: &str) -> Result<Option<Arc<TypeInfo>>> {
        let types = self.types.read()?;
        if let Some(info) = types.get(type_name) {
            return Ok(Some(Arc::clone(info)));
        }

        let mut matches = types
            .values()
            .filter(|info| info.ident().short_name() == type_name);
        match (matches.next(), matches.next()) {
            (Some(info), None) => Ok(Some(Arc::clone(info))),
            (Some(_), Some(_)) => Err(MapError::ConstructionFailed {
                type_name: type_name.to_string(),
                details: "short name matches more than one registered type".to_string(),
            }),
            _ => Ok(None),
        }
    }

    /// Creates a default-initialized instance of a registered type.
    pub fn create_instance(&self, type_name: &str) -> Result<Box<dyn Entity>> {
        match self.get(type_name)? {
            Some(info) => info.construct(),
            None => Err(MapError::ConstructionFailed {
                type_name: type_name.to_string(),
                details: "type is not registered".to_string(),
            }),
        }
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.types.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
