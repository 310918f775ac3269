//! Get/set/construct entry points used by the mapping layer.

pub mod cached;
pub mod direct;

pub use cached::CachedReflectionStrategy;
pub use direct::DirectReflectionStrategy;

use tracing::{debug, warn};

use crate::config::{MapperConfig, ReadOnlyPolicy};
use crate::core::{MapError, Result, Value};
use crate::reflect::{Entity, FieldValue, MemberHandle, Reflect, create_instance};

/// Reads and writes entity members by name.
pub trait ReflectionStrategy: Send + Sync {
    /// Writes `value` into the member `field` of `entity`.
    ///
    /// `Value::Null` is replaced by the member's default. Any failure is
    /// reported as [`MapError::DataMapping`].
    fn set_field_value(&self, entity: &mut dyn Entity, field: &str, value: Value) -> Result<()>;

    /// Reads the member `field` of `entity`.
    fn get_field_value(&self, entity: &dyn Entity, field: &str) -> Result<Value>;

    /// Creates a default-initialized instance of a registered type.
    fn create_instance(&self, type_name: &str) -> Result<Box<dyn Entity>>;
}

/// Typed conveniences on top of [`ReflectionStrategy`].
pub trait ReflectionStrategyExt: ReflectionStrategy {
    fn get_value_as<V: FieldValue>(&self, entity: &dyn Entity, field: &str) -> Result<V> {
        V::from_value(self.get_field_value(entity, field)?)
    }

    /// Writes several members, stopping at the first failure.
    fn set_values<I, K>(&self, entity: &mut dyn Entity, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        for (field, value) in values {
            self.set_field_value(entity, field.as_ref(), value)?;
        }
        Ok(())
    }

    fn create_instance_of<T: Reflect>(&self) -> Result<T> {
        create_instance::<T>()
    }
}

impl<S: ReflectionStrategy + ?Sized> ReflectionStrategyExt for S {}

pub(crate) fn write_member(
    handle: &MemberHandle,
    entity: &mut dyn Entity,
    field: &str,
    value: Value,
    config: &MapperConfig,
) -> Result<()> {
    let value = if value.is_null() && config.coerce_nulls {
        handle.default_value()?
    } else {
        value
    };

    if handle.write(entity.as_any_mut(), value)? {
        return Ok(());
    }

    let type_name = entity.type_ident().short_name();
    match config.read_only_policy {
        ReadOnlyPolicy::Skip => {
            debug!(type_name, field, "skipped write to read-only property");
            Ok(())
        }
        ReadOnlyPolicy::Reject => Err(MapError::ReadOnly {
            type_name: type_name.to_string(),
            field: field.to_string(),
        }),
    }
}

pub(crate) fn read_member(handle: &MemberHandle, entity: &dyn Entity, field: &str) -> Result<Value> {
    handle
        .read(entity.as_any())?
        .ok_or_else(|| MapError::Unreadable {
            type_name: entity.type_ident().short_name().to_string(),
            field: field.to_string(),
        })
}

pub(crate) fn wrap_write_error(field: &str, err: MapError) -> MapError {
    warn!(field, error = %err, "failed to load entity field");
    MapError::data_mapping(field, err)
}
