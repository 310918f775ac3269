use std::sync::Arc;

use super::{ReflectionStrategy, read_member, wrap_write_error, write_member};
use crate::cache::{MemberCache, TypeRegistry};
use crate::config::MapperConfig;
use crate::core::{Result, Value};
use crate::reflect::{Entity, MemberHandle, Reflect};

/// Resolves each (type, member) pair once and reuses the handle.
///
/// # Examples
///
/// ```
/// use rowmap::{CachedReflectionStrategy, ReflectionStrategy, Value, reflect_entity};
///
/// #[derive(Default)]
/// struct Person {
///     age: i32,
/// }
///
/// reflect_entity!(Person { age as "Age" });
///
/// # fn main() -> rowmap::Result<()> {
/// let strategy = CachedReflectionStrategy::new();
/// let mut person = Person::default();
///
/// strategy.set_field_value(&mut person, "Age", Value::Null)?;
/// assert_eq!(person.age, 0);
///
/// strategy.set_field_value(&mut person, "Age", Value::Integer(42))?;
/// assert_eq!(strategy.get_field_value(&person, "Age")?, Value::Integer(42));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CachedReflectionStrategy {
    cache: Arc<MemberCache>,
    registry: Arc<TypeRegistry>,
    config: MapperConfig,
}

impl CachedReflectionStrategy {
    /// Strategy with its own, empty cache.
    pub fn new() -> Self {
        Self::with_cache(Arc::new(MemberCache::new()))
    }

    /// Strategy backed by the process-wide cache.
    pub fn global() -> Self {
        Self::with_cache(Arc::clone(MemberCache::global()))
    }

    pub fn with_cache(cache: Arc<MemberCache>) -> Self {
        Self {
            cache,
            registry: Arc::new(TypeRegistry::new()),
            config: MapperConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MapperConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_registry(mut self, registry: Arc<TypeRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Makes `T` available to [`ReflectionStrategy::create_instance`].
    pub fn register<T: Reflect>(&self) -> Result<()> {
        self.registry.register::<T>()
    }

    pub fn cache(&self) -> &Arc<MemberCache> {
        &self.cache
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn resolve(&self, entity: &dyn Entity, field: &str) -> Result<Arc<MemberHandle>> {
        self.cache.resolve_entity(entity, field)
    }

    fn try_set(&self, entity: &mut dyn Entity, field: &str, value: Value) -> Result<()> {
        let handle = self.resolve(&*entity, field)?;
        write_member(&handle, entity, field, value, &self.config)
    }
}

impl Default for CachedReflectionStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ReflectionStrategy for CachedReflectionStrategy {
    fn set_field_value(&self, entity: &mut dyn Entity, field: &str, value: Value) -> Result<()> {
        self.try_set(entity, field, value)
            .map_err(|err| wrap_write_error(field, err))
    }

    fn get_field_value(&self, entity: &dyn Entity, field: &str) -> Result<Value> {
        let handle = self.resolve(entity, field)?;
        read_member(&handle, entity, field)
    }

    fn create_instance(&self, type_name: &str) -> Result<Box<dyn Entity>> {
        self.registry.create_instance(type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MapError;
    use crate::reflect::TypeBuilder;
    use crate::strategy::ReflectionStrategyExt;

    #[derive(Default)]
    struct Sensor {
        reading: f64,
        label: Option<String>,
        calibrated: bool,
    }

    impl Reflect for Sensor {
        fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
            builder
                .field("Reading", |s: &Sensor| &s.reading, |s: &mut Sensor| &mut s.reading)
                .field("Label", |s: &Sensor| &s.label, |s: &mut Sensor| &mut s.label)
                .readonly_property("Calibrated", |s: &Sensor| s.calibrated)
                .writeonly_property("Recalibrate", |s: &mut Sensor, on: bool| s.calibrated = on)
                .constructible()
        }
    }

    #[test]
    fn test_strategies_share_an_injected_cache() {
        let cache = Arc::new(MemberCache::new());
        let first = CachedReflectionStrategy::with_cache(Arc::clone(&cache));
        let second = CachedReflectionStrategy::with_cache(Arc::clone(&cache));
        let mut sensor = Sensor::default();

        first.set_field_value(&mut sensor, "Reading", Value::Float(1.5)).unwrap();
        second.set_field_value(&mut sensor, "Reading", Value::Float(2.5)).unwrap();

        assert_eq!(sensor.reading, 2.5);
        let stats = cache.stats().unwrap();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_nullable_field_takes_null() {
        let strategy = CachedReflectionStrategy::new();
        let mut sensor = Sensor {
            label: Some("north".into()),
            ..Sensor::default()
        };

        strategy.set_field_value(&mut sensor, "Label", Value::Null).unwrap();
        assert_eq!(sensor.label, None);
        assert_eq!(strategy.get_field_value(&sensor, "Label").unwrap(), Value::Null);
    }

    #[test]
    fn test_strict_config_rejects_read_only_write() {
        let strategy = CachedReflectionStrategy::new().with_config(MapperConfig::new().strict());
        let mut sensor = Sensor::default();

        let err = strategy
            .set_field_value(&mut sensor, "Calibrated", Value::Boolean(true))
            .unwrap_err();
        match err {
            MapError::DataMapping { field, source, .. } => {
                assert_eq!(field, "Calibrated");
                assert!(matches!(
                    source.as_deref().and_then(|s| s.downcast_ref::<MapError>()),
                    Some(MapError::ReadOnly { .. })
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!sensor.calibrated);
    }

    #[test]
    fn test_without_null_coercion_null_needs_nullable_member() {
        let strategy =
            CachedReflectionStrategy::new().with_config(MapperConfig::new().coerce_nulls(false));
        let mut sensor = Sensor::default();

        assert!(strategy.set_field_value(&mut sensor, "Label", Value::Null).is_ok());
        let err = strategy
            .set_field_value(&mut sensor, "Reading", Value::Null)
            .unwrap_err();
        assert!(err.to_string().contains("Member 'Reading' expects FLOAT, got NULL"));
    }

    #[test]
    fn test_write_only_property() {
        let strategy = CachedReflectionStrategy::new();
        let mut sensor = Sensor::default();

        strategy
            .set_field_value(&mut sensor, "Recalibrate", Value::Boolean(true))
            .unwrap();
        assert!(sensor.calibrated);

        let err = strategy.get_field_value(&sensor, "Recalibrate").unwrap_err();
        assert!(matches!(err, MapError::Unreadable { .. }));
        assert_eq!(
            err.to_string(),
            "The data mapper could not get the value for Sensor.Recalibrate."
        );
    }

    #[test]
    fn test_typed_helpers() {
        let strategy = CachedReflectionStrategy::new();
        strategy.register::<Sensor>().unwrap();

        let mut entity = strategy.create_instance("Sensor").unwrap();
        strategy
            .set_values(
                entity.as_mut(),
                [("Reading", Value::Integer(3)), ("Label", Value::from("east"))],
            )
            .unwrap();

        let reading: f64 = strategy.get_value_as(entity.as_ref(), "Reading").unwrap();
        let label: Option<String> = strategy.get_value_as(entity.as_ref(), "Label").unwrap();
        assert_eq!(reading, 3.0);
        assert_eq!(label.as_deref(), Some("east"));

        let fresh: Sensor = strategy.create_instance_of().unwrap();
        assert!(fresh.label.is_none());
    }
}
