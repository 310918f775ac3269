// ============================================================================
// rowmap Library
// ============================================================================
//
// Cached member access for mapping database rows onto Rust entities.
//
// An entity type describes its fields and properties once (`Reflect`). The
// strategies resolve a member by name, keep the resolved handle in a
// `MemberCache`, and move `Value`s in and out of the entity, turning the
// database NULL into the member's default value on the way in.

pub mod cache;
pub mod config;
pub mod core;
pub mod reflect;
pub mod result;
pub mod strategy;
mod macros;

// Re-export main types for convenience
pub use cache::{CacheStats, MemberCache, TypeRegistry};
pub use config::{MapperConfig, ReadOnlyPolicy};
pub use crate::core::{DataType, MapError, Result, Row, Value};
pub use reflect::{
    Entity, FieldValue, MemberHandle, MemberKind, Reflect, Scope, TypeBuilder, TypeIdent, TypeInfo,
    Visibility, create_instance,
};
pub use result::{QueryResult, RowLoader};
pub use strategy::{
    CachedReflectionStrategy, DirectReflectionStrategy, ReflectionStrategy, ReflectionStrategyExt,
};

/// Writes `value` into `field` of `entity` through the process-wide cache.
///
/// # Examples
///
/// ```
/// use rowmap::{Value, reflect_entity};
///
/// #[derive(Default)]
/// struct Person {
///     age: i32,
/// }
///
/// reflect_entity!(Person { age as "Age" });
///
/// # fn main() -> rowmap::Result<()> {
/// let mut person = Person { age: 30 };
/// rowmap::set_value(&mut person, "Age", Value::Null)?;
/// assert_eq!(person.age, 0);
/// # Ok(())
/// # }
/// ```
pub fn set_value(entity: &mut dyn Entity, field: &str, value: Value) -> Result<()> {
    CachedReflectionStrategy::global().set_field_value(entity, field, value)
}

/// Reads `field` of `entity` through the process-wide cache.
pub fn get_value(entity: &dyn Entity, field: &str) -> Result<Value> {
    CachedReflectionStrategy::global().get_field_value(entity, field)
}
