//! Member tables for mapped entity types.
//!
//! Rust has no runtime reflection, so each entity type describes its fields
//! and properties once through [`Reflect::describe`]. The resulting
//! [`TypeInfo`] is what the resolver searches on a cache miss.

pub mod entity;
pub mod field_value;
pub mod member;

pub use entity::{Entity, Reflect, TypeBuilder, TypeIdent, TypeInfo, create_instance};
pub use field_value::FieldValue;
pub use member::{MemberHandle, MemberKind, Scope, Visibility};
