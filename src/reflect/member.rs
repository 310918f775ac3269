use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::core::{DataType, MapError, Result, Value};

pub(crate) type Getter = Arc<dyn Fn(&dyn Any) -> Result<Value> + Send + Sync>;
pub(crate) type Setter = Arc<dyn Fn(&mut dyn Any, Value) -> Result<()> + Send + Sync>;
pub(crate) type DefaultValue = Arc<dyn Fn() -> Result<Value> + Send + Sync>;

/// Storage kind of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Plain data, always readable and writable.
    Field,
    /// Accessor pair; either side may be missing.
    Property,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    NonPublic,
}

/// Instance members belong to an entity value, static members to the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Instance,
    Static,
}

/// A resolved field or property of one entity type.
///
/// Accessors are type-erased: they downcast the entity to the declaring type
/// and fail with [`MapError::EntityMismatch`] when handed anything else.
#[derive(Clone)]
pub struct MemberHandle {
    pub(crate) name: String,
    pub(crate) declaring_type: &'static str,
    pub(crate) kind: MemberKind,
    pub(crate) visibility: Visibility,
    pub(crate) scope: Scope,
    pub(crate) data_type: DataType,
    pub(crate) nullable: bool,
    pub(crate) getter: Option<Getter>,
    pub(crate) setter: Option<Setter>,
    pub(crate) default_value: DefaultValue,
}

impl MemberHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified name of the type that declares this member.
    pub fn declaring_type(&self) -> &'static str {
        self.declaring_type
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn is_field(&self) -> bool {
        self.kind == MemberKind::Field
    }

    pub fn is_property(&self) -> bool {
        self.kind == MemberKind::Property
    }

    pub fn can_read(&self) -> bool {
        self.getter.is_some()
    }

    pub fn can_write(&self) -> bool {
        self.setter.is_some()
    }

    /// The value a `NULL` coming from the database is coerced to.
    pub fn default_value(&self) -> Result<Value> {
        (self.default_value)()
    }

    /// Checks `value` against the declared type before it reaches the setter.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_null() {
            return self.nullable;
        }
        self.data_type.is_compatible(value)
    }

    pub(crate) fn read(&self, entity: &dyn Any) -> Result<Option<Value>> {
        match &self.getter {
            Some(getter) => getter(entity).map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn write(&self, entity: &mut dyn Any, value: Value) -> Result<bool> {
        match &self.setter {
            Some(setter) => {
                if !self.accepts(&value) {
                    return Err(MapError::TypeMismatch(format!(
                        "Member '{}' expects {}, got {}",
                        self.name,
                        self.data_type,
                        value.type_name()
                    )));
                }
                setter(entity, value)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl fmt::Debug for MemberHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberHandle")
            .field("name", &self.name)
            .field("declaring_type", &self.declaring_type)
            .field("kind", &self.kind)
            .field("visibility", &self.visibility)
            .field("scope", &self.scope)
            .field("data_type", &self.data_type)
            .field("can_read", &self.can_read())
            .field("can_write", &self.can_write())
            .finish()
    }
}
