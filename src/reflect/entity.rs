use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::field_value::FieldValue;
use super::member::{DefaultValue, Getter, MemberHandle, MemberKind, Scope, Setter, Visibility};
use crate::core::{MapError, Result, Value};

type Constructor = Arc<dyn Fn() -> Box<dyn Entity> + Send + Sync>;

/// Runtime identity of an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeIdent {
    type_id: TypeId,
    full_name: &'static str,
}

impl TypeIdent {
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            full_name: type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified path, e.g. `app::models::Person`.
    pub fn full_name(&self) -> &'static str {
        self.full_name
    }

    /// Last path segment without generic arguments, e.g. `Person`.
    pub fn short_name(&self) -> &'static str {
        let base = self
            .full_name
            .split_once('<')
            .map_or(self.full_name, |(base, _)| base);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl fmt::Display for TypeIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name)
    }
}

/// Implemented by every type whose members can be mapped.
///
/// `describe` is the reflective lookup: it is only called when a member is
/// not cached yet, so it may allocate freely.
pub trait Reflect: Any + Send + Sync + Sized {
    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self>;
}

/// Object-safe view of a [`Reflect`] type.
pub trait Entity: Any + Send + Sync {
    fn type_ident(&self) -> TypeIdent;
    fn introspect(&self) -> TypeInfo;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Reflect> Entity for T {
    fn type_ident(&self) -> TypeIdent {
        TypeIdent::of::<T>()
    }

    fn introspect(&self) -> TypeInfo {
        TypeInfo::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Member table of one entity type.
pub struct TypeInfo {
    ident: TypeIdent,
    members: Vec<MemberHandle>,
    constructor: Option<Constructor>,
}

impl TypeInfo {
    pub fn of<T: Reflect>() -> Self {
        T::describe(TypeBuilder::new()).build()
    }

    pub fn ident(&self) -> TypeIdent {
        self.ident
    }

    /// All members in declaration order, own members before embedded ones.
    pub fn members(&self) -> &[MemberHandle] {
        &self.members
    }

    /// First instance member named `name`, public or not.
    pub fn find_member(&self, name: &str) -> Option<&MemberHandle> {
        self.members
            .iter()
            .filter(|m| m.scope == Scope::Instance)
            .find(|m| m.name == name)
    }

    pub fn can_construct(&self) -> bool {
        self.constructor.is_some()
    }

    /// Builds a default-initialized instance through the parameterless constructor.
    pub fn construct(&self) -> Result<Box<dyn Entity>> {
        match &self.constructor {
            Some(constructor) => Ok(constructor()),
            None => Err(MapError::ConstructionFailed {
                type_name: self.ident.full_name().to_string(),
                details: "type has no parameterless constructor".to_string(),
            }),
        }
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("ident", &self.ident)
            .field("members", &self.members)
            .field("can_construct", &self.can_construct())
            .finish()
    }
}

/// Creates a default-initialized `T`.
pub fn create_instance<T: Reflect>() -> Result<T> {
    let info = TypeInfo::of::<T>();
    let entity = info.construct()?;
    entity
        .into_any()
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| MapError::ConstructionFailed {
            type_name: info.ident().full_name().to_string(),
            details: "constructor produced a different type".to_string(),
        })
}

fn downcast_ref<T: 'static>(entity: &dyn Any) -> Result<&T> {
    entity
        .downcast_ref::<T>()
        .ok_or_else(|| MapError::EntityMismatch {
            expected: type_name::<T>().to_string(),
            actual: "another type".to_string(),
        })
}

fn downcast_mut<T: 'static>(entity: &mut dyn Any) -> Result<&mut T> {
    entity
        .downcast_mut::<T>()
        .ok_or_else(|| MapError::EntityMismatch {
            expected: type_name::<T>().to_string(),
            actual: "another type".to_string(),
        })
}

fn default_of<V: FieldValue>() -> DefaultValue {
    Arc::new(|| V::default().to_value())
}

/// Collects the members of `T`.
///
/// ```
/// use rowmap::reflect::{Reflect, TypeBuilder};
///
/// #[derive(Default)]
/// struct Account {
///     id: i64,
///     email: String,
///     password_hash: String,
/// }
///
/// impl Reflect for Account {
///     fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
///         builder
///             .field("Id", |a: &Account| &a.id, |a: &mut Account| &mut a.id)
///             .field("Email", |a: &Account| &a.email, |a: &mut Account| &mut a.email)
///             .writeonly_property("Password", |a: &mut Account, v: String| {
///                 a.password_hash = format!("hashed:{}", v)
///             })
///             .non_public()
///             .constructible()
///     }
/// }
/// ```
pub struct TypeBuilder<T> {
    members: Vec<MemberHandle>,
    embedded: Vec<MemberHandle>,
    constructor: Option<Constructor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Reflect> TypeBuilder<T> {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            embedded: Vec::new(),
            constructor: None,
            _marker: PhantomData,
        }
    }

    fn push<V: FieldValue>(
        mut self,
        name: &str,
        kind: MemberKind,
        scope: Scope,
        getter: Option<Getter>,
        setter: Option<Setter>,
    ) -> Self {
        self.members.push(MemberHandle {
            name: name.to_string(),
            declaring_type: type_name::<T>(),
            kind,
            visibility: Visibility::Public,
            scope,
            data_type: V::data_type(),
            nullable: V::nullable(),
            getter,
            setter,
            default_value: default_of::<V>(),
        });
        self
    }

    /// A plain data member, readable and writable through the two projections.
    pub fn field<V, G, M>(self, name: &str, get: G, get_mut: M) -> Self
    where
        V: FieldValue,
        G: Fn(&T) -> &V + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        let getter: Getter = Arc::new(move |entity: &dyn Any| -> Result<Value> {
            let entity = downcast_ref::<T>(entity)?;
            get(entity).to_value()
        });
        let setter: Setter = Arc::new(move |entity: &mut dyn Any, value: Value| -> Result<()> {
            let value = V::from_value(value)?;
            *get_mut(downcast_mut::<T>(entity)?) = value;
            Ok(())
        });
        self.push::<V>(name, MemberKind::Field, Scope::Instance, Some(getter), Some(setter))
    }

    pub fn property<V, G, S>(self, name: &str, get: G, set: S) -> Self
    where
        V: FieldValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let getter = property_getter::<T, V, G>(get);
        let setter = property_setter::<T, V, S>(set);
        self.push::<V>(name, MemberKind::Property, Scope::Instance, Some(getter), Some(setter))
    }

    pub fn readonly_property<V, G>(self, name: &str, get: G) -> Self
    where
        V: FieldValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        let getter = property_getter::<T, V, G>(get);
        self.push::<V>(name, MemberKind::Property, Scope::Instance, Some(getter), None)
    }

    pub fn writeonly_property<V, S>(self, name: &str, set: S) -> Self
    where
        V: FieldValue,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let setter = property_setter::<T, V, S>(set);
        self.push::<V>(name, MemberKind::Property, Scope::Instance, None, Some(setter))
    }

    /// A type-level value. Listed in [`TypeInfo::members`] but never resolved.
    pub fn static_property<V, G>(self, name: &str, get: G) -> Self
    where
        V: FieldValue,
        G: Fn() -> V + Send + Sync + 'static,
    {
        let getter: Getter = Arc::new(move |_: &dyn Any| -> Result<Value> { get().to_value() });
        self.push::<V>(name, MemberKind::Property, Scope::Static, Some(getter), None)
    }

    /// Marks the most recently added member as non-public.
    pub fn non_public(mut self) -> Self {
        if let Some(last) = self.members.last_mut() {
            last.visibility = Visibility::NonPublic;
        }
        self
    }

    /// Exposes the members of an embedded base type `B`.
    ///
    /// Embedded members are searched after the members declared on `T`, so a
    /// member of `T` shadows a base member with the same name.
    pub fn embed<B, P, M>(mut self, project: P, project_mut: M) -> Self
    where
        B: Reflect,
        P: Fn(&T) -> &B + Send + Sync + 'static,
        M: Fn(&mut T) -> &mut B + Send + Sync + 'static,
    {
        let project = Arc::new(project);
        let project_mut = Arc::new(project_mut);

        for base in TypeInfo::of::<B>().members {
            let getter = base.getter.map(|inner| {
                let project = Arc::clone(&project);
                let getter: Getter = Arc::new(move |entity: &dyn Any| -> Result<Value> {
                    let entity = downcast_ref::<T>(entity)?;
                    inner(project(entity) as &dyn Any)
                });
                getter
            });
            let setter = base.setter.map(|inner| {
                let project_mut = Arc::clone(&project_mut);
                let setter: Setter = Arc::new(move |entity: &mut dyn Any, value: Value| -> Result<()> {
                    let entity = downcast_mut::<T>(entity)?;
                    inner(project_mut(entity) as &mut dyn Any, value)
                });
                setter
            });
            self.embedded.push(MemberHandle {
                getter,
                setter,
                ..base
            });
        }
        self
    }

    fn build(self) -> TypeInfo {
        let mut members = self.members;
        members.extend(self.embedded);
        TypeInfo {
            ident: TypeIdent::of::<T>(),
            members,
            constructor: self.constructor,
        }
    }
}

impl<T: Reflect + Default> TypeBuilder<T> {
    /// Registers `T::default` as the parameterless constructor.
    pub fn constructible(mut self) -> Self {
        let constructor: Constructor = Arc::new(|| Box::new(T::default()) as Box<dyn Entity>);
        self.constructor = Some(constructor);
        self
    }
}

impl<T: Reflect> Default for TypeBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn property_getter<T, V, G>(get: G) -> Getter
where
    T: Reflect,
    V: FieldValue,
    G: Fn(&T) -> V + Send + Sync + 'static,
{
    Arc::new(move |entity: &dyn Any| -> Result<Value> {
        let entity = downcast_ref::<T>(entity)?;
        get(entity).to_value()
    })
}

fn property_setter<T, V, S>(set: S) -> Setter
where
    T: Reflect,
    V: FieldValue,
    S: Fn(&mut T, V) + Send + Sync + 'static,
{
    Arc::new(move |entity: &mut dyn Any, value: Value| -> Result<()> {
        let value = V::from_value(value)?;
        set(downcast_mut::<T>(entity)?, value);
        Ok(())
    })
}
