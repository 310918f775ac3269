/// Implements [`Reflect`](crate::reflect::Reflect) for a struct whose mapped
/// members are all plain fields.
///
/// Each listed field becomes a member named after the field, or after the
/// string given with `as`. The type must implement `Default`, which serves as
/// its parameterless constructor.
///
/// ```
/// use rowmap::reflect_entity;
///
/// #[derive(Default)]
/// pub struct Person {
///     pub age: i32,
///     pub name: String,
///     pub nickname: Option<String>,
/// }
///
/// reflect_entity!(Person {
///     age as "Age",
///     name as "Name",
///     nickname,
/// });
/// ```
#[macro_export]
macro_rules! reflect_entity {
    (@name $field:ident) => {
        stringify!($field)
    };
    (@name $field:ident $alias:literal) => {
        $alias
    };
    ($ty:ty { $($field:ident $(as $alias:literal)?),+ $(,)? }) => {
        impl $crate::reflect::Reflect for $ty {
            fn describe(
                builder: $crate::reflect::TypeBuilder<Self>,
            ) -> $crate::reflect::TypeBuilder<Self> {
                builder
                    $(
                        .field(
                            $crate::reflect_entity!(@name $field $($alias)?),
                            |entity: &Self| &entity.$field,
                            |entity: &mut Self| &mut entity.$field,
                        )
                    )+
                    .constructible()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::Value;
    use crate::reflect::{MemberKind, TypeInfo};

    #[derive(Default)]
    struct Book {
        title: String,
        pages: i32,
    }

    reflect_entity!(Book { title as "Title", pages });

    #[test]
    fn test_macro_generates_fields() {
        let info = TypeInfo::of::<Book>();
        let names: Vec<&str> = info.members().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["Title", "pages"]);
        assert!(info.members().iter().all(|m| m.kind() == MemberKind::Field));
        assert!(info.can_construct());

        let book = Book {
            title: "Dune".into(),
            pages: 412,
        };
        let pages = info.find_member("pages").unwrap();
        assert_eq!(pages.default_value().unwrap(), Value::Integer(0));
        assert_eq!(
            pages.read(crate::reflect::Entity::as_any(&book)).unwrap(),
            Some(Value::Integer(412))
        );
    }
}
