/// Marks types as single-column leaves.
///
/// The types still need a converter in the [`ConverterRegistry`](crate::convert::ConverterRegistry)
/// used by the mapper; a missing converter is reported when the shape is
/// resolved, before any row is converted.
///
/// # Examples
///
/// ```
/// use csv_mapper::{leaf_type, shape::Tabular, convert::ConverterRegistry};
///
/// struct Rarity(u8);
///
/// leaf_type!(Rarity);
///
/// // Not registered yet.
/// assert!(Rarity::shape(&ConverterRegistry::new()).is_err());
/// ```
#[macro_export]
macro_rules! leaf_type {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::shape::Leaf for $ty {}

            impl $crate::shape::Tabular for $ty {
                fn shape(
                    registry: &$crate::convert::ConverterRegistry,
                ) -> ::core::result::Result<$crate::shape::Shape, $crate::MapperError> {
                    $crate::shape::leaf_shape::<Self>(registry)
                }
            }
        )+
    };
}

/// Declares a struct and implements [`Composite`](crate::shape::Composite) and
/// [`Tabular`](crate::shape::Tabular) for it.
///
/// Fields are mapped in declaration order, using the field identifier as the
/// column name before the naming convention is applied. Every field type must
/// itself be `Tabular`.
///
/// # Examples
///
/// ```
/// use csv_mapper::{tabular_record, CsvMapper};
///
/// tabular_record! {
///     #[derive(Debug, PartialEq)]
///     pub struct Loot {
///         pub items: Vec<String>,
///         pub count: u32,
///     }
/// }
///
/// let mapper = CsvMapper::new();
/// let loot = Loot { items: vec!["Spear".into(), "Sword".into()], count: 2 };
/// let flat = mapper.serialize(&loot).unwrap();
/// assert_eq!(flat.header.names(), ["item1", "item2", "count"]);
/// ```
#[macro_export]
macro_rules! tabular_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::shape::Composite for $name {
            fn field_shapes(
                registry: &$crate::convert::ConverterRegistry,
            ) -> ::core::result::Result<::std::vec::Vec<$crate::shape::FieldShape>, $crate::MapperError> {
                ::core::result::Result::Ok(::std::vec![
                    $(
                        $crate::shape::FieldShape::new(
                            ::core::stringify!($field),
                            <$ty as $crate::shape::Tabular>::shape(registry)?,
                        ),
                    )*
                ])
            }

            fn field_values(&self) -> ::std::vec::Vec<&dyn ::core::any::Any> {
                ::std::vec![$(&self.$field as &dyn ::core::any::Any),*]
            }

            #[allow(unused_mut, unused_variables)]
            fn from_field_values(
                mut values: $crate::shape::FieldValues,
            ) -> ::core::result::Result<Self, $crate::MapperError> {
                ::core::result::Result::Ok($name {
                    $($field: values.take::<$ty>()?,)*
                })
            }
        }

        impl $crate::shape::Tabular for $name {
            fn shape(
                registry: &$crate::convert::ConverterRegistry,
            ) -> ::core::result::Result<$crate::shape::Shape, $crate::MapperError> {
                $crate::shape::composite_shape::<Self>(registry)
            }
        }
    };
}
