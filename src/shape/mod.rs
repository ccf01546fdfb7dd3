//! Static description of how a type maps to columns.
//!
//! Every mappable type implements [`Tabular`], which resolves its [`Shape`]
//! against a [`ConverterRegistry`] once, at configuration time:
//!
//! - a [`Leaf`] occupies exactly one column and is converted by a leaf codec;
//! - a [`Collection`](crate::collection::Collection) occupies a run of numbered
//!   item columns;
//! - a [`Composite`] expands its fields, in declared order, in place.
//!
//! Struct types are usually declared with [`tabular_record!`](crate::tabular_record),
//! and user leaf types are marked with [`leaf_type!`](crate::leaf_type).

use std::{any::{type_name, Any}, fmt};

use crate::{
    collection::CollectionShape,
    convert::{BoxedValue, ConverterRegistry, LeafCodec},
    error::MapperError,
};

mod macros;

/// A type that can be mapped to and from columns.
pub trait Tabular: Sized + Send + 'static {
    /// Resolves the column shape of the type.
    ///
    /// Fails with [`MapperError::Configuration`] when a leaf inside the shape has
    /// no converter in `registry`.
    fn shape(registry: &ConverterRegistry) -> Result<Shape, MapperError>;
}

/// A type stored in a single column.
pub trait Leaf: Sized + Send + 'static {
    /// Resolves the codec for this type.
    fn codec(registry: &ConverterRegistry) -> Result<LeafCodec, MapperError> {
        registry.resolve::<Self>().ok_or_else(|| {
            MapperError::configuration(type_name::<Self>(), "no leaf converter is registered")
        })
    }
}

/// A struct whose fields are flattened into columns.
///
/// Fields are visited in the same declared order by all three methods.
pub trait Composite: Tabular {
    fn field_shapes(registry: &ConverterRegistry) -> Result<Vec<FieldShape>, MapperError>;

    fn field_values(&self) -> Vec<&dyn Any>;

    fn from_field_values(values: FieldValues) -> Result<Self, MapperError>;
}

/// The resolved column shape of a type.
#[derive(Clone, Debug)]
pub enum Shape {
    Leaf(LeafCodec),
    Collection(CollectionShape),
    Composite(CompositeShape),
}

/// One named field of a composite.
#[derive(Clone, Debug)]
pub struct FieldShape {
    name: &'static str,
    shape: Shape,
}

impl FieldShape {
    pub fn new(name: &'static str, shape: Shape) -> Self {
        FieldShape { name, shape }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

type FieldValuesFn = for<'a> fn(&'a dyn Any) -> Option<Vec<&'a dyn Any>>;
type AssembleFn = fn(FieldValues) -> Result<BoxedValue, MapperError>;

/// Type-erased access to the fields of one composite type.
#[derive(Clone, Copy)]
pub(crate) struct Accessors {
    type_name: &'static str,
    values: FieldValuesFn,
    assemble: AssembleFn,
}

impl Accessors {
    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrows the field values of `value`, in declared order.
    pub(crate) fn field_values<'a>(
        &self,
        value: &'a dyn Any,
    ) -> Result<Vec<&'a dyn Any>, MapperError> {
        (self.values)(value).ok_or_else(|| {
            MapperError::configuration(self.type_name, "value does not match its shape")
        })
    }

    pub(crate) fn assemble(&self, values: Vec<BoxedValue>) -> Result<BoxedValue, MapperError> {
        (self.assemble)(FieldValues::new(self.type_name, values))
    }
}

fn values_of<T: Composite>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
    value.downcast_ref::<T>().map(T::field_values)
}

fn assemble<T: Composite>(values: FieldValues) -> Result<BoxedValue, MapperError> {
    T::from_field_values(values).map(|value| Box::new(value) as BoxedValue)
}

/// The fields of a composite type plus its erased accessors.
#[derive(Clone)]
pub struct CompositeShape {
    accessors: Accessors,
    fields: Vec<FieldShape>,
}

impl CompositeShape {
    pub fn of<T: Composite>(registry: &ConverterRegistry) -> Result<Self, MapperError> {
        Ok(CompositeShape {
            accessors: Accessors {
                type_name: type_name::<T>(),
                values: values_of::<T>,
                assemble: assemble::<T>,
            },
            fields: T::field_shapes(registry)?,
        })
    }

    pub fn type_name(&self) -> &'static str {
        self.accessors.type_name
    }

    pub fn fields(&self) -> &[FieldShape] {
        &self.fields
    }

    /// Nesting depth: 1 for a composite made only of leaves and collections.
    pub fn depth(&self) -> usize {
        1 + self
            .fields
            .iter()
            .filter_map(|field| match &field.shape {
                Shape::Composite(nested) => Some(nested.depth()),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn accessors(&self) -> Accessors {
        self.accessors
    }
}

impl fmt::Debug for CompositeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeShape")
            .field("type_name", &self.type_name())
            .field("fields", &self.fields)
            .finish()
    }
}

/// The converted values of a composite's fields, handed out in declared order.
pub struct FieldValues {
    type_name: &'static str,
    values: std::vec::IntoIter<BoxedValue>,
}

impl FieldValues {
    pub(crate) fn new(type_name: &'static str, values: Vec<BoxedValue>) -> Self {
        FieldValues {
            type_name,
            values: values.into_iter(),
        }
    }

    /// Takes the next field value as a `T`.
    pub fn take<T: 'static>(&mut self) -> Result<T, MapperError> {
        let value = self.values.next().ok_or_else(|| {
            MapperError::configuration(self.type_name, "fewer field values than fields")
        })?;
        value.downcast::<T>().map(|value| *value).map_err(|_| {
            MapperError::configuration(
                self.type_name,
                format!("field value is not a `{}`", type_name::<T>()),
            )
        })
    }

    /// Number of values not taken yet.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

/// Shape of a leaf type: its codec from `registry`.
pub fn leaf_shape<T: Leaf>(registry: &ConverterRegistry) -> Result<Shape, MapperError> {
    T::codec(registry).map(Shape::Leaf)
}

/// Shape of a composite type: its fields, resolved recursively.
pub fn composite_shape<T: Composite>(registry: &ConverterRegistry) -> Result<Shape, MapperError> {
    CompositeShape::of::<T>(registry).map(Shape::Composite)
}

crate::leaf_type!(
    bool,
    char,
    String,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    uuid::Uuid,
    serde_json::Value,
);

#[cfg(feature = "chrono")]
crate::leaf_type!(
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    chrono::DateTime<chrono::Utc>,
);

impl<T: Leaf> Leaf for Option<T> {
    fn codec(registry: &ConverterRegistry) -> Result<LeafCodec, MapperError> {
        Ok(T::codec(registry)?.optional::<T>())
    }
}

impl<T: Leaf> Tabular for Option<T> {
    fn shape(registry: &ConverterRegistry) -> Result<Shape, MapperError> {
        leaf_shape::<Self>(registry)
    }
}
