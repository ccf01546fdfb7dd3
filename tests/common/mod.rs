#![allow(dead_code)]

use std::any::Any;

use csv_mapper::{
    convert::ConverterRegistry,
    leaf_type,
    shape::{composite_shape, Composite, FieldShape, FieldValues, Shape, Tabular},
    MapperError,
};
use rand::distr::{Alphanumeric, SampleString};

pub mod mocks;

pub use mocks::MockMoneyConverter;

/// An amount in cents, converted by a user converter only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Money {
    pub cents: i64,
}

leaf_type!(Money);

/// A labelled container followed by a trailing scalar column.
#[derive(Debug, Clone, PartialEq)]
pub struct Holder<C> {
    pub label: String,
    pub items: C,
    pub count: usize,
}

impl<C: Tabular> Composite for Holder<C> {
    fn field_shapes(registry: &ConverterRegistry) -> Result<Vec<FieldShape>, MapperError> {
        Ok(vec![
            FieldShape::new("label", String::shape(registry)?),
            FieldShape::new("items", C::shape(registry)?),
            FieldShape::new("count", usize::shape(registry)?),
        ])
    }

    fn field_values(&self) -> Vec<&dyn Any> {
        vec![
            &self.label as &dyn Any,
            &self.items as &dyn Any,
            &self.count as &dyn Any,
        ]
    }

    fn from_field_values(mut values: FieldValues) -> Result<Self, MapperError> {
        Ok(Holder {
            label: values.take()?,
            items: values.take()?,
            count: values.take()?,
        })
    }
}

impl<C: Tabular> Tabular for Holder<C> {
    fn shape(registry: &ConverterRegistry) -> Result<Shape, MapperError> {
        composite_shape::<Self>(registry)
    }
}

/// Wraps a composite one level deeper.
#[derive(Debug, Clone, PartialEq)]
pub struct Nest<T> {
    pub level: u32,
    pub inner: T,
}

impl<T: Composite> Composite for Nest<T> {
    fn field_shapes(registry: &ConverterRegistry) -> Result<Vec<FieldShape>, MapperError> {
        Ok(vec![
            FieldShape::new("level", u32::shape(registry)?),
            FieldShape::new("inner", T::shape(registry)?),
        ])
    }

    fn field_values(&self) -> Vec<&dyn Any> {
        vec![&self.level as &dyn Any, &self.inner as &dyn Any]
    }

    fn from_field_values(mut values: FieldValues) -> Result<Self, MapperError> {
        Ok(Nest {
            level: values.take()?,
            inner: values.take()?,
        })
    }
}

impl<T: Composite> Tabular for Nest<T> {
    fn shape(registry: &ConverterRegistry) -> Result<Shape, MapperError> {
        composite_shape::<Self>(registry)
    }
}

pub fn nest<T>(level: u32, inner: T) -> Nest<T> {
    Nest { level, inner }
}

pub fn random_name() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), 8)
}

pub fn random_names(len: usize) -> Vec<String> {
    (0..len).map(|_| random_name()).collect()
}
