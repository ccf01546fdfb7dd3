//! Leaf converters: one typed value to and from the text of one column.
//!
//! A [`ValueConverter`] is a stateless strategy. Converters are collected in a
//! [`ConverterRegistry`] at configuration time; the registry hands out
//! [`LeafCodec`] handles, which erase the value type so the object graph walker
//! can drive any leaf through the same code path.
//!
//! # Examples
//!
//! ```
//! use csv_mapper::convert::{ConverterRegistry, ValueConverter};
//!
//! #[derive(Debug, PartialEq)]
//! struct Cents(i64);
//!
//! struct CentsConverter;
//!
//! impl ValueConverter for CentsConverter {
//!     type Value = Cents;
//!
//!     fn try_serialize(&self, value: &Cents, out: &mut String) -> bool {
//!         out.push_str(&format!("{}.{:02}", value.0 / 100, value.0 % 100));
//!         true
//!     }
//!
//!     fn try_deserialize(&self, text: &str) -> Option<Cents> {
//!         let (units, cents) = text.split_once('.')?;
//!         Some(Cents(units.parse::<i64>().ok()? * 100 + cents.parse::<i64>().ok()?))
//!     }
//! }
//!
//! let registry = ConverterRegistry::builder().register(CentsConverter).build();
//! let codec = registry.resolve::<Cents>().unwrap();
//! assert_eq!(codec.type_name(), std::any::type_name::<Cents>());
//! ```

use std::{any::Any, fmt, sync::Arc};

/// Built-in converters for primitive and common library types.
pub mod builtin;

/// The registry that maps a type to its leaf converter.
pub mod registry;

pub use registry::{ConverterRegistry, ConverterRegistryBuilder};

/// A type-erased value travelling through the walker.
pub type BoxedValue = Box<dyn Any + Send>;

/// Converts exactly one column to and from a typed value.
///
/// Implementations must be deterministic and free of side effects beyond
/// writing to `out`. Malformed input is reported by returning `None`, never by
/// panicking.
pub trait ValueConverter: Send + Sync + 'static {
    /// The type this converter reads and writes.
    type Value: Send + 'static;

    /// Appends the textual form of `value` to `out`.
    ///
    /// Returns `false` if the value cannot be represented; the caller then
    /// discards whatever was appended.
    fn try_serialize(&self, value: &Self::Value, out: &mut String) -> bool;

    /// Parses the text of one column.
    fn try_deserialize(&self, text: &str) -> Option<Self::Value>;
}

/// Object-safe view of a [`ValueConverter`].
pub(crate) trait ErasedConverter: Send + Sync {
    fn serialize_erased(&self, value: &dyn Any, out: &mut String) -> bool;
    fn deserialize_erased(&self, text: &str) -> Option<BoxedValue>;
}

pub(crate) struct Erased<C>(pub(crate) C);

impl<C: ValueConverter> ErasedConverter for Erased<C> {
    fn serialize_erased(&self, value: &dyn Any, out: &mut String) -> bool {
        value
            .downcast_ref::<C::Value>()
            .is_some_and(|value| self.0.try_serialize(value, out))
    }

    fn deserialize_erased(&self, text: &str) -> Option<BoxedValue> {
        self.0
            .try_deserialize(text)
            .map(|value| Box::new(value) as BoxedValue)
    }
}

/// Wraps the codec of `T` so that `Option<T>` maps an empty column to `None`.
struct Optional<T> {
    inner: Arc<dyn ErasedConverter>,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T: Send + 'static> ErasedConverter for Optional<T> {
    fn serialize_erased(&self, value: &dyn Any, out: &mut String) -> bool {
        match value.downcast_ref::<Option<T>>() {
            Some(None) => true,
            Some(Some(inner)) => self.inner.serialize_erased(inner, out),
            None => false,
        }
    }

    fn deserialize_erased(&self, text: &str) -> Option<BoxedValue> {
        if text.is_empty() {
            return Some(Box::new(None::<T>));
        }
        let inner = self.inner.deserialize_erased(text)?.downcast::<T>().ok()?;
        Some(Box::new(Some(*inner)))
    }
}

/// A resolved leaf converter with its value type erased.
///
/// Cloning is cheap: the converter itself is shared.
#[derive(Clone)]
pub struct LeafCodec {
    type_name: &'static str,
    converter: Arc<dyn ErasedConverter>,
}

impl LeafCodec {
    pub(crate) fn new(type_name: &'static str, converter: Arc<dyn ErasedConverter>) -> Self {
        LeafCodec {
            type_name,
            converter,
        }
    }

    /// Name of the value type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Lifts the codec of `T` to a codec of `Option<T>`.
    pub(crate) fn optional<T: Send + 'static>(self) -> LeafCodec {
        LeafCodec {
            type_name: std::any::type_name::<Option<T>>(),
            converter: Arc::new(Optional::<T> {
                inner: self.converter,
                _marker: std::marker::PhantomData,
            }),
        }
    }

    /// Writes `value` into a fresh string, or `None` if the converter refuses it.
    pub(crate) fn write(&self, value: &dyn Any) -> Option<String> {
        let mut out = String::new();
        self.converter
            .serialize_erased(value, &mut out)
            .then_some(out)
    }

    pub(crate) fn read(&self, text: &str) -> Option<BoxedValue> {
        self.converter.deserialize_erased(text)
    }
}

impl fmt::Debug for LeafCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafCodec")
            .field("type_name", &self.type_name)
            .finish()
    }
}
