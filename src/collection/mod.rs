//! Homogeneous containers stored as a run of numbered item columns.
//!
//! A collection field of length N occupies the columns `item1..itemN` (the
//! prefix is configurable). Each container type implements [`Collection`],
//! declaring one [`CollectionKind`] capability that fixes how it is rebuilt:
//!
//! | Kind           | Types                          | Rebuilt by                          |
//! |----------------|--------------------------------|-------------------------------------|
//! | `Fixed`        | `Box<[T]>`, `[T; N]`           | slots sized before any write        |
//! | `RandomAccess` | `Vec<T>`                       | insertion at the item's position    |
//! | `Sequential`   | `VecDeque<T>`, `LinkedList<T>` | `push_back` in column order         |
//! | `Frozen`       | `Arc<[T]>`                     | a full buffer, then frozen          |
//! | `Unordered`    | `HashSet`, `BTreeSet`, `BinaryHeap` | insertion; membership is what counts |
//!
//! `Vec<T>` doubles as a stack: it is written bottom to top and rebuilt by
//! pushing in column order, so popping a rebuilt stack yields the original pop
//! order. `VecDeque<T>` is written front to back and rebuilt with `push_back`,
//! so dequeue order is preserved.

use std::{
    any::{type_name, Any},
    fmt,
    marker::PhantomData,
    sync::Arc,
};

use crate::{
    convert::{BoxedValue, ConverterRegistry, LeafCodec},
    error::{MapperError, StructuralError},
    shape::{Leaf, Shape},
};

mod impls;

/// Rebuilding a collection from its item columns.
pub mod reconstruct;

pub use impls::Slots;
pub use reconstruct::{reconstruct, scan_items, Reconstructed};

/// How a container is allocated and filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Fixed,
    RandomAccess,
    Sequential,
    Frozen,
    Unordered,
}

/// A container of leaf items.
pub trait Collection: Sized + Send + 'static {
    type Item: Leaf;

    /// Partially filled container, never exposed to callers.
    type Builder: 'static;

    const KIND: CollectionKind;

    /// Items in the order they are written to columns.
    fn items(&self) -> Vec<&Self::Item>;

    /// Allocates a builder for exactly `len` items.
    fn begin(len: usize) -> Self::Builder;

    /// Stores the item read from the `index`-th item column.
    fn put(builder: &mut Self::Builder, index: usize, item: Self::Item);

    fn finish(builder: Self::Builder) -> Result<Self, StructuralError>;
}

pub(crate) trait ErasedCollection: Send + Sync {
    fn items<'a>(&self, value: &'a dyn Any) -> Option<Vec<&'a dyn Any>>;
    fn begin(&self, len: usize) -> Box<dyn ErasedBuilder>;
}

pub(crate) trait ErasedBuilder {
    /// Returns `false` if `item` is not of the element type.
    fn put(&mut self, index: usize, item: BoxedValue) -> bool;
    fn finish(self: Box<Self>) -> Result<BoxedValue, StructuralError>;
}

struct Ops<C>(PhantomData<fn() -> C>);

impl<C: Collection> ErasedCollection for Ops<C> {
    fn items<'a>(&self, value: &'a dyn Any) -> Option<Vec<&'a dyn Any>> {
        let collection = value.downcast_ref::<C>()?;
        Some(
            collection
                .items()
                .into_iter()
                .map(|item| item as &dyn Any)
                .collect(),
        )
    }

    fn begin(&self, len: usize) -> Box<dyn ErasedBuilder> {
        Box::new(Building::<C> {
            builder: C::begin(len),
        })
    }
}

struct Building<C: Collection> {
    builder: C::Builder,
}

impl<C: Collection> ErasedBuilder for Building<C> {
    fn put(&mut self, index: usize, item: BoxedValue) -> bool {
        match item.downcast::<C::Item>() {
            Ok(item) => {
                C::put(&mut self.builder, index, *item);
                true
            }
            Err(_) => false,
        }
    }

    fn finish(self: Box<Self>) -> Result<BoxedValue, StructuralError> {
        C::finish(self.builder).map(|collection| Box::new(collection) as BoxedValue)
    }
}

/// The resolved shape of a collection: its kind, element codec and builder.
#[derive(Clone)]
pub struct CollectionShape {
    kind: CollectionKind,
    type_name: &'static str,
    element: LeafCodec,
    ops: Arc<dyn ErasedCollection>,
}

impl CollectionShape {
    pub fn of<C: Collection>(registry: &ConverterRegistry) -> Result<Self, MapperError> {
        let element = C::Item::codec(registry).map_err(|_| {
            MapperError::configuration(
                type_name::<C>(),
                format!(
                    "element type `{}` has no leaf converter",
                    type_name::<C::Item>()
                ),
            )
        })?;

        Ok(CollectionShape {
            kind: C::KIND,
            type_name: type_name::<C>(),
            element,
            ops: Arc::new(Ops::<C>(PhantomData)),
        })
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn element(&self) -> &LeafCodec {
        &self.element
    }

    pub(crate) fn items<'a>(&self, value: &'a dyn Any) -> Result<Vec<&'a dyn Any>, MapperError> {
        self.ops.items(value).ok_or_else(|| {
            MapperError::configuration(self.type_name, "value does not match its shape")
        })
    }

    pub(crate) fn begin(&self, len: usize) -> Box<dyn ErasedBuilder> {
        self.ops.begin(len)
    }
}

impl fmt::Debug for CollectionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionShape")
            .field("kind", &self.kind)
            .field("type_name", &self.type_name)
            .field("element", &self.element)
            .finish()
    }
}

/// Shape of a collection type.
pub fn collection_shape<C: Collection>(registry: &ConverterRegistry) -> Result<Shape, MapperError> {
    CollectionShape::of::<C>(registry).map(Shape::Collection)
}
