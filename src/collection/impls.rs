use std::{
    any::type_name,
    collections::{BTreeSet, BinaryHeap, HashSet, LinkedList, VecDeque},
    hash::Hash,
    sync::Arc,
};

use super::{collection_shape, Collection, CollectionKind};
use crate::{
    convert::ConverterRegistry,
    error::{MapperError, StructuralError},
    shape::{Leaf, Shape, Tabular},
};

/// Fixed-size storage whose length is set before the first item is written.
pub struct Slots<T> {
    slots: Vec<Option<T>>,
}

impl<T> Slots<T> {
    fn with_len(len: usize) -> Self {
        Slots {
            slots: std::iter::repeat_with(|| None).take(len).collect(),
        }
    }

    fn set(&mut self, index: usize, item: T) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(item);
        }
    }

    fn into_vec<C>(self) -> Result<Vec<T>, StructuralError> {
        let expected = self.slots.len();
        let items: Vec<T> = self.slots.into_iter().flatten().collect();
        if items.len() == expected {
            Ok(items)
        } else {
            Err(StructuralError::FixedLength {
                type_name: type_name::<C>(),
                expected,
                found: items.len(),
            })
        }
    }
}

impl<T: Leaf> Collection for Box<[T]> {
    type Item = T;
    type Builder = Slots<T>;
    const KIND: CollectionKind = CollectionKind::Fixed;

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }

    fn begin(len: usize) -> Slots<T> {
        Slots::with_len(len)
    }

    fn put(builder: &mut Slots<T>, index: usize, item: T) {
        builder.set(index, item);
    }

    fn finish(builder: Slots<T>) -> Result<Self, StructuralError> {
        builder.into_vec::<Self>().map(Vec::into_boxed_slice)
    }
}

impl<T: Leaf, const N: usize> Collection for [T; N] {
    type Item = T;
    type Builder = Slots<T>;
    const KIND: CollectionKind = CollectionKind::Fixed;

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }

    fn begin(len: usize) -> Slots<T> {
        Slots::with_len(len)
    }

    fn put(builder: &mut Slots<T>, index: usize, item: T) {
        builder.set(index, item);
    }

    fn finish(builder: Slots<T>) -> Result<Self, StructuralError> {
        let items = builder.into_vec::<Self>()?;
        <[T; N]>::try_from(items).map_err(|items| StructuralError::FixedLength {
            type_name: type_name::<Self>(),
            expected: N,
            found: items.len(),
        })
    }
}

impl<T: Leaf> Collection for Vec<T> {
    type Item = T;
    type Builder = Vec<T>;
    const KIND: CollectionKind = CollectionKind::RandomAccess;

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }

    fn begin(len: usize) -> Vec<T> {
        Vec::with_capacity(len)
    }

    fn put(builder: &mut Vec<T>, index: usize, item: T) {
        builder.insert(index.min(builder.len()), item);
    }

    fn finish(builder: Vec<T>) -> Result<Self, StructuralError> {
        Ok(builder)
    }
}

impl<T: Leaf> Collection for VecDeque<T> {
    type Item = T;
    type Builder = VecDeque<T>;
    const KIND: CollectionKind = CollectionKind::Sequential;

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }

    fn begin(len: usize) -> VecDeque<T> {
        VecDeque::with_capacity(len)
    }

    fn put(builder: &mut VecDeque<T>, _index: usize, item: T) {
        builder.push_back(item);
    }

    fn finish(builder: VecDeque<T>) -> Result<Self, StructuralError> {
        Ok(builder)
    }
}

impl<T: Leaf> Collection for LinkedList<T> {
    type Item = T;
    type Builder = LinkedList<T>;
    const KIND: CollectionKind = CollectionKind::Sequential;

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }

    fn begin(_len: usize) -> LinkedList<T> {
        LinkedList::new()
    }

    fn put(builder: &mut LinkedList<T>, _index: usize, item: T) {
        builder.push_back(item);
    }

    fn finish(builder: LinkedList<T>) -> Result<Self, StructuralError> {
        Ok(builder)
    }
}

impl<T: Leaf + Sync> Collection for Arc<[T]> {
    type Item = T;
    type Builder = Vec<T>;
    const KIND: CollectionKind = CollectionKind::Frozen;

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }

    fn begin(len: usize) -> Vec<T> {
        Vec::with_capacity(len)
    }

    fn put(builder: &mut Vec<T>, _index: usize, item: T) {
        builder.push(item);
    }

    fn finish(builder: Vec<T>) -> Result<Self, StructuralError> {
        Ok(Arc::from(builder))
    }
}

impl<T: Leaf + Eq + Hash> Collection for HashSet<T> {
    type Item = T;
    type Builder = HashSet<T>;
    const KIND: CollectionKind = CollectionKind::Unordered;

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }

    fn begin(len: usize) -> HashSet<T> {
        HashSet::with_capacity(len)
    }

    fn put(builder: &mut HashSet<T>, _index: usize, item: T) {
        builder.insert(item);
    }

    fn finish(builder: HashSet<T>) -> Result<Self, StructuralError> {
        Ok(builder)
    }
}

impl<T: Leaf + Ord> Collection for BTreeSet<T> {
    type Item = T;
    type Builder = BTreeSet<T>;
    const KIND: CollectionKind = CollectionKind::Unordered;

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }

    fn begin(_len: usize) -> BTreeSet<T> {
        BTreeSet::new()
    }

    fn put(builder: &mut BTreeSet<T>, _index: usize, item: T) {
        builder.insert(item);
    }

    fn finish(builder: BTreeSet<T>) -> Result<Self, StructuralError> {
        Ok(builder)
    }
}

impl<T: Leaf + Ord> Collection for BinaryHeap<T> {
    type Item = T;
    type Builder = BinaryHeap<T>;
    const KIND: CollectionKind = CollectionKind::Unordered;

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }

    fn begin(len: usize) -> BinaryHeap<T> {
        BinaryHeap::with_capacity(len)
    }

    fn put(builder: &mut BinaryHeap<T>, _index: usize, item: T) {
        builder.push(item);
    }

    fn finish(builder: BinaryHeap<T>) -> Result<Self, StructuralError> {
        Ok(builder)
    }
}

impl<T: Leaf> Tabular for Box<[T]> {
    fn shape(registry: &ConverterRegistry) -> Result<Shape, MapperError> {
        collection_shape::<Self>(registry)
    }
}

impl<T: Leaf, const N: usize> Tabular for [T; N] {
    fn shape(registry: &ConverterRegistry) -> Result<Shape, MapperError> {
        collection_shape::<Self>(registry)
    }
}

impl<T: Leaf> Tabular for Vec<T> {
    fn shape(registry: &ConverterRegistry) -> Result<Shape, MapperError> {
        collection_shape::<Self>(registry)
    }
}

impl<T: Leaf> Tabular for VecDeque<T> {
    fn shape(registry: &ConverterRegistry) -> Result<Shape, MapperError> {
        collection_shape::<Self>(registry)
    }
}

impl<T: Leaf> Tabular for LinkedList<T> {
    fn shape(registry: &ConverterRegistry) -> Result<Shape, MapperError> {
        collection_shape::<Self>(registry)
    }
}

impl<T: Leaf + Sync> Tabular for Arc<[T]> {
    fn shape(registry: &ConverterRegistry) -> Result<Shape, MapperError> {
        collection_shape::<Self>(registry)
    }
}

impl<T: Leaf + Eq + Hash> Tabular for HashSet<T> {
    fn shape(registry: &ConverterRegistry) -> Result<Shape, MapperError> {
        collection_shape::<Self>(registry)
    }
}

impl<T: Leaf + Ord> Tabular for BTreeSet<T> {
    fn shape(registry: &ConverterRegistry) -> Result<Shape, MapperError> {
        collection_shape::<Self>(registry)
    }
}

impl<T: Leaf + Ord> Tabular for BinaryHeap<T> {
    fn shape(registry: &ConverterRegistry) -> Result<Shape, MapperError> {
        collection_shape::<Self>(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build<C: Collection>(items: Vec<C::Item>) -> Result<C, StructuralError> {
        let mut builder = C::begin(items.len());
        for (index, item) in items.into_iter().enumerate() {
            C::put(&mut builder, index, item);
        }
        C::finish(builder)
    }

    #[test]
    fn fixed_array_should_reject_wrong_item_count() {
        let array: [u8; 3] = build(vec![1, 2, 3]).unwrap();
        assert_eq!(array, [1, 2, 3]);

        let error = build::<[u8; 3]>(vec![1, 2]).unwrap_err();
        assert_eq!(
            error,
            StructuralError::FixedLength {
                type_name: type_name::<[u8; 3]>(),
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn boxed_slice_should_fill_every_slot() {
        let slice: Box<[i32]> = build(vec![4, 5]).unwrap();
        assert_eq!(&*slice, &[4, 5]);

        let empty = Box::<[i32]>::finish(Box::<[i32]>::begin(2)).unwrap_err();
        assert!(matches!(empty, StructuralError::FixedLength { expected: 2, found: 0, .. }));
    }

    #[test]
    fn stack_should_pop_in_original_order() {
        let mut original = Vec::new();
        original.push("first".to_string());
        original.push("second".to_string());

        let written: Vec<String> = original.items().into_iter().cloned().collect();
        let mut rebuilt: Vec<String> = build(written).unwrap();

        assert_eq!(rebuilt.pop(), original.pop());
        assert_eq!(rebuilt.pop(), original.pop());
    }

    #[test]
    fn queue_should_dequeue_in_original_order() {
        let original: VecDeque<u32> = [3, 1, 2].into_iter().collect();
        let written: Vec<u32> = original.items().into_iter().copied().collect();
        let mut rebuilt: VecDeque<u32> = build(written).unwrap();

        let mut expected = original.clone();
        while let Some(item) = expected.pop_front() {
            assert_eq!(rebuilt.pop_front(), Some(item));
        }
        assert!(rebuilt.is_empty());
    }

    #[test]
    fn frozen_slice_should_keep_column_order() {
        let frozen: Arc<[char]> = build(vec!['a', 'b', 'c']).unwrap();
        assert_eq!(&*frozen, &['a', 'b', 'c']);
    }

    #[test]
    fn unordered_containers_should_compare_by_membership() {
        let heap: BinaryHeap<i64> = build(vec![5, 1, 3, 1]).unwrap();
        assert_eq!(heap.into_sorted_vec(), vec![1, 1, 3, 5]);

        let set: BTreeSet<u8> = build(vec![2, 1, 2]).unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }
}
