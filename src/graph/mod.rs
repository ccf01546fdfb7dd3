//! Flattening composite values into columns and rebuilding them.
//!
//! Serialization walks a [`CompositePlan`] field by field: a leaf emits one
//! column, a collection emits its item columns, and a nested composite is
//! expanded in place.
//!
//! Deserialization consumes the identical layout with one of two strategies.
//! The recursive reader calls itself for every nested composite, so its stack
//! depth follows the nesting depth of the type. The work-stack reader keeps
//! one frame per open composite in a `Vec` and loops instead.
//! Both go through the same [`ColumnReader`], so they accept and reject exactly
//! the same records and build equal values.

use log::trace;

use crate::{
    collection::{reconstruct, CollectionShape},
    convert::{BoxedValue, LeafCodec},
    core::{
        options::TraversalStrategy,
        record::{Flattened, Header, Row},
    },
    error::{MapperError, StructuralError},
};

mod flatten;
mod plan;
mod recursive;
mod work_stack;

pub use plan::CompositePlan;

pub(crate) use flatten::flatten;
pub(crate) use plan::FieldPlan;

/// The deserialization strategy actually used for a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Traversal {
    Recursive,
    WorkStack,
}

impl Traversal {
    pub(crate) fn select(strategy: TraversalStrategy, plan: &CompositePlan) -> Self {
        match strategy {
            TraversalStrategy::Recursive => Traversal::Recursive,
            TraversalStrategy::WorkStack => Traversal::WorkStack,
            TraversalStrategy::Adaptive {
                max_recursion_depth,
            } => {
                if plan.depth() <= max_recursion_depth {
                    Traversal::Recursive
                } else {
                    Traversal::WorkStack
                }
            }
        }
    }
}

/// Reads columns left to right, checking names against the plan.
pub(crate) struct ColumnReader<'r> {
    header: &'r Header,
    row: &'r Row,
    column: usize,
}

impl<'r> ColumnReader<'r> {
    pub(crate) fn new(header: &'r Header, row: &'r Row) -> Result<Self, StructuralError> {
        if header.len() != row.len() {
            return Err(StructuralError::LengthMismatch {
                header: header.len(),
                row: row.len(),
            });
        }
        Ok(ColumnReader {
            header,
            row,
            column: 0,
        })
    }

    pub(crate) fn column(&self) -> usize {
        self.column
    }

    pub(crate) fn read_scalar(
        &mut self,
        name: &str,
        codec: &LeafCodec,
    ) -> Result<BoxedValue, MapperError> {
        let column = self.column;
        let (Some(found), Some(text)) = (self.header.get(column), self.row.get(column)) else {
            return Err(StructuralError::MissingColumn {
                column,
                expected: name.to_string(),
            }
            .into());
        };

        if found != name {
            return Err(StructuralError::UnexpectedColumn {
                column,
                expected: name.to_string(),
                found: found.to_string(),
            }
            .into());
        }

        let value = codec.read(text).ok_or_else(|| MapperError::FieldConversion {
            column,
            header: found.to_string(),
            type_name: codec.type_name(),
            text: text.to_string(),
        })?;

        self.column += 1;
        Ok(value)
    }

    pub(crate) fn read_collection(
        &mut self,
        item_name: &str,
        shape: &CollectionShape,
    ) -> Result<BoxedValue, MapperError> {
        let rebuilt = reconstruct(shape, self.header, self.row, self.column, item_name)?;
        self.column += rebuilt.consumed;
        Ok(rebuilt.value)
    }

    /// Fails if columns remain that no field consumed.
    pub(crate) fn finish(self) -> Result<(), StructuralError> {
        match self.header.get(self.column) {
            Some(found) => Err(StructuralError::TrailingColumn {
                column: self.column,
                found: found.to_string(),
            }),
            None => Ok(()),
        }
    }
}

pub(crate) fn check_depth(depth: usize, limit: Option<usize>) -> Result<(), MapperError> {
    match limit {
        Some(limit) if depth > limit => Err(MapperError::DepthLimitExceeded { depth, limit }),
        _ => Ok(()),
    }
}

/// Serializes `value`, whose type the plan was compiled for, into a header and a row.
pub(crate) fn serialize(
    plan: &CompositePlan,
    value: &dyn std::any::Any,
) -> Result<Flattened, MapperError> {
    let mut flattened = Flattened::default();
    flatten(plan, value, &mut flattened)?;
    Ok(flattened)
}

/// Rebuilds a value from a header and a row with the given traversal.
pub(crate) fn deserialize(
    plan: &CompositePlan,
    header: &Header,
    row: &Row,
    traversal: Traversal,
    max_depth: Option<usize>,
) -> Result<BoxedValue, MapperError> {
    let mut reader = ColumnReader::new(header, row)?;

    trace!(
        "Reading `{}` ({} columns) with {:?} traversal",
        plan.type_name(),
        header.len(),
        traversal
    );

    let value = match traversal {
        Traversal::Recursive => recursive::read(plan, &mut reader, 1, max_depth)?,
        Traversal::WorkStack => work_stack::read(plan, &mut reader, max_depth)?,
    };

    reader.finish()?;
    Ok(value)
}
