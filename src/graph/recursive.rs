use crate::{convert::BoxedValue, error::MapperError};

use super::{check_depth, ColumnReader, CompositePlan, FieldPlan};

/// Reads the composite described by `plan`, recursing into nested composites.
pub(super) fn read(
    plan: &CompositePlan,
    reader: &mut ColumnReader<'_>,
    depth: usize,
    max_depth: Option<usize>,
) -> Result<BoxedValue, MapperError> {
    check_depth(depth, max_depth)?;

    let mut values = Vec::with_capacity(plan.fields.len());
    for field in &plan.fields {
        let value = match field {
            FieldPlan::Scalar { name, codec } => reader.read_scalar(name, codec)?,
            FieldPlan::Collection { item_name, shape } => reader.read_collection(item_name, shape)?,
            FieldPlan::Composite(nested) => read(nested, reader, depth + 1, max_depth)?,
        };
        values.push(value);
    }

    plan.accessors.assemble(values)
}
