use log::trace;

use crate::{convert::BoxedValue, error::MapperError};

use super::{check_depth, ColumnReader, CompositePlan, FieldPlan};

/// One composite being read: its plan, the next field to read, the column it
/// started at, and the values read so far.
struct Frame<'p> {
    plan: &'p CompositePlan,
    next: usize,
    start_column: usize,
    values: Vec<BoxedValue>,
}

impl<'p> Frame<'p> {
    fn open(plan: &'p CompositePlan, start_column: usize) -> Self {
        Frame {
            plan,
            next: 0,
            start_column,
            values: Vec::with_capacity(plan.fields.len()),
        }
    }
}

/// Reads the composite described by `root` without recursion.
///
/// Nested composites are pushed as frames; a frame is closed, assembled and
/// handed to its parent once all of its fields are read. Memory use grows with
/// the nesting depth of the type, in the `Vec` rather than on the call stack.
pub(super) fn read(
    root: &CompositePlan,
    reader: &mut ColumnReader<'_>,
    max_depth: Option<usize>,
) -> Result<BoxedValue, MapperError> {
    check_depth(1, max_depth)?;

    let mut stack = vec![Frame::open(root, reader.column())];

    loop {
        let Some(frame) = stack.last_mut() else {
            return Err(unbalanced(root));
        };
        let plan = frame.plan;
        let Some(field) = plan.fields.get(frame.next) else {
            let Some(closed) = stack.pop() else {
                return Err(unbalanced(root));
            };
            trace!(
                "Closing `{}` over columns {}..{}",
                closed.plan.type_name(),
                closed.start_column,
                reader.column()
            );
            let value = closed.plan.accessors.assemble(closed.values)?;
            match stack.last_mut() {
                Some(parent) => parent.values.push(value),
                None => return Ok(value),
            }
            continue;
        };
        frame.next += 1;

        match field {
            FieldPlan::Scalar { name, codec } => {
                let value = reader.read_scalar(name, codec)?;
                frame.values.push(value);
            }
            FieldPlan::Collection { item_name, shape } => {
                let value = reader.read_collection(item_name, shape)?;
                frame.values.push(value);
            }
            FieldPlan::Composite(nested) => {
                check_depth(stack.len() + 1, max_depth)?;
                let start_column = reader.column();
                stack.push(Frame::open(nested, start_column));
            }
        }
    }
}

fn unbalanced(root: &CompositePlan) -> MapperError {
    MapperError::configuration(
        root.type_name(),
        "work stack emptied before the root record was assembled",
    )
}
