use std::any::Any;

use crate::{core::record::Flattened, error::MapperError};

use super::{CompositePlan, FieldPlan};

/// Appends the columns of `value` to `out`, in plan order.
///
/// On failure `out` holds a partial row; callers discard it.
pub(crate) fn flatten(
    plan: &CompositePlan,
    value: &dyn Any,
    out: &mut Flattened,
) -> Result<(), MapperError> {
    let values = plan.accessors.field_values(value)?;
    if values.len() != plan.fields.len() {
        return Err(MapperError::configuration(
            plan.type_name(),
            format!(
                "{} field values for {} declared fields",
                values.len(),
                plan.fields.len()
            ),
        ));
    }

    for (field, value) in plan.fields.iter().zip(values) {
        match field {
            FieldPlan::Scalar { name, codec } => {
                let text = codec.write(value).ok_or_else(|| MapperError::Serialization {
                    column: name.clone(),
                    type_name: codec.type_name(),
                })?;
                out.header.push(name.clone());
                out.row.push(text);
            }
            FieldPlan::Collection { item_name, shape } => {
                for (offset, item) in shape.items(value)?.into_iter().enumerate() {
                    let column = format!("{item_name}{}", offset + 1);
                    let text = shape.element().write(item).ok_or_else(|| {
                        MapperError::Serialization {
                            column: column.clone(),
                            type_name: shape.element().type_name(),
                        }
                    })?;
                    out.header.push(column);
                    out.row.push(text);
                }
            }
            FieldPlan::Composite(nested) => flatten(nested, value, out)?,
        }
    }

    Ok(())
}
