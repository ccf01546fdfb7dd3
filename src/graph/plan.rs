use std::fmt;

use crate::{
    collection::{reconstruct::item_index, CollectionShape},
    convert::LeafCodec,
    core::options::{MapperOptions, NestedHandling},
    error::MapperError,
    shape::{Accessors, CompositeShape, Shape},
};

/// What one field contributes to a record, with its column names resolved.
pub(crate) enum FieldPlan {
    /// One column named `name`.
    Scalar { name: String, codec: LeafCodec },
    /// A run of columns `{item_name}1..`.
    Collection {
        item_name: String,
        shape: CollectionShape,
    },
    /// The fields of a nested composite, expanded in place.
    Composite(CompositePlan),
}

/// One column, or one run of item columns, in flattened order.
enum Slot<'p> {
    Scalar(&'p str),
    Items(&'p str),
}

/// The column layout of a composite type under a fixed set of options.
///
/// Plans are compiled once per type and shared by every serialization and
/// deserialization of that type, which keeps both directions in the same
/// column order.
///
/// A collection must not be followed by a column its item scan would also
/// accept: another collection with the same item name, or a scalar named like
/// an item column. Such layouts cannot be read back unambiguously and are
/// rejected when the plan is compiled.
pub struct CompositePlan {
    pub(crate) accessors: Accessors,
    pub(crate) fields: Vec<FieldPlan>,
    depth: usize,
}

impl CompositePlan {
    pub(crate) fn compile(
        shape: &CompositeShape,
        options: &MapperOptions,
    ) -> Result<Self, MapperError> {
        let plan = Self::compile_prefixed(shape, options, "");
        plan.check_item_runs()?;
        Ok(plan)
    }

    fn compile_prefixed(shape: &CompositeShape, options: &MapperOptions, prefix: &str) -> Self {
        let convention = options.naming_convention;

        let fields: Vec<FieldPlan> = shape
            .fields()
            .iter()
            .map(|field| match field.shape() {
                Shape::Leaf(codec) => FieldPlan::Scalar {
                    name: format!("{prefix}{}", convention.apply(field.name())),
                    codec: codec.clone(),
                },
                Shape::Collection(collection) => FieldPlan::Collection {
                    item_name: format!("{prefix}{}", options.item_name),
                    shape: collection.clone(),
                },
                Shape::Composite(nested) => {
                    let nested_prefix = match &options.nested_handling {
                        NestedHandling::InPlace => prefix.to_string(),
                        NestedHandling::Prefixed { separator } => {
                            format!("{prefix}{}{separator}", convention.apply(field.name()))
                        }
                    };
                    FieldPlan::Composite(Self::compile_prefixed(nested, options, &nested_prefix))
                }
            })
            .collect();

        let depth = 1 + fields
            .iter()
            .filter_map(|field| match field {
                FieldPlan::Composite(nested) => Some(nested.depth),
                _ => None,
            })
            .max()
            .unwrap_or(0);

        CompositePlan {
            accessors: shape.accessors(),
            fields,
            depth,
        }
    }

    fn check_item_runs(&self) -> Result<(), MapperError> {
        let mut slots = Vec::new();
        self.collect_slots(&mut slots);

        for pair in slots.windows(2) {
            let [Slot::Items(item_name), next] = pair else {
                continue;
            };
            let column = match next {
                Slot::Scalar(name) => name.to_string(),
                Slot::Items(next_item_name) => format!("{next_item_name}1"),
            };
            if item_index(&column, item_name).is_some() {
                return Err(MapperError::configuration(
                    self.type_name(),
                    format!(
                        "column `{column}` directly follows the `{item_name}` items \
                         and would be read as one of them"
                    ),
                ));
            }
        }

        Ok(())
    }

    fn collect_slots<'p>(&'p self, slots: &mut Vec<Slot<'p>>) {
        for field in &self.fields {
            match field {
                FieldPlan::Scalar { name, .. } => slots.push(Slot::Scalar(name)),
                FieldPlan::Collection { item_name, .. } => slots.push(Slot::Items(item_name)),
                FieldPlan::Composite(nested) => nested.collect_slots(slots),
            }
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.accessors.type_name()
    }

    /// Composite nesting depth, 1 for a flat type.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Names of the fixed columns in order; collections appear as `{item_name}*`.
    pub fn column_template(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_template(&mut names);
        names
    }

    fn collect_template(&self, names: &mut Vec<String>) {
        for field in &self.fields {
            match field {
                FieldPlan::Scalar { name, .. } => names.push(name.clone()),
                FieldPlan::Collection { item_name, .. } => names.push(format!("{item_name}*")),
                FieldPlan::Composite(nested) => nested.collect_template(names),
            }
        }
    }
}

impl fmt::Debug for CompositePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositePlan")
            .field("type_name", &self.type_name())
            .field("depth", &self.depth)
            .field("columns", &self.column_template())
            .finish()
    }
}
