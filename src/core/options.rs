use serde::{Deserialize, Serialize};

use super::naming::NamingConvention;

/// Default prefix of collection item columns.
pub const DEFAULT_ITEM_NAME: &str = "item";

/// Composite nesting depth up to which [`TraversalStrategy::Adaptive`] recurses.
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 16;

/// How the fields of a nested composite are named.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NestedHandling {
    /// Fields of the nested composite take its place with their own names.
    #[default]
    InPlace,
    /// Every column generated inside the nested composite is qualified with the
    /// parent field name, e.g. `address_city`.
    Prefixed {
        #[serde(default = "default_separator")]
        separator: String,
    },
}

fn default_separator() -> String {
    "_".to_string()
}

impl NestedHandling {
    /// Prefixed with the default `_` separator.
    pub fn prefixed() -> Self {
        NestedHandling::Prefixed {
            separator: default_separator(),
        }
    }
}

/// How nested composites are deserialized.
///
/// Both strategies consume the same column layout and produce equal values;
/// they differ only in where the pending work is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalStrategy {
    /// Each nested composite is read by a recursive call.
    Recursive,
    /// Nested composites are pushed as frames on an explicit work stack.
    WorkStack,
    /// Recursive up to `max_recursion_depth` levels of nesting, work stack beyond.
    Adaptive { max_recursion_depth: usize },
}

impl Default for TraversalStrategy {
    fn default() -> Self {
        TraversalStrategy::Adaptive {
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
        }
    }
}

/// Options of a [`CsvMapper`](crate::CsvMapper).
///
/// Every field has a default, so partial documents deserialize:
///
/// ```
/// use csv_mapper::core::options::{MapperOptions, NestedHandling};
/// use csv_mapper::core::naming::NamingConvention;
///
/// let options: MapperOptions = serde_json::from_str(r#"{
///     "naming_convention": "pascal_case",
///     "nested_handling": { "prefixed": { "separator": "." } }
/// }"#).unwrap();
///
/// assert_eq!(options.naming_convention, NamingConvention::PascalCase);
/// assert_eq!(options.item_name, "item");
/// assert_eq!(options.nested_handling, NestedHandling::Prefixed { separator: ".".into() });
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperOptions {
    pub naming_convention: NamingConvention,
    /// Prefix of collection item columns; items are numbered from 1.
    pub item_name: String,
    pub nested_handling: NestedHandling,
    pub strategy: TraversalStrategy,
    /// Maximum composite nesting depth accepted when deserializing.
    pub max_depth: Option<usize>,
}

impl Default for MapperOptions {
    fn default() -> Self {
        MapperOptions {
            naming_convention: NamingConvention::default(),
            item_name: DEFAULT_ITEM_NAME.to_string(),
            nested_handling: NestedHandling::default(),
            strategy: TraversalStrategy::default(),
            max_depth: None,
        }
    }
}
