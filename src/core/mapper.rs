use std::{
    any::{type_name, TypeId},
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use log::debug;

use crate::{
    convert::ConverterRegistry,
    core::{
        naming::NamingConvention,
        options::{MapperOptions, NestedHandling, TraversalStrategy},
        record::{Flattened, Header, Row},
    },
    error::MapperError,
    graph::{self, CompositePlan, Traversal},
    shape::{Composite, Shape},
};

/// Converts composite values to and from one header and one row.
///
/// The mapper owns an immutable [`ConverterRegistry`] and a set of
/// [`MapperOptions`]. Column plans are compiled the first time a type is used
/// and cached; compiling is deterministic, so concurrent first use from
/// several threads at worst compiles the same plan twice.
///
/// # Examples
///
/// ```
/// use csv_mapper::{tabular_record, CsvMapper, core::naming::NamingConvention};
///
/// tabular_record! {
///     #[derive(Debug, PartialEq)]
///     struct Loot {
///         items: Vec<String>,
///         count: u32,
///     }
/// }
///
/// let mapper = CsvMapper::builder()
///     .naming_convention(NamingConvention::PascalCase)
///     .build();
///
/// let loot = Loot { items: vec!["Spear".into(), "Sword".into()], count: 2 };
/// let flat = mapper.serialize(&loot).unwrap();
/// assert_eq!(flat.header.names(), ["item1", "item2", "Count"]);
/// assert_eq!(flat.row.fields(), ["Spear", "Sword", "2"]);
///
/// let back: Loot = mapper.deserialize(&flat.header, &flat.row).unwrap();
/// assert_eq!(back, loot);
/// ```
pub struct CsvMapper {
    registry: Arc<ConverterRegistry>,
    options: MapperOptions,
    plans: RwLock<HashMap<TypeId, Arc<CompositePlan>>>,
}

impl Default for CsvMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvMapper {
    /// A mapper with the built-in converters and default options.
    pub fn new() -> Self {
        CsvMapperBuilder::new().build()
    }

    pub fn builder() -> CsvMapperBuilder {
        CsvMapperBuilder::new()
    }

    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    /// Resolves and caches the column plan of `T`.
    ///
    /// Call this at setup to surface configuration errors, such as a leaf type
    /// without a converter, before any record is processed.
    pub fn prepare<T: Composite>(&self) -> Result<Arc<CompositePlan>, MapperError> {
        let id = TypeId::of::<T>();

        if let Some(plan) = self
            .plans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            return Ok(Arc::clone(plan));
        }

        let Shape::Composite(shape) = T::shape(&self.registry)? else {
            return Err(MapperError::configuration(
                type_name::<T>(),
                "only composite types can be mapped to a record",
            ));
        };
        let plan = Arc::new(CompositePlan::compile(&shape, &self.options)?);

        debug!(
            "Compiled column plan for `{}`: {} fields, depth {}, {:?} traversal",
            plan.type_name(),
            shape.fields().len(),
            plan.depth(),
            Traversal::select(self.options.strategy, &plan)
        );

        let mut plans = self.plans.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(plans.entry(id).or_insert(plan)))
    }

    /// Flattens `value` into a header and a row of equal length.
    ///
    /// Nothing is returned unless every column converted.
    pub fn serialize<T: Composite>(&self, value: &T) -> Result<Flattened, MapperError> {
        let plan = self.prepare::<T>()?;
        graph::serialize(&plan, value)
    }

    /// Rebuilds a `T` from a header and a row using the configured strategy.
    pub fn deserialize<T: Composite>(&self, header: &Header, row: &Row) -> Result<T, MapperError> {
        let plan = self.prepare::<T>()?;
        let traversal = Traversal::select(self.options.strategy, &plan);
        self.deserialize_planned(&plan, header, row, traversal)
    }

    /// Rebuilds a `T` with an explicit strategy, ignoring the configured one.
    pub fn deserialize_with<T: Composite>(
        &self,
        header: &Header,
        row: &Row,
        strategy: TraversalStrategy,
    ) -> Result<T, MapperError> {
        let plan = self.prepare::<T>()?;
        let traversal = Traversal::select(strategy, &plan);
        self.deserialize_planned(&plan, header, row, traversal)
    }

    fn deserialize_planned<T: Composite>(
        &self,
        plan: &CompositePlan,
        header: &Header,
        row: &Row,
        traversal: Traversal,
    ) -> Result<T, MapperError> {
        let value = graph::deserialize(plan, header, row, traversal, self.options.max_depth)?;
        value.downcast::<T>().map(|value| *value).map_err(|_| {
            MapperError::configuration(type_name::<T>(), "plan produced a value of another type")
        })
    }
}

/// A builder for configuring a [`CsvMapper`].
///
/// # Default Configuration
///
/// - Registry: built-in converters only
/// - Naming convention: verbatim field names
/// - Item name: `item`
/// - Nested handling: in place
/// - Strategy: adaptive, recursive up to 16 levels of nesting
/// - Max depth: unlimited
#[derive(Default)]
pub struct CsvMapperBuilder {
    registry: Option<Arc<ConverterRegistry>>,
    options: MapperOptions,
}

impl CsvMapperBuilder {
    pub fn new() -> Self {
        Self {
            registry: None,
            options: MapperOptions::default(),
        }
    }

    /// Uses `registry` for leaf conversion.
    pub fn registry(mut self, registry: ConverterRegistry) -> Self {
        self.registry = Some(Arc::new(registry));
        self
    }

    /// Shares a registry that other mappers also use.
    pub fn shared_registry(mut self, registry: Arc<ConverterRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replaces every option at once, e.g. with options loaded from a file.
    pub fn options(mut self, options: MapperOptions) -> Self {
        self.options = options;
        self
    }

    pub fn naming_convention(mut self, naming_convention: NamingConvention) -> Self {
        self.options.naming_convention = naming_convention;
        self
    }

    /// Sets the prefix of collection item columns.
    pub fn item_name(mut self, item_name: impl Into<String>) -> Self {
        self.options.item_name = item_name.into();
        self
    }

    pub fn nested_handling(mut self, nested_handling: NestedHandling) -> Self {
        self.options.nested_handling = nested_handling;
        self
    }

    pub fn strategy(mut self, strategy: TraversalStrategy) -> Self {
        self.options.strategy = strategy;
        self
    }

    /// Rejects records of types nested deeper than `max_depth` composites.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = Some(max_depth);
        self
    }

    pub fn build(self) -> CsvMapper {
        CsvMapper {
            registry: self
                .registry
                .unwrap_or_else(|| Arc::new(ConverterRegistry::new())),
            options: self.options,
            plans: RwLock::new(HashMap::new()),
        }
    }
}
