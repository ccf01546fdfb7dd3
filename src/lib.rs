#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # CSV Mapper

 Maps strongly typed values to and from a single CSV record, a header plus one
 row, without any per-type mapping code beyond a declaration of the type's fields.

 ## Core Concepts

- **Leaf:** A value that occupies exactly one column. Its text form comes from a
  `ValueConverter` found in the `ConverterRegistry`.
- **Collection:** A homogeneous container of leaves, written as a run of numbered
  columns `item1`, `item2`, ... `itemN`.
- **Composite:** A record type whose fields are leaves, collections or other
  composites, expanded in declaration order.
- **CsvMapper:** The facade. It compiles one column plan per type and uses it for
  both directions, so a serialized record always deserializes back.

 ## Features

| **Feature** | **Description**                                                   |
|-------------|-------------------------------------------------------------------|
| csv         | Enables the CSV document `ItemReader` and `ItemWriter`            |
| chrono      | Registers converters for `chrono` dates and times                 |
| full        | Enables all available features                                    |

 ## Getting Started

```rust
use csv_mapper::{
    convert::{ConverterRegistry, ValueConverter},
    core::naming::NamingConvention,
    leaf_type, tabular_record, CsvMapper, MapperError,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cents(u64);

leaf_type!(Cents);

struct CentsConverter;

impl ValueConverter for CentsConverter {
    type Value = Cents;

    fn try_serialize(&self, value: &Cents, out: &mut String) -> bool {
        out.push_str(&format!("{}.{:02}", value.0 / 100, value.0 % 100));
        true
    }

    fn try_deserialize(&self, text: &str) -> Option<Cents> {
        let (units, cents) = text.split_once('.')?;
        Some(Cents(units.parse::<u64>().ok()? * 100 + cents.parse::<u64>().ok()?))
    }
}

tabular_record! {
    #[derive(Debug, PartialEq)]
    struct Order {
        customer: String,
        lines: Vec<u32>,
        total: Cents,
    }
}

fn main() -> Result<(), MapperError> {
    let registry = ConverterRegistry::builder()
        .register(CentsConverter)
        .build();

    let mapper = CsvMapper::builder()
        .registry(registry)
        .naming_convention(NamingConvention::PascalCase)
        .build();

    let order = Order {
        customer: "Ada".to_string(),
        lines: vec![7, 9],
        total: Cents(1250),
    };

    let flat = mapper.serialize(&order)?;
    assert_eq!(flat.header.names(), ["Customer", "item1", "item2", "Total"]);
    assert_eq!(flat.row.fields(), ["Ada", "7", "9", "12.50"]);

    let back: Order = mapper.deserialize(&flat.header, &flat.row)?;
    assert_eq!(back, order);

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
 */

/// Core module: the mapper facade, options and record types
pub mod core;

/// Value converters and the converter registry
pub mod convert;

/// Type shapes: leaves, collections and composites
pub mod shape;

/// Collection capabilities and reconstruction from item columns
pub mod collection;

/// Column plans and the object graph walkers
pub mod graph;

/// Error types for mapping operations
pub mod error;

#[doc(inline)]
pub use error::*;

#[doc(inline)]
pub use crate::core::mapper::{CsvMapper, CsvMapperBuilder};

#[doc(inline)]
pub use crate::core::record::{Flattened, Format, Header, Row};

/// Document readers and writers built on the mapper
#[cfg(feature = "csv")]
pub mod item;
