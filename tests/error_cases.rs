mod common;

use common::{Money, MockMoneyConverter};
use csv_mapper::{
    convert::ConverterRegistry,
    core::{naming::NamingConvention, options::NestedHandling},
    error::StructuralError,
    tabular_record, CsvMapper, Header, MapperError, Row,
};

tabular_record! {
    #[derive(Debug, PartialEq)]
    struct Loot {
        items: Vec<String>,
        count: u32,
    }
}

tabular_record! {
    #[derive(Debug, PartialEq)]
    struct Invoice {
        id: u32,
        amount: Money,
        memo: String,
    }
}

tabular_record! {
    #[derive(Debug, PartialEq)]
    struct Pair {
        values: [u8; 2],
    }
}

tabular_record! {
    #[derive(Debug, PartialEq)]
    struct Ledger {
        debits: Vec<u8>,
        credits: Vec<u8>,
    }
}

tabular_record! {
    #[derive(Debug, Clone, PartialEq)]
    struct Inner {
        tags: Vec<String>,
        n: u32,
    }
}

tabular_record! {
    #[derive(Debug, Clone, PartialEq)]
    struct Outer {
        items: Vec<String>,
        inner: Inner,
    }
}

tabular_record! {
    #[derive(Debug, PartialEq)]
    struct Tally {
        marks: Vec<u8>,
        item2: u8,
    }
}

fn loot_mapper() -> CsvMapper {
    CsvMapper::builder()
        .naming_convention(NamingConvention::PascalCase)
        .build()
}

fn record(names: &[&str], fields: &[&str]) -> (Header, Row) {
    (
        names.iter().copied().collect(),
        fields.iter().copied().collect(),
    )
}

#[test]
fn gap_in_item_numbers_should_be_structural() {
    let (header, row) = record(&["item1", "item3", "Count"], &["Spear", "Sword", "2"]);

    let error = loot_mapper().deserialize::<Loot>(&header, &row).unwrap_err();

    assert!(matches!(
        error,
        MapperError::Structural(StructuralError::OutOfSequence {
            column: 1,
            ref found,
            expected_index: 2,
        }) if found == "item3"
    ));
}

#[test]
fn reordered_items_should_be_structural() {
    let (header, row) = record(&["item2", "item1", "Count"], &["Sword", "Spear", "2"]);

    let error = loot_mapper().deserialize::<Loot>(&header, &row).unwrap_err();

    assert!(matches!(
        error,
        MapperError::Structural(StructuralError::OutOfSequence {
            column: 0,
            expected_index: 1,
            ..
        })
    ));
}

#[test]
fn malformed_number_should_name_its_column() {
    let (header, row) = record(&["item1", "item2", "Count"], &["Spear", "Sword", "two"]);

    match loot_mapper().deserialize::<Loot>(&header, &row).unwrap_err() {
        MapperError::FieldConversion {
            column,
            header,
            type_name,
            text,
        } => {
            assert_eq!(column, 2);
            assert_eq!(header, "Count");
            assert_eq!(type_name, "u32");
            assert_eq!(text, "two");
        }
        error => panic!("unexpected error: {error}"),
    }
}

#[test]
fn header_and_row_lengths_must_agree() {
    let (header, row) = record(&["item1", "Count"], &["Spear", "Sword", "2"]);

    let error = loot_mapper().deserialize::<Loot>(&header, &row).unwrap_err();
    assert!(matches!(
        error,
        MapperError::Structural(StructuralError::LengthMismatch { header: 2, row: 3 })
    ));
}

#[test]
fn unconsumed_columns_should_be_rejected() {
    let (header, row) = record(&["item1", "Count", "Extra"], &["Spear", "1", "x"]);

    let error = loot_mapper().deserialize::<Loot>(&header, &row).unwrap_err();
    assert!(matches!(
        error,
        MapperError::Structural(StructuralError::TrailingColumn { column: 2, .. })
    ));
}

#[test]
fn misnamed_column_should_be_rejected() {
    let (header, row) = record(&["item1", "Total"], &["Spear", "1"]);

    let error = loot_mapper().deserialize::<Loot>(&header, &row).unwrap_err();
    assert_eq!(
        error.to_string(),
        "column 1: expected `Count`, found `Total`"
    );
}

#[test]
fn missing_column_should_be_rejected() {
    let (header, row) = record(&["item1"], &["Spear"]);

    let error = loot_mapper().deserialize::<Loot>(&header, &row).unwrap_err();
    assert!(matches!(
        error,
        MapperError::Structural(StructuralError::MissingColumn { column: 1, .. })
    ));
}

#[test]
fn fixed_size_container_should_reject_other_lengths() {
    let mapper = CsvMapper::new();
    let (header, row) = record(&["item1", "item2", "item3"], &["1", "2", "3"]);

    let error = mapper.deserialize::<Pair>(&header, &row).unwrap_err();
    assert!(matches!(
        error,
        MapperError::Structural(StructuralError::FixedLength {
            expected: 2,
            found: 3,
            ..
        })
    ));

    let (header, row) = record(&["item1", "item2"], &["1", "2"]);
    assert_eq!(
        mapper.deserialize::<Pair>(&header, &row).unwrap(),
        Pair { values: [1, 2] }
    );
}

#[test]
fn refused_serialization_should_return_no_row() {
    let mut converter = MockMoneyConverter::new();
    converter
        .expect_try_serialize()
        .times(1)
        .returning(|_, _| false);

    let mapper = CsvMapper::builder()
        .registry(ConverterRegistry::builder().register(converter).build())
        .build();

    let invoice = Invoice {
        id: 7,
        amount: Money { cents: -1 },
        memo: "refund".to_string(),
    };

    let error = mapper.serialize(&invoice).unwrap_err();
    assert!(matches!(
        error,
        MapperError::Serialization { ref column, .. } if column == "amount"
    ));
}

#[test]
fn rejected_user_text_should_be_a_conversion_error() {
    let mut converter = MockMoneyConverter::new();
    converter
        .expect_try_deserialize()
        .times(1)
        .returning(|_| None);

    let mapper = CsvMapper::builder()
        .registry(ConverterRegistry::builder().register(converter).build())
        .build();
    let (header, row) = record(&["id", "amount", "memo"], &["7", "12,50", "refund"]);

    let error = mapper.deserialize::<Invoice>(&header, &row).unwrap_err();
    assert!(matches!(
        error,
        MapperError::FieldConversion { column: 1, ref text, .. } if text == "12,50"
    ));
}

#[test]
fn conversion_should_stop_at_the_first_failure() {
    let mut converter = MockMoneyConverter::new();
    converter.expect_try_deserialize().never();

    let mapper = CsvMapper::builder()
        .registry(ConverterRegistry::builder().register(converter).build())
        .build();
    let (header, row) = record(&["id", "amount", "memo"], &["seven", "1250", "refund"]);

    let error = mapper.deserialize::<Invoice>(&header, &row).unwrap_err();
    assert!(matches!(error, MapperError::FieldConversion { column: 0, .. }));
}

#[test]
fn adjacent_collections_should_fail_at_setup() {
    let mapper = CsvMapper::new();

    let error = mapper.prepare::<Ledger>().unwrap_err();
    assert!(matches!(error, MapperError::Configuration { .. }));

    let ledger = Ledger {
        debits: vec![1, 2],
        credits: vec![3],
    };
    assert!(matches!(
        mapper.serialize(&ledger),
        Err(MapperError::Configuration { .. })
    ));
}

#[test]
fn collection_followed_by_nested_collection_should_fail_in_place() {
    let mapper = CsvMapper::new();
    assert!(matches!(
        mapper.prepare::<Outer>(),
        Err(MapperError::Configuration { .. })
    ));

    let (header, row) = record(&["item1", "item2", "n"], &["a", "b", "1"]);
    assert!(matches!(
        mapper.deserialize::<Outer>(&header, &row),
        Err(MapperError::Configuration { .. })
    ));
}

#[test]
fn scalar_named_like_an_item_should_fail_at_setup() {
    let error = CsvMapper::new().prepare::<Tally>().unwrap_err();
    assert!(error.to_string().contains("`item2`"));
}

#[test]
fn prefixed_nesting_should_separate_sibling_collections() {
    let mapper = CsvMapper::builder()
        .nested_handling(NestedHandling::prefixed())
        .build();

    for items in [vec![], vec!["a".to_string(), "b".to_string()]] {
        let outer = Outer {
            items,
            inner: Inner {
                tags: vec!["x".to_string()],
                n: 3,
            },
        };

        let flat = mapper.serialize(&outer).unwrap();
        let back: Outer = mapper.deserialize(&flat.header, &flat.row).unwrap();
        assert_eq!(back, outer);
    }
}
