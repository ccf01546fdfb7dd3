pub mod common;

use std::fmt::Debug;

use common::{nest, random_name, Nest};
use csv_mapper::{
    core::options::TraversalStrategy, shape::Composite, tabular_record, CsvMapper, Header,
    MapperError, Row,
};

tabular_record! {
    #[derive(Debug, Clone, PartialEq)]
    struct Sample {
        label: String,
        readings: Vec<i32>,
        note: Option<String>,
    }
}

type D1 = Sample;
type D2 = Nest<D1>;
type D3 = Nest<D2>;
type D4 = Nest<D3>;
type D5 = Nest<D4>;
type D6 = Nest<D5>;
type D7 = Nest<D6>;
type D8 = Nest<D7>;
type D9 = Nest<D8>;
type D10 = Nest<D9>;

fn sample() -> Sample {
    Sample {
        label: random_name(),
        readings: vec![4, -8, 15],
        note: None,
    }
}

fn d10() -> D10 {
    nest(10, nest(9, nest(8, nest(7, nest(6, nest(5, nest(4, nest(3, nest(2, sample())))))))))
}

/// Deserializes the serialized `value` with both strategies and checks both
/// rebuild the original.
fn assert_equivalent<T: Composite + Debug + PartialEq>(mapper: &CsvMapper, value: &T) {
    let flat = mapper.serialize(value).unwrap();

    let recursive: T = mapper
        .deserialize_with(&flat.header, &flat.row, TraversalStrategy::Recursive)
        .unwrap();
    let work_stack: T = mapper
        .deserialize_with(&flat.header, &flat.row, TraversalStrategy::WorkStack)
        .unwrap();

    assert_eq!(recursive, work_stack);
    assert_eq!(&recursive, value);
}

fn error_text<T: Composite + Debug>(
    mapper: &CsvMapper,
    header: &Header,
    row: &Row,
    strategy: TraversalStrategy,
) -> String {
    mapper
        .deserialize_with::<T>(header, row, strategy)
        .unwrap_err()
        .to_string()
}

#[test]
fn strategies_should_agree_at_every_depth() {
    let mapper = CsvMapper::new();
    let value = d10();

    assert_equivalent::<D1>(&mapper, &value.inner.inner.inner.inner.inner.inner.inner.inner.inner);
    assert_equivalent::<D2>(&mapper, &value.inner.inner.inner.inner.inner.inner.inner.inner);
    assert_equivalent::<D3>(&mapper, &value.inner.inner.inner.inner.inner.inner.inner);
    assert_equivalent::<D4>(&mapper, &value.inner.inner.inner.inner.inner.inner);
    assert_equivalent::<D5>(&mapper, &value.inner.inner.inner.inner.inner);
    assert_equivalent::<D6>(&mapper, &value.inner.inner.inner.inner);
    assert_equivalent::<D7>(&mapper, &value.inner.inner.inner);
    assert_equivalent::<D8>(&mapper, &value.inner.inner);
    assert_equivalent::<D9>(&mapper, &value.inner);
    assert_equivalent::<D10>(&mapper, &value);
}

#[test]
fn plan_depth_should_follow_nesting() {
    let mapper = CsvMapper::new();
    assert_eq!(mapper.prepare::<D1>().unwrap().depth(), 1);
    assert_eq!(mapper.prepare::<D10>().unwrap().depth(), 10);
}

#[test]
fn adaptive_strategy_should_switch_to_the_work_stack() {
    let mapper = CsvMapper::builder()
        .strategy(TraversalStrategy::Adaptive {
            max_recursion_depth: 3,
        })
        .build();
    let value = d10();

    let flat = mapper.serialize(&value).unwrap();
    let back: D10 = mapper.deserialize(&flat.header, &flat.row).unwrap();
    assert_eq!(back, value);
}

#[test]
fn strategies_should_report_the_same_malformed_column() {
    let mapper = CsvMapper::new();
    let flat = mapper.serialize(&d10()).unwrap();

    let mut fields = flat.row.clone().into_inner();
    // Second reading of the innermost record, after nine levels and the label.
    fields[11] = "not a number".to_string();
    let row = Row::new(fields);

    let recursive = error_text::<D10>(&mapper, &flat.header, &row, TraversalStrategy::Recursive);
    let work_stack = error_text::<D10>(&mapper, &flat.header, &row, TraversalStrategy::WorkStack);

    assert_eq!(recursive, work_stack);
    assert!(recursive.contains("column 11"));
    assert!(recursive.contains("not a number"));
}

#[test]
fn strategies_should_report_the_same_structural_error() {
    let mapper = CsvMapper::new();
    let flat = mapper.serialize(&d10()).unwrap();

    let mut names = flat.header.clone().into_inner();
    names[11] = "item3".to_string();
    let header = Header::new(names);

    let recursive = error_text::<D10>(&mapper, &header, &flat.row, TraversalStrategy::Recursive);
    let work_stack = error_text::<D10>(&mapper, &header, &flat.row, TraversalStrategy::WorkStack);

    assert_eq!(recursive, work_stack);
    assert!(recursive.contains("expected index 2"));
}

#[test]
fn depth_limit_should_stop_both_strategies() {
    let mapper = CsvMapper::builder().max_depth(8).build();
    let flat = CsvMapper::new().serialize(&d10()).unwrap();

    for strategy in [TraversalStrategy::Recursive, TraversalStrategy::WorkStack] {
        let error = mapper
            .deserialize_with::<D10>(&flat.header, &flat.row, strategy)
            .unwrap_err();
        assert!(matches!(
            error,
            MapperError::DepthLimitExceeded { depth: 9, limit: 8 }
        ));
    }

    let shallow = d10().inner.inner;
    let flat = mapper.serialize(&shallow).unwrap();
    let back: D8 = mapper
        .deserialize_with(&flat.header, &flat.row, TraversalStrategy::WorkStack)
        .unwrap();
    assert_eq!(back, shallow);
}
