/// CSV documents of mapped records.
///
/// A document is one header line followed by rows. Every row of a document is
/// mapped with the same header, so all items written to one document must
/// flatten to the same columns: a `Vec` field holding three items in one record
/// and two in the next cannot share a document.
///
/// # Module Architecture
///
/// 1. **CsvRecordReader**: reads the header once, then rebuilds one item per
///    row through [`CsvMapper::deserialize`](crate::CsvMapper::deserialize).
///
/// 2. **CsvRecordWriter**: flattens items through
///    [`CsvMapper::serialize`](crate::CsvMapper::serialize), writes the header of
///    the first item and rejects items whose header differs from it.
///
/// Both components follow the builder pattern and share a mapper through an
/// `Arc`, so the column plans compiled by one are reused by the other.
///
/// Fields are never trimmed: leading and trailing spaces are part of the text
/// handed to the converters.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use csv_mapper::{
///     core::item::{ItemReader, ItemWriter},
///     item::csv::{csv_reader::CsvRecordReaderBuilder, csv_writer::CsvRecordWriterBuilder},
///     tabular_record, CsvMapper,
/// };
///
/// tabular_record! {
///     #[derive(Debug, Clone, PartialEq)]
///     struct City {
///         name: String,
///         districts: Vec<String>,
///         population: u32,
///     }
/// }
///
/// let mapper = Arc::new(CsvMapper::new());
/// let cities = vec![
///     City { name: "Boston".into(), districts: vec!["Back Bay".into(), "Fenway".into()], population: 4628910 },
///     City { name: "Concord".into(), districts: vec!["Center".into(), "West".into()], population: 42695 },
/// ];
///
/// let writer = CsvRecordWriterBuilder::new()
///     .mapper(Arc::clone(&mapper))
///     .from_writer(vec![]);
/// writer.write(cities.as_slice()).unwrap();
///
/// let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(data, "\
/// name,item1,item2,population
/// Boston,Back Bay,Fenway,4628910
/// Concord,Center,West,42695
/// ");
///
/// let reader = CsvRecordReaderBuilder::new()
///     .mapper(mapper)
///     .from_reader::<_, City>(data.as_bytes())
///     .unwrap();
///
/// let mut read = Vec::new();
/// while let Some(city) = reader.read().unwrap() {
///     read.push(city);
/// }
/// assert_eq!(read, cities);
/// ```

/// A module providing facilities for reading CSV data records.
pub mod csv_reader;

/// A module providing facilities for writing CSV data records.
pub mod csv_writer;
