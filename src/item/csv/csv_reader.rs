use csv::{ReaderBuilder, StringRecordsIntoIter, Terminator};
use log::debug;
use std::{cell::RefCell, fs::File, io::Read, marker::PhantomData, path::Path, sync::Arc};

use crate::{
    core::{
        item::{ItemReader, ItemReaderResult},
        mapper::CsvMapper,
        record::{Format, Header, Row},
    },
    error::MapperError,
    shape::Composite,
};

/// A CSV record reader that implements the `ItemReader` trait.
///
/// The first line of the document is its header. Every following line is
/// rebuilt into a `T` by the mapper, using that header.
///
/// # Implementation Details
///
/// - Uses a `RefCell` to provide interior mutability for the CSV record iterator
/// - Resolves the column plan of `T` when the reader is built, so a type that
///   cannot be mapped fails before any row is read
/// - Converts CSV parsing errors into `MapperError::ItemReader`
///
/// # Examples
///
/// ```
/// use csv_mapper::{core::item::ItemReader, item::csv::csv_reader::CsvRecordReaderBuilder, tabular_record};
///
/// tabular_record! {
///     #[derive(Debug)]
///     struct Record {
///         name: String,
///         scores: Vec<i32>,
///     }
/// }
///
/// let data = "\
/// name,item1,item2
/// foo,1,2
/// bar,3,4
/// ";
///
/// let reader = CsvRecordReaderBuilder::new()
///     .from_reader::<_, Record>(data.as_bytes())
///     .unwrap();
///
/// let record = reader.read().unwrap().unwrap();
/// assert_eq!(record.name, "foo");
/// assert_eq!(record.scores, vec![1, 2]);
///
/// let record = reader.read().unwrap().unwrap();
/// assert_eq!(record.name, "bar");
///
/// assert!(reader.read().unwrap().is_none());
/// ```
pub struct CsvRecordReader<R, T> {
    /// Iterator over the rows following the header
    records: RefCell<StringRecordsIntoIter<R>>,
    header: Header,
    mapper: Arc<CsvMapper>,
    item: PhantomData<fn() -> T>,
}

impl<R, T> CsvRecordReader<R, T> {
    /// The header read from the first line of the document.
    pub fn header(&self) -> &Header {
        &self.header
    }
}

impl<R: Read, T: Composite> ItemReader<T> for CsvRecordReader<R, T> {
    /// Reads the next item from the CSV document.
    ///
    /// # Returns
    /// - `Ok(Some(item))` if a row is successfully mapped
    /// - `Ok(None)` if there are no more rows to read
    /// - `Err(MapperError::ItemReader(_))` if the row cannot be parsed as CSV
    /// - any mapping error raised while rebuilding the item
    fn read(&self) -> ItemReaderResult<T> {
        let Some(result) = self.records.borrow_mut().next() else {
            return Ok(None);
        };

        match result {
            Ok(record) => {
                let row: Row = record.iter().collect();
                self.mapper.deserialize(&self.header, &row).map(Some)
            }
            Err(error) => Err(MapperError::ItemReader(error.to_string())),
        }
    }
}

/// A builder for configuring CSV record reading.
///
/// # Default Configuration
///
/// - Delimiter: comma (,)
/// - Quote: double quote (")
/// - Terminator: CRLF (either `\r\n` or `\n`)
/// - Mapper: a `CsvMapper` with default options
///
/// # Examples
///
/// ```
/// use csv::Terminator;
/// use csv_mapper::{item::csv::csv_reader::CsvRecordReaderBuilder, tabular_record};
///
/// tabular_record! {
///     struct Person {
///         name: String,
///         age: u8,
///     }
/// }
///
/// let reader = CsvRecordReaderBuilder::new()
///     .delimiter(b';')
///     .terminator(Terminator::Any(b'\n'))
///     .from_reader::<_, Person>("name;age\nAlice;30".as_bytes())
///     .unwrap();
///
/// assert_eq!(reader.header().names(), ["name", "age"]);
/// ```
pub struct CsvRecordReaderBuilder {
    format: Format,
    terminator: Terminator,
    mapper: Option<Arc<CsvMapper>>,
}

impl Default for CsvRecordReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvRecordReaderBuilder {
    pub fn new() -> Self {
        Self {
            format: Format::default(),
            terminator: Terminator::CRLF,
            mapper: None,
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.format.delimiter = delimiter;
        self
    }

    pub fn quote(mut self, quote: u8) -> Self {
        self.format.quote = quote;
        self
    }

    /// Sets delimiter and quote at once.
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn mapper(mut self, mapper: Arc<CsvMapper>) -> Self {
        self.mapper = Some(mapper);
        self
    }

    fn reader_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .delimiter(self.format.delimiter)
            .quote(self.format.quote)
            .terminator(self.terminator)
            .has_headers(true)
            .flexible(false);
        builder
    }

    pub fn from_reader<R: Read, T: Composite>(
        self,
        rdr: R,
    ) -> Result<CsvRecordReader<R, T>, MapperError> {
        let rdr = self.reader_builder().from_reader(rdr);
        self.build(rdr)
    }

    pub fn from_path<P: AsRef<Path>, T: Composite>(
        self,
        path: P,
    ) -> Result<CsvRecordReader<File, T>, MapperError> {
        let rdr = self
            .reader_builder()
            .from_path(path)
            .map_err(|error| MapperError::ItemReader(error.to_string()))?;
        self.build(rdr)
    }

    fn build<R: Read, T: Composite>(
        self,
        mut rdr: csv::Reader<R>,
    ) -> Result<CsvRecordReader<R, T>, MapperError> {
        let mapper = self.mapper.unwrap_or_else(|| Arc::new(CsvMapper::new()));
        mapper.prepare::<T>()?;

        let header: Header = rdr
            .headers()
            .map_err(|error| MapperError::ItemReader(error.to_string()))?
            .iter()
            .collect();

        debug!("Opened CSV document with {} columns", header.len());

        Ok(CsvRecordReader {
            records: RefCell::new(rdr.into_records()),
            header,
            mapper,
            item: PhantomData,
        })
    }
}
