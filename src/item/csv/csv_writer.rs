use std::{
    cell::RefCell,
    fs::File,
    io::{self, Write},
    path::Path,
    sync::Arc,
};

use csv::{Writer, WriterBuilder};
use log::debug;

use crate::{
    core::{
        item::ItemWriter,
        mapper::CsvMapper,
        record::{Format, Header},
    },
    error::{MapperError, StructuralError},
    shape::Composite,
};

/// Writes mapped records to a CSV document.
///
/// The header of the first item written becomes the document header. Every
/// later item must flatten to the same header, otherwise the write fails with
/// [`StructuralError::HeaderMismatch`] and nothing is written for that item.
pub struct CsvRecordWriter<W: Write> {
    wrapper: RefCell<Writer<W>>,
    header: RefCell<Option<Header>>,
    has_headers: bool,
    mapper: Arc<CsvMapper>,
}

impl<W: Write, T: Composite> ItemWriter<T> for CsvRecordWriter<W> {
    fn write(&self, items: &[T]) -> Result<(), MapperError> {
        for item in items {
            let flat = self.mapper.serialize(item)?;
            self.check_header(&flat.header)?;

            let result = self.wrapper.borrow_mut().write_record(flat.row.fields());
            match result {
                Ok(()) => {}
                Err(error) => return Err(MapperError::ItemWriter(error.to_string())),
            }
        }
        Ok(())
    }

    /// Flush the contents of the internal buffer to the underlying writer.
    ///
    /// Note that this also flushes the underlying writer.
    fn flush(&self) -> Result<(), MapperError> {
        let result = self.wrapper.borrow_mut().flush();
        match result {
            Ok(()) => Ok(()),
            Err(error) => Err(MapperError::ItemWriter(error.to_string())),
        }
    }
}

impl<W: Write> CsvRecordWriter<W> {
    /// The document header, once the first item has been written.
    pub fn header(&self) -> Option<Header> {
        self.header.borrow().clone()
    }

    /// Writes the header on first use, then compares every header against it.
    fn check_header(&self, header: &Header) -> Result<(), MapperError> {
        let mut current = self.header.borrow_mut();

        match current.as_ref() {
            Some(expected) if expected == header => Ok(()),
            Some(expected) => {
                let column = expected
                    .names()
                    .iter()
                    .zip(header.names())
                    .position(|(left, right)| left != right)
                    .unwrap_or_else(|| expected.len().min(header.len()));
                Err(StructuralError::HeaderMismatch { column }.into())
            }
            None => {
                if self.has_headers {
                    self.wrapper
                        .borrow_mut()
                        .write_record(header.names())
                        .map_err(|error| MapperError::ItemWriter(error.to_string()))?;
                }
                debug!("Document header set to {} columns", header.len());
                *current = Some(header.clone());
                Ok(())
            }
        }
    }

    pub fn into_inner(self) -> Result<W, MapperError> {
        let result = self.wrapper.into_inner().into_inner();
        match result {
            Ok(inner) => Ok(inner),
            Err(error) => Err(MapperError::ItemWriter(error.to_string())),
        }
    }
}

/// A builder for configuring CSV record writing.
///
/// # Default Configuration
///
/// - Delimiter: comma (,)
/// - Quote: double quote (")
/// - Headers: enabled
/// - Mapper: a `CsvMapper` with default options
pub struct CsvRecordWriterBuilder {
    format: Format,
    has_headers: bool,
    mapper: Option<Arc<CsvMapper>>,
}

impl Default for CsvRecordWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvRecordWriterBuilder {
    pub fn new() -> CsvRecordWriterBuilder {
        CsvRecordWriterBuilder {
            format: Format::default(),
            has_headers: true,
            mapper: None,
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> CsvRecordWriterBuilder {
        self.format.delimiter = delimiter;
        self
    }

    pub fn quote(mut self, quote: u8) -> CsvRecordWriterBuilder {
        self.format.quote = quote;
        self
    }

    /// Sets delimiter and quote at once.
    pub fn format(mut self, format: Format) -> CsvRecordWriterBuilder {
        self.format = format;
        self
    }

    /// Whether the header line is written. Headers are still compared when it is not.
    pub fn has_headers(mut self, yes: bool) -> CsvRecordWriterBuilder {
        self.has_headers = yes;
        self
    }

    pub fn mapper(mut self, mapper: Arc<CsvMapper>) -> CsvRecordWriterBuilder {
        self.mapper = Some(mapper);
        self
    }

    fn writer_builder(&self) -> WriterBuilder {
        let mut builder = WriterBuilder::new();
        builder
            .delimiter(self.format.delimiter)
            .quote(self.format.quote)
            .has_headers(false)
            .flexible(false);
        builder
    }

    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvRecordWriter<File>, MapperError> {
        let wtr = self
            .writer_builder()
            .from_path(path)
            .map_err(|error| MapperError::ItemWriter(error.to_string()))?;
        Ok(self.build(wtr))
    }

    /// Writes CSV to any `io::Write`, such as a `Vec<u8>` buffer.
    ///
    /// ```
    /// # use std::error::Error;
    /// # use csv_mapper::{item::csv::csv_writer::CsvRecordWriterBuilder, core::item::ItemWriter, tabular_record};
    /// tabular_record! {
    ///     struct Row {
    ///         city: String,
    ///         population: u64,
    ///     }
    /// }
    ///
    /// # fn main() { example().unwrap(); }
    /// fn example() -> Result<(), Box<dyn Error>> {
    ///     let wtr = CsvRecordWriterBuilder::new()
    ///         .delimiter(b';')
    ///         .from_writer(vec![]);
    ///
    ///     wtr.write(&[
    ///         Row { city: "Boston".into(), population: 4628910 },
    ///         Row { city: "Concord".into(), population: 42695 },
    ///     ])?;
    ///
    ///     let data = String::from_utf8(wtr.into_inner()?)?;
    ///     assert_eq!(data, "\
    /// city;population
    /// Boston;4628910
    /// Concord;42695
    /// ");
    ///     Ok(())
    /// }
    /// ```
    pub fn from_writer<W: io::Write>(self, wtr: W) -> CsvRecordWriter<W> {
        let wtr = self.writer_builder().from_writer(wtr);
        self.build(wtr)
    }

    fn build<W: io::Write>(self, wtr: Writer<W>) -> CsvRecordWriter<W> {
        CsvRecordWriter {
            wrapper: RefCell::new(wtr),
            header: RefCell::new(None),
            has_headers: self.has_headers,
            mapper: self.mapper.unwrap_or_else(|| Arc::new(CsvMapper::new())),
        }
    }
}
