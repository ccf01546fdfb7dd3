use crate::error::MapperError;

/// Result of reading one item: `Ok(None)` once the source is exhausted.
pub type ItemReaderResult<T> = Result<Option<T>, MapperError>;

/// Yields typed items from a document, one record at a time.
pub trait ItemReader<T> {
    fn read(&self) -> ItemReaderResult<T>;
}

/// Writes typed items to a document.
pub trait ItemWriter<T> {
    /// Writes `items` in order, stopping at the first failure.
    fn write(&self, items: &[T]) -> Result<(), MapperError>;

    fn flush(&self) -> Result<(), MapperError>;
}
