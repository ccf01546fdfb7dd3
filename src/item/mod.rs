#[cfg(feature = "csv")]
/// This module provides a CSV record reader and writer built on the mapper.
pub mod csv;
