/// Reader and writer abstractions used by the document adapters.
pub mod item;

/// The conversion facade.
pub mod mapper;

/// Column naming conventions.
pub mod naming;

/// Mapper options and their defaults.
pub mod options;

/// Headers, rows and record formats.
pub mod record;
