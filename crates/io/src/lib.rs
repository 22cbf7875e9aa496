// File I/O operations

pub mod cache;
pub mod csv;
pub mod error;
pub mod export;

pub use cache::{LoadedTable, TableCache};
pub use error::LoadError;

/// Delimiter of the CLV export files.
pub const DEFAULT_DELIMITER: u8 = b';';
