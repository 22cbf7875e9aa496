use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum LoadError {
    /// The data file could not be opened or read.
    Read { path: PathBuf, message: String },
    /// The CSV reader rejected a record.
    Csv { path: PathBuf, message: String },
}

impl LoadError {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Read { path, .. } | Self::Csv { path, .. } => path,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Csv { path, message } => write!(f, "malformed CSV in {}: {message}", path.display()),
        }
    }
}

impl std::error::Error for LoadError {}
