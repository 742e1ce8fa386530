use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Outcome of one load attempt, as reported to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadStatus {
    Success,
    FileNotFound,
    CannotOpenFile,
    InvalidFormat,
    CorruptedFile,
    EmptyFile,
    UnsupportedFormat,
    ReadError,
}

impl LoadStatus {
    pub fn is_success(self) -> bool {
        self == LoadStatus::Success
    }

    pub fn label(self) -> &'static str {
        match self {
            LoadStatus::Success => "success",
            LoadStatus::FileNotFound => "file not found",
            LoadStatus::CannotOpenFile => "cannot open file",
            LoadStatus::InvalidFormat => "invalid format",
            LoadStatus::CorruptedFile => "corrupted file",
            LoadStatus::EmptyFile => "empty file",
            LoadStatus::UnsupportedFormat => "unsupported format",
            LoadStatus::ReadError => "read error",
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a load failed. `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file does not exist: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("cannot open file {}: {kind}", .path.display())]
    CannotOpenFile { path: PathBuf, kind: io::ErrorKind },

    #[error("invalid STL: {message}")]
    InvalidFormat { message: String },

    /// Grammar violation in an ASCII file.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// Structurally impossible binary content.
    #[error("corrupted STL: {message}")]
    Corrupted { message: String },

    #[error("{message}")]
    Empty { message: String },

    #[error("unsupported STL variant: {message}")]
    Unsupported { message: String },

    /// The byte stream failed mid-decode.
    #[error("read error: {message}")]
    Read { message: String },
}

impl LoadError {
    pub fn status(&self) -> LoadStatus {
        match self {
            LoadError::FileNotFound { .. } => LoadStatus::FileNotFound,
            LoadError::CannotOpenFile { .. } => LoadStatus::CannotOpenFile,
            LoadError::InvalidFormat { .. } => LoadStatus::InvalidFormat,
            LoadError::Syntax { .. } | LoadError::Corrupted { .. } => LoadStatus::CorruptedFile,
            LoadError::Empty { .. } => LoadStatus::EmptyFile,
            LoadError::Unsupported { .. } => LoadStatus::UnsupportedFormat,
            LoadError::Read { .. } => LoadStatus::ReadError,
        }
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        LoadError::InvalidFormat { message: message.into() }
    }

    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        LoadError::Syntax { line, message: message.into() }
    }

    pub fn corrupted(message: impl Into<String>) -> Self {
        LoadError::Corrupted { message: message.into() }
    }

    pub fn empty(message: impl Into<String>) -> Self {
        LoadError::Empty { message: message.into() }
    }

    pub fn read(message: impl Into<String>) -> Self {
        LoadError::Read { message: message.into() }
    }

    /// Line number of an ASCII grammar violation.
    pub fn line(&self) -> Option<usize> {
        match self {
            LoadError::Syntax { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;
