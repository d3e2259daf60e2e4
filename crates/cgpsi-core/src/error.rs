//! Error type for pressure file parsing and collection.

use std::io;
use std::path::PathBuf;

/// Result type alias for PSI operations.
pub type Result<T> = std::result::Result<T, PsiError>;

/// Errors raised while reading or decoding pressure files.
#[derive(thiserror::Error, Debug)]
pub enum PsiError {
    /// The caller passed no target to write into.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A field is not of the form `key=value`.
    #[error("invalid psi data: {token:?}")]
    MalformedToken { token: String },

    /// A known key carries a value that is not a valid number.
    #[error("invalid PSI value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    /// The stream failed partway through the scan.
    #[error("unable to read {}/{file}: {source}", path.display())]
    StreamRead {
        path: PathBuf,
        file: String,
        #[source]
        source: io::Error,
    },

    /// The file accessor could not open the pressure file.
    #[error("unable to open {}/{file}: {source}", path.display())]
    Open {
        path: PathBuf,
        file: String,
        #[source]
        source: io::Error,
    },

    /// The file name does not belong to any resource domain.
    #[error("unknown pressure file: {name:?}")]
    UnknownFile { name: String },
}

impl PsiError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn malformed_token(token: impl Into<String>) -> Self {
        Self::MalformedToken {
            token: token.into(),
        }
    }

    pub fn invalid_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn stream_read(path: impl Into<PathBuf>, file: impl Into<String>, source: io::Error) -> Self {
        Self::StreamRead {
            path: path.into(),
            file: file.into(),
            source,
        }
    }

    pub fn open(path: impl Into<PathBuf>, file: impl Into<String>, source: io::Error) -> Self {
        Self::Open {
            path: path.into(),
            file: file.into(),
            source,
        }
    }

    pub fn unknown_file(name: impl Into<String>) -> Self {
        Self::UnknownFile { name: name.into() }
    }

    /// Returns the underlying I/O error kind, if this error wraps one.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::StreamRead { source, .. } | Self::Open { source, .. } => Some(source.kind()),
            _ => None,
        }
    }

    /// True when the kernel refused the read because PSI is disabled.
    pub fn is_unsupported(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::Unsupported)
    }
}
