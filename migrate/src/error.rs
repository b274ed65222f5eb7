use std::error;
use std::fmt;

/// Convenient result type for migration operations using [`MigrateError`] as the error type.
pub type MigrateResult<T> = Result<T, MigrateError>;

/// Main error type for migration operations.
///
/// A [`MigrateError`] always carries an [`ErrorKind`], which is what callers branch on
/// (fatal versus per-record failures), a static description and, optionally, the
/// diagnostic detail reported by the failing component.
#[derive(Debug, Clone)]
pub struct MigrateError {
    repr: ErrorRepr,
}

#[derive(Debug, Clone)]
enum ErrorRepr {
    /// Error with kind and static description
    WithDescription(ErrorKind, &'static str),
    /// Error with kind, static description, and dynamic detail
    WithDescriptionAndDetail(ErrorKind, &'static str, String),
}

/// Categories of errors that can occur during a migration run.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    // Run-level failures, a run stops on these.
    RemoteUnavailable,
    CorruptStore,

    // Per-record failures, a run records them and continues.
    MigrationFailed,
    CheckpointWrite,

    // Ledger client failures, reclassified by the directory and the migrator.
    LedgerRequestFailed,
    LedgerRejected,
    InvalidData,

    // Configuration
    ConfigError,

    // IO & Serialization
    IoError,
    SerializationError,
    DeserializationError,

    Unknown,
}

impl MigrateError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self.repr {
            ErrorRepr::WithDescription(kind, _)
            | ErrorRepr::WithDescriptionAndDetail(kind, _, _) => kind,
        }
    }

    /// Returns the static description of this error.
    pub fn description(&self) -> &'static str {
        match self.repr {
            ErrorRepr::WithDescription(_, desc)
            | ErrorRepr::WithDescriptionAndDetail(_, desc, _) => desc,
        }
    }

    /// Returns the detailed error information if available.
    pub fn detail(&self) -> Option<&str> {
        match self.repr {
            ErrorRepr::WithDescriptionAndDetail(_, _, ref detail) => Some(detail.as_str()),
            ErrorRepr::WithDescription(_, _) => None,
        }
    }

    /// Wraps this error into a new kind, keeping the full original message as detail.
    ///
    /// Used at component boundaries, e.g. a failed ledger request becomes
    /// [`ErrorKind::RemoteUnavailable`] when it happens while listing records.
    pub fn reclassify(self, kind: ErrorKind, desc: &'static str) -> MigrateError {
        MigrateError {
            repr: ErrorRepr::WithDescriptionAndDetail(kind, desc, self.to_string()),
        }
    }
}

impl PartialEq for MigrateError {
    fn eq(&self, other: &MigrateError) -> bool {
        self.kind() == other.kind()
    }
}

impl fmt::Display for MigrateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.repr {
            ErrorRepr::WithDescription(kind, desc) => {
                fmt::Debug::fmt(&kind, f)?;
                f.write_str(": ")?;
                desc.fmt(f)
            }
            ErrorRepr::WithDescriptionAndDetail(kind, desc, ref detail) => {
                fmt::Debug::fmt(&kind, f)?;
                f.write_str(": ")?;
                desc.fmt(f)?;
                f.write_str(" -> ")?;
                detail.fmt(f)
            }
        }
    }
}

impl error::Error for MigrateError {}

/// Creates a [`MigrateError`] from an error kind and static description.
impl From<(ErrorKind, &'static str)> for MigrateError {
    fn from((kind, desc): (ErrorKind, &'static str)) -> MigrateError {
        MigrateError {
            repr: ErrorRepr::WithDescription(kind, desc),
        }
    }
}

/// Creates a [`MigrateError`] from an error kind, static description, and dynamic detail.
impl From<(ErrorKind, &'static str, String)> for MigrateError {
    fn from((kind, desc, detail): (ErrorKind, &'static str, String)) -> MigrateError {
        MigrateError {
            repr: ErrorRepr::WithDescriptionAndDetail(kind, desc, detail),
        }
    }
}

/// Converts [`std::io::Error`] to [`MigrateError`] with [`ErrorKind::IoError`].
impl From<std::io::Error> for MigrateError {
    fn from(err: std::io::Error) -> MigrateError {
        MigrateError {
            repr: ErrorRepr::WithDescriptionAndDetail(
                ErrorKind::IoError,
                "I/O error occurred",
                err.to_string(),
            ),
        }
    }
}

/// Converts [`serde_json::Error`] to [`MigrateError`] based on the serde error category.
impl From<serde_json::Error> for MigrateError {
    fn from(err: serde_json::Error) -> MigrateError {
        let (kind, description) = match err.classify() {
            serde_json::error::Category::Io => (ErrorKind::IoError, "JSON I/O operation failed"),
            serde_json::error::Category::Syntax
            | serde_json::error::Category::Data
            | serde_json::error::Category::Eof => (
                ErrorKind::DeserializationError,
                "JSON deserialization failed",
            ),
        };

        MigrateError {
            repr: ErrorRepr::WithDescriptionAndDetail(kind, description, err.to_string()),
        }
    }
}

/// Converts [`reqwest::Error`] to [`MigrateError`].
///
/// Timeouts and connection errors are request failures, a body that cannot be
/// decoded is a deserialization failure.
impl From<reqwest::Error> for MigrateError {
    fn from(err: reqwest::Error) -> MigrateError {
        let (kind, description) = if err.is_decode() {
            (
                ErrorKind::DeserializationError,
                "Ledger response could not be decoded",
            )
        } else if err.is_timeout() {
            (ErrorKind::LedgerRequestFailed, "Ledger request timed out")
        } else {
            (ErrorKind::LedgerRequestFailed, "Ledger request failed")
        };

        MigrateError {
            repr: ErrorRepr::WithDescriptionAndDetail(kind, description, err.to_string()),
        }
    }
}
