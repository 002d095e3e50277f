//! Error types for configuration population

use std::path::PathBuf;

/// Errors that can occur while populating a record.
///
/// Entry points wrap these in [`anyhow::Error`] with context naming the
/// failing stage; recover the kind with `err.downcast_ref::<ConfError>()`.
///
/// Per-field conversion failures are never reported: a value that does not
/// parse leaves the field as it was.
#[derive(Debug, thiserror::Error)]
pub enum ConfError {
    /// The target was `None`.
    #[error("target should not be nil")]
    NilTarget,

    /// The target was passed by value rather than as `&mut`.
    #[error("target must be a mutable reference to a record, not a value")]
    NotAHandle,

    /// The target was a `&mut` to something that is not a record.
    #[error("target must refer to a record")]
    NotARecord,

    /// The configuration file could not be opened or read.
    #[error("failed to read file '{path}': {source}")]
    Open {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// File content is malformed or does not fit the record.
    #[error("failed to decode {format} content: {message}")]
    Decode {
        /// Format name (`json`, `yaml`, `toml`, `dotenv`)
        format: &'static str,
        /// What went wrong, including the field path when one is involved
        message: String,
    },

    /// Command-line arguments could not be parsed.
    #[error("invalid command-line arguments: {0}")]
    FlagParse(#[from] clap::Error),
}

impl ConfError {
    /// Create a decode error (used by the file adapter)
    pub(crate) fn decode(format: &'static str, message: impl std::fmt::Display) -> Self {
        Self::Decode {
            format,
            message: message.to_string(),
        }
    }

    /// `true` for shape validation failures.
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::NilTarget | Self::NotAHandle | Self::NotARecord)
    }

    /// `true` for failures reading or decoding a file.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Open { .. } | Self::Decode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_formats_correctly() {
        let err = ConfError::decode("json", "parent.nested.flag: expected bool");
        let msg = err.to_string();
        assert!(msg.contains("json"));
        assert!(msg.contains("parent.nested.flag"));
        assert!(err.is_decode());
        assert!(!err.is_shape());
    }

    #[test]
    fn test_open_includes_path() {
        let err = ConfError::Open {
            path: "/etc/app/config.toml".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("/etc/app/config.toml"));
        assert!(err.is_decode());
    }

    #[test]
    fn test_shape_errors() {
        assert!(ConfError::NilTarget.is_shape());
        assert!(ConfError::NotAHandle.is_shape());
        assert!(ConfError::NotARecord.is_shape());
    }
}
