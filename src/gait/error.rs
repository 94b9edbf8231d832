//! Error types for gait file loading.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// An error that prevented a gait file from being read at all.
///
/// Format problems inside the file are not errors at this level — the parser
/// is best-effort and reports those through `had_errors` and the trace.
#[derive(Debug)]
pub enum GaitError {
    /// The path does not exist or is not a regular file.
    NotFound(PathBuf),
    /// The file exists but could not be read.
    Io(PathBuf, io::Error),
}

impl fmt::Display for GaitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GaitError::NotFound(path) => write!(f, "\"{}\" is not a file", path.display()),
            GaitError::Io(path, err) => write!(f, "cannot read \"{}\": {}", path.display(), err),
        }
    }
}

impl std::error::Error for GaitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GaitError::NotFound(_) => None,
            GaitError::Io(_, err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_path() {
        let err = GaitError::NotFound(PathBuf::from("walk.gait"));
        assert_eq!(err.to_string(), "\"walk.gait\" is not a file");
    }

    #[test]
    fn io_error_keeps_source() {
        use std::error::Error;
        let err = GaitError::Io(
            PathBuf::from("walk.gait"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.source().is_some());
        assert!(err.to_string().contains("walk.gait"));
    }
}
