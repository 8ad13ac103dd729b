use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure categories of a single implementation run. All of them are
/// terminal for the invocation that raised them.
#[derive(Debug, Error)]
pub enum ImplError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("type '{type_name}' cannot be implemented: {reason}")]
    NotImplementable { type_name: String, reason: String },

    #[error("type '{type_name}' cannot be introspected: {reason}")]
    NotIntrospectable { type_name: String, reason: String },

    #[error("class '{type_name}' has no non-private constructor to delegate to")]
    NoAccessibleConstructor { type_name: String },

    #[error("cannot create directory: '{}' exists and is not a directory", .path.display())]
    PathConflict { path: PathBuf },

    #[error("access denied: {}: {source}", .path.display())]
    AccessDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error at {}: {source}", .path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("compilation of '{}' failed: {reason}", .unit.display())]
    CompileFailure { unit: PathBuf, reason: String },

    #[error("cannot write archive '{}': {reason}", .path.display())]
    ArchiveFailure { path: PathBuf, reason: String },
}

impl ImplError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ImplError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn not_introspectable(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        ImplError::NotIntrospectable {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    pub fn not_implementable(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        ImplError::NotImplementable {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Classify an I/O error raised while touching `path`.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match source.kind() {
            io::ErrorKind::PermissionDenied => ImplError::AccessDenied { path, source },
            _ => ImplError::IoFailure { path, source },
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            ImplError::InvalidArgument { .. } => "InvalidArgument",
            ImplError::NotImplementable { .. } => "NotImplementable",
            ImplError::NotIntrospectable { .. } => "NotIntrospectable",
            ImplError::NoAccessibleConstructor { .. } => "NoAccessibleConstructor",
            ImplError::PathConflict { .. } => "PathConflict",
            ImplError::AccessDenied { .. } => "AccessDenied",
            ImplError::IoFailure { .. } => "IOFailure",
            ImplError::CompileFailure { .. } => "CompileFailure",
            ImplError::ArchiveFailure { .. } => "ArchiveFailure",
        }
    }

    /// Process exit status for this category. Usage errors from the argument
    /// parser use 2, so the categories start at 3.
    pub fn exit_code(&self) -> i32 {
        match self {
            ImplError::InvalidArgument { .. } => 3,
            ImplError::NotImplementable { .. } => 4,
            ImplError::NotIntrospectable { .. } => 5,
            ImplError::NoAccessibleConstructor { .. } => 6,
            ImplError::PathConflict { .. } => 7,
            ImplError::AccessDenied { .. } => 8,
            ImplError::IoFailure { .. } => 9,
            ImplError::CompileFailure { .. } => 10,
            ImplError::ArchiveFailure { .. } => 11,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_maps_to_access_denied() {
        let error = ImplError::io(
            "/root/secret",
            io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        );
        assert_eq!(error.category(), "AccessDenied");
        assert!(error.to_string().contains("/root/secret"));
    }

    #[test]
    fn other_io_errors_map_to_io_failure() {
        let error = ImplError::io("out", io::Error::new(io::ErrorKind::Other, "disk full"));
        assert_eq!(error.category(), "IOFailure");
    }

    #[test]
    fn exit_codes_are_distinct_and_non_zero() {
        let errors = [
            ImplError::invalid_argument("x"),
            ImplError::not_implementable("int", "primitive"),
            ImplError::not_introspectable("a.B", "missing"),
            ImplError::NoAccessibleConstructor {
                type_name: "a.B".into(),
            },
            ImplError::PathConflict {
                path: PathBuf::from("a"),
            },
            ImplError::CompileFailure {
                unit: PathBuf::from("A.java"),
                reason: "exit 1".into(),
            },
            ImplError::ArchiveFailure {
                path: PathBuf::from("a.jar"),
                reason: "closed".into(),
            },
        ];
        let mut codes: Vec<i32> = errors.iter().map(ImplError::exit_code).collect();
        assert!(codes.iter().all(|code| *code > 2));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn messages_name_the_offending_type() {
        let error = ImplError::not_implementable("java.lang.String", "type is final");
        assert_eq!(
            error.to_string(),
            "type 'java.lang.String' cannot be implemented: type is final"
        );
    }
}
