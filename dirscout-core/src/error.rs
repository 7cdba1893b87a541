use thiserror::Error;

/// Error taxonomy for navigator operations.
///
/// Every variant that concerns a named entry carries the attempted operation
/// and the entry name so callers can surface a useful diagnostic without
/// re-deriving context. Traversal never raises these directly; it collects
/// them into [`crate::walk::WalkFailure`] records instead.
#[derive(Error, Debug)]
pub enum NavError {
    #[error("no root directory has been granted")]
    NoGrant,

    #[error("{op}: no entry named {name:?}")]
    NotFound { op: &'static str, name: String },

    #[error("create_directory: {name:?} already exists and is not a directory")]
    NameConflict { name: String },

    #[error("delete_entry: directory {name:?} is not empty")]
    NotEmpty { name: String },

    #[error("read of {name:?} failed mid-stream")]
    Stream {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{op} on {name:?} failed")]
    Io {
        op: &'static str,
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("processing of {name:?} failed: {cause}")]
    Visit { name: String, cause: anyhow::Error },
}

impl NavError {
    pub(crate) fn io(op: &'static str, name: impl Into<String>, source: std::io::Error) -> Self {
        let name = name.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return NavError::NotFound { op, name };
        }
        NavError::Io { op, name, source }
    }
}
