use std::path::{Path, PathBuf};

use thiserror::Error;

use dt_pb_schema::SchemaError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("field {field:?} of message {message:?} has unsupported wire type {code}")]
    UnsupportedWireType {
        message: String,
        field: String,
        code: i32,
    },

    #[error("inconsistent schema: {0}")]
    InconsistentSchema(String),

    #[error("failed to load schema from {}", path.display())]
    LoadFailure {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to write {}", destination_name(destination.as_deref()))]
    WriteFailure {
        destination: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },
}

fn destination_name(destination: Option<&Path>) -> String {
    match destination {
        Some(path) => path.display().to_string(),
        None => "to stdout".to_string(),
    }
}

impl Error {
    /// Sorts a loader error into the inconsistency and load-failure kinds.
    pub(crate) fn from_schema_error(path: PathBuf, error: SchemaError) -> Self {
        match error {
            SchemaError::Decode(_) => Self::LoadFailure {
                path,
                source: Box::new(error),
            },
            SchemaError::UnresolvedTypeName { .. }
            | SchemaError::InvalidLabel { .. }
            | SchemaError::DuplicateMessage(_)
            | SchemaError::MissingMessage { .. } => Self::InconsistentSchema(error.to_string()),
        }
    }
}
