use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to decode descriptor set")]
    Decode(#[from] prost::DecodeError),

    #[error("field {field:?} of message {message:?} references unknown type {type_name:?}")]
    UnresolvedTypeName {
        message: String,
        field: String,
        type_name: String,
    },

    #[error("field {field:?} of message {message:?} has invalid label {label}")]
    InvalidLabel {
        message: String,
        field: String,
        label: i32,
    },

    #[error("message type {0:?} is declared more than once")]
    DuplicateMessage(String),

    #[error("message #{id} was reserved but never defined")]
    MissingMessage { id: usize },
}
