pub mod components;
pub mod error;
pub mod field;
pub mod message;
pub mod schema;

mod mapping_context;

pub use components::{MessageTable, Ref, SchemaComponentTable};
pub use error::SchemaError;
pub use field::{FieldDescriptor, Label, TYPE_MESSAGE};
pub use message::MessageDescriptor;
pub use schema::{Schema, SchemaBuilder};

use mapping_context::MappingContext;
use prost::Message as _;
use prost_types::FileDescriptorSet;

/// Decodes a serialized `FileDescriptorSet`, as written by
/// `protoc --include_imports --descriptor_set_out=...`, and maps it into a [`Schema`].
pub fn read_descriptor_set(bytes: &[u8]) -> Result<(Schema, SchemaComponentTable), SchemaError> {
    let set = FileDescriptorSet::decode(bytes)?;
    map_descriptor_set(&set)
}

/// Maps an already decoded `FileDescriptorSet` into a [`Schema`].
pub fn map_descriptor_set(
    set: &FileDescriptorSet,
) -> Result<(Schema, SchemaComponentTable), SchemaError> {
    MappingContext::new().map_descriptor_set(set)
}
