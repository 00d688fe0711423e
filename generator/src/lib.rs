//! Generates `typing.TypedDict` declarations describing the JSON form of protobuf messages.
//!
//! The input is a schema loaded by [`dt_pb_schema`], usually from a descriptor set written by
//! `protoc --include_imports --descriptor_set_out=...`. Each message becomes one declaration named
//! after its containment chain; message-typed fields refer to other declarations by quoted name,
//! so recursive schemas need no ordering.

pub mod error;
pub mod generators;
pub mod naming;
pub mod options;
pub mod output;
pub mod pyast;
pub mod unparse;

use std::path::Path;

use dt_pb_schema::{Schema, SchemaComponentTable};

pub use error::Error;
pub use generators::generate;
pub use options::{BytesRepr, Options};

/// Loads the descriptor set at `input` and writes its declarations to `output`, or to stdout.
///
/// The document is generated completely before anything is written, so a failing schema leaves
/// an existing `output` as it was.
pub fn compile(input: &Path, output: Option<&Path>, options: &Options) -> Result<(), Error> {
    let (schema, table) = load_descriptor_set(input)?;
    let document = generate(&schema, &table, options)?;
    output::write_document(&document, output).map_err(|source| Error::WriteFailure {
        destination: output.map(Path::to_path_buf),
        source,
    })
}

/// Reads and maps a serialized `FileDescriptorSet`.
pub fn load_descriptor_set(path: &Path) -> Result<(Schema, SchemaComponentTable), Error> {
    let bytes = std::fs::read(path).map_err(|err| Error::LoadFailure {
        path: path.to_path_buf(),
        source: Box::new(err),
    })?;
    dt_pb_schema::read_descriptor_set(&bytes)
        .map_err(|err| Error::from_schema_error(path.to_path_buf(), err))
}
