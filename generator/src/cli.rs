use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FieldNames {
    /// Keep the names from the schema
    Preserve,
    /// Use the lowerCamelCase JSON names
    LowerCamel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BytesRepr {
    /// A `str` alias, since JSON carries binary data as base64
    Base64,
    /// Python `bytes`
    Raw,
}

/// Create TypedDict declarations from a compiled protobuf schema
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Descriptor set written by `protoc --include_imports --descriptor_set_out=...`
    pub input: PathBuf,

    /// Output file; the declarations are printed to stdout if omitted
    pub output: Option<PathBuf>,

    /// Add field numbers and protobuf types as `Annotated` metadata
    #[arg(long, overrides_with = "no_extra_anno")]
    pub extra_anno: bool,

    #[arg(long, overrides_with = "extra_anno", hide = true)]
    pub no_extra_anno: bool,

    /// Describe protobuf maps as dicts [default]
    #[arg(long, overrides_with = "no_maps")]
    pub maps: bool,

    /// Describe protobuf maps as lists of key/value entries
    #[arg(long, overrides_with = "maps")]
    pub no_maps: bool,

    /// How field names are written
    #[arg(long, value_enum)]
    pub field_names: FieldNames,

    /// How `bytes` fields are typed
    #[arg(long = "bytes", value_enum, default_value = "base64")]
    pub bytes_repr: BytesRepr,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn options(&self) -> pb_typeddict::Options {
        pb_typeddict::Options {
            add_extra_annotations: self.extra_anno && !self.no_extra_anno,
            maps_as_containers: self.maps || !self.no_maps,
            preserve_field_names: self.field_names == FieldNames::Preserve,
            bytes: match self.bytes_repr {
                BytesRepr::Base64 => pb_typeddict::BytesRepr::Base64,
                BytesRepr::Raw => pb_typeddict::BytesRepr::Raw,
            },
        }
    }
}
