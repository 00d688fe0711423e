/// How `bytes` fields are typed.
///
/// The protobuf JSON mapping transmits binary data as base64 text, so the default is a `str`
/// alias named `_Base64` that keeps the intent visible in the declarations.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BytesRepr {
    #[default]
    Base64,
    Raw,
}

/// Generation options; fixed for a whole run.
///
/// Not `Default`: the field-name policy has to be picked explicitly.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Wrap every field type in `Annotated[T, <number>, "<wire type>"]`
    pub add_extra_annotations: bool,
    /// Type map fields as `dict[K, V]` and skip the synthetic map entry messages
    pub maps_as_containers: bool,
    /// Use the schema field names instead of their lowerCamelCase JSON names
    pub preserve_field_names: bool,
    pub bytes: BytesRepr,
}

impl Options {
    pub fn new(preserve_field_names: bool) -> Self {
        Self {
            add_extra_annotations: false,
            maps_as_containers: true,
            preserve_field_names,
            bytes: BytesRepr::default(),
        }
    }
}
