mod common;
mod map_fields;
mod scalar;
mod typeddict;

pub use map_fields::{is_map_entry, is_map_field, map_entry_fields};
pub use scalar::{lookup as lookup_wire_type, PyScalar, WireType, BASE64_ALIAS, WIRE_TYPES};
pub use typeddict::generate;
