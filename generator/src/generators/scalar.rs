use crate::options::BytesRepr;

/// Name of the `str` alias used for base64-encoded `bytes` fields.
pub const BASE64_ALIAS: &str = "_Base64";

/// Python type of a protobuf scalar in the JSON mapping.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PyScalar {
    Bool,
    Bytes,
    Dict,
    Float,
    Int,
    Str,
}

impl PyScalar {
    pub fn type_name(self, bytes: BytesRepr) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Bytes => match bytes {
                BytesRepr::Base64 => BASE64_ALIAS,
                BytesRepr::Raw => "bytes",
            },
            Self::Dict => "dict",
            Self::Float => "float",
            Self::Int => "int",
            Self::Str => "str",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WireType {
    pub code: i32,
    /// The type name as written in a `.proto` file
    pub name: &'static str,
    pub scalar: PyScalar,
}

const fn wire(code: i32, name: &'static str, scalar: PyScalar) -> WireType {
    WireType { code, name, scalar }
}

/// Every supported wire-type code. Groups (10) are not supported.
pub const WIRE_TYPES: &[WireType] = &[
    wire(1, "double", PyScalar::Float),
    wire(2, "float", PyScalar::Float),
    wire(3, "int64", PyScalar::Int),
    wire(4, "uint64", PyScalar::Int),
    wire(5, "int32", PyScalar::Int),
    wire(6, "fixed64", PyScalar::Int),
    wire(7, "fixed32", PyScalar::Int),
    wire(8, "bool", PyScalar::Bool),
    wire(9, "string", PyScalar::Str),
    wire(11, "message", PyScalar::Dict),
    wire(12, "bytes", PyScalar::Bytes),
    wire(13, "uint32", PyScalar::Int),
    wire(14, "enum", PyScalar::Int),
    wire(15, "sfixed32", PyScalar::Int),
    wire(16, "sfixed64", PyScalar::Int),
    wire(17, "sint32", PyScalar::Int),
    wire(18, "sint64", PyScalar::Int),
];

pub fn lookup(code: i32) -> Option<&'static WireType> {
    WIRE_TYPES.iter().find(|wire| wire.code == code)
}
