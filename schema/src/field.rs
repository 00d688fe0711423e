use super::{MessageDescriptor, Ref};

/// Wire-type code of message-typed fields (`TYPE_MESSAGE` in `descriptor.proto`).
pub const TYPE_MESSAGE: i32 = 11;

/// Field cardinality, numbered as in `descriptor.proto`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    Optional,
    Required,
    Repeated,
}

impl Label {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Optional),
            2 => Some(Self::Required),
            3 => Some(Self::Repeated),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::Optional => 1,
            Self::Required => 2,
            Self::Repeated => 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    /// The numeric field tag
    pub number: i32,
    /// The raw wire-type code. Kept unvalidated so that legacy codes (such as groups) survive
    /// loading and can be rejected by the consumer.
    pub type_code: i32,
    pub label: Label,
    /// Target of message-typed fields
    pub message_type: Option<Ref<MessageDescriptor>>,
}

impl FieldDescriptor {
    pub fn scalar(name: impl Into<String>, number: i32, type_code: i32, label: Label) -> Self {
        Self {
            name: name.into(),
            number,
            type_code,
            label,
            message_type: None,
        }
    }

    pub fn message(
        name: impl Into<String>,
        number: i32,
        label: Label,
        message_type: Ref<MessageDescriptor>,
    ) -> Self {
        Self {
            message_type: Some(message_type),
            ..Self::scalar(name, number, TYPE_MESSAGE, label)
        }
    }
}
