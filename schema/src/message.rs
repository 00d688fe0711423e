use super::{FieldDescriptor, Ref};

/// A protobuf message type.
///
/// Nested messages point at their parent through `containing_type`; this is the containment tree,
/// which is acyclic since a parent is always created before its children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageDescriptor {
    /// The local (unqualified) name
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldDescriptor>,
    pub containing_type: Option<Ref<MessageDescriptor>>,
    /// Set by the schema compiler for the synthetic `XxxEntry` message backing a `map<K, V>` field
    pub map_entry: bool,
}

impl MessageDescriptor {
    pub fn new(name: impl Into<String>, containing_type: Option<Ref<MessageDescriptor>>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            containing_type,
            map_entry: false,
        }
    }

    pub fn field_by_number(&self, number: i32) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.number == number)
    }

    /// The key field of a map entry (field number 1)
    pub fn map_key(&self) -> Option<&FieldDescriptor> {
        self.field_by_number(1)
    }

    /// The value field of a map entry (field number 2)
    pub fn map_value(&self) -> Option<&FieldDescriptor> {
        self.field_by_number(2)
    }
}
