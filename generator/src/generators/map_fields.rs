use dt_pb_schema::{FieldDescriptor, MessageDescriptor, MessageTable, Ref};

use crate::{naming::dotted_name, Error};

/// A message is a map entry only when the schema compiler flagged it as one.
pub fn is_map_entry(message: Ref<MessageDescriptor>, table: &impl MessageTable) -> bool {
    table.get(message).map_entry
}

/// A field is a map field when its message type is a map entry.
pub fn is_map_field(field: &FieldDescriptor, table: &impl MessageTable) -> bool {
    field
        .message_type
        .is_some_and(|target| is_map_entry(target, table))
}

/// The key (number 1) and value (number 2) fields of a map entry.
pub fn map_entry_fields<'a>(
    entry: Ref<MessageDescriptor>,
    table: &'a impl MessageTable,
) -> Result<(&'a FieldDescriptor, &'a FieldDescriptor), Error> {
    let message = table.get(entry);
    let missing = |role: &str, number: i32| {
        Error::InconsistentSchema(format!(
            "map entry {} has no {role} field (number {number})",
            dotted_name(entry, table)
        ))
    };
    let key = message.map_key().ok_or_else(|| missing("key", 1))?;
    let value = message.map_value().ok_or_else(|| missing("value", 2))?;
    Ok((key, value))
}
