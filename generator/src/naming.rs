use dt_pb_schema::{FieldDescriptor, MessageDescriptor, MessageTable, Ref};

use crate::Options;

/// Returns `message` and its containing messages, outermost first.
pub fn containment_chain<'a>(
    message: Ref<MessageDescriptor>,
    table: &'a impl MessageTable,
) -> Vec<&'a MessageDescriptor> {
    let mut chain = vec![table.get(message)];
    let mut current = table.get(message).containing_type;
    while let Some(parent) = current {
        let parent = table.get(parent);
        chain.push(parent);
        current = parent.containing_type;
    }
    chain.reverse();
    chain
}

/// The declaration name of `message`: the local names of the containment chain concatenated
/// without a separator, so `Outer.Inner` becomes `OuterInner`.
pub fn qualified_name(message: Ref<MessageDescriptor>, table: &impl MessageTable) -> String {
    containment_chain(message, table)
        .iter()
        .map(|m| m.name.as_str())
        .collect()
}

/// Dotted form of the containment chain, for diagnostics.
pub fn dotted_name(message: Ref<MessageDescriptor>, table: &impl MessageTable) -> String {
    containment_chain(message, table)
        .iter()
        .map(|m| m.name.as_str())
        .collect::<Vec<_>>()
        .join(".")
}

/// Converts a protobuf field name to its JSON name.
///
/// Every underscore is dropped and upper-cases the character following it; everything else is
/// kept as is, including the case of the first word.
pub fn to_lower_camel(name: &str) -> String {
    let mut words = name.split('_');
    let mut result = String::with_capacity(name.len());
    if let Some(first) = words.next() {
        result.push_str(first);
    }
    for word in words {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

/// The key under which `field` appears in the JSON object.
pub fn field_key(field: &FieldDescriptor, options: &Options) -> String {
    if options.preserve_field_names {
        field.name.clone()
    } else {
        to_lower_camel(&field.name)
    }
}
