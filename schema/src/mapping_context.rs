use std::collections::HashMap;

use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorSet};
use tracing::{debug, trace};

use super::{
    components::SchemaComponentTable, FieldDescriptor, Label, MessageDescriptor, Ref, Schema,
    SchemaBuilder, SchemaError,
};

/// A message whose `Ref` has been reserved but whose fields are not mapped yet.
struct PendingMessage<'a> {
    ref_: Ref<MessageDescriptor>,
    proto: &'a DescriptorProto,
    full_name: String,
    containing_type: Option<Ref<MessageDescriptor>>,
}

/// State for mapping a [`FileDescriptorSet`] into a [`Schema`].
///
/// Mapping runs in two passes: all messages of all files are declared first, so that field type
/// names can be resolved regardless of declaration order or cycles.
pub(super) struct MappingContext<'a> {
    builder: SchemaBuilder,
    by_full_name: HashMap<String, Ref<MessageDescriptor>>,
    pending: Vec<PendingMessage<'a>>,
}

impl<'a> MappingContext<'a> {
    pub(super) fn new() -> Self {
        Self {
            builder: SchemaBuilder::new(),
            by_full_name: HashMap::new(),
            pending: Vec::new(),
        }
    }

    pub(super) fn map_descriptor_set(
        mut self,
        set: &'a FileDescriptorSet,
    ) -> Result<(Schema, SchemaComponentTable), SchemaError> {
        for file in &set.file {
            let scope = match file.package() {
                "" => String::new(),
                package => format!(".{package}"),
            };
            debug!(file = file.name(), package = file.package(), "declaring messages");
            for message in &file.message_type {
                self.declare_message(message, &scope, None)?;
            }
        }

        for pending in std::mem::take(&mut self.pending) {
            let message = self.map_message(&pending)?;
            self.builder.define_message(pending.ref_, message);
        }

        self.builder.try_finish()
    }

    /// Reserves a slot for `proto` and, recursively, for its nested messages.
    fn declare_message(
        &mut self,
        proto: &'a DescriptorProto,
        scope: &str,
        containing_type: Option<Ref<MessageDescriptor>>,
    ) -> Result<(), SchemaError> {
        let full_name = format!("{scope}.{}", proto.name());
        let ref_ = self.builder.reserve_message();
        if self.by_full_name.insert(full_name.clone(), ref_).is_some() {
            return Err(SchemaError::DuplicateMessage(full_name));
        }
        trace!(name = %full_name, "declared message");

        for nested in &proto.nested_type {
            self.declare_message(nested, &full_name, Some(ref_))?;
        }

        self.pending.push(PendingMessage {
            ref_,
            proto,
            full_name,
            containing_type,
        });
        Ok(())
    }

    fn map_message(&self, pending: &PendingMessage<'a>) -> Result<MessageDescriptor, SchemaError> {
        let proto = pending.proto;
        let fields = proto
            .field
            .iter()
            .map(|field| self.map_field(&pending.full_name, field))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MessageDescriptor {
            name: proto.name().to_string(),
            fields,
            containing_type: pending.containing_type,
            map_entry: proto
                .options
                .as_ref()
                .and_then(|options| options.map_entry)
                .unwrap_or(false),
        })
    }

    fn map_field(
        &self,
        message: &str,
        field: &FieldDescriptorProto,
    ) -> Result<FieldDescriptor, SchemaError> {
        // proto3 leaves the label unset on some generators; singular is the default
        let label = match field.label {
            None => Label::Optional,
            Some(code) => Label::from_code(code).ok_or_else(|| SchemaError::InvalidLabel {
                message: message.to_string(),
                field: field.name().to_string(),
                label: code,
            })?,
        };

        // Enum fields carry a type name as well, but only message targets are tracked
        let message_type = match field.type_name.as_deref() {
            Some(type_name) if !is_enum_field(field) => {
                Some(self.resolve_type_name(message, field, type_name)?)
            }
            _ => None,
        };

        Ok(FieldDescriptor {
            name: field.name().to_string(),
            number: field.number(),
            type_code: field.r#type.unwrap_or_default(),
            label,
            message_type,
        })
    }

    fn resolve_type_name(
        &self,
        message: &str,
        field: &FieldDescriptorProto,
        type_name: &str,
    ) -> Result<Ref<MessageDescriptor>, SchemaError> {
        let key = if type_name.starts_with('.') {
            type_name.to_string()
        } else {
            format!(".{type_name}")
        };
        self.by_full_name
            .get(&key)
            .copied()
            .ok_or_else(|| SchemaError::UnresolvedTypeName {
                message: message.to_string(),
                field: field.name().to_string(),
                type_name: type_name.to_string(),
            })
    }
}

fn is_enum_field(field: &FieldDescriptorProto) -> bool {
    field.r#type == Some(prost_types::field_descriptor_proto::Type::Enum as i32)
}
