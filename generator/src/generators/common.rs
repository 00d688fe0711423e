use dt_pb_schema::{FieldDescriptor, MessageDescriptor, Ref, SchemaComponentTable};

use super::map_fields::is_map_entry;
use crate::{Error, Options};

pub(super) trait ComponentVisitor: Sized {
    type MessageValue;
    fn visit_message(
        &mut self,
        context: &GeneratorContext,
        message: Ref<MessageDescriptor>,
    ) -> Result<Self::MessageValue, Error>;

    type FieldValue;
    fn visit_field(
        &mut self,
        context: &GeneratorContext,
        message: Ref<MessageDescriptor>,
        field: &FieldDescriptor,
    ) -> Result<Self::FieldValue, Error>;
}

pub(super) struct GeneratorContext<'a> {
    pub(super) table: &'a SchemaComponentTable,
    pub(super) options: &'a Options,
}

impl<'a> GeneratorContext<'a> {
    pub(super) fn new(table: &'a SchemaComponentTable, options: &'a Options) -> Self {
        Self { table, options }
    }

    /// Whether `message` gets its own declaration. Map entries are folded into their map fields
    /// when maps are typed as containers.
    pub(super) fn is_emitted(&self, message: Ref<MessageDescriptor>) -> bool {
        !(self.options.maps_as_containers && is_map_entry(message, self.table))
    }
}
