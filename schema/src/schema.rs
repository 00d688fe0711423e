use super::{
    components::{ConstructionComponentTable, SchemaComponentTable},
    FieldDescriptor, MessageDescriptor, Ref, SchemaError,
};

/// A loaded protobuf schema.
///
/// `message_descriptors` lists every message of the schema, nested ones and map entries included,
/// in declaration order: files in descriptor-set order, and within a file each message before
/// the messages nested in it.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    pub message_descriptors: Vec<Ref<MessageDescriptor>>,
}

/// Builds a [`Schema`] in memory.
///
/// Messages are listed in the order they are added, so parents must be added before the
/// messages nested in them.
#[derive(Default)]
pub struct SchemaBuilder {
    table: ConstructionComponentTable,
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            table: ConstructionComponentTable::new(),
            schema: Schema::default(),
        }
    }

    pub fn add_message(
        &mut self,
        name: impl Into<String>,
        containing_type: Option<Ref<MessageDescriptor>>,
    ) -> Ref<MessageDescriptor> {
        let ref_ = self
            .table
            .create(MessageDescriptor::new(name, containing_type));
        self.schema.message_descriptors.push(ref_);
        ref_
    }

    /// Adds a synthetic map entry message nested in `containing_type`. Its key (number 1) and
    /// value (number 2) fields are added separately.
    pub fn add_map_entry(
        &mut self,
        name: impl Into<String>,
        containing_type: Ref<MessageDescriptor>,
    ) -> Ref<MessageDescriptor> {
        let ref_ = self.add_message(name, Some(containing_type));
        self.table.get_mut(ref_).map_entry = true;
        ref_
    }

    pub fn add_field(&mut self, message: Ref<MessageDescriptor>, field: FieldDescriptor) {
        self.table.get_mut(message).fields.push(field);
    }

    pub fn finish(self) -> (Schema, SchemaComponentTable) {
        let table = self
            .table
            .convert_to_schema_table()
            .expect("SchemaBuilder never leaves reserved slots");
        (self.schema, table)
    }

    /// Lists a message whose definition is filled in later by [`Self::define_message`]; fields of
    /// earlier messages may already reference it.
    pub(super) fn reserve_message(&mut self) -> Ref<MessageDescriptor> {
        let ref_ = self.table.reserve();
        self.schema.message_descriptors.push(ref_);
        ref_
    }

    pub(super) fn define_message(
        &mut self,
        ref_: Ref<MessageDescriptor>,
        message: MessageDescriptor,
    ) {
        self.table.insert(ref_, message);
    }

    pub(super) fn try_finish(self) -> Result<(Schema, SchemaComponentTable), SchemaError> {
        let table = self.table.convert_to_schema_table()?;
        Ok((self.schema, table))
    }
}
