use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::num::NonZeroU32;

use super::{MessageDescriptor, SchemaError};

/// Typed index of a message in a [`MessageTable`].
///
/// IDs are 1-based so that `Option<Ref<_>>` stays four bytes wide.
pub struct Ref<R>(NonZeroU32, PhantomData<fn() -> R>);

impl<R> Ref<R> {
    fn from_index(index: usize) -> Option<Self> {
        let id = u32::try_from(index).ok()?.checked_add(1)?;
        NonZeroU32::new(id).map(|id| Self(id, PhantomData))
    }

    fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl Ref<MessageDescriptor> {
    pub fn get(self, table: &impl MessageTable) -> &MessageDescriptor {
        table.get(self)
    }
}

// Derives would require `R: Copy` etc. although only a `PhantomData` holds it.
impl<R> Copy for Ref<R> {}

impl<R> Clone for Ref<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> PartialEq for Ref<R> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<R> Eq for Ref<R> {}

impl<R> Hash for Ref<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<R> fmt::Debug for Ref<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "message#{}", self.0)
    }
}

/// Read access to the messages of a schema.
pub trait MessageTable {
    /// Looks up `ref_`, returning `None` if it does not point into this table.
    fn try_get(&self, ref_: Ref<MessageDescriptor>) -> Option<&MessageDescriptor>;

    /// Like [`Self::try_get`], but panics on a reference from another table. Callers that accept
    /// hand-built schemas check references with [`Self::contains`] first.
    fn get(&self, ref_: Ref<MessageDescriptor>) -> &MessageDescriptor {
        match self.try_get(ref_) {
            Some(message) => message,
            None => panic!("{ref_:?} is not defined in this table"),
        }
    }

    fn contains(&self, ref_: Ref<MessageDescriptor>) -> bool {
        self.try_get(ref_).is_some()
    }
}

/// Messages of a schema under construction.
///
/// Slots are `Option`s since fields may reference messages that are declared later (or the
/// message itself), so a `Ref` is handed out before its message is complete.
#[derive(Default)]
pub struct ConstructionComponentTable {
    messages: Vec<Option<MessageDescriptor>>,
}

impl MessageTable for ConstructionComponentTable {
    fn try_get(&self, ref_: Ref<MessageDescriptor>) -> Option<&MessageDescriptor> {
        self.messages.get(ref_.index())?.as_ref()
    }
}

impl ConstructionComponentTable {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Hands out a `Ref` to an empty slot, to be filled by [`Self::insert`].
    pub(super) fn reserve(&mut self) -> Ref<MessageDescriptor> {
        let ref_ = Ref::from_index(self.messages.len())
            .unwrap_or_else(|| panic!("more than {} messages", u32::MAX - 1));
        self.messages.push(None);
        ref_
    }

    pub(super) fn insert(&mut self, ref_: Ref<MessageDescriptor>, message: MessageDescriptor) {
        self.messages[ref_.index()] = Some(message);
    }

    pub(super) fn create(&mut self, message: MessageDescriptor) -> Ref<MessageDescriptor> {
        let ref_ = self.reserve();
        self.insert(ref_, message);
        ref_
    }

    pub(super) fn get_mut(&mut self, ref_: Ref<MessageDescriptor>) -> &mut MessageDescriptor {
        match self.messages.get_mut(ref_.index()).and_then(Option::as_mut) {
            Some(message) => message,
            None => panic!("{ref_:?} is not defined in this table"),
        }
    }

    /// Freezes the table, failing if a reserved slot was never filled.
    pub(super) fn convert_to_schema_table(self) -> Result<SchemaComponentTable, SchemaError> {
        let messages = self
            .messages
            .into_iter()
            .enumerate()
            .map(|(index, message)| message.ok_or(SchemaError::MissingMessage { id: index + 1 }))
            .collect::<Result<_, _>>()?;
        Ok(SchemaComponentTable { messages })
    }
}

/// The messages of a finished schema. Every slot is filled.
#[derive(Clone, Debug, Default)]
pub struct SchemaComponentTable {
    messages: Box<[MessageDescriptor]>,
}

impl MessageTable for SchemaComponentTable {
    fn try_get(&self, ref_: Ref<MessageDescriptor>) -> Option<&MessageDescriptor> {
        self.messages.get(ref_.index())
    }
}

impl SchemaComponentTable {
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ref<MessageDescriptor>, &MessageDescriptor)> {
        self.messages
            .iter()
            .enumerate()
            .filter_map(|(index, message)| Some((Ref::from_index(index)?, message)))
    }
}
