use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use hashbrown::HashMap;

use crate::access::{MemberAccessor, MemberKey};
use crate::factory::ImplicitProvider;

// -----------------------------------------------------------------------------
// Entry

/// One captured member value: either a decoded value or a deferred default.
///
/// The tag replaces any runtime type inspection — completion matches on the
/// variant, never on the payload's type.
pub enum Entry {
    /// A value decoded from the source tree.
    Explicit(Box<dyn Any>),
    /// No source value; resolved against the instance during completion.
    Implicit(ImplicitProvider),
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(_) => f.pad("Explicit"),
            Self::Implicit(_) => f.pad("Implicit"),
        }
    }
}

// -----------------------------------------------------------------------------
// Intermediate

pub(crate) struct Slot {
    pub(crate) accessor: MemberAccessor,
    pub(crate) entry: Entry,
}

/// The per-operation store mapping member identity to an [`Entry`], in
/// first-deposit order.
///
/// Created by [`InstanceFactory::begin`](crate::factory::InstanceFactory::begin),
/// filled through the per-member deposit callbacks while decoding, consumed by
/// completion and then discarded. Never shared across threads; each operation
/// owns its own.
///
/// Re-depositing for a member already present replaces the entry in place
/// without moving its position.
#[derive(Default)]
pub struct Intermediate {
    slots: Vec<Slot>,
    indices: HashMap<MemberKey, usize>,
}

impl Intermediate {
    /// Creates an empty store.
    #[inline]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            indices: HashMap::new(),
        }
    }

    /// Stores `entry` under the accessor's member identity.
    pub fn put(&mut self, accessor: MemberAccessor, entry: Entry) {
        let key = accessor.key();
        match self.indices.get(&key) {
            Some(&index) => self.slots[index].entry = entry,
            None => {
                self.indices.insert(key, self.slots.len());
                self.slots.push(Slot { accessor, entry });
            }
        }
    }

    /// Returns the entry for the given member identity, if present.
    pub fn get(&self, key: &MemberKey) -> Option<&Entry> {
        self.indices.get(key).map(|&index| &self.slots[index].entry)
    }

    /// Returns `true` if an entry exists for the given member identity.
    #[inline]
    pub fn contains(&self, key: &MemberKey) -> bool {
        self.indices.contains_key(key)
    }

    /// Returns the member identities in first-deposit order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = MemberKey> {
        self.slots.iter().map(|slot| slot.accessor.key())
    }

    /// Returns the number of captured members.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing was captured.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn into_slots(self) -> Vec<Slot> {
        self.slots
    }
}

impl fmt::Debug for Intermediate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Intermediate")
            .field("len", &self.len())
            .finish()
    }
}
