//! Static interning for type information of generic types.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use std::sync::{PoisonError, RwLock};

// -----------------------------------------------------------------------------
// GenericPathCell

/// Interns built path strings for generic types.
///
/// A `static CELL` inside a generic function is shared by every
/// instantiation, so the cell keys by `TypeId`. The map tolerates concurrent
/// read/populate: a race recomputes idempotently under the write lock, and a
/// poisoned lock is recovered rather than propagated.
///
/// ```
/// use treebind::impls::{GenericPathCell, concat};
///
/// fn path_of<T: 'static>(inner: &str) -> &'static str {
///     static CELL: GenericPathCell = GenericPathCell::new();
///     CELL.get_or_insert::<T>(|| concat(&["demo::Holder<", inner, ">"]))
/// }
///
/// assert_eq!(path_of::<u32>("u32"), "demo::Holder<u32>");
/// ```
pub struct GenericPathCell(RwLock<Vec<(TypeId, &'static str)>>);

impl GenericPathCell {
    /// Create an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(Vec::new()))
    }

    /// Returns the interned string for the type `G`, building it with `f`
    /// on first access.
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> String) -> &'static str {
        let id = TypeId::of::<G>();
        if let Some(found) = self.lookup(id) {
            return found;
        }
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(found) = guard.iter().find(|(key, _)| *key == id) {
            return found.1;
        }
        let leaked: &'static str = Box::leak(f().into_boxed_str());
        guard.push((id, leaked));
        leaked
    }

    fn lookup(&self, id: TypeId) -> Option<&'static str> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, value)| *value)
    }
}

impl Default for GenericPathCell {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Concatenates path fragments into one owned string.
#[inline]
pub fn concat(parts: &[&str]) -> String {
    parts.concat()
}

// -----------------------------------------------------------------------------
// TableCell

use std::sync::OnceLock;

use crate::describe::FieldTable;

/// Static storage for the field table of a non-generic type.
///
/// Internally an [`OnceLock`]; initialization is published safely and happens
/// at most once.
pub struct TableCell(OnceLock<FieldTable>);

impl TableCell {
    /// Create an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored table, building it with `f` on first access.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> FieldTable) -> &FieldTable {
        self.0.get_or_init(f)
    }
}

impl Default for TableCell {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// GenericTableCell

/// Static storage for the field tables of a generic type.
///
/// A `static CELL` inside a generic function is shared by every
/// instantiation, so the cell keys tables by `TypeId`. Racing initializers
/// recompute idempotently; the loser's table is simply discarded.
pub struct GenericTableCell(RwLock<Vec<(TypeId, &'static FieldTable)>>);

impl GenericTableCell {
    /// Create an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(Vec::new()))
    }

    /// Returns the table for the type `G`, building it with `f` on first
    /// access.
    pub fn get_or_insert<G: Any + ?Sized>(
        &self,
        f: impl FnOnce() -> FieldTable,
    ) -> &'static FieldTable {
        let id = TypeId::of::<G>();
        {
            let guard = self.0.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(found) = guard.iter().find(|(key, _)| *key == id) {
                return found.1;
            }
        }
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(found) = guard.iter().find(|(key, _)| *key == id) {
            return found.1;
        }
        let leaked: &'static FieldTable = Box::leak(Box::new(f()));
        guard.push((id, leaked));
        leaked
    }
}

impl Default for GenericTableCell {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
