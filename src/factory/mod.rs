//! The two-mode instance construction protocol.
//!
//! ## Menu
//!
//! - [`InstanceFactory`]: one capability set with two distinctly named
//!   completion operations, `populate_existing` and `construct_new`.
//! - [`Intermediate`]: the per-operation ordered store from member identity
//!   to [`Entry`].
//! - [`Entry`]: `Explicit(value) | Implicit(provider)`, an explicit tagged
//!   union per captured member.
//! - [`ImplicitProvider`]: a deferred default, resolved only on genuine
//!   absence.

use alloc::boxed::Box;
use core::any::Any;

use crate::error::ObjectMappingError;

// -----------------------------------------------------------------------------
// Modules

mod implicit;
mod intermediate;

// -----------------------------------------------------------------------------
// Exports

pub use implicit::ImplicitProvider;
pub use intermediate::{Entry, Intermediate};

// -----------------------------------------------------------------------------
// InstanceFactory

/// The construction capability produced by a discoverer for one target type.
///
/// Factories are stateless and reusable across any number of operations for
/// the same type. Every failure aborts the whole operation: a caller never
/// observes a half-populated instance.
pub trait InstanceFactory {
    /// Begins a new operation with an empty intermediate store.
    fn begin(&self) -> Intermediate {
        Intermediate::new()
    }

    /// Whether [`construct_new`](Self::construct_new) is usable.
    ///
    /// When `false`, callers must fall back to populate-only mode, and may
    /// fail only if new-instance construction is mandatory for them.
    fn can_create_instances(&self) -> bool;

    /// Completes against an existing instance.
    ///
    /// `Explicit` entries are written through the member accessor. `Implicit`
    /// entries first read the member's *current* value off the instance; only
    /// when that value is null-equivalent is the provider consulted and its
    /// product written. An initializer the instance already carries therefore
    /// survives when no serialized value and no explicit default exist.
    fn populate_existing(
        &self,
        instance: &mut dyn Any,
        intermediate: Intermediate,
    ) -> Result<(), ObjectMappingError>;

    /// Completes by producing a new instance.
    ///
    /// Obtains an instance via the construction strategy (failing with
    /// [`ConstructionFailed`](crate::error::ObjectMappingError::ConstructionFailed)
    /// when none exists or it misbehaves), then completes it from the
    /// intermediate store and returns it.
    fn construct_new(&self, intermediate: Intermediate) -> Result<Box<dyn Any>, ObjectMappingError>;
}
