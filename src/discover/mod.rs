//! Field discovery: enumerating a type's serializable members and producing
//! a matching construction strategy.
//!
//! ## Menu
//!
//! - [`FieldDiscoverer`]: pluggable discovery strategy.
//! - [`FieldCollector`]: the sink receiving [`Member`] records during one
//!   discovery pass.
//! - [`Member`]: name, resolved type, combined attributes, deposit callback
//!   and read accessor for one discovered member.
//! - [`Deposit`]: the setter callback into the intermediate representation.
//! - [`StructFieldDiscoverer`]: the reference field-based strategy (mutable
//!   lifecycle).
//! - [`RecordDiscoverer`]: constructor-parameter strategy (immutable
//!   lifecycle).

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::access::MemberAccessor;
use crate::error::ObjectMappingError;
use crate::factory::{Entry, ImplicitProvider, InstanceFactory, Intermediate};
use crate::info::{AnnotatedType, AttributeSet};

// -----------------------------------------------------------------------------
// Modules

mod fields;
mod record;

// -----------------------------------------------------------------------------
// Exports

pub use fields::StructFieldDiscoverer;
pub use record::RecordDiscoverer;

// -----------------------------------------------------------------------------
// FieldDiscoverer

/// A strategy enumerating a type's serializable members and supplying a
/// matching [`InstanceFactory`].
///
/// Returns `Ok(None)` when the strategy does not apply to the target's shape,
/// letting the caller try the next strategy. Fails with
/// [`TypeNotConstructible`](ObjectMappingError::TypeNotConstructible) when the
/// target is abstract — fail-fast, before any tree reading.
pub trait FieldDiscoverer {
    /// Discovers `target`'s members into `collector`.
    fn discover(
        &self,
        target: &AnnotatedType,
        collector: &mut dyn FieldCollector,
    ) -> Result<Option<Box<dyn InstanceFactory>>, ObjectMappingError>;
}

// -----------------------------------------------------------------------------
// FieldCollector

/// The sink invoked once per discovered member.
///
/// The stream of [`Member`] records is transient; this subsystem retains
/// nothing, and callers own any caching of the discovered shape.
pub trait FieldCollector {
    /// Receives one discovered member.
    fn accept(&mut self, member: Member);
}

impl<F: FnMut(Member)> FieldCollector for F {
    #[inline]
    fn accept(&mut self, member: Member) {
        self(member);
    }
}

// -----------------------------------------------------------------------------
// Deposit

/// The setter callback for one member: stores a decoded value — or, in its
/// absence, a deferred default — into the intermediate representation.
#[derive(Clone)]
pub struct Deposit {
    accessor: MemberAccessor,
}

impl Deposit {
    /// Stores `Explicit(value)` when a decoded value exists, else
    /// `Implicit(fallback)`.
    pub fn put(
        &self,
        intermediate: &mut Intermediate,
        value: Option<Box<dyn Any>>,
        fallback: ImplicitProvider,
    ) {
        let entry = match value {
            Some(value) => Entry::Explicit(value),
            None => Entry::Implicit(fallback),
        };
        intermediate.put(self.accessor.clone(), entry);
    }
}

impl fmt::Debug for Deposit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deposit")
            .field("member", &self.accessor.name())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Member

/// One discovered member, scoped to exactly one declaring level.
///
/// Carries the externally visible name, the member's [`AnnotatedType`]
/// resolved at its declaring level, the combined ordered attribute set, the
/// [`Deposit`] callback into the intermediate representation, and the
/// accessor for reading the member off an existing instance.
pub struct Member {
    name: &'static str,
    ty: AnnotatedType,
    attributes: Arc<AttributeSet>,
    deposit: Deposit,
    accessor: MemberAccessor,
}

impl Member {
    /// Creates a member record from its parts.
    pub fn new(
        name: &'static str,
        ty: AnnotatedType,
        attributes: AttributeSet,
        accessor: MemberAccessor,
    ) -> Self {
        Self {
            name,
            ty,
            attributes: Arc::new(attributes),
            deposit: Deposit {
                accessor: accessor.clone(),
            },
            accessor,
        }
    }

    /// Returns the externally visible member name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the member's type, resolved at its declaring level.
    #[inline]
    pub const fn ty(&self) -> &AnnotatedType {
        &self.ty
    }

    /// Returns the combined ordered attribute set (declared + type-use).
    #[inline]
    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Returns the setter callback into the intermediate representation.
    #[inline]
    pub const fn deposit(&self) -> &Deposit {
        &self.deposit
    }

    /// Returns the accessor reading the member off an existing instance.
    #[inline]
    pub const fn accessor(&self) -> &MemberAccessor {
        &self.accessor
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("ty", &self.ty.ty().path())
            .finish()
    }
}
