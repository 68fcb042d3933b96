//! The serializer registry consumed by the orchestrator.
//!
//! ## Menu
//!
//! - [`ValueSerializer`]: leaf conversion between tree nodes and host values.
//! - [`SerializerRegistry`]: resolves member types to serializers and holds
//!   the registry-level fallback defaults.
//! - [`ImplicitSource`]: a per-type fallback default built from [`Default`].
//! - [`SharedSerializerRegistry`]: a clonable, lock-guarded registry handle.
//!
//! ## auto_register
//!
//! With the default-on `auto_register` feature, serializer registrations can
//! be submitted statically through [`submit_serializers!`] (backed by the
//! `inventory` crate) and drained with
//! [`SerializerRegistry::auto_register`]. Not all platforms support static
//! registration (although major platforms do); where unsupported, draining is
//! a no-op.
//!
//! [`submit_serializers!`]: crate::submit_serializers

// -----------------------------------------------------------------------------
// Modules

mod defaults;
mod registry;
mod serializer;

// -----------------------------------------------------------------------------
// Exports

pub use defaults::ImplicitSource;
pub use registry::{SerializerRegistry, SharedSerializerRegistry};
pub use serializer::ValueSerializer;

#[cfg(feature = "auto_register")]
pub use registry::SerializerSubmission;
