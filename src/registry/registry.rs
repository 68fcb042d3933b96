use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;

use hashbrown::HashMap;

use crate::factory::ImplicitProvider;
use crate::info::AnnotatedType;
use crate::registry::{ImplicitSource, ValueSerializer};

// -----------------------------------------------------------------------------
// SerializerRegistry

/// The central store resolving member types to [`ValueSerializer`]s, plus the
/// registry-level fallback defaults.
///
/// Resolution is by the member's exact `TypeId`: generic members resolve with
/// their concrete parameterization (`Option<u16>`, not `Option<_>`).
///
/// # Examples
///
/// ```ignore
/// let mut registry = SerializerRegistry::new();
/// registry.register::<u32>(IntSerializer);
/// registry.register_implicit::<Vec<String>>();
/// ```
pub struct SerializerRegistry {
    serializers: HashMap<TypeId, Arc<dyn ValueSerializer>>,
    implicit_defaults: HashMap<TypeId, ImplicitSource>,
}

impl Default for SerializerRegistry {
    /// See [`SerializerRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SerializerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            serializers: HashMap::new(),
            implicit_defaults: HashMap::new(),
        }
    }

    /// Registers a serializer for values of type `T`.
    ///
    /// A later registration for the same type overwrites the earlier one.
    pub fn register<T: Any>(&mut self, serializer: impl ValueSerializer + 'static) {
        self.register_arc::<T>(Arc::new(serializer));
    }

    /// Registers an already-shared serializer for values of type `T`.
    pub fn register_arc<T: Any>(&mut self, serializer: Arc<dyn ValueSerializer>) {
        self.serializers.insert(TypeId::of::<T>(), serializer);
    }

    /// Registers `T`'s [`Default`] as the fallback default for members of
    /// type `T`.
    pub fn register_implicit<T: Default + Any>(&mut self) {
        self.implicit_defaults
            .insert(TypeId::of::<T>(), ImplicitSource::of::<T>());
    }

    /// Resolves the serializer for the given member type, if registered.
    pub fn resolve(&self, ty: &AnnotatedType) -> Option<&Arc<dyn ValueSerializer>> {
        self.serializers.get(&ty.id())
    }

    /// Returns `true` if a serializer is registered for `T`.
    #[inline]
    pub fn contains<T: Any>(&self) -> bool {
        self.serializers.contains_key(&TypeId::of::<T>())
    }

    /// Returns the fallback default provider for the given member type.
    ///
    /// When no default is registered the provider supplies nothing, which
    /// preserves whatever value the instance already carries.
    pub fn implicit_provider(&self, ty: &AnnotatedType) -> ImplicitProvider {
        match self.implicit_defaults.get(&ty.id()) {
            Some(source) => source.provider(),
            None => ImplicitProvider::none(),
        }
    }

    /// Drains all statically submitted serializer registrations into this
    /// registry.
    ///
    /// Registrations are collected through [`submit_serializers!`] and the
    /// `inventory` crate. Repeated calls are cheap and re-register the same
    /// submissions idempotently.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if static registration is available on the current
    /// platform; with the `auto_register` feature disabled this always does
    /// nothing and returns `false`.
    ///
    /// [`submit_serializers!`]: crate::submit_serializers
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            for submission in inventory::iter::<SerializerSubmission> {
                (submission.register)(self);
            }
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field("serializers", &self.serializers.len())
            .field("implicit_defaults", &self.implicit_defaults.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// SerializerSubmission

/// A statically collected registration, drained by
/// [`SerializerRegistry::auto_register`].
#[cfg(feature = "auto_register")]
pub struct SerializerSubmission {
    register: fn(&mut SerializerRegistry),
}

#[cfg(feature = "auto_register")]
impl SerializerSubmission {
    /// Creates a submission. Prefer the [`submit_serializers!`] macro.
    ///
    /// [`submit_serializers!`]: crate::submit_serializers
    pub const fn new(register: fn(&mut SerializerRegistry)) -> Self {
        Self { register }
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(SerializerSubmission);

/// Submits a registration function to every registry that calls
/// [`SerializerRegistry::auto_register`].
///
/// ```ignore
/// treebind::submit_serializers!(|registry| {
///     registry.register::<u32>(IntSerializer);
/// });
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! submit_serializers {
    ($register:expr) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::registry::SerializerSubmission::new($register)
        }
    };
}

// -----------------------------------------------------------------------------
// SharedSerializerRegistry

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A clonable, thread-safe handle to a [`SerializerRegistry`].
///
/// The inner lock tolerates poisoning; a panicked writer does not wedge the
/// registry for everyone else.
#[derive(Clone, Default)]
pub struct SharedSerializerRegistry {
    /// The wrapped [`SerializerRegistry`].
    pub internal: Arc<RwLock<SerializerRegistry>>,
}

impl SharedSerializerRegistry {
    /// Takes a read lock on the underlying [`SerializerRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, SerializerRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`SerializerRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, SerializerRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for SharedSerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read().fmt(f)
    }
}
