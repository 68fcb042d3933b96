use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

// -----------------------------------------------------------------------------
// ImplicitProvider

/// A deferred default: a one-shot value supplier resolved only on genuine
/// absence.
///
/// An `ImplicitProvider` stands in for a member value when decoding found no
/// explicit value in the source tree. During completion it is consulted only
/// if the member's current value on the instance is null-equivalent — filling
/// absence, never overriding presence. Each provider belongs to exactly one
/// member and is invoked at most once per completion.
///
/// ```
/// use treebind::factory::ImplicitProvider;
///
/// let provider = ImplicitProvider::of(|| Box::new(7u32));
/// let value = provider.produce().unwrap();
/// assert_eq!(*value.downcast::<u32>().unwrap(), 7);
///
/// assert!(ImplicitProvider::none().produce().is_none());
/// ```
pub struct ImplicitProvider {
    supplier: Option<Box<dyn FnOnce() -> Box<dyn Any>>>,
}

impl ImplicitProvider {
    /// A provider with nothing to supply.
    ///
    /// Completion leaves the member untouched, preserving whatever value the
    /// instance already carries.
    #[inline]
    pub const fn none() -> Self {
        Self { supplier: None }
    }

    /// Wraps a one-shot supplier.
    #[inline]
    pub fn of(supplier: impl FnOnce() -> Box<dyn Any> + 'static) -> Self {
        Self {
            supplier: Some(Box::new(supplier)),
        }
    }

    /// Whether a supplier is present.
    #[inline]
    pub const fn has_supplier(&self) -> bool {
        self.supplier.is_some()
    }

    /// Consumes the provider, invoking the supplier if one is present.
    pub fn produce(self) -> Option<Box<dyn Any>> {
        self.supplier.map(|supplier| supplier())
    }
}

impl fmt::Debug for ImplicitProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImplicitProvider")
            .field("has_supplier", &self.has_supplier())
            .finish()
    }
}
