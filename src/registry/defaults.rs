use alloc::boxed::Box;
use core::any::Any;

use crate::factory::ImplicitProvider;

// -----------------------------------------------------------------------------
// ImplicitSource

/// A registry-level fallback default for one type.
///
/// Internally stores a function pointer to the type's [`Default`]; handed out
/// as an [`ImplicitProvider`] whenever decode finds no explicit value for a
/// member of that type.
///
/// # Examples
///
/// ```
/// use treebind::registry::ImplicitSource;
///
/// let source = ImplicitSource::of::<u32>();
/// let value = source.produce();
/// assert_eq!(*value.downcast::<u32>().unwrap(), 0);
/// ```
#[derive(Clone)]
pub struct ImplicitSource {
    func: fn() -> Box<dyn Any>,
}

impl ImplicitSource {
    /// Creates a source from `T`'s [`Default`].
    pub fn of<T: Default + Any>() -> Self {
        Self {
            func: || Box::<T>::default(),
        }
    }

    /// Produces one default value.
    #[inline]
    pub fn produce(&self) -> Box<dyn Any> {
        (self.func)()
    }

    /// Returns a one-shot provider backed by this source.
    #[inline]
    pub fn provider(&self) -> ImplicitProvider {
        let func = self.func;
        ImplicitProvider::of(move || func())
    }
}
