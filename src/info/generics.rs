use alloc::boxed::Box;
use core::any::Any;
use core::ops::Deref;

use crate::info::{Type, TypePath};

// -----------------------------------------------------------------------------
// Type Generic Param

/// Information about one generic type parameter, as instantiated.
///
/// The bound type is exact: a descriptor for `Holder<u32>` records the
/// parameter `T` bound to `u32`, never an erased placeholder.
///
/// # Examples
///
/// ```
/// use treebind::info::TypeParamInfo;
///
/// let info = TypeParamInfo::new::<u32>("T");
/// assert_eq!(info.name(), "T");
/// assert!(info.ty().is::<u32>());
/// ```
#[derive(Clone, Debug)]
pub struct TypeParamInfo {
    ty: Type,
    name: &'static str,
}

impl TypeParamInfo {
    /// Create a new [`TypeParamInfo`] with the bound type `T`.
    #[inline]
    pub const fn new<T: TypePath + Any + ?Sized>(name: &'static str) -> Self {
        Self {
            ty: Type::of::<T>(),
            name,
        }
    }

    /// Returns the generic parameter name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the bound [`Type`].
    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Check if the bound type matches the given one.
    #[inline]
    pub fn type_is<T: Any>(&self) -> bool {
        self.ty.is::<T>()
    }
}

// -----------------------------------------------------------------------------
// Generics

/// A container for a list of instantiated generic parameters.
///
/// Produced by [`#[derive(Describe)]`](crate::derive::Describe) for generic
/// types and stored on the [`AnnotatedType`](crate::info::AnnotatedType).
///
/// If the type has no generics, this is empty.
///
/// # Examples
///
/// ```
/// use treebind::info::{Generics, TypeParamInfo};
///
/// let generics = Generics::from([TypeParamInfo::new::<u32>("T")]);
/// assert!(generics.get("T").unwrap().type_is::<u32>());
/// assert!(generics.get("U").is_none());
/// ```
#[derive(Clone, Default, Debug)]
pub struct Generics(Option<Box<[TypeParamInfo]>>);

impl Generics {
    /// Create a new, empty `Generics` container.
    #[inline(always)]
    pub const fn new() -> Self {
        // We use `Option` to enable compile time `new`.
        Self(None)
    }

    /// Create a `Generics` from `TypeParamInfo`s.
    #[inline]
    pub fn from<const P: usize>(buf: [TypeParamInfo; P]) -> Self {
        Self(Some(Box::new(buf)))
    }

    /// Returns the parameter with the given `name`, if present.
    ///
    /// Complexity: O(n) in the number of parameters.
    pub fn get(&self, name: &str) -> Option<&TypeParamInfo> {
        match &self.0 {
            Some(val) => val.iter().find(|info| info.name() == name),
            None => None,
        }
    }
}

impl Deref for Generics {
    type Target = [TypeParamInfo];
    #[inline]
    fn deref(&self) -> &Self::Target {
        static EMPTY: [TypeParamInfo; 0] = [];
        match &self.0 {
            Some(v) => v,
            None => &EMPTY,
        }
    }
}
