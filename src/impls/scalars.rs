//! `Describe` implementations for primitive leaf types.

use alloc::string::String;

use crate::describe::Describe;
use crate::info::{AnnotatedType, TypePath};

// -----------------------------------------------------------------------------
// Primitives

macro_rules! impl_describe_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                stringify!($ty)
            }

            #[inline]
            fn type_name() -> &'static str {
                stringify!($ty)
            }

            #[inline]
            fn type_ident() -> &'static str {
                stringify!($ty)
            }
        }

        impl Describe for $ty {
            fn annotated_type() -> AnnotatedType {
                AnnotatedType::opaque::<Self>()
            }
        }
    )*};
}

impl_describe_scalar!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
);

// -----------------------------------------------------------------------------
// String

impl TypePath for String {
    #[inline]
    fn type_path() -> &'static str {
        "alloc::string::String"
    }

    #[inline]
    fn type_name() -> &'static str {
        "String"
    }

    #[inline]
    fn type_ident() -> &'static str {
        "String"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::string")
    }
}

impl Describe for String {
    fn annotated_type() -> AnnotatedType {
        AnnotatedType::opaque::<Self>()
    }
}
