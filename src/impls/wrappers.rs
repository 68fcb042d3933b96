//! `Describe` implementations for generic leaf containers.
//!
//! These are leaves from the mapper's point of view: their conversion is
//! owned entirely by a serializer, but their descriptors still carry the
//! exact generic parameterization for registry resolution.

use alloc::vec::Vec;
use std::collections::HashMap;

use crate::describe::Describe;
use crate::impls::{GenericPathCell, concat};
use crate::info::{AnnotatedType, Generics, TypeParamInfo, TypePath};

// -----------------------------------------------------------------------------
// Option

impl<T: Describe> TypePath for Option<T> {
    fn type_path() -> &'static str {
        static CELL: GenericPathCell = GenericPathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["core::option::Option<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericPathCell = GenericPathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Option<", T::type_name(), ">"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Option"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("core::option")
    }
}

impl<T: Describe> Describe for Option<T> {
    fn annotated_type() -> AnnotatedType {
        AnnotatedType::opaque::<Self>()
            .with_generics(Generics::from([TypeParamInfo::new::<T>("T")]))
    }
}

// -----------------------------------------------------------------------------
// Vec

impl<T: Describe> TypePath for Vec<T> {
    fn type_path() -> &'static str {
        static CELL: GenericPathCell = GenericPathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["alloc::vec::Vec<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericPathCell = GenericPathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Vec<", T::type_name(), ">"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Vec"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::vec")
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn annotated_type() -> AnnotatedType {
        AnnotatedType::opaque::<Self>()
            .with_generics(Generics::from([TypeParamInfo::new::<T>("T")]))
    }
}

// -----------------------------------------------------------------------------
// HashMap

impl<K: Describe, V: Describe> TypePath for HashMap<K, V> {
    fn type_path() -> &'static str {
        static CELL: GenericPathCell = GenericPathCell::new();
        CELL.get_or_insert::<Self>(|| {
            concat(&[
                "std::collections::HashMap<",
                K::type_path(),
                ", ",
                V::type_path(),
                ">",
            ])
        })
    }

    fn type_name() -> &'static str {
        static CELL: GenericPathCell = GenericPathCell::new();
        CELL.get_or_insert::<Self>(|| {
            concat(&["HashMap<", K::type_name(), ", ", V::type_name(), ">"])
        })
    }

    #[inline]
    fn type_ident() -> &'static str {
        "HashMap"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("std::collections")
    }
}

impl<K: Describe, V: Describe> Describe for HashMap<K, V> {
    fn annotated_type() -> AnnotatedType {
        AnnotatedType::opaque::<Self>().with_generics(Generics::from([
            TypeParamInfo::new::<K>("K"),
            TypeParamInfo::new::<V>("V"),
        ]))
    }
}
