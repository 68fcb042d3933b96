//! Type descriptors: paths, generics, attributes and hierarchy levels.
//!
//! ## Menu
//!
//! - [`TypePath`]: A trait for obtaining type names, without prefix `::`.
//!     - [`type_path`](TypePath::type_path): Full name, a fixed and unique identifier for the type.
//!     - [`type_name`](TypePath::type_name): The name without module path, may be duplicated.
//!     - [`type_ident`](TypePath::type_ident): The name without generics and module path.
//!     - [`module_path`](TypePath::module_path): optional module path.
//!
//! - [`TypePathTable`]: A struct storing function pointers for a single type's
//!   `TypePath` implementation.
//!
//! - [`Type`]: A struct containing a `TypeId` and a `TypePathTable`.
//!
//! - [`AttributeSet`]: An ordered attribute container keyed by attribute type.
//!
//! - [`Generics`]: A list of [`TypeParamInfo`], representing instantiated
//!   generic parameters.
//!
//! - [`AnnotatedType`]: A type with its resolved generic parameterization,
//!   attached attributes and hierarchy link, valid at one declaring level.
//!     - [`TypeShape`]: The construction shape (`Struct`, `Record`, `Opaque`, `Abstract`).
//!     - [`AncestorLink`]: The link to the extended base type.
//!
//! - Hierarchy walking:
//!     - [`lineage`]: A finite, restartable sequence of declaring levels.
//!     - [`resolve_ancestor`]: The exact descriptor of an ancestor as
//!       instantiated from a concrete subtype.

// -----------------------------------------------------------------------------
// Modules

mod annotated;
mod attributes;
mod generics;
mod lineage;
mod type_path;

// -----------------------------------------------------------------------------
// Exports

pub use annotated::{AncestorLink, AnnotatedType, TypeShape};
pub use attributes::AttributeSet;
pub use generics::{Generics, TypeParamInfo};
pub use lineage::{Lineage, LineageError, LineageLevel, lineage, resolve_ancestor};
pub use type_path::{Type, TypePath, TypePathTable};
