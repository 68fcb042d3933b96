//! Privileged member access capabilities.
//!
//! ## Menu
//!
//! - [`FieldAccessor`]: read/write/vacancy function pointers for one declared
//!   field, generated by the derive inside the declaring type.
//! - [`Project`] / [`ProjectionChain`]: narrowing from a leaf instance to an
//!   embedded base value, composed per hierarchy walk.
//! - [`MemberAccessor`]: a declared accessor bound to its declaring level,
//!   usable against the leaf instance.
//! - [`MemberKey`]: member identity — declaring level plus field index.
//! - [`AccessError`]: access failure with declaring type and field context.

// -----------------------------------------------------------------------------
// Modules

mod accessor;

// -----------------------------------------------------------------------------
// Exports

pub use accessor::{AccessError, AccessErrorKind};
pub use accessor::{FieldAccessor, MemberAccessor, MemberKey};
pub use accessor::{Project, ProjectionChain};
