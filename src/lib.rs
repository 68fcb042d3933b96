//! Maps structured host objects onto order-preserving configuration trees and
//! back, through pluggable field discovery and a two-mode instance
//! construction protocol.
//!
//! # Overview
//!
//! A type opts in with [`#[derive(Describe)]`](derive::Describe), which emits
//! its descriptor and a privileged accessor table. Discovery walks the type's
//! extends-chain level by level, streaming [`Member`](discover::Member)
//! records to a collector and producing an
//! [`InstanceFactory`](factory::InstanceFactory) with two completion modes:
//! populating an existing instance in place, or constructing a new one.
//!
//! Leaf conversion is owned entirely by the
//! [`SerializerRegistry`](registry::SerializerRegistry); the mapper never
//! parses or formats scalars. Where the source tree supplies no value, a
//! deferred [`ImplicitProvider`](factory::ImplicitProvider) fills genuine
//! absence only — a value the instance already carries is never clobbered.
//!
//! ```ignore
//! use treebind::derive::Describe;
//! use treebind::ObjectMapper;
//!
//! #[derive(Describe, Default)]
//! #[describe(default)]
//! struct Server {
//!     host: String,
//!     port: Option<u16>,
//! }
//!
//! let mapper = ObjectMapper::new(registry);
//! let server: Server = mapper.load(&root_node)?;
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Usually, we need to use `crate` in the crate itself and use `treebind` in
// doc testing. An `extern self` ensures `treebind` can be used as an alias
// for `crate` in both positions.
extern crate self as treebind;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod describe;
mod error;
mod mapper;

pub mod access;
pub mod discover;
pub mod factory;
pub mod impls;
pub mod info;
pub mod node;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use describe::{AssembleError, AssembleErrorKind};
pub use describe::{Assembler, InstanceMaker, Replacer};
pub use describe::{Describe, FieldSpec, FieldTable};
pub use error::ObjectMappingError;
pub use mapper::ObjectMapper;

pub use treebind_derive as derive;

// -----------------------------------------------------------------------------
// Macro support

#[cfg(feature = "auto_register")]
#[doc(hidden)]
pub mod __macro_exports {
    pub use inventory;
}
