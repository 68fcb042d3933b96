//! Derive support for `treebind`.
//!
//! See [`Describe`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static DESCRIBE_ATTRIBUTE_NAME: &str = "describe";

// -----------------------------------------------------------------------------
// Modules

mod expand;
mod input;

// -----------------------------------------------------------------------------
// Macros

/// # Description Derivation
///
/// `#[derive(Describe)]` implements `TypePath` and `Describe` for a struct
/// with named fields, emitting its descriptor and the privileged
/// accessor table the mapper discovers members through.
///
/// ## Container attributes
///
/// ```rust, ignore
/// // Zero-argument constructor strategy: the mapper may construct new
/// // instances through `Default`. Without this flag the type is
/// // populate-only.
/// #[derive(Describe, Default)]
/// #[describe(default)]
/// struct Server { /* ... */ }
///
/// // Immutable lifecycle: members are constructor parameters, gathered
/// // into an ordered argument list and constructed in one shot.
/// #[derive(Describe)]
/// #[describe(record)]
/// struct Endpoint { /* ... */ }
///
/// // Type-use attributes, readable from the descriptor's attribute set.
/// #[derive(Describe)]
/// #[describe(@Stability::Stable)]
/// struct Limits { /* ... */ }
/// ```
///
/// ## Field attributes
///
/// ```rust, ignore
/// #[derive(Describe, Default)]
/// #[describe(default)]
/// struct Widget {
///     // The extends-chain: members of `Base` surface through `Widget`,
///     // each keyed to its own declaring level. The field itself is never
///     // mapped directly.
///     #[describe(extends)]
///     base: Base,
///
///     // Explicit external name.
///     #[describe(name = "max-count")]
///     max_count: u32,
///
///     // Process-only state, never discovered.
///     #[describe(skip)]
///     dirty: bool,
///
///     // Field attributes, merged after the declared ones.
///     #[describe(@Range(0, 128))]
///     count: u32,
/// }
/// ```
///
/// `Option<...>` fields are null-equivalent-aware: an absent source value
/// leaves `None` to be filled by a fallback default, while any other field
/// keeps the value the instance already carries.
///
/// Generic structs are supported; every type parameter receives a `Describe`
/// bound. Enums, tuple structs, unions and lifetime parameters are not
/// supported.
#[proc_macro_derive(Describe, attributes(describe))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match input::DescribeInput::parse(input).and_then(expand::expand) {
        Ok(tokens) => tokens.into(),
        Err(error) => error.to_compile_error().into(),
    }
}
