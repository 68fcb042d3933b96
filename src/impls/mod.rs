//! Built-in `Describe` implementations and static storage utilities.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod scalars;
mod wrappers;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericPathCell, GenericTableCell, TableCell, concat};
