use alloc::boxed::Box;
use core::any::Any;

use crate::error::ObjectMappingError;
use crate::info::AnnotatedType;
use crate::node::{SourceNode, TargetNode};

// -----------------------------------------------------------------------------
// ValueSerializer

/// Converts leaf member values between tree nodes and host values.
///
/// Every leaf conversion the mapper performs is delegated here; the mapper
/// core itself never parses or formats scalars. Implementations receive the
/// member's exact [`AnnotatedType`] so they can honour generics and attached
/// attributes (numeric ranges, explicit external names, ...).
pub trait ValueSerializer: Send + Sync {
    /// Reads a value of `ty` from `node`.
    fn deserialize(
        &self,
        ty: &AnnotatedType,
        node: &dyn SourceNode,
    ) -> Result<Box<dyn Any>, ObjectMappingError>;

    /// Writes `value` of `ty` into `node`.
    fn serialize(
        &self,
        ty: &AnnotatedType,
        value: &dyn Any,
        node: &mut dyn TargetNode,
    ) -> Result<(), ObjectMappingError>;
}
