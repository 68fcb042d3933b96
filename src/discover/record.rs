use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;
use core::any::Any;

use crate::access::{MemberAccessor, ProjectionChain};
use crate::describe::{AssembleErrorKind, FieldTable};
use crate::discover::{FieldCollector, FieldDiscoverer, Member};
use crate::error::ObjectMappingError;
use crate::factory::{Entry, InstanceFactory, Intermediate};
use crate::info::{AnnotatedType, AttributeSet, Type, TypeShape};

// -----------------------------------------------------------------------------
// RecordDiscoverer

/// Constructor-parameter discovery (immutable lifecycle).
///
/// Applies to record-shaped targets only. Members surface as the record's
/// constructor parameters in declaration order; completion gathers entries
/// into an ordered argument list and invokes the constructor exactly once.
/// Records have no extends-chain, so discovery stays at a single declaring
/// level.
pub struct RecordDiscoverer;

impl RecordDiscoverer {
    /// Creates the discoverer.
    pub fn new() -> Self {
        Self
    }
}

impl FieldDiscoverer for RecordDiscoverer {
    fn discover(
        &self,
        target: &AnnotatedType,
        collector: &mut dyn FieldCollector,
    ) -> Result<Option<Box<dyn InstanceFactory>>, ObjectMappingError> {
        match target.shape() {
            TypeShape::Abstract => {
                return Err(ObjectMappingError::type_not_constructible(
                    target.ty(),
                    "object mapping can only work with concrete types",
                ));
            }
            TypeShape::Record => {}
            _ => return Ok(None),
        }

        let Some(table) = target.field_table() else {
            return Ok(None);
        };

        for index in 0..table.field_len() {
            let spec = &table.fields()[index];
            let accessor = MemberAccessor::new(ProjectionChain::root(), table, index);
            let ty = spec.annotated();
            let attributes = AttributeSet::merged(spec.attributes(), ty.attributes());
            collector.accept(Member::new(spec.name(), ty, attributes, accessor));
        }

        Ok(Some(Box::new(RecordInstanceFactory {
            target: *target.ty(),
            table,
        })))
    }
}

// -----------------------------------------------------------------------------
// RecordInstanceFactory

/// Immutable lifecycle: an ordered argument list fed to the constructor in
/// one shot.
struct RecordInstanceFactory {
    target: Type,
    table: &'static FieldTable,
}

impl RecordInstanceFactory {
    fn member_name(&self, index: usize) -> &'static str {
        self.table
            .field_at(index)
            .map(|spec| spec.name())
            .unwrap_or("<unknown>")
    }
}

impl InstanceFactory for RecordInstanceFactory {
    fn can_create_instances(&self) -> bool {
        self.table.assembler().is_some()
    }

    fn populate_existing(
        &self,
        instance: &mut dyn Any,
        intermediate: Intermediate,
    ) -> Result<(), ObjectMappingError> {
        // Records cannot be written member by member; populate rebuilds the
        // value and replaces it wholesale.
        let replacer = self.table.replacer().ok_or_else(|| {
            ObjectMappingError::construction_failed(
                &self.target,
                "record type cannot be populated in place",
            )
        })?;
        let fresh = self.construct_new(intermediate)?;
        replacer(instance, fresh).map_err(|_| {
            ObjectMappingError::construction_failed(
                &self.target,
                "existing instance was not of the record's type",
            )
        })
    }

    fn construct_new(
        &self,
        intermediate: Intermediate,
    ) -> Result<Box<dyn Any>, ObjectMappingError> {
        let assembler = self.table.assembler().ok_or_else(|| {
            ObjectMappingError::construction_failed(
                &self.target,
                "record type has no usable constructor",
            )
        })?;

        let mut args: Vec<Option<Box<dyn Any>>> =
            (0..self.table.field_len()).map(|_| None).collect();
        for slot in intermediate.into_slots() {
            let key = slot.accessor.key();
            if key.declaring() != self.table.declaring().id() {
                continue;
            }
            let value = match slot.entry {
                Entry::Explicit(value) => Some(value),
                Entry::Implicit(provider) => provider.produce(),
            };
            if let Some(arg) = args.get_mut(key.index()) {
                *arg = value;
            }
        }

        assembler(args).map_err(|fault| match fault.kind() {
            AssembleErrorKind::MissingArgument => ObjectMappingError::missing_required_member(
                &self.target,
                self.member_name(fault.index()),
            ),
            AssembleErrorKind::MismatchedArgument => ObjectMappingError::construction_failed(
                &self.target,
                format!(
                    "constructor argument for `{}` had the wrong type",
                    self.member_name(fault.index())
                ),
            ),
        })
    }
}
