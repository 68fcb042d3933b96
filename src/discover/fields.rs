use alloc::boxed::Box;
use core::any::Any;

use crate::access::MemberAccessor;
use crate::describe::{FieldTable, InstanceMaker};
use crate::discover::{FieldCollector, FieldDiscoverer, Member};
use crate::error::ObjectMappingError;
use crate::factory::{Entry, InstanceFactory, Intermediate};
use crate::info::{AnnotatedType, AttributeSet, Type, TypeShape, lineage};

// -----------------------------------------------------------------------------
// StructFieldDiscoverer

/// The reference, field-based discovery strategy (mutable lifecycle).
///
/// Walks the declaring levels from the most-derived type to the root of the
/// extends-chain, enumerating every member physically declared at each level.
/// The declaring level's accessor table is acquired once per level, and each
/// member's type is resolved against that level's own descriptor — which is
/// what keeps generic members declared in ancestors exact.
///
/// The zero-argument constructor strategy is pluggable; its absence does not
/// fail discovery, it only makes the produced factory populate-only.
pub struct StructFieldDiscoverer {
    instance_source: fn(&AnnotatedType) -> Option<InstanceMaker>,
}

impl StructFieldDiscoverer {
    /// The default strategy: use the maker the target opted into with
    /// `#[describe(default)]`.
    pub fn empty_constructor() -> Self {
        Self {
            instance_source: |target| target.field_table().and_then(FieldTable::maker),
        }
    }

    /// A discoverer with a custom instance source.
    pub fn with_instance_source(
        instance_source: fn(&AnnotatedType) -> Option<InstanceMaker>,
    ) -> Self {
        Self { instance_source }
    }
}

impl FieldDiscoverer for StructFieldDiscoverer {
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
            TypeShape::Struct => {}
            _ => return Ok(None),
        }

        let maker = (self.instance_source)(target);

        for level in lineage(target) {
            let Some(table) = level.annotated().field_table() else {
                continue;
            };
            for index in 0..table.field_len() {
                let spec = &table.fields()[index];
                let accessor = MemberAccessor::new(level.projection().clone(), table, index);
                let ty = spec.annotated();
                let attributes = AttributeSet::merged(spec.attributes(), ty.attributes());
                collector.accept(Member::new(spec.name(), ty, attributes, accessor));
            }
        }

        Ok(Some(Box::new(StructInstanceFactory {
            target: *target.ty(),
            maker,
        })))
    }
}

// -----------------------------------------------------------------------------
// StructInstanceFactory

/// Mutable (populate) lifecycle: writes members in place, one at a time.
struct StructInstanceFactory {
    target: Type,
    maker: Option<InstanceMaker>,
}

impl InstanceFactory for StructInstanceFactory {
    fn can_create_instances(&self) -> bool {
        self.maker.is_some()
    }

    fn populate_existing(
        &self,
        instance: &mut dyn Any,
        intermediate: Intermediate,
    ) -> Result<(), ObjectMappingError> {
        for slot in intermediate.into_slots() {
            match slot.entry {
                Entry::Explicit(value) => slot.accessor.set(instance, value)?,
                Entry::Implicit(provider) => {
                    // Fill absence, never override presence.
                    if slot.accessor.is_vacant(instance)? {
                        if let Some(value) = provider.produce() {
                            slot.accessor.set(instance, value)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn construct_new(
        &self,
        intermediate: Intermediate,
    ) -> Result<Box<dyn Any>, ObjectMappingError> {
        let maker = self.maker.ok_or_else(|| {
            ObjectMappingError::construction_failed(
                &self.target,
                "unable to create an instance with this populator",
            )
        })?;
        let mut instance = maker();
        self.populate_existing(&mut *instance, intermediate)?;
        Ok(instance)
    }
}
