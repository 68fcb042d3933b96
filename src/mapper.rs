//! The thin orchestrator driving discovery, decoding and completion.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::any::Any;

use crate::describe::Describe;
use crate::discover::{FieldCollector, FieldDiscoverer, Member};
use crate::discover::{RecordDiscoverer, StructFieldDiscoverer};
use crate::error::ObjectMappingError;
use crate::factory::{ImplicitProvider, InstanceFactory, Intermediate};
use crate::info::AnnotatedType;
use crate::node::{SourceNode, TargetNode};
use crate::registry::SerializerRegistry;

// -----------------------------------------------------------------------------
// ObjectMapper

/// Converts between described host objects and configuration trees.
///
/// The mapper drives discovery, delegates every leaf conversion to the
/// serializer registry and assembles the final object through the discovered
/// [`InstanceFactory`]. It holds no per-operation state: each call owns its
/// own intermediate store and either completes or fails atomically.
///
/// Discovery strategies run in order; the first applicable one wins. The
/// default lineup tries constructor-parameter discovery for record-shaped
/// types first, then the field-based reference strategy.
///
/// ```ignore
/// let mapper = ObjectMapper::new(registry);
/// let server: Server = mapper.load(&root_node)?;
/// ```
pub struct ObjectMapper {
    discoverers: Vec<Box<dyn FieldDiscoverer>>,
    registry: Arc<SerializerRegistry>,
}

impl ObjectMapper {
    /// Creates a mapper with the default discovery strategies.
    pub fn new(registry: Arc<SerializerRegistry>) -> Self {
        Self::with_discoverers(
            registry,
            vec![
                Box::new(RecordDiscoverer::new()),
                Box::new(StructFieldDiscoverer::empty_constructor()),
            ],
        )
    }

    /// Creates a mapper with a custom strategy lineup.
    pub fn with_discoverers(
        registry: Arc<SerializerRegistry>,
        discoverers: Vec<Box<dyn FieldDiscoverer>>,
    ) -> Self {
        Self {
            discoverers,
            registry,
        }
    }

    /// Returns the serializer registry.
    #[inline]
    pub fn registry(&self) -> &Arc<SerializerRegistry> {
        &self.registry
    }

    /// Runs discovery for `target`, streaming members into `collector`.
    ///
    /// Strategies are tried in order; each declines by returning no factory.
    /// Fails with
    /// [`TypeNotConstructible`](ObjectMappingError::TypeNotConstructible)
    /// when no strategy applies.
    pub fn discover(
        &self,
        target: &AnnotatedType,
        collector: &mut dyn FieldCollector,
    ) -> Result<Box<dyn InstanceFactory>, ObjectMappingError> {
        for discoverer in &self.discoverers {
            if let Some(factory) = discoverer.discover(target, collector)? {
                return Ok(factory);
            }
        }
        Err(ObjectMappingError::type_not_constructible(
            target.ty(),
            "no field discoverer was able to handle the type",
        ))
    }

    fn mapping(
        &self,
        target: &AnnotatedType,
    ) -> Result<(Vec<Member>, Box<dyn InstanceFactory>), ObjectMappingError> {
        let mut members = Vec::new();
        let mut collector = |member: Member| members.push(member);
        let factory = self.discover(target, &mut collector)?;
        log::trace!(
            "discovered {} members for `{}`",
            members.len(),
            target.ty().path()
        );
        Ok((members, factory))
    }

    fn decode(
        &self,
        members: &[Member],
        node: &dyn SourceNode,
        intermediate: &mut Intermediate,
    ) -> Result<(), ObjectMappingError> {
        for member in members {
            match node.child(member.name()) {
                Some(child) if !child.is_virtual() => {
                    let serializer = self.registry.resolve(member.ty()).ok_or_else(|| {
                        ObjectMappingError::no_serializer(member.ty().ty()).at(member.name())
                    })?;
                    let value = serializer
                        .deserialize(member.ty(), child)
                        .map_err(|fault| fault.at(member.name()))?;
                    member
                        .deposit()
                        .put(intermediate, Some(value), ImplicitProvider::none());
                }
                _ => {
                    // Absent in the source; completion falls back to the
                    // instance's own value, then the registry default.
                    member.deposit().put(
                        intermediate,
                        None,
                        self.registry.implicit_provider(member.ty()),
                    );
                }
            }
        }
        Ok(())
    }

    /// Loads a new `T` from `node`.
    ///
    /// New-instance construction is mandatory here, so a populate-only target
    /// type fails; use [`load_into`](Self::load_into) for those.
    pub fn load<T: Describe>(&self, node: &dyn SourceNode) -> Result<T, ObjectMappingError> {
        let target = T::annotated_type();
        let (members, factory) = self.mapping(&target)?;

        let mut intermediate = factory.begin();
        self.decode(&members, node, &mut intermediate)?;

        let instance = factory.construct_new(intermediate)?;
        instance.downcast::<T>().map(|boxed| *boxed).map_err(|_| {
            ObjectMappingError::construction_failed(
                target.ty(),
                "constructed instance was not of the requested type",
            )
        })
    }

    /// Populates an existing instance from `node`.
    ///
    /// This is the fallback mode when the target type cannot create new
    /// instances; values the instance already carries survive wherever the
    /// source and the registry supply nothing.
    pub fn load_into<T: Describe>(
        &self,
        instance: &mut T,
        node: &dyn SourceNode,
    ) -> Result<(), ObjectMappingError> {
        let target = T::annotated_type();
        let (members, factory) = self.mapping(&target)?;

        let mut intermediate = factory.begin();
        self.decode(&members, node, &mut intermediate)?;

        factory.populate_existing(instance as &mut dyn Any, intermediate)
    }

    /// Saves `value` into `node`, member by member.
    pub fn save<T: Describe>(
        &self,
        value: &T,
        node: &mut dyn TargetNode,
    ) -> Result<(), ObjectMappingError> {
        let target = T::annotated_type();
        let (members, _factory) = self.mapping(&target)?;
        log::trace!("saving `{}`", target.ty().path());

        for member in &members {
            let serializer = self.registry.resolve(member.ty()).ok_or_else(|| {
                ObjectMappingError::no_serializer(member.ty().ty()).at(member.name())
            })?;
            let current = member.accessor().get(value as &dyn Any)?;
            serializer
                .serialize(member.ty(), current, node.child_mut(member.name()))
                .map_err(|fault| fault.at(member.name()))?;
        }
        Ok(())
    }
}
