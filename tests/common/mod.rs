//! Shared test doubles: an in-memory tree and a handful of scalar
//! serializers.
#![allow(dead_code)]

use std::any::Any;
use std::sync::Arc;

use treebind::ObjectMappingError;
use treebind::discover::Member;
use treebind::info::AnnotatedType;
use treebind::node::{ScalarValue, SourceNode, TargetNode};
use treebind::registry::{SerializerRegistry, ValueSerializer};

// -----------------------------------------------------------------------------
// MemoryNode

/// A minimal order-preserving tree node.
#[derive(Default, Debug)]
pub struct MemoryNode {
    scalar: Option<ScalarValue>,
    children: Vec<(String, MemoryNode)>,
}

impl MemoryNode {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn leaf(value: ScalarValue) -> Self {
        Self {
            scalar: Some(value),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, key: &str, node: MemoryNode) -> Self {
        self.children.push((key.to_string(), node));
        self
    }

    pub fn with_scalar_child(self, key: &str, value: ScalarValue) -> Self {
        self.with_child(key, MemoryNode::leaf(value))
    }

    pub fn get(&self, key: &str) -> Option<&MemoryNode> {
        self.children
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }
}

impl SourceNode for MemoryNode {
    fn child(&self, key: &str) -> Option<&dyn SourceNode> {
        self.get(key).map(|node| node as &dyn SourceNode)
    }

    fn child_keys(&self) -> Vec<String> {
        self.children.iter().map(|(name, _)| name.clone()).collect()
    }

    fn scalar(&self) -> Option<&ScalarValue> {
        self.scalar.as_ref()
    }
}

impl TargetNode for MemoryNode {
    fn set_scalar(&mut self, value: ScalarValue) {
        self.scalar = Some(value);
    }

    fn child_mut(&mut self, key: &str) -> &mut dyn TargetNode {
        let position = self.children.iter().position(|(name, _)| name == key);
        let index = match position {
            Some(index) => index,
            None => {
                self.children.push((key.to_string(), MemoryNode::empty()));
                self.children.len() - 1
            }
        };
        &mut self.children[index].1
    }
}

// -----------------------------------------------------------------------------
// Scalar serializers

fn expect_scalar<'a>(
    ty: &AnnotatedType,
    node: &'a dyn SourceNode,
) -> Result<&'a ScalarValue, ObjectMappingError> {
    node.scalar()
        .ok_or_else(|| ObjectMappingError::serialization(ty.ty(), "expected a scalar node"))
}

pub struct StringSerializer;

impl ValueSerializer for StringSerializer {
    fn deserialize(
        &self,
        ty: &AnnotatedType,
        node: &dyn SourceNode,
    ) -> Result<Box<dyn Any>, ObjectMappingError> {
        let scalar = expect_scalar(ty, node)?;
        let value = scalar
            .as_str()
            .ok_or_else(|| ObjectMappingError::serialization(ty.ty(), "expected a string"))?;
        Ok(Box::new(value.to_string()))
    }

    fn serialize(
        &self,
        ty: &AnnotatedType,
        value: &dyn Any,
        node: &mut dyn TargetNode,
    ) -> Result<(), ObjectMappingError> {
        let value = value
            .downcast_ref::<String>()
            .ok_or_else(|| ObjectMappingError::serialization(ty.ty(), "expected a String value"))?;
        node.set_scalar(ScalarValue::Str(value.clone()));
        Ok(())
    }
}

pub struct U32Serializer;

impl ValueSerializer for U32Serializer {
    fn deserialize(
        &self,
        ty: &AnnotatedType,
        node: &dyn SourceNode,
    ) -> Result<Box<dyn Any>, ObjectMappingError> {
        let scalar = expect_scalar(ty, node)?;
        let value = scalar
            .as_int()
            .and_then(|int| u32::try_from(int).ok())
            .ok_or_else(|| ObjectMappingError::serialization(ty.ty(), "expected a u32"))?;
        Ok(Box::new(value))
    }

    fn serialize(
        &self,
        ty: &AnnotatedType,
        value: &dyn Any,
        node: &mut dyn TargetNode,
    ) -> Result<(), ObjectMappingError> {
        let value = value
            .downcast_ref::<u32>()
            .ok_or_else(|| ObjectMappingError::serialization(ty.ty(), "expected a u32 value"))?;
        node.set_scalar(ScalarValue::Int(i64::from(*value)));
        Ok(())
    }
}

pub struct I64Serializer;

impl ValueSerializer for I64Serializer {
    fn deserialize(
        &self,
        ty: &AnnotatedType,
        node: &dyn SourceNode,
    ) -> Result<Box<dyn Any>, ObjectMappingError> {
        let scalar = expect_scalar(ty, node)?;
        let value = scalar
            .as_int()
            .ok_or_else(|| ObjectMappingError::serialization(ty.ty(), "expected an integer"))?;
        Ok(Box::new(value))
    }

    fn serialize(
        &self,
        ty: &AnnotatedType,
        value: &dyn Any,
        node: &mut dyn TargetNode,
    ) -> Result<(), ObjectMappingError> {
        let value = value
            .downcast_ref::<i64>()
            .ok_or_else(|| ObjectMappingError::serialization(ty.ty(), "expected an i64 value"))?;
        node.set_scalar(ScalarValue::Int(*value));
        Ok(())
    }
}

/// `Option<i64>` members: a present node decodes to `Some`.
pub struct OptI64Serializer;

impl ValueSerializer for OptI64Serializer {
    fn deserialize(
        &self,
        ty: &AnnotatedType,
        node: &dyn SourceNode,
    ) -> Result<Box<dyn Any>, ObjectMappingError> {
        let scalar = expect_scalar(ty, node)?;
        let value = scalar
            .as_int()
            .ok_or_else(|| ObjectMappingError::serialization(ty.ty(), "expected an integer"))?;
        Ok(Box::new(Some(value)))
    }

    fn serialize(
        &self,
        ty: &AnnotatedType,
        value: &dyn Any,
        node: &mut dyn TargetNode,
    ) -> Result<(), ObjectMappingError> {
        let value = value.downcast_ref::<Option<i64>>().ok_or_else(|| {
            ObjectMappingError::serialization(ty.ty(), "expected an Option<i64> value")
        })?;
        if let Some(value) = value {
            node.set_scalar(ScalarValue::Int(*value));
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Registry & member helpers

pub fn registry_inner() -> SerializerRegistry {
    let mut registry = SerializerRegistry::new();
    registry.register::<String>(StringSerializer);
    registry.register::<u32>(U32Serializer);
    registry.register::<i64>(I64Serializer);
    registry.register::<Option<i64>>(OptI64Serializer);
    registry
}

pub fn registry() -> Arc<SerializerRegistry> {
    Arc::new(registry_inner())
}

pub fn member<'a>(members: &'a [Member], name: &str) -> &'a Member {
    members
        .iter()
        .find(|member| member.name() == name)
        .unwrap_or_else(|| panic!("member `{name}` not discovered"))
}
