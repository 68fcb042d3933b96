//! End-to-end orchestration over an in-memory tree.

mod common;

use treebind::ObjectMapper;
use treebind::derive::Describe;
use treebind::node::ScalarValue;
use treebind::ObjectMappingError;

use common::{MemoryNode, registry};

// -----------------------------------------------------------------------------
// Fixtures

#[derive(Describe, Debug, PartialEq)]
#[describe(default)]
struct Base {
    id: String,
}

impl Default for Base {
    fn default() -> Self {
        Self {
            id: String::from("fallback"),
        }
    }
}

#[derive(Describe, Default, Debug, PartialEq)]
#[describe(default)]
struct Widget {
    #[describe(extends)]
    base: Base,
    count: u32,
}

#[derive(Describe, Debug, PartialEq)]
#[describe(record)]
struct Endpoint {
    host: String,
    port: Option<i64>,
}

#[derive(Describe, Debug, PartialEq)]
struct PopulateOnly {
    retries: u32,
}

// -----------------------------------------------------------------------------
// Loading

#[test]
fn loads_across_hierarchy_levels() {
    let mapper = ObjectMapper::new(registry());
    let node = MemoryNode::empty()
        .with_scalar_child("id", ScalarValue::Str(String::from("abc")))
        .with_scalar_child("count", ScalarValue::Int(7));

    let widget: Widget = mapper.load(&node).unwrap();
    assert_eq!(widget.base.id, "abc");
    assert_eq!(widget.count, 7);
}

#[test]
fn absent_members_keep_instance_defaults() {
    let mapper = ObjectMapper::new(registry());
    let node = MemoryNode::empty().with_scalar_child("count", ScalarValue::Int(2));

    let widget: Widget = mapper.load(&node).unwrap();
    assert_eq!(widget.base.id, "fallback");
    assert_eq!(widget.count, 2);
}

#[test]
fn virtual_child_counts_as_absent() {
    let mapper = ObjectMapper::new(registry());
    let node = MemoryNode::empty().with_child("id", MemoryNode::empty());

    let widget: Widget = mapper.load(&node).unwrap();
    assert_eq!(widget.base.id, "fallback");
}

#[test]
fn registry_default_fills_vacant_option() {
    #[derive(Describe, Default, Debug)]
    #[describe(default)]
    struct Timeouts {
        connect: Option<i64>,
    }

    let mut registry = common::registry_inner();
    registry.register_implicit::<Option<i64>>();

    // `Option::<i64>::default()` is `None`, so the registered fallback is
    // indistinguishable from absence here; the point is that resolution
    // consults it without clobbering explicit values.
    let mapper = ObjectMapper::new(std::sync::Arc::new(registry));
    let loaded: Timeouts = mapper
        .load(&MemoryNode::empty().with_scalar_child("connect", ScalarValue::Int(30)))
        .unwrap();
    assert_eq!(loaded.connect, Some(30));

    let absent: Timeouts = mapper.load(&MemoryNode::empty()).unwrap();
    assert_eq!(absent.connect, None);
}

#[test]
fn missing_serializer_reports_member_path() {
    #[derive(Describe, Default, Debug)]
    #[describe(default)]
    struct Odd {
        flag: bool,
    }

    let mapper = ObjectMapper::new(registry());
    let node = MemoryNode::empty().with_scalar_child("flag", ScalarValue::Bool(true));

    let error = mapper.load::<Odd>(&node).unwrap_err();
    match error {
        ObjectMappingError::NoSerializerFound { type_path, path } => {
            assert_eq!(type_path, "bool");
            assert_eq!(path, ["flag"]);
        }
        other => panic!("expected NoSerializerFound, got {other}"),
    }
}

#[test]
fn populate_only_type_falls_back_to_load_into() {
    let mapper = ObjectMapper::new(registry());
    let node = MemoryNode::empty().with_scalar_child("retries", ScalarValue::Int(5));

    // New-instance construction is mandatory for `load`, so it fails.
    let error = mapper.load::<PopulateOnly>(&node).unwrap_err();
    assert!(matches!(
        error,
        ObjectMappingError::ConstructionFailed { .. }
    ));

    let mut instance = PopulateOnly { retries: 0 };
    mapper.load_into(&mut instance, &node).unwrap();
    assert_eq!(instance.retries, 5);
}

#[test]
fn record_types_load_through_their_constructor() {
    let mapper = ObjectMapper::new(registry());
    let node = MemoryNode::empty()
        .with_scalar_child("host", ScalarValue::Str(String::from("localhost")))
        .with_scalar_child("port", ScalarValue::Int(8080));

    let endpoint: Endpoint = mapper.load(&node).unwrap();
    assert_eq!(
        endpoint,
        Endpoint {
            host: String::from("localhost"),
            port: Some(8080),
        }
    );
}

#[test]
fn record_missing_required_member_aborts() {
    let mapper = ObjectMapper::new(registry());
    let node = MemoryNode::empty().with_scalar_child("port", ScalarValue::Int(8080));

    let error = mapper.load::<Endpoint>(&node).unwrap_err();
    assert!(matches!(
        error,
        ObjectMappingError::MissingRequiredMember { .. }
    ));
}

// -----------------------------------------------------------------------------
// Saving

#[test]
fn saves_members_back_to_the_tree() {
    let mapper = ObjectMapper::new(registry());
    let widget = Widget {
        base: Base {
            id: String::from("abc"),
        },
        count: 7,
    };

    let mut node = MemoryNode::empty();
    mapper.save(&widget, &mut node).unwrap();

    use treebind::node::SourceNode;
    let id = node.get("id").and_then(|child| child.scalar()).unwrap();
    assert_eq!(id, &ScalarValue::Str(String::from("abc")));
    let count = node.get("count").and_then(|child| child.scalar()).unwrap();
    assert_eq!(count, &ScalarValue::Int(7));
}

#[test]
fn save_then_load_round_trips() {
    let mapper = ObjectMapper::new(registry());
    let original = Widget {
        base: Base {
            id: String::from("cycle"),
        },
        count: 12,
    };

    let mut node = MemoryNode::empty();
    mapper.save(&original, &mut node).unwrap();
    let reloaded: Widget = mapper.load(&node).unwrap();
    assert_eq!(reloaded, original);
}

// -----------------------------------------------------------------------------
// Static registration

#[cfg(feature = "auto_register")]
mod auto_register {
    use super::*;
    use treebind::registry::SerializerRegistry;

    treebind::submit_serializers!(|registry| {
        registry.register::<u32>(common::U32Serializer);
    });

    #[test]
    fn drains_submissions_idempotently() {
        let mut registry = SerializerRegistry::new();
        assert!(!registry.contains::<u32>());

        assert!(registry.auto_register());
        assert!(registry.contains::<u32>());

        // Repeated drains stay cheap and change nothing.
        assert!(registry.auto_register());
        assert!(registry.contains::<u32>());
    }
}
