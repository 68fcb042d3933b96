//! Completion semantics: populate, construct, implicit defaults and records.

mod common;

use std::any::Any;

use treebind::derive::Describe;
use treebind::discover::{FieldDiscoverer, Member, RecordDiscoverer, StructFieldDiscoverer};
use treebind::factory::{ImplicitProvider, InstanceFactory};
use treebind::{Describe, ObjectMappingError};

use common::member;

// -----------------------------------------------------------------------------
// Fixtures

#[derive(Describe, Default, Debug)]
#[describe(default)]
struct Base {
    id: String,
}

#[derive(Describe, Default, Debug)]
#[describe(default)]
struct Widget {
    #[describe(extends)]
    base: Base,
    count: u32,
}

#[derive(Describe, Debug, PartialEq)]
#[describe(default)]
struct Opts {
    label: Option<String>,
    retries: u32,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            label: Some(String::from("preset")),
            retries: 3,
        }
    }
}

#[derive(Describe, Debug, PartialEq)]
#[describe(record)]
struct Endpoint {
    host: String,
    port: Option<i64>,
}

fn discover_with<T: Describe>(
    discoverer: &dyn FieldDiscoverer,
) -> (Vec<Member>, Box<dyn InstanceFactory>) {
    let mut members = Vec::new();
    let mut collector = |member: Member| members.push(member);
    let factory = discoverer
        .discover(&T::annotated_type(), &mut collector)
        .expect("discovery should succeed")
        .expect("strategy should apply");
    (members, factory)
}

fn discover<T: Describe>() -> (Vec<Member>, Box<dyn InstanceFactory>) {
    discover_with::<T>(&StructFieldDiscoverer::empty_constructor())
}

// -----------------------------------------------------------------------------
// Mutable lifecycle

#[test]
fn explicit_entries_are_written() {
    let (members, factory) = discover::<Widget>();

    let mut intermediate = factory.begin();
    member(&members, "id").deposit().put(
        &mut intermediate,
        Some(Box::new(String::from("abc"))),
        ImplicitProvider::none(),
    );
    member(&members, "count").deposit().put(
        &mut intermediate,
        Some(Box::new(7u32)),
        ImplicitProvider::none(),
    );

    let mut widget = Widget::default();
    factory.populate_existing(&mut widget, intermediate).unwrap();
    assert_eq!(widget.base.id, "abc");
    assert_eq!(widget.count, 7);
}

#[test]
fn construct_new_equals_populate_on_fresh_instance() {
    let (members, factory) = discover::<Widget>();
    assert!(factory.can_create_instances());

    let mut intermediate = factory.begin();
    member(&members, "id").deposit().put(
        &mut intermediate,
        Some(Box::new(String::from("abc"))),
        ImplicitProvider::none(),
    );
    member(&members, "count").deposit().put(
        &mut intermediate,
        Some(Box::new(7u32)),
        ImplicitProvider::none(),
    );

    let widget = factory.construct_new(intermediate).unwrap();
    let widget = widget.downcast::<Widget>().unwrap();
    assert_eq!(widget.base.id, "abc");
    assert_eq!(widget.count, 7);
}

#[test]
fn missing_constructor_strategy_fails_construct_only() {
    #[derive(Describe, Debug)]
    struct NoCtor {
        value: u32,
    }

    let (members, factory) = discover::<NoCtor>();
    assert!(!factory.can_create_instances());

    let mut intermediate = factory.begin();
    member(&members, "value").deposit().put(
        &mut intermediate,
        Some(Box::new(11u32)),
        ImplicitProvider::none(),
    );
    let error = factory.construct_new(intermediate).unwrap_err();
    assert!(matches!(
        error,
        ObjectMappingError::ConstructionFailed { .. }
    ));

    // Populate-only mode still works.
    let (members, factory) = discover::<NoCtor>();
    let mut intermediate = factory.begin();
    member(&members, "value").deposit().put(
        &mut intermediate,
        Some(Box::new(11u32)),
        ImplicitProvider::none(),
    );
    let mut instance = NoCtor { value: 0 };
    factory.populate_existing(&mut instance, intermediate).unwrap();
    assert_eq!(instance.value, 11);
}

#[test]
fn implicit_fills_absence_only() {
    let (members, factory) = discover::<Opts>();

    let mut intermediate = factory.begin();
    member(&members, "label").deposit().put(
        &mut intermediate,
        None,
        ImplicitProvider::of(|| Box::new(Some(String::from("supplied")))),
    );
    member(&members, "retries").deposit().put(
        &mut intermediate,
        None,
        ImplicitProvider::of(|| Box::new(99u32)),
    );

    // The instance's own defaults are present, so neither supplier result
    // may land.
    let instance = factory.construct_new(intermediate).unwrap();
    let instance = instance.downcast::<Opts>().unwrap();
    assert_eq!(*instance, Opts::default());
}

#[test]
fn implicit_fills_vacant_option() {
    let (members, factory) = discover::<Opts>();

    let mut intermediate = factory.begin();
    member(&members, "label").deposit().put(
        &mut intermediate,
        None,
        ImplicitProvider::of(|| Box::new(Some(String::from("supplied")))),
    );

    let mut instance = Opts {
        label: None,
        retries: 3,
    };
    factory.populate_existing(&mut instance, intermediate).unwrap();
    assert_eq!(instance.label.as_deref(), Some("supplied"));
}

#[test]
fn implicit_without_supplier_preserves_instance() {
    let (members, factory) = discover::<Opts>();

    let mut intermediate = factory.begin();
    member(&members, "label")
        .deposit()
        .put(&mut intermediate, None, ImplicitProvider::none());
    member(&members, "retries")
        .deposit()
        .put(&mut intermediate, None, ImplicitProvider::none());

    let mut instance = Opts {
        label: None,
        retries: 42,
    };
    factory.populate_existing(&mut instance, intermediate).unwrap();
    assert_eq!(instance.label, None);
    assert_eq!(instance.retries, 42);
}

#[test]
fn round_trip_all_members() {
    let (members, factory) = discover::<Widget>();

    let mut intermediate = factory.begin();
    member(&members, "count").deposit().put(
        &mut intermediate,
        Some(Box::new(31u32)),
        ImplicitProvider::none(),
    );
    member(&members, "id").deposit().put(
        &mut intermediate,
        Some(Box::new(String::from("roundtrip"))),
        ImplicitProvider::none(),
    );

    let instance = factory.construct_new(intermediate).unwrap();

    let id = member(&members, "id").accessor().get(&*instance).unwrap();
    assert_eq!(id.downcast_ref::<String>().unwrap(), "roundtrip");
    let count = member(&members, "count").accessor().get(&*instance).unwrap();
    assert_eq!(*count.downcast_ref::<u32>().unwrap(), 31);
}

// -----------------------------------------------------------------------------
// Immutable lifecycle

#[test]
fn record_constructs_from_ordered_arguments() {
    let (members, factory) = discover_with::<Endpoint>(&RecordDiscoverer::new());
    assert!(factory.can_create_instances());

    let mut intermediate = factory.begin();
    member(&members, "host").deposit().put(
        &mut intermediate,
        Some(Box::new(String::from("localhost"))),
        ImplicitProvider::none(),
    );
    member(&members, "port").deposit().put(
        &mut intermediate,
        Some(Box::new(Some(8080i64))),
        ImplicitProvider::none(),
    );

    let endpoint = factory.construct_new(intermediate).unwrap();
    let endpoint = endpoint.downcast::<Endpoint>().unwrap();
    assert_eq!(
        *endpoint,
        Endpoint {
            host: String::from("localhost"),
            port: Some(8080),
        }
    );
}

#[test]
fn record_missing_required_member_fails_fast() {
    let (members, factory) = discover_with::<Endpoint>(&RecordDiscoverer::new());

    let mut intermediate = factory.begin();
    member(&members, "port").deposit().put(
        &mut intermediate,
        Some(Box::new(Some(8080i64))),
        ImplicitProvider::none(),
    );
    member(&members, "host")
        .deposit()
        .put(&mut intermediate, None, ImplicitProvider::none());

    let error = factory.construct_new(intermediate).unwrap_err();
    match error {
        ObjectMappingError::MissingRequiredMember { member, .. } => {
            assert_eq!(member, "host");
        }
        other => panic!("expected MissingRequiredMember, got {other}"),
    }
}

#[test]
fn record_optional_parameter_defaults_to_none() {
    let (members, factory) = discover_with::<Endpoint>(&RecordDiscoverer::new());

    let mut intermediate = factory.begin();
    member(&members, "host").deposit().put(
        &mut intermediate,
        Some(Box::new(String::from("localhost"))),
        ImplicitProvider::none(),
    );
    member(&members, "port")
        .deposit()
        .put(&mut intermediate, None, ImplicitProvider::none());

    let endpoint = factory.construct_new(intermediate).unwrap();
    let endpoint = endpoint.downcast::<Endpoint>().unwrap();
    assert_eq!(endpoint.port, None);
}

#[test]
fn record_populate_replaces_wholesale() {
    let (members, factory) = discover_with::<Endpoint>(&RecordDiscoverer::new());

    let mut intermediate = factory.begin();
    member(&members, "host").deposit().put(
        &mut intermediate,
        Some(Box::new(String::from("replaced"))),
        ImplicitProvider::none(),
    );
    member(&members, "port")
        .deposit()
        .put(&mut intermediate, None, ImplicitProvider::none());

    let mut endpoint = Endpoint {
        host: String::from("original"),
        port: Some(1),
    };
    factory
        .populate_existing(&mut endpoint, intermediate)
        .unwrap();
    assert_eq!(endpoint.host, "replaced");
    assert_eq!(endpoint.port, None);
}

// -----------------------------------------------------------------------------
// Supplier discipline

#[test]
fn supplier_runs_at_most_once_per_completion() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    let (members, factory) = discover::<Opts>();
    let mut intermediate = factory.begin();
    member(&members, "label").deposit().put(
        &mut intermediate,
        None,
        ImplicitProvider::of(|| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            Box::new(Some(String::from("counted")))
        }),
    );

    let mut instance = Opts {
        label: None,
        retries: 0,
    };
    factory.populate_existing(&mut instance, intermediate).unwrap();
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn redeposit_replaces_in_place() {
    let (members, factory) = discover::<Widget>();

    let mut intermediate = factory.begin();
    member(&members, "count").deposit().put(
        &mut intermediate,
        Some(Box::new(1u32)),
        ImplicitProvider::none(),
    );
    member(&members, "id").deposit().put(
        &mut intermediate,
        Some(Box::new(String::from("first"))),
        ImplicitProvider::none(),
    );
    // A later deposit for the same member replaces the entry without moving
    // its position.
    member(&members, "count").deposit().put(
        &mut intermediate,
        Some(Box::new(2u32)),
        ImplicitProvider::none(),
    );

    assert_eq!(intermediate.len(), 2);
    let keys: Vec<_> = intermediate.keys().collect();
    assert_eq!(keys[0], member(&members, "count").accessor().key());

    let widget = factory.construct_new(intermediate).unwrap();
    let widget = widget.downcast::<Widget>().unwrap();
    assert_eq!(widget.count, 2);
}

// -----------------------------------------------------------------------------
// Erasure discipline

#[test]
fn get_rejects_foreign_instances() {
    let (members, _) = discover::<Widget>();
    let stranger: &dyn Any = &0u8;
    assert!(member(&members, "count").accessor().get(stranger).is_err());
}
