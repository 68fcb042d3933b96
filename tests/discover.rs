//! Discovery walks, hierarchy resolution and member identity.

mod common;

use treebind::derive::Describe;
use treebind::discover::{FieldDiscoverer, Member, StructFieldDiscoverer};
use treebind::factory::InstanceFactory;
use treebind::info::{AnnotatedType, TypePath, TypeShape, resolve_ancestor};
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

#[derive(Describe, Default, Debug)]
#[describe(default)]
struct LeafOnly {
    #[describe(extends)]
    base: Base,
}

#[derive(Describe, Default, Debug)]
#[describe(default)]
struct Shadow {
    #[describe(extends)]
    base: Base,
    id: String,
}

#[derive(Describe, Default, Debug)]
#[describe(default)]
struct WithSkip {
    kept: u32,
    #[describe(skip)]
    scratch: u32,
}

#[derive(Describe, Default, Debug)]
#[describe(default)]
struct GenBase<T> {
    value: T,
}

#[derive(Describe, Default, Debug)]
#[describe(default)]
struct ConcreteHolder {
    #[describe(extends)]
    base: GenBase<u32>,
    tag: String,
}

struct Unbuildable;

impl TypePath for Unbuildable {
    fn type_path() -> &'static str {
        "discover::Unbuildable"
    }

    fn type_name() -> &'static str {
        "Unbuildable"
    }

    fn type_ident() -> &'static str {
        "Unbuildable"
    }
}

impl Describe for Unbuildable {
    fn annotated_type() -> AnnotatedType {
        AnnotatedType::of::<Self>(TypeShape::Abstract)
    }
}

fn discover<T: Describe>() -> (Vec<Member>, Box<dyn InstanceFactory>) {
    let discoverer = StructFieldDiscoverer::empty_constructor();
    let mut members = Vec::new();
    let mut collector = |member: Member| members.push(member);
    let factory = discoverer
        .discover(&T::annotated_type(), &mut collector)
        .expect("discovery should succeed")
        .expect("strategy should apply");
    (members, factory)
}

// -----------------------------------------------------------------------------
// Tests

#[test]
fn walks_every_level_once() {
    let (members, _) = discover::<Widget>();
    let names: Vec<_> = members.iter().map(Member::name).collect();
    assert_eq!(names, ["count", "id"]);
}

#[test]
fn ancestor_only_members_surface_exactly_once() {
    let (members, _) = discover::<LeafOnly>();
    let names: Vec<_> = members.iter().map(Member::name).collect();
    assert_eq!(names, ["id"]);
}

#[test]
fn redeclared_name_yields_two_distinct_members() {
    let (members, _) = discover::<Shadow>();
    let ids: Vec<_> = members
        .iter()
        .filter(|member| member.name() == "id")
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0].accessor().key(), ids[1].accessor().key());

    // Writing one must never mutate the other.
    let mut shadow = Shadow::default();
    ids[0]
        .accessor()
        .set(&mut shadow, Box::new(String::from("own")))
        .unwrap();
    ids[1]
        .accessor()
        .set(&mut shadow, Box::new(String::from("inherited")))
        .unwrap();
    assert_eq!(shadow.id, "own");
    assert_eq!(shadow.base.id, "inherited");
}

#[test]
fn skipped_members_are_never_discovered() {
    let (members, _) = discover::<WithSkip>();
    let names: Vec<_> = members.iter().map(Member::name).collect();
    assert_eq!(names, ["kept"]);
}

#[test]
fn abstract_target_is_not_constructible() {
    let discoverer = StructFieldDiscoverer::empty_constructor();
    let mut collector = |_member: Member| {};
    let result = discoverer.discover(&Unbuildable::annotated_type(), &mut collector);
    assert!(matches!(
        result,
        Err(ObjectMappingError::TypeNotConstructible { .. })
    ));
}

#[test]
fn opaque_target_is_declined() {
    let discoverer = StructFieldDiscoverer::empty_constructor();
    let mut collector = |_member: Member| {};
    let result = discoverer
        .discover(&<u32 as Describe>::annotated_type(), &mut collector)
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn generic_ancestor_member_resolves_exactly() {
    let (members, _) = discover::<ConcreteHolder>();
    let value = member(&members, "value");
    assert!(value.ty().ty().is::<u32>());
}

#[test]
fn resolve_ancestor_binds_generics() {
    let target = ConcreteHolder::annotated_type();

    let base = resolve_ancestor(&target, "GenBase").unwrap();
    assert!(base.generics().get("T").unwrap().type_is::<u32>());

    let same = resolve_ancestor(&target, "ConcreteHolder").unwrap();
    assert!(same.ty().is::<ConcreteHolder>());
}

#[test]
fn resolve_ancestor_rejects_strangers() {
    let target = Widget::annotated_type();
    let error = resolve_ancestor(&target, "GenBase").unwrap_err();
    assert_eq!(error.ancestor(), "GenBase");
}

#[test]
fn renamed_member_uses_external_name() {
    #[derive(Describe, Default)]
    #[describe(default)]
    struct Renamed {
        #[describe(name = "max-count")]
        max_count: u32,
    }

    let (members, _) = discover::<Renamed>();
    assert_eq!(members[0].name(), "max-count");
}

#[test]
fn attributes_merge_declared_first() {
    #[derive(PartialEq, Debug)]
    struct Marker(&'static str);

    #[derive(Describe, Default)]
    #[describe(default, @Marker("type"), @true)]
    struct Tagged {
        inner: u32,
    }

    #[derive(Describe, Default)]
    #[describe(default)]
    struct Holder {
        #[describe(@Marker("field"), @7u32)]
        tagged: Tagged,
    }

    let (members, _) = discover::<Holder>();
    let tagged = member(&members, "tagged");

    // Declared attributes win; type-use attributes fill the rest.
    assert_eq!(tagged.attributes().get::<Marker>(), Some(&Marker("field")));
    assert_eq!(tagged.attributes().get::<u32>(), Some(&7));
    assert_eq!(tagged.attributes().get::<bool>(), Some(&true));
}

#[test]
fn factory_without_default_is_populate_only() {
    #[derive(Describe, Debug)]
    struct NoCtor {
        value: u32,
    }

    let (_, factory) = discover::<NoCtor>();
    assert!(!factory.can_create_instances());
}
