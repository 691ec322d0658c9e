use crate::prelude::*;
use crate::{ErrorKind, ErrorOrigin, VERSION};
use relext_core::{
    binding::BindingDescriptor,
    config::RelextConfig,
    error::InternalError,
    identity::{IdentityRow, MemoryIdentityStore},
    model::EntityClass,
};
use uuid::Uuid;

const NODE_GUID: Uuid = Uuid::from_u128(0x1234);

fn store() -> MemoryIdentityStore {
    MemoryIdentityStore::new()
        .with_row("cms.tree", IdentityRow::new(42).with_guid(NODE_GUID))
        .with_row(
            "cms.relationshipname",
            IdentityRow::new(7).with_code_name("RelatedArticles"),
        )
}

fn related(relext: &Relext<MemoryIdentityStore>) -> SelectQuery {
    relext
        .filters()
        .filter_by_relationship(
            SelectQuery::new("CMS_Tree"),
            OwnerRef::Guid(NODE_GUID),
            Some("RelatedArticles"),
            RelationshipOptions::default(),
        )
        .expect("built-in classes resolve")
}

#[test]
fn version_matches_package() {
    assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
}

#[test]
fn context_caches_across_facades() {
    let relext = Relext::new(store(), RelextConfig::default());

    let first = related(&relext);
    let second = related(&relext);

    assert_eq!(first, second);
    assert_eq!(relext.store().lookups(), 2);
}

#[test]
fn invalidation_helpers_evict_tagged_entries() {
    let relext = Relext::new(store(), RelextConfig::default());
    related(&relext);

    assert_eq!(relext.invalidate_entity(42), 1);
    assert_eq!(relext.invalidate_entity(42), 0);
    assert_eq!(relext.invalidate_relationship_name("RelatedArticles"), 1);

    related(&relext);
    assert_eq!(relext.store().lookups(), 4);

    relext.clear_cache();
    related(&relext);
    assert_eq!(relext.store().lookups(), 6);
}

#[test]
fn toml_config_is_applied() {
    let relext = Relext::from_toml_str(
        store(),
        r#"
        [relationship]
        order_column = "SortOrder"
        "#,
    )
    .expect("valid config");

    let sql = related(&relext).to_sql();
    assert!(sql.ends_with("ORDER BY [CMS_Relationship].[SortOrder] ASC"), "{sql}");
}

#[test]
fn invalid_config_maps_to_public_configuration_error() {
    let err = Relext::from_toml_str(store(), "[cache]\nttl_minutes = 0\n")
        .err()
        .expect("zero ttl must be rejected");

    assert_eq!(err.kind, ErrorKind::Configuration);
    assert_eq!(err.origin, ErrorOrigin::Config);
    assert!(err.is_configuration());
}

#[test]
fn unregistered_class_maps_to_public_configuration_error() {
    let relext = Relext::new(store(), RelextConfig::default());

    let err = relext
        .filters()
        .filter_by_binding(
            SelectQuery::new("Demo_Foo"),
            &BindingDescriptor::new("Demo_FooBar", "FooID", "L", "R"),
            "demo.unregistered",
            &[IdentityRef::parse("BarA")],
            MembershipMode::Any,
            None,
        )
        .expect_err("unregistered class");

    assert_eq!(err.kind, ErrorKind::Configuration);
    assert_eq!(err.origin, ErrorOrigin::Registry);
}

#[test]
fn custom_classes_can_be_registered() {
    let mut relext = Relext::new(
        store().with_row("demo.bar", IdentityRow::new(5).with_code_name("BarA")),
        RelextConfig::default(),
    );
    let registry = relext.registry_mut();
    registry.register(EntityClass::new("demo.bar", "Demo_Bar", "BarID").with_code_name_column("BarName"));
    registry.register(EntityClass::new("demo.foobar", "Demo_FooBar", "FooBarID"));

    let descriptor = relext
        .filters()
        .binding_descriptor("demo.foobar", "FooID", "FooBarFooID", "FooBarBarID")
        .expect("registered binding class");
    let query = relext
        .filters()
        .filter_by_binding(
            SelectQuery::new("Demo_Foo"),
            &descriptor,
            "demo.bar",
            &[IdentityRef::parse("BarA")],
            MembershipMode::Any,
            None,
        )
        .expect("registered class");

    assert!(query.to_sql().contains("[Demo_FooBar].[FooBarBarID] = 5"));
}

#[test]
fn identity_store_failures_map_to_internal() {
    let err = Error::from(InternalError::identity_store("connection reset"));

    assert_eq!(err.kind, ErrorKind::Internal);
    assert_eq!(err.origin, ErrorOrigin::Identity);
    assert!(!err.is_configuration());
    assert_eq!(err.to_string(), "connection reset");
}
