use super::*;
use crate::{
    cache::{CacheTag, TaggedCache},
    model::{ClassRegistry, EntityClass, EntityClassLookup},
    value::Value,
};
use std::time::Duration;
use uuid::Uuid;

const TTL: Duration = Duration::from_secs(60 * 60 * 24);

const BAR_A: Uuid = Uuid::from_u128(0xa);
const BAR_B: Uuid = Uuid::from_u128(0xb);
const NODE_GUID: Uuid = Uuid::from_u128(0x42);

fn bar_class() -> EntityClass {
    EntityClass::new("demo.bar", "Demo_Bar", "BarID")
        .with_guid_column("BarGUID")
        .with_code_name_column("BarName")
}

fn store() -> MemoryIdentityStore {
    MemoryIdentityStore::new()
        .with_row(
            "demo.bar",
            IdentityRow::new(1).with_guid(BAR_A).with_code_name("BarA"),
        )
        .with_row(
            "demo.bar",
            IdentityRow::new(2).with_guid(BAR_B).with_code_name("BarB"),
        )
        .with_row("cms.tree", IdentityRow::new(42).with_guid(NODE_GUID))
        .with_row(
            "cms.relationshipname",
            IdentityRow::new(9).with_code_name("RelatedArticles"),
        )
}

#[test]
fn parse_classifies_raw_text_once() {
    assert_eq!(IdentityRef::parse("42"), IdentityRef::Id(42));
    assert_eq!(
        IdentityRef::parse("00000000-0000-0000-0000-00000000000a"),
        IdentityRef::Guid(BAR_A)
    );
    assert_eq!(
        IdentityRef::parse("BarA"),
        IdentityRef::CodeName("BarA".to_string())
    );
    assert_eq!(IdentityRef::from(7_i64).kind(), IdentityKind::Id);
}

#[test]
fn mixed_inputs_resolve_to_ids_in_input_order() {
    let store = store();
    let cache = TaggedCache::new();
    let resolver = IdentityResolver::new(&store, &cache, TTL);

    let refs = vec![
        IdentityRef::from("BarB"),
        IdentityRef::Guid(BAR_A),
        IdentityRef::Id(1),
    ];
    let resolved = resolver.resolve(&bar_class(), &refs, IdentityKind::Id);

    assert_eq!(resolved, vec![Value::Int(2), Value::Int(1)]);
}

#[test]
fn padded_code_names_are_trimmed() {
    assert_eq!(
        IdentityRef::parse(" BarA \t"),
        IdentityRef::CodeName("BarA".to_string())
    );

    let store = store();
    let cache = TaggedCache::new();
    let resolver = IdentityResolver::new(&store, &cache, TTL);
    let resolved = resolver.resolve(&bar_class(), &[IdentityRef::from("  BarA ")], IdentityKind::Id);

    assert_eq!(resolved, vec![Value::Int(1)]);
}

#[test]
fn unmatched_inputs_are_dropped() {
    let store = store();
    let cache = TaggedCache::new();
    let resolver = IdentityResolver::new(&store, &cache, TTL);

    let refs = vec![IdentityRef::from("Nope"), IdentityRef::from("bara")];
    let resolved = resolver.resolve(&bar_class(), &refs, IdentityKind::Guid);

    assert_eq!(resolved, vec![Value::Guid(BAR_A)]);
}

#[test]
fn matching_kind_passes_through_without_lookup() {
    let store = store();
    let cache = TaggedCache::new();
    let resolver = IdentityResolver::new(&store, &cache, TTL);

    let resolved = resolver.resolve(
        &bar_class(),
        &[IdentityRef::Id(5), IdentityRef::Id(6)],
        IdentityKind::Id,
    );

    assert_eq!(resolved, vec![Value::Int(5), Value::Int(6)]);
    assert_eq!(store.lookups(), 0);
}

#[test]
fn code_name_output_projects_rows() {
    let store = store();
    let cache = TaggedCache::new();
    let resolver = IdentityResolver::new(&store, &cache, TTL);

    let value = resolver.resolve_one(&bar_class(), &IdentityRef::Id(2), IdentityKind::CodeName);

    assert_eq!(value, Some(Value::Text("BarB".to_string())));
}

#[test]
fn missing_output_column_drops_everything() {
    let store = store();
    let cache = TaggedCache::new();
    let resolver = IdentityResolver::new(&store, &cache, TTL);
    let class = EntityClass::new("demo.bar", "Demo_Bar", "BarID");

    let resolved = resolver.resolve(&class, &[IdentityRef::Id(1)], IdentityKind::Guid);

    assert!(resolved.is_empty());
}

#[test]
fn failed_lookup_collapses_to_miss() {
    let store = store();
    store.set_failing(true);
    let cache = TaggedCache::new();
    let resolver = IdentityResolver::new(&store, &cache, TTL);

    let resolved = resolver.resolve(
        &bar_class(),
        &[IdentityRef::from("BarA"), IdentityRef::Id(3)],
        IdentityKind::Id,
    );

    assert_eq!(resolved, vec![Value::Int(3)]);
}

#[test]
fn owner_guid_is_cached_and_tagged_by_entity() {
    let store = store();
    let cache = TaggedCache::new();
    let resolver = IdentityResolver::new(&store, &cache, TTL);
    let tree = ClassRegistry::with_builtins().lookup("cms.tree").unwrap();

    assert_eq!(resolver.resolve_owner_key(&tree, OwnerRef::Guid(NODE_GUID)), Some(42));
    assert_eq!(resolver.resolve_owner_key(&tree, OwnerRef::Guid(NODE_GUID)), Some(42));
    assert_eq!(store.lookups(), 1);

    assert_eq!(cache.invalidate_tag(&CacheTag::entity(42)), 1);
    assert_eq!(resolver.resolve_owner_key(&tree, OwnerRef::Guid(NODE_GUID)), Some(42));
    assert_eq!(store.lookups(), 2);
}

#[test]
fn owner_id_needs_no_lookup() {
    let store = store();
    let cache = TaggedCache::new();
    let resolver = IdentityResolver::new(&store, &cache, TTL);
    let tree = ClassRegistry::with_builtins().lookup("cms.tree").unwrap();

    assert_eq!(resolver.resolve_owner_key(&tree, OwnerRef::Id(7)), Some(7));
    assert_eq!(store.lookups(), 0);
    assert!(cache.is_empty());
}

#[test]
fn unknown_owner_guid_caches_the_miss() {
    let store = store();
    let cache = TaggedCache::new();
    let resolver = IdentityResolver::new(&store, &cache, TTL);
    let tree = ClassRegistry::with_builtins().lookup("cms.tree").unwrap();
    let unknown = OwnerRef::Guid(Uuid::from_u128(0xdead));

    assert_eq!(resolver.resolve_owner_key(&tree, unknown), None);
    assert_eq!(resolver.resolve_owner_key(&tree, unknown), None);
    assert_eq!(store.lookups(), 1);
}

#[test]
fn owner_lookup_failure_is_not_cached() {
    let store = store();
    let cache = TaggedCache::new();
    let resolver = IdentityResolver::new(&store, &cache, TTL);
    let tree = ClassRegistry::with_builtins().lookup("cms.tree").unwrap();

    store.set_failing(true);
    assert_eq!(resolver.resolve_owner_key(&tree, OwnerRef::Guid(NODE_GUID)), None);

    store.set_failing(false);
    assert_eq!(resolver.resolve_owner_key(&tree, OwnerRef::Guid(NODE_GUID)), Some(42));
}

#[test]
fn relationship_name_is_cached_until_tag_invalidated() {
    let store = store();
    let cache = TaggedCache::new();
    let resolver = IdentityResolver::new(&store, &cache, TTL);
    let names = ClassRegistry::with_builtins()
        .lookup("cms.relationshipname")
        .unwrap();

    assert_eq!(resolver.resolve_relationship_name(&names, "RelatedArticles"), Some(9));
    assert_eq!(resolver.resolve_relationship_name(&names, "RelatedArticles"), Some(9));
    assert_eq!(store.lookups(), 1);

    cache.invalidate_tag(&CacheTag::relationship_name("RelatedArticles"));
    assert_eq!(resolver.resolve_relationship_name(&names, "RelatedArticles"), Some(9));
    assert_eq!(store.lookups(), 2);
}

#[test]
fn unknown_relationship_name_is_cached_under_its_tag() {
    let store = store();
    let cache = TaggedCache::new();
    let resolver = IdentityResolver::new(&store, &cache, TTL);
    let names = ClassRegistry::with_builtins()
        .lookup("cms.relationshipname")
        .unwrap();

    assert_eq!(resolver.resolve_relationship_name(&names, "Missing"), None);
    assert_eq!(
        cache.invalidate_tag(&CacheTag::relationship_name("Missing")),
        1
    );
}
