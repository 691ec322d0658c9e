use crate::{
    cache::{CacheEntry, CacheKey, CacheTag, TaggedCache},
    error::InternalError,
    identity::{IdentityKind, IdentityRef, IdentityRow, IdentityStore, OwnerRef},
    model::EntityClass,
    obs::sink::{self, MetricsEvent},
    value::Value,
};
use std::time::Duration;
use tracing::{debug, warn};

///
/// IdentityResolver
///
/// Translates identity references into the canonical values stored by a
/// binding table. Owner keys and relationship names are memoized in the
/// shared [`TaggedCache`]; everything else is a pure translation.
///

pub struct IdentityResolver<'a, S: ?Sized> {
    store: &'a S,
    cache: &'a TaggedCache<Option<i64>>,
    ttl: Duration,
}

impl<'a, S> IdentityResolver<'a, S>
where
    S: IdentityStore + ?Sized,
{
    #[must_use]
    pub const fn new(store: &'a S, cache: &'a TaggedCache<Option<i64>>, ttl: Duration) -> Self {
        Self { store, cache, ttl }
    }

    /// Resolve `refs` against `class`, producing `output` identities.
    ///
    /// References already in the output representation pass through
    /// untouched; the rest are looked up in one batch per input kind.
    /// Unmatched references are dropped.
    pub fn resolve(
        &self,
        class: &EntityClass,
        refs: &[IdentityRef],
        output: IdentityKind,
    ) -> Vec<Value> {
        if class.identity_column(output).is_none() {
            warn!(
                class = %class.code_name,
                kind = %output,
                "class has no column for requested identity kind; dropping all values"
            );
            record_resolved(refs.len(), 0);
            return Vec::new();
        }

        // Phase 1: batch lookups for every foreign input kind.
        let mut rows: Vec<IdentityRow> = Vec::new();
        for kind in [IdentityKind::Id, IdentityKind::Guid, IdentityKind::CodeName] {
            if kind == output {
                continue;
            }
            let values: Vec<Value> = refs
                .iter()
                .filter(|identity| identity.kind() == kind)
                .map(IdentityRef::to_value)
                .collect();
            if values.is_empty() {
                continue;
            }
            rows.extend(self.lookup(class, kind, &values));
        }

        // Phase 2: project in input order, dropping misses and duplicates.
        let mut resolved: Vec<Value> = Vec::with_capacity(refs.len());
        for identity in refs {
            let value = if identity.kind() == output {
                Some(identity.to_value())
            } else {
                rows.iter()
                    .find(|row| row.matches(identity))
                    .and_then(|row| row.value(output))
            };

            match value {
                Some(value) if !resolved.contains(&value) => resolved.push(value),
                Some(_) => {}
                None => debug!(class = %class.code_name, ?identity, "identity not found; dropped"),
            }
        }

        record_resolved(refs.len(), resolved.len());

        resolved
    }

    /// Resolve a single reference; `None` when it matches nothing.
    pub fn resolve_one(
        &self,
        class: &EntityClass,
        identity: &IdentityRef,
        output: IdentityKind,
    ) -> Option<Value> {
        self.resolve(class, std::slice::from_ref(identity), output)
            .into_iter()
            .next()
    }

    /// Resolve a relationship anchor to its numeric id.
    ///
    /// GUID anchors are cached under `ownerKey:{guid}` and tagged with
    /// `entity|{id}` once found. Numeric anchors need no lookup.
    pub fn resolve_owner_key(&self, class: &EntityClass, owner: OwnerRef) -> Option<i64> {
        let guid = match owner {
            OwnerRef::Id(id) => return Some(id),
            OwnerRef::Guid(guid) => guid,
        };

        let key = CacheKey::owner_key(guid);
        self.cache
            .get_or_compute(&key, self.ttl, || {
                let id = self
                    .store
                    .find(class, IdentityKind::Guid, &[Value::Guid(guid)])?
                    .into_iter()
                    .find(|row| row.guid == Some(guid))
                    .map(|row| row.id);

                let entry = CacheEntry::new(id);
                Ok::<_, InternalError>(match id {
                    Some(id) => entry.with_tag(CacheTag::entity(id)),
                    None => entry,
                })
            })
            .unwrap_or_else(|err| lookup_failed(&key, &err))
    }

    /// Resolve a relationship-type name to its id, cached per name.
    pub fn resolve_relationship_name(&self, class: &EntityClass, name: &str) -> Option<i64> {
        let key = CacheKey::relationship_name(name);
        let identity = IdentityRef::CodeName(name.to_string());

        self.cache
            .get_or_compute(&key, self.ttl, || {
                let id = self
                    .store
                    .find(class, IdentityKind::CodeName, &[identity.to_value()])?
                    .into_iter()
                    .find(|row| row.matches(&identity))
                    .map(|row| row.id);

                Ok::<_, InternalError>(
                    CacheEntry::new(id).with_tag(CacheTag::relationship_name(name)),
                )
            })
            .unwrap_or_else(|err| lookup_failed(&key, &err))
    }

    fn lookup(&self, class: &EntityClass, kind: IdentityKind, values: &[Value]) -> Vec<IdentityRow> {
        if class.identity_column(kind).is_none() {
            debug!(class = %class.code_name, %kind, "class has no column for input identity kind");
            return Vec::new();
        }

        self.store.find(class, kind, values).unwrap_or_else(|err| {
            sink::record(MetricsEvent::LookupFailed);
            warn!(class = %class.code_name, %kind, error = %err, "identity lookup failed; treating as miss");
            Vec::new()
        })
    }
}

fn lookup_failed(key: &CacheKey, err: &InternalError) -> Option<i64> {
    sink::record(MetricsEvent::LookupFailed);
    warn!(key = %key, error = %err, "cached identity lookup failed; treating as miss");

    None
}

fn record_resolved(requested: usize, resolved: usize) {
    sink::record(MetricsEvent::IdentityResolved {
        requested: requested as u64,
        resolved: resolved as u64,
    });
}
