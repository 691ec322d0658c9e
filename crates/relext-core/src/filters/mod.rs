//! Module: filters
//! Responsibility: public entry points that decorate a caller's query with
//! relationship, binding and category conditions.
//! Does not own: query execution, class metadata or identity storage.
//! Boundary: registry and store are borrowed collaborators; the cache is
//! shared with every other facade built over it.
//!
//! Every entry point follows the same sequence: look up classes (errors
//! propagate), resolve identities (misses never error), then either add
//! the condition or hand `base` back unchanged.


use crate::{
    binding::{
        BindingDescriptor, MembershipMode, binding_order, build_binding_join,
        build_binding_predicate,
    },
    cache::TaggedCache,
    config::{CategoryBindingConfig, RelextConfig},
    error::InternalError,
    identity::{IdentityRef, IdentityResolver, IdentityStore, OwnerRef},
    model::{EntityClass, EntityClassLookup},
    obs::sink::{self, FilterKind, MetricsEvent, MetricsSink, with_metrics_sink},
    query::{Join, Predicate, QueryTarget},
    relationship::{RelationshipOptions, build_relationship_join},
};
use std::rc::Rc;
use tracing::debug;

///
/// CategoryScope
///
/// Which built-in category binding table a category filter targets.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CategoryScope {
    /// Per-document (per-culture) categories.
    #[default]
    Document,
    /// Per-node categories shared by every culture of the page.
    Node,
}

///
/// RelationshipFilters
///
/// Query augmentation facade. Generic over the query shape through
/// [`QueryTarget`], so single, typed and multi-class queries share one
/// code path.
///

pub struct RelationshipFilters<'a, R: ?Sized, S: ?Sized> {
    registry: &'a R,
    store: &'a S,
    cache: &'a TaggedCache<Option<i64>>,
    config: &'a RelextConfig,
    metrics: Option<Rc<dyn MetricsSink>>,
}

impl<'a, R, S> RelationshipFilters<'a, R, S>
where
    R: EntityClassLookup + ?Sized,
    S: IdentityStore + ?Sized,
{
    #[must_use]
    pub const fn new(
        registry: &'a R,
        store: &'a S,
        cache: &'a TaggedCache<Option<i64>>,
        config: &'a RelextConfig,
    ) -> Self {
        Self {
            registry,
            store,
            cache,
            config,
            metrics: None,
        }
    }

    /// Route this facade's metrics events to `sink` instead of the global counters.
    #[must_use]
    pub fn metrics_sink(mut self, sink: Rc<dyn MetricsSink>) -> Self {
        self.metrics = Some(sink);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &RelextConfig {
        self.config
    }

    /// Describe a binding class's junction table.
    pub fn binding_descriptor(
        &self,
        binding_class: &str,
        owner_id_column: &str,
        left_column: &str,
        right_column: &str,
    ) -> Result<BindingDescriptor, InternalError> {
        let class = self.registry.lookup(binding_class)?;

        Ok(BindingDescriptor::for_class(
            &class,
            owner_id_column,
            left_column,
            right_column,
        ))
    }

    // ------------------------------------------------------------------
    // Relationship table
    // ------------------------------------------------------------------

    /// Restrict `base` to entities related to `owner` through the built-in
    /// relationship table.
    ///
    /// An owner that resolves to nothing returns `base` unchanged. A name
    /// that resolves to nothing drops the type condition, as does `None`.
    pub fn filter_by_relationship<Q: QueryTarget>(
        &self,
        base: Q,
        owner: OwnerRef,
        relationship_name: Option<&str>,
        options: RelationshipOptions,
    ) -> Result<Q, InternalError> {
        self.with_metrics(|| {
            let node_class = self.registry.lookup(&self.config.classes.node)?;
            let resolver = self.resolver();

            let Some(owner_id) = resolver.resolve_owner_key(&node_class, owner) else {
                return Ok(skip(base, FilterKind::Relationship, "owner not found"));
            };

            let name_id = match relationship_name.map(str::trim).filter(|n| !n.is_empty()) {
                Some(name) => {
                    let name_class = self
                        .registry
                        .lookup(&self.config.classes.relationship_name)?;
                    let id = resolver.resolve_relationship_name(&name_class, name);
                    if id.is_none() {
                        debug!(
                            relationship = name,
                            "relationship name not found; matching any type"
                        );
                    }
                    id
                }
                None => None,
            };

            let join = build_relationship_join(&self.config.relationship, owner_id, name_id, options);

            Ok(applied(join.apply(base), FilterKind::Relationship))
        })
    }

    // ------------------------------------------------------------------
    // Single-target binding
    // ------------------------------------------------------------------

    /// Join `base` to the rows of `descriptor` that bind it to one target.
    ///
    /// The target is resolved against `target_class` into the
    /// descriptor's `right_kind`; when the descriptor has an order column
    /// the result is sorted by it.
    pub fn filter_by_custom_binding<Q: QueryTarget>(
        &self,
        base: Q,
        descriptor: &BindingDescriptor,
        target_class: &str,
        target: &IdentityRef,
        ascending: bool,
    ) -> Result<Q, InternalError> {
        self.with_metrics(|| {
            let class = self.registry.lookup(target_class)?;

            let Some(value) = self
                .resolver()
                .resolve_one(&class, target, descriptor.right_kind)
            else {
                return Ok(skip(base, FilterKind::CustomBinding, "target not found"));
            };

            let join = build_binding_join(descriptor, None);
            let on = join.on & Predicate::eq(descriptor.right(), value);
            let query = base.inner_join(Join::inner(join.table, on));

            let query = match binding_order(descriptor, ascending) {
                Some(term) => query.order_by(term.column, term.direction),
                None => query,
            };

            Ok(applied(query, FilterKind::CustomBinding))
        })
    }

    // ------------------------------------------------------------------
    // Membership conditions
    // ------------------------------------------------------------------

    /// Filter `base` by membership of `values` (resolved against
    /// `target_class`) in the binding table.
    pub fn filter_by_binding<Q: QueryTarget>(
        &self,
        base: Q,
        descriptor: &BindingDescriptor,
        target_class: &str,
        values: &[IdentityRef],
        mode: MembershipMode,
        owner_table: Option<&str>,
    ) -> Result<Q, InternalError> {
        self.with_metrics(|| {
            let class = self.registry.lookup(target_class)?;

            Ok(self.apply_binding(
                base,
                descriptor,
                &class,
                values,
                mode,
                owner_table,
                FilterKind::Binding,
            ))
        })
    }

    /// [`Self::filter_by_binding`] with the target class fixed to categories.
    pub fn filter_by_binding_category<Q: QueryTarget>(
        &self,
        base: Q,
        descriptor: &BindingDescriptor,
        values: &[IdentityRef],
        mode: MembershipMode,
        owner_table: Option<&str>,
    ) -> Result<Q, InternalError> {
        self.with_metrics(|| {
            let class = self.registry.lookup(&self.config.classes.category)?;

            Ok(self.apply_binding(
                base,
                descriptor,
                &class,
                values,
                mode,
                owner_table,
                FilterKind::Category,
            ))
        })
    }

    /// Filter `base` by the built-in category binding of `scope`.
    ///
    /// `owner_table` overrides the scope's default owner table qualifier.
    pub fn filter_by_category<Q: QueryTarget>(
        &self,
        base: Q,
        scope: CategoryScope,
        values: &[IdentityRef],
        mode: MembershipMode,
        owner_table: Option<&str>,
    ) -> Result<Q, InternalError> {
        let binding = self.category_binding(scope);
        let descriptor = BindingDescriptor::new(
            &binding.binding_table,
            &binding.owner_column,
            &binding.owner_column,
            &binding.category_column,
        );
        let owner_table = owner_table.unwrap_or(binding.owner_table.as_str());

        self.filter_by_binding_category(base, &descriptor, values, mode, Some(owner_table))
    }

    const fn category_binding(&self, scope: CategoryScope) -> &CategoryBindingConfig {
        match scope {
            CategoryScope::Document => &self.config.categories.document,
            CategoryScope::Node => &self.config.categories.node,
        }
    }

    #[expect(clippy::too_many_arguments)]
    fn apply_binding<Q: QueryTarget>(
        &self,
        base: Q,
        descriptor: &BindingDescriptor,
        class: &EntityClass,
        values: &[IdentityRef],
        mode: MembershipMode,
        owner_table: Option<&str>,
        kind: FilterKind,
    ) -> Q {
        let targets = self.resolver().resolve(class, values, descriptor.right_kind);

        match build_binding_predicate(descriptor, &targets, mode, owner_table) {
            Some(pred) => {
                debug!(
                    binding = %descriptor.binding_table,
                    %mode,
                    targets = targets.len(),
                    "binding condition added"
                );
                applied(base.filter(pred), kind)
            }
            None => skip(base, kind, "no target resolved"),
        }
    }

    fn resolver(&self) -> IdentityResolver<'a, S> {
        IdentityResolver::new(self.store, self.cache, self.config.cache.ttl())
    }

    fn with_metrics<T>(&self, f: impl FnOnce() -> T) -> T {
        match &self.metrics {
            Some(sink) => with_metrics_sink(Rc::clone(sink), f),
            None => f(),
        }
    }
}

fn applied<Q>(query: Q, kind: FilterKind) -> Q {
    sink::record(MetricsEvent::FilterApplied { kind });

    query
}

fn skip<Q>(base: Q, kind: FilterKind, reason: &'static str) -> Q {
    sink::record(MetricsEvent::FilterSkipped { kind });
    debug!(filter = ?kind, reason, "filter skipped; query unchanged");

    base
}
