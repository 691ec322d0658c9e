use crate::error::Error;
use relext_core::{
    self as core,
    binding::{BindingDescriptor, MembershipMode},
    filters::CategoryScope,
    identity::{IdentityRef, IdentityStore, OwnerRef},
    model::ClassRegistry,
    obs::MetricsSink,
    query::QueryTarget,
    relationship::RelationshipOptions,
};
use std::rc::Rc;

///
/// Filters
/// Public filter facade bound to a [`crate::Relext`] context.
/// Converts core errors into `relext::Error`.
///

pub struct Filters<'a, S> {
    inner: core::filters::RelationshipFilters<'a, ClassRegistry, S>,
}

impl<'a, S: IdentityStore> Filters<'a, S> {
    pub(crate) const fn new(
        inner: core::filters::RelationshipFilters<'a, ClassRegistry, S>,
    ) -> Self {
        Self { inner }
    }

    /// Override the metrics sink for filters applied through this facade.
    #[must_use]
    pub fn metrics_sink(mut self, sink: Rc<dyn MetricsSink>) -> Self {
        self.inner = self.inner.metrics_sink(sink);
        self
    }

    /// Borrow the core facade, whose methods return core errors.
    #[must_use]
    pub const fn core(&self) -> &core::filters::RelationshipFilters<'a, ClassRegistry, S> {
        &self.inner
    }

    //
    // Descriptors
    //

    pub fn binding_descriptor(
        &self,
        binding_class: &str,
        owner_id_column: &str,
        left_column: &str,
        right_column: &str,
    ) -> Result<BindingDescriptor, Error> {
        Ok(self
            .inner
            .binding_descriptor(binding_class, owner_id_column, left_column, right_column)?)
    }

    //
    // Filters
    //

    pub fn filter_by_relationship<Q: QueryTarget>(
        &self,
        base: Q,
        owner: OwnerRef,
        relationship_name: Option<&str>,
        options: RelationshipOptions,
    ) -> Result<Q, Error> {
        Ok(self
            .inner
            .filter_by_relationship(base, owner, relationship_name, options)?)
    }

    pub fn filter_by_custom_binding<Q: QueryTarget>(
        &self,
        base: Q,
        descriptor: &BindingDescriptor,
        target_class: &str,
        target: &IdentityRef,
        ascending: bool,
    ) -> Result<Q, Error> {
        Ok(self
            .inner
            .filter_by_custom_binding(base, descriptor, target_class, target, ascending)?)
    }

    pub fn filter_by_binding<Q: QueryTarget>(
        &self,
        base: Q,
        descriptor: &BindingDescriptor,
        target_class: &str,
        values: &[IdentityRef],
        mode: MembershipMode,
        owner_table: Option<&str>,
    ) -> Result<Q, Error> {
        Ok(self
            .inner
            .filter_by_binding(base, descriptor, target_class, values, mode, owner_table)?)
    }

    pub fn filter_by_binding_category<Q: QueryTarget>(
        &self,
        base: Q,
        descriptor: &BindingDescriptor,
        values: &[IdentityRef],
        mode: MembershipMode,
        owner_table: Option<&str>,
    ) -> Result<Q, Error> {
        Ok(self
            .inner
            .filter_by_binding_category(base, descriptor, values, mode, owner_table)?)
    }

    pub fn filter_by_category<Q: QueryTarget>(
        &self,
        base: Q,
        scope: CategoryScope,
        values: &[IdentityRef],
        mode: MembershipMode,
        owner_table: Option<&str>,
    ) -> Result<Q, Error> {
        Ok(self
            .inner
            .filter_by_category(base, scope, values, mode, owner_table)?)
    }
}
