//! Module: binding
//! Responsibility: synthesize joins, predicates and sort keys for junction tables.
//! Does not own: identity resolution or query mutation.
//! Boundary: consumes already-resolved target values, emits query fragments.
//!
//! Invariants:
//! - an empty target set never produces a predicate;
//! - predicates test the owner id column against an uncorrelated subselect
//!   of the binding table's left column, so they compose with any join on
//!   the base query and stay correct when owner and left columns share a
//!   name.


use crate::{
    identity::IdentityKind,
    model::EntityClass,
    query::{Column, Join, OrderDirection, OrderTerm, Predicate, SubSelect},
    value::Value,
};
use std::{collections::HashSet, fmt};

///
/// MembershipMode
///
/// Set-containment semantics against the resolved target set.
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum MembershipMode {
    /// At least one binding row references a target.
    #[default]
    Any,
    /// Every target is referenced by its own binding row.
    All,
    /// No binding row references any target.
    None,
}

impl fmt::Display for MembershipMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Any => "any",
            Self::All => "all",
            Self::None => "none",
        };
        write!(f, "{label}")
    }
}

///
/// BindingDescriptor
///
/// A junction table relating owner rows (the base query's table) to target
/// rows. `left_column` holds the owner id, `right_column` the target
/// identity in the `right_kind` representation. Column existence is not
/// checked here; a typo surfaces when the decorated query runs.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BindingDescriptor {
    pub binding_table: String,
    pub owner_id_column: String,
    pub left_column: String,
    pub right_column: String,
    pub right_kind: IdentityKind,
    pub order_column: Option<String>,
}

impl BindingDescriptor {
    #[must_use]
    pub fn new(
        binding_table: impl Into<String>,
        owner_id_column: impl Into<String>,
        left_column: impl Into<String>,
        right_column: impl Into<String>,
    ) -> Self {
        Self {
            binding_table: binding_table.into(),
            owner_id_column: owner_id_column.into(),
            left_column: left_column.into(),
            right_column: right_column.into(),
            right_kind: IdentityKind::Id,
            order_column: None,
        }
    }

    /// Descriptor over a registered binding class's table.
    #[must_use]
    pub fn for_class(
        class: &EntityClass,
        owner_id_column: impl Into<String>,
        left_column: impl Into<String>,
        right_column: impl Into<String>,
    ) -> Self {
        Self::new(
            class.table_name.clone(),
            owner_id_column,
            left_column,
            right_column,
        )
    }

    /// Set how the binding table stores target identities.
    #[must_use]
    pub fn with_right_kind(mut self, kind: IdentityKind) -> Self {
        self.right_kind = kind;
        self
    }

    #[must_use]
    pub fn with_order_column(mut self, column: impl Into<String>) -> Self {
        self.order_column = Some(column.into());
        self
    }

    #[must_use]
    pub fn left(&self) -> Column {
        Column::qualified(&self.binding_table, &self.left_column)
    }

    #[must_use]
    pub fn right(&self) -> Column {
        Column::qualified(&self.binding_table, &self.right_column)
    }

    /// Owner id column, qualified with `owner_table` when one is given.
    #[must_use]
    pub fn owner(&self, owner_table: Option<&str>) -> Column {
        Column::maybe_qualified(owner_table, &self.owner_id_column)
    }
}

/// Inner join of the binding table on `owner.owner_id = binding.left`.
#[must_use]
pub fn build_binding_join(descriptor: &BindingDescriptor, owner_table: Option<&str>) -> Join {
    Join::inner(
        &descriptor.binding_table,
        Predicate::column_eq(descriptor.owner(owner_table), descriptor.left()),
    )
}

/// Build the membership predicate for `targets`.
///
/// Returns `None` for an empty target set; the caller leaves its query
/// untouched in that case. Duplicate targets are collapsed first, so
/// `All` over N distinct targets needs N distinct binding rows.
#[must_use]
pub fn build_binding_predicate(
    descriptor: &BindingDescriptor,
    targets: &[Value],
    mode: MembershipMode,
    owner_table: Option<&str>,
) -> Option<Predicate> {
    let targets = distinct(targets);
    if targets.is_empty() {
        return None;
    }

    let owner = descriptor.owner(owner_table);
    let pred = match mode {
        MembershipMode::Any => Predicate::in_select(owner, bound_to(descriptor, targets)),
        MembershipMode::All => Predicate::and(
            targets
                .into_iter()
                .map(|target| {
                    Predicate::in_select(owner.clone(), bound_to(descriptor, vec![target]))
                })
                .collect(),
        ),
        // NULL left values would make NOT IN unknown for every owner
        MembershipMode::None => {
            let select = SubSelect::new(
                descriptor.left(),
                &descriptor.binding_table,
                Predicate::in_list(descriptor.right(), targets)
                    & Predicate::not_null(descriptor.left()),
            );

            Predicate::not_in_select(owner, select)
        }
    };

    Some(pred)
}

/// Sort key on the binding table's order column, when it has one.
#[must_use]
pub fn binding_order(descriptor: &BindingDescriptor, ascending: bool) -> Option<OrderTerm> {
    descriptor.order_column.as_ref().map(|name| OrderTerm {
        column: Column::qualified(&descriptor.binding_table, name),
        direction: OrderDirection::from_ascending(ascending),
    })
}

// SELECT left FROM binding WHERE right IN (targets)
fn bound_to(descriptor: &BindingDescriptor, targets: Vec<Value>) -> SubSelect {
    SubSelect::new(
        descriptor.left(),
        &descriptor.binding_table,
        Predicate::in_list(descriptor.right(), targets),
    )
}

fn distinct(values: &[Value]) -> Vec<Value> {
    let mut seen = HashSet::with_capacity(values.len());

    values
        .iter()
        .filter(|value| seen.insert(*value))
        .cloned()
        .collect()
}
