//! Module: relationship
//! Responsibility: joins over the built-in self-referential relationship table.
//! Does not own: owner-key or relationship-name resolution.
//! Boundary: takes resolved numeric ids, emits one join plus an optional sort key.


use crate::{
    binding::{BindingDescriptor, binding_order, build_binding_join},
    config::RelationshipTableConfig,
    query::{Join, OrderTerm, Predicate, QueryTarget},
};

///
/// RelationshipDirection
///
/// `Forward` anchors the owner on the left column and returns rows on the
/// right; `Reverse` swaps the two.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RelationshipDirection {
    #[default]
    Forward,
    Reverse,
}

impl RelationshipDirection {
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::Reverse)
    }
}

///
/// RelationshipOptions
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RelationshipOptions {
    pub ordered: bool,
    pub ascending: bool,
    pub direction: RelationshipDirection,
}

impl RelationshipOptions {
    #[must_use]
    pub const fn unordered(mut self) -> Self {
        self.ordered = false;
        self
    }

    #[must_use]
    pub const fn descending(mut self) -> Self {
        self.ascending = false;
        self
    }

    #[must_use]
    pub const fn reversed(mut self) -> Self {
        self.direction = RelationshipDirection::Reverse;
        self
    }
}

impl Default for RelationshipOptions {
    fn default() -> Self {
        Self {
            ordered: true,
            ascending: true,
            direction: RelationshipDirection::Forward,
        }
    }
}

///
/// RelationshipJoin
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RelationshipJoin {
    pub join: Join,
    order: Option<OrderTerm>,
}

impl RelationshipJoin {
    /// Sort key to apply; absent when ordering is off or the join is reversed.
    #[must_use]
    pub const fn order(&self) -> Option<&OrderTerm> {
        self.order.as_ref()
    }

    /// Add the join, then the sort key if any, to `query`.
    #[must_use]
    pub fn apply<Q: QueryTarget>(self, query: Q) -> Q {
        let query = query.inner_join(self.join);

        match self.order {
            Some(term) => query.order_by(term.column, term.direction),
            None => query,
        }
    }
}

/// Build the relationship join for `owner_id`.
///
/// `name_id` restricts the join to one relationship type; `None` matches
/// every type.
#[must_use]
pub fn build_relationship_join(
    table: &RelationshipTableConfig,
    owner_id: i64,
    name_id: Option<i64>,
    options: RelationshipOptions,
) -> RelationshipJoin {
    let (related, anchor) = match options.direction {
        RelationshipDirection::Forward => (&table.right_column, &table.left_column),
        RelationshipDirection::Reverse => (&table.left_column, &table.right_column),
    };

    // The queried rows sit on the `related` side of the relationship row.
    let descriptor = BindingDescriptor::new(
        &table.table,
        &table.owner_id_column,
        related.as_str(),
        anchor.as_str(),
    )
    .with_order_column(&table.order_column);

    let mut conditions = vec![build_binding_join(&descriptor, None).on];
    if let Some(name_id) = name_id {
        conditions.push(Predicate::eq(table.column(&table.name_id_column), name_id));
    }
    conditions.push(Predicate::eq(descriptor.right(), owner_id));

    let order = if options.ordered && !options.direction.is_reverse() {
        binding_order(&descriptor, options.ascending)
    } else {
        None
    };

    RelationshipJoin {
        join: Join::inner(&table.table, Predicate::and(conditions)),
        order,
    }
}
