//! Query composition surface.
//!
//! The filters never execute anything: they decorate a caller-supplied
//! query through [`QueryTarget`] and hand it back. The concrete shapes here
//! (single, typed, multi) render to SQL Server flavoured text so the
//! decorated result can be inspected or executed by an outer layer.

mod predicate;
mod render;
mod select;
mod source;

#[cfg(test)]
mod tests;

pub use predicate::{Column, CompareOp, ComparePredicate, Operand, Predicate, SubQuery, SubSelect};
pub use render::bracket;
pub use select::{MultiQuery, SelectQuery, TypedQuery};
pub use source::{Join, OrderDirection, OrderTerm};

///
/// QueryTarget
///
/// Capability set the filters need from a query object. Every method
/// consumes and returns the query so callers chain on the result.
///

pub trait QueryTarget: Sized {
    /// Add an inner join.
    #[must_use]
    fn inner_join(self, join: Join) -> Self;

    /// Add a predicate, AND-ing with any existing predicate.
    #[must_use]
    fn filter(self, predicate: Predicate) -> Self;

    /// Append a sort key.
    #[must_use]
    fn order_by(self, column: Column, direction: OrderDirection) -> Self;

    #[must_use]
    fn order_by_asc(self, column: Column) -> Self {
        self.order_by(column, OrderDirection::Asc)
    }

    #[must_use]
    fn order_by_desc(self, column: Column) -> Self {
        self.order_by(column, OrderDirection::Desc)
    }
}
