use crate::{
    model::EntityKind,
    query::{Column, Join, OrderDirection, OrderTerm, Predicate, QueryTarget, render},
};
use std::{fmt::Write, marker::PhantomData};

///
/// SelectQuery
///
/// Untyped single-source query.
///
/// This builder:
/// - Collects joins, a predicate and ordering against one source table
/// - Is purely declarative (no registry access, resolution or execution)
/// - Renders deterministically, so two queries compare equal iff their SQL does
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SelectQuery {
    source: String,
    columns: Vec<Column>,
    joins: Vec<Join>,
    predicate: Option<Predicate>,
    order: Vec<OrderTerm>,
}

impl SelectQuery {
    /// Create a `SELECT *` query over `source`.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            columns: Vec::new(),
            joins: Vec::new(),
            predicate: None,
            order: Vec::new(),
        }
    }

    /// Restrict the projection.
    #[must_use]
    pub fn columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.columns.extend(columns);
        self
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    #[must_use]
    pub const fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    #[must_use]
    pub fn order(&self) -> &[OrderTerm] {
        &self.order
    }

    /// Render as one SQL statement.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let projection = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns
                .iter()
                .map(render::column)
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut sql = format!("SELECT {projection} FROM {}", render::bracket(&self.source));
        for join in &self.joins {
            let _ = write!(sql, " {}", render::join(join));
        }
        if let Some(predicate) = &self.predicate {
            let _ = write!(sql, " WHERE {}", render::predicate(predicate));
        }
        if !self.order.is_empty() {
            let _ = write!(sql, " {}", render::order(&self.order));
        }

        sql
    }
}

impl QueryTarget for SelectQuery {
    fn inner_join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = match self.predicate.take() {
            Some(existing) => Some(Predicate::And(vec![existing, predicate])),
            None => Some(predicate),
        };
        self
    }

    fn order_by(mut self, column: Column, direction: OrderDirection) -> Self {
        self.order.push(OrderTerm { column, direction });
        self
    }
}

///
/// TypedQuery
///
/// Single-source query whose source table is fixed by an [`EntityKind`].
///

pub struct TypedQuery<E: EntityKind> {
    inner: SelectQuery,
    _marker: PhantomData<E>,
}

impl<E: EntityKind> TypedQuery<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: SelectQuery::new(E::TABLE_NAME),
            _marker: PhantomData,
        }
    }

    /// Registry code name of the entity this query targets.
    #[must_use]
    pub const fn code_name(&self) -> &'static str {
        E::CODE_NAME
    }

    #[must_use]
    pub const fn inner(&self) -> &SelectQuery {
        &self.inner
    }

    #[must_use]
    pub fn into_inner(self) -> SelectQuery {
        self.inner
    }

    #[must_use]
    pub fn to_sql(&self) -> String {
        self.inner.to_sql()
    }
}

impl<E: EntityKind> Default for TypedQuery<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityKind> Clone for TypedQuery<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<E: EntityKind> QueryTarget for TypedQuery<E> {
    fn inner_join(mut self, join: Join) -> Self {
        self.inner = self.inner.inner_join(join);
        self
    }

    fn filter(mut self, predicate: Predicate) -> Self {
        self.inner = self.inner.filter(predicate);
        self
    }

    fn order_by(mut self, column: Column, direction: OrderDirection) -> Self {
        self.inner = self.inner.order_by(column, direction);
        self
    }
}

///
/// MultiQuery
///
/// One query per source table, decorated in lockstep. Each part renders
/// as its own statement.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MultiQuery {
    parts: Vec<SelectQuery>,
}

impl MultiQuery {
    #[must_use]
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: sources.into_iter().map(SelectQuery::new).collect(),
        }
    }

    #[must_use]
    pub fn parts(&self) -> &[SelectQuery] {
        &self.parts
    }

    /// Render one statement per part.
    #[must_use]
    pub fn statements(&self) -> Vec<String> {
        self.parts.iter().map(SelectQuery::to_sql).collect()
    }

    #[must_use]
    pub fn to_sql(&self) -> String {
        self.statements().join(";\n")
    }

    fn map_parts(mut self, f: impl Fn(SelectQuery) -> SelectQuery) -> Self {
        self.parts = self.parts.into_iter().map(f).collect();
        self
    }
}

impl QueryTarget for MultiQuery {
    fn inner_join(self, join: Join) -> Self {
        self.map_parts(|part| part.inner_join(join.clone()))
    }

    fn filter(self, predicate: Predicate) -> Self {
        self.map_parts(|part| part.filter(predicate.clone()))
    }

    fn order_by(self, column: Column, direction: OrderDirection) -> Self {
        self.map_parts(|part| part.order_by(column.clone(), direction))
    }
}
