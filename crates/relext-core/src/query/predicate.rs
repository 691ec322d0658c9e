use crate::value::Value;
use std::ops::{BitAnd, BitOr};

///
/// Predicate AST
///
/// Column-level boolean expressions over a base table and the tables it
/// joins. Correlated `EXISTS` subqueries reference outer columns by their
/// qualifying table name; `IN (SELECT ...)` subselects are uncorrelated and
/// never see outer columns.
///

///
/// Column
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Column {
    pub table: Option<String>,
    pub name: String,
}

impl Column {
    /// Unqualified column reference.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: name.into(),
        }
    }

    /// Column reference qualified with a table name or alias.
    #[must_use]
    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            name: name.into(),
        }
    }

    /// Qualify with `table` when one is given.
    #[must_use]
    pub fn maybe_qualified(table: Option<&str>, name: impl Into<String>) -> Self {
        match table {
            Some(table) => Self::qualified(table, name),
            None => Self::new(name),
        }
    }
}

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    In,
    NotIn,
}

///
/// Operand
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Operand {
    Value(Value),
    Column(Column),
    List(Vec<Value>),
    Select(Box<SubSelect>),
}

///
/// ComparePredicate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComparePredicate {
    pub column: Column,
    pub op: CompareOp,
    pub operand: Operand,
}

///
/// SubQuery
/// `SELECT 1 FROM <table> WHERE <predicate>`, used under `EXISTS`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubQuery {
    pub table: String,
    pub predicate: Predicate,
}

///
/// SubSelect
/// `SELECT <column> FROM <table> WHERE <predicate>`, used under `IN`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubSelect {
    pub column: Column,
    pub table: String,
    pub predicate: Predicate,
}

impl SubSelect {
    #[must_use]
    pub fn new(column: Column, table: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            column,
            table: table.into(),
            predicate,
        }
    }
}

///
/// Predicate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Predicate {
    True,
    False,
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Compare(ComparePredicate),
    Exists(Box<SubQuery>),
    NotNull(Column),
}

impl Predicate {
    #[must_use]
    pub const fn and(preds: Vec<Self>) -> Self {
        Self::And(preds)
    }

    #[must_use]
    pub const fn or(preds: Vec<Self>) -> Self {
        Self::Or(preds)
    }

    #[expect(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(pred: Self) -> Self {
        Self::Not(Box::new(pred))
    }

    #[must_use]
    pub fn eq(column: Column, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Eq, Operand::Value(value.into()))
    }

    #[must_use]
    pub fn ne(column: Column, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Ne, Operand::Value(value.into()))
    }

    /// Column-to-column equality, used for join conditions and correlation.
    #[must_use]
    pub fn column_eq(left: Column, right: Column) -> Self {
        Self::compare(left, CompareOp::Eq, Operand::Column(right))
    }

    /// Membership test; a single value collapses to plain equality.
    #[must_use]
    pub fn in_list(column: Column, mut values: Vec<Value>) -> Self {
        if values.len() == 1 {
            let value = values.remove(0);
            return Self::compare(column, CompareOp::Eq, Operand::Value(value));
        }

        Self::compare(column, CompareOp::In, Operand::List(values))
    }

    #[must_use]
    pub fn not_in(column: Column, values: Vec<Value>) -> Self {
        Self::compare(column, CompareOp::NotIn, Operand::List(values))
    }

    /// `column IN (SELECT ...)`.
    #[must_use]
    pub fn in_select(column: Column, select: SubSelect) -> Self {
        Self::compare(column, CompareOp::In, Operand::Select(Box::new(select)))
    }

    /// `column NOT IN (SELECT ...)`. The subselect must not yield NULL, or
    /// no row matches.
    #[must_use]
    pub fn not_in_select(column: Column, select: SubSelect) -> Self {
        Self::compare(column, CompareOp::NotIn, Operand::Select(Box::new(select)))
    }

    #[must_use]
    pub const fn not_null(column: Column) -> Self {
        Self::NotNull(column)
    }

    #[must_use]
    pub fn exists(table: impl Into<String>, predicate: Self) -> Self {
        Self::Exists(Box::new(SubQuery {
            table: table.into(),
            predicate,
        }))
    }

    /// Whether this predicate is the neutral `True` condition.
    #[must_use]
    pub const fn is_true(&self) -> bool {
        matches!(self, Self::True)
    }

    const fn compare(column: Column, op: CompareOp, operand: Operand) -> Self {
        Self::Compare(ComparePredicate {
            column,
            op,
            operand,
        })
    }
}

impl BitAnd for Predicate {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::And(vec![self, rhs])
    }
}

impl BitOr for Predicate {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::Or(vec![self, rhs])
    }
}
