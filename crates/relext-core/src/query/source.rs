use crate::query::{Column, Predicate};

///
/// Join
/// `INNER JOIN <table> ON <on>`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Join {
    pub table: String,
    pub on: Predicate,
}

impl Join {
    #[must_use]
    pub fn inner(table: impl Into<String>, on: Predicate) -> Self {
        Self {
            table: table.into(),
            on,
        }
    }
}

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    #[must_use]
    pub const fn from_ascending(ascending: bool) -> Self {
        if ascending { Self::Asc } else { Self::Desc }
    }
}

///
/// OrderTerm
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrderTerm {
    pub column: Column,
    pub direction: OrderDirection,
}
