use derive_more::From;
use std::fmt::{self, Display};
use uuid::Uuid;

///
/// Value
///
/// Literal operand carried inside predicates and identity lookups.
/// Rendering is SQL Server flavoured: text is quoted with `N'..'` and
/// embedded quotes are doubled.
///

#[derive(Clone, Debug, Eq, From, Hash, Ord, PartialEq, PartialOrd)]
pub enum Value {
    #[from(ignore)]
    Null,
    Int(i64),
    Guid(Uuid),
    Text(String),
}

impl Value {
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_guid(&self) -> Option<Uuid> {
        match self {
            Self::Guid(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Render this value as an inline SQL literal.
    #[must_use]
    pub fn to_sql_literal(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Int(v) => v.to_string(),
            Self::Guid(v) => format!("'{v}'"),
            Self::Text(v) => format!("N'{}'", v.replace('\'', "''")),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql_literal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_literal_escapes_quotes() {
        let value = Value::from("O'Brien");

        assert_eq!(value.to_sql_literal(), "N'O''Brien'");
    }

    #[test]
    fn guid_literal_is_quoted_hyphenated() {
        let guid = Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);

        assert_eq!(
            Value::Guid(guid).to_sql_literal(),
            "'01234567-89ab-cdef-0123-456789abcdef'"
        );
    }

    #[test]
    fn accessors_match_variant() {
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(Value::Int(7).as_text(), None);
        assert_eq!(Value::Null.as_guid(), None);
        assert_eq!(Value::from("x").as_text(), Some("x"));
    }
}
