use crate::value::Value;
use derive_more::{Display, From};
use serde::Deserialize;
use uuid::Uuid;

///
/// IdentityKind
/// Which representation of an entity identity a value or column uses.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    #[default]
    Id,
    Guid,
    CodeName,
}

///
/// IdentityRef
///
/// One raw filter value tagged with how it must be interpreted.
/// Classification happens once, when the value enters the system.
///

#[derive(Clone, Debug, Eq, From, Hash, PartialEq)]
pub enum IdentityRef {
    Id(i64),
    Guid(Uuid),
    CodeName(String),
}

impl IdentityRef {
    /// Classify free-form text: integers are ids, GUIDs are GUIDs,
    /// anything else is a code name.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(id) = trimmed.parse::<i64>() {
            return Self::Id(id);
        }
        if let Ok(guid) = Uuid::parse_str(trimmed) {
            return Self::Guid(guid);
        }

        Self::CodeName(trimmed.to_string())
    }

    #[must_use]
    pub const fn kind(&self) -> IdentityKind {
        match self {
            Self::Id(_) => IdentityKind::Id,
            Self::Guid(_) => IdentityKind::Guid,
            Self::CodeName(_) => IdentityKind::CodeName,
        }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Id(id) => Value::Int(*id),
            Self::Guid(guid) => Value::Guid(*guid),
            Self::CodeName(name) => Value::Text(name.clone()),
        }
    }
}

impl From<&str> for IdentityRef {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

///
/// OwnerRef
/// Identity of the entity a relationship query is anchored on.
///

#[derive(Clone, Copy, Debug, Eq, From, Hash, PartialEq)]
pub enum OwnerRef {
    Id(i64),
    Guid(Uuid),
}
