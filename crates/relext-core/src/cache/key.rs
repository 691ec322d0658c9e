use derive_more::{Deref, Display};
use std::fmt::Display as FmtDisplay;

pub(super) const OWNER_KEY_PREFIX: &str = "ownerKey:";
pub(super) const RELATIONSHIP_NAME_PREFIX: &str = "relationshipName:";

///
/// CacheKey
/// Namespaced cache key (`ownerKey:{raw}` or `relationshipName:{name}`).
///

#[derive(Clone, Debug, Deref, Display, Eq, Hash, PartialEq)]
pub struct CacheKey(String);

impl CacheKey {
    #[must_use]
    pub fn owner_key(raw: impl FmtDisplay) -> Self {
        Self(format!("{OWNER_KEY_PREFIX}{raw}"))
    }

    #[must_use]
    pub fn relationship_name(name: &str) -> Self {
        Self(format!("{RELATIONSHIP_NAME_PREFIX}{name}"))
    }
}

///
/// CacheTag
/// Invalidation dependency key (`entity|{id}`, `relationshipname|byname|{name}`).
///

#[derive(Clone, Debug, Deref, Display, Eq, Hash, PartialEq)]
pub struct CacheTag(String);

impl CacheTag {
    #[must_use]
    pub fn entity(id: i64) -> Self {
        Self(format!("entity|{id}"))
    }

    #[must_use]
    pub fn relationship_name(name: &str) -> Self {
        Self(format!("relationshipname|byname|{name}"))
    }

    /// Wrap an externally produced tag verbatim.
    #[must_use]
    pub fn raw(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
}
