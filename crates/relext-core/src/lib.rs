//! Core runtime for RelExt: identity resolution, binding and relationship
//! predicate synthesis, the tagged identity cache, and the query shapes the
//! filters decorate.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod binding;
pub mod cache;
pub mod config;
pub mod error;
pub mod filters;
pub mod identity;
pub mod model;
pub mod obs;
pub mod query;
pub mod relationship;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores, caches or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        binding::MembershipMode,
        filters::CategoryScope,
        identity::{IdentityKind, IdentityRef, OwnerRef},
        model::EntityKind,
        query::QueryTarget,
        relationship::{RelationshipDirection, RelationshipOptions},
        value::Value,
    };
}
