//! Runtime class metadata.
//!
//! Entity classes describe the table-backed types a query can be anchored
//! on or bound to. They are immutable once registered and are looked up by
//! code name through an [`EntityClassLookup`] collaborator.
pub mod entity;
pub mod registry;

pub use entity::{EntityClass, EntityKind};
pub use registry::{ClassRegistry, EntityClassLookup};
