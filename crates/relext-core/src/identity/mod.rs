//! Module: identity
//! Responsibility: classify raw filter values once at the boundary and
//! translate them into the identity representation a binding table stores.
//! Does not own: row storage; lookups go through an [`IdentityStore`].
//!
//! Invariants:
//! - Values that match no row are dropped, never reported as errors.
//! - Output preserves first-seen input order and contains no duplicates.
//! - Lookup failures collapse to misses and are never cached.

mod reference;
mod resolver;
mod store;

#[cfg(test)]
mod tests;

pub use reference::{IdentityKind, IdentityRef, OwnerRef};
pub use resolver::IdentityResolver;
pub use store::{IdentityRow, IdentityStore, MemoryIdentityStore};
