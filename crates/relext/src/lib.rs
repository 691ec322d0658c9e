//! ## Crate layout
//! - `core`: identity resolution, predicate synthesis, cache, query shapes
//!   and observability.
//! - `error`: public error type mapped from core runtime errors.
//! - `filters`: public filter facade returning [`Error`].
//!
//! [`Relext`] owns the long-lived pieces (class registry, identity store,
//! tagged cache, configuration) and hands out short-lived [`Filters`]
//! borrowing them.

pub use relext_core as core;

pub mod error;
pub mod filters;

pub use error::{Error, ErrorKind, ErrorOrigin};
pub use filters::Filters;
pub use relext_core::filters::CategoryScope;

use relext_core::{
    cache::{CacheTag, TaggedCache},
    config::RelextConfig,
    identity::IdentityStore,
    filters::RelationshipFilters,
    model::ClassRegistry,
};
use tracing::debug;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Relext
///
/// Process-wide context: one per application. The cache inside is shared
/// by every facade handed out by [`Relext::filters`].
///

pub struct Relext<S> {
    registry: ClassRegistry,
    store: S,
    cache: TaggedCache<Option<i64>>,
    config: RelextConfig,
}

impl<S: IdentityStore> Relext<S> {
    /// Build a context over the built-in classes.
    #[must_use]
    pub fn new(store: S, config: RelextConfig) -> Self {
        Self::with_registry(ClassRegistry::with_builtins(), store, config)
    }

    #[must_use]
    pub fn with_registry(registry: ClassRegistry, store: S, config: RelextConfig) -> Self {
        Self {
            registry,
            store,
            cache: TaggedCache::for_config(&config.cache),
            config,
        }
    }

    /// Build a context from a TOML configuration document.
    pub fn from_toml_str(store: S, source: &str) -> Result<Self, Error> {
        let config = RelextConfig::from_toml_str(source)?;

        Ok(Self::new(store, config))
    }

    #[must_use]
    pub const fn filters(&self) -> Filters<'_, S> {
        Filters::new(RelationshipFilters::new(
            &self.registry,
            &self.store,
            &self.cache,
            &self.config,
        ))
    }

    #[must_use]
    pub const fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub const fn registry_mut(&mut self) -> &mut ClassRegistry {
        &mut self.registry
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn config(&self) -> &RelextConfig {
        &self.config
    }

    /// Drop cached owner keys that resolved to entity `id`.
    pub fn invalidate_entity(&self, id: i64) -> usize {
        let evicted = self.cache.invalidate_tag(&CacheTag::entity(id));
        debug!(id, evicted, "entity cache tag invalidated");

        evicted
    }

    /// Drop the cached id of relationship type `name`.
    pub fn invalidate_relationship_name(&self, name: &str) -> usize {
        let evicted = self.cache.invalidate_tag(&CacheTag::relationship_name(name));
        debug!(name, evicted, "relationship name cache tag invalidated");

        evicted
    }

    /// Drop every cached resolution.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{Error, Filters, Relext};
    pub use relext_core::{
        prelude::*,
        query::{MultiQuery, SelectQuery, TypedQuery},
    };
}

#[cfg(test)]
mod tests;
