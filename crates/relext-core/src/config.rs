//! Runtime configuration.
//!
//! Every field has a default matching the stock CMS schema, so an empty
//! TOML document is a valid configuration.

use crate::query::Column;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error as ThisError;

/// Longest accepted cache TTL: one year.
pub const MAX_TTL_MINUTES: u64 = 365 * 24 * 60;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cache ttl must be at least one minute")]
    ZeroTtl,

    #[error("cache ttl of {minutes} minutes exceeds the {max} minute limit", max = MAX_TTL_MINUTES)]
    TtlTooLong { minutes: u64 },

    #[error("{section}.{field} must not be empty")]
    EmptyName {
        section: &'static str,
        field: &'static str,
    },
}

///
/// RelextConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RelextConfig {
    pub cache: CacheConfig,
    pub classes: ClassConfig,
    pub relationship: RelationshipTableConfig,
    pub categories: CategoryConfig,
}

impl RelextConfig {
    /// Parse and validate a TOML document; missing keys take defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.ttl_minutes == 0 {
            return Err(ConfigError::ZeroTtl);
        }
        if self.cache.ttl_minutes > MAX_TTL_MINUTES {
            return Err(ConfigError::TtlTooLong {
                minutes: self.cache.ttl_minutes,
            });
        }

        let names = [
            ("classes", "node", &self.classes.node),
            ("classes", "relationship_name", &self.classes.relationship_name),
            ("classes", "category", &self.classes.category),
            ("relationship", "table", &self.relationship.table),
            ("relationship", "left_column", &self.relationship.left_column),
            ("relationship", "right_column", &self.relationship.right_column),
            ("relationship", "name_id_column", &self.relationship.name_id_column),
            ("relationship", "owner_id_column", &self.relationship.owner_id_column),
        ];
        for (section, field, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyName { section, field });
            }
        }

        Ok(())
    }
}

///
/// CacheConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_minutes: u64,
}

impl CacheConfig {
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes.saturating_mul(60))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_minutes: 1440,
        }
    }
}

///
/// ClassConfig
/// Code names of the built-in classes the filters resolve against.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClassConfig {
    pub node: String,
    pub relationship_name: String,
    pub category: String,
}

impl Default for ClassConfig {
    fn default() -> Self {
        Self {
            node: "cms.tree".to_string(),
            relationship_name: "cms.relationshipname".to_string(),
            category: "cms.category".to_string(),
        }
    }
}

///
/// RelationshipTableConfig
///
/// Layout of the built-in self-referential relationship table.
/// `owner_id_column` is the id column on the queried table that the
/// relationship rows point at.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RelationshipTableConfig {
    pub table: String,
    pub left_column: String,
    pub right_column: String,
    pub name_id_column: String,
    pub order_column: String,
    pub owner_id_column: String,
}

impl RelationshipTableConfig {
    #[must_use]
    pub fn column(&self, name: &str) -> Column {
        Column::qualified(&self.table, name)
    }
}

impl Default for RelationshipTableConfig {
    fn default() -> Self {
        Self {
            table: "CMS_Relationship".to_string(),
            left_column: "LeftNodeID".to_string(),
            right_column: "RightNodeID".to_string(),
            name_id_column: "RelationshipNameID".to_string(),
            order_column: "RelationshipOrder".to_string(),
            owner_id_column: "NodeID".to_string(),
        }
    }
}

///
/// CategoryConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryConfig {
    pub document: CategoryBindingConfig,
    pub node: CategoryBindingConfig,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            document: CategoryBindingConfig {
                binding_table: "CMS_DocumentCategory".to_string(),
                owner_column: "DocumentID".to_string(),
                category_column: "CategoryID".to_string(),
                owner_table: "CMS_Document".to_string(),
            },
            node: CategoryBindingConfig {
                binding_table: "CMS_TreeCategory".to_string(),
                owner_column: "NodeID".to_string(),
                category_column: "CategoryID".to_string(),
                owner_table: "CMS_Tree".to_string(),
            },
        }
    }
}

///
/// CategoryBindingConfig
///
/// One built-in category binding table. The same column name is used on
/// the owner table and on the binding table's owner side.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CategoryBindingConfig {
    pub binding_table: String,
    pub owner_column: String,
    pub category_column: String,
    pub owner_table: String,
}
