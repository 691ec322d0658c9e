use crate::{error::InternalError, model::EntityClass};
use std::collections::HashMap;

///
/// EntityClassLookup
///
/// Class registry capability consumed by the filters.
/// Implementations must fail with an entity-class-not-found error for
/// unregistered code names; callers propagate it verbatim.
///

pub trait EntityClassLookup {
    fn lookup(&self, code_name: &str) -> Result<EntityClass, InternalError>;
}

///
/// ClassRegistry
///
/// In-process registry keyed by case-insensitive code name.
///

#[derive(Clone, Debug, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, EntityClass>,
}

impl ClassRegistry {
    /// Create an empty class registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the built-in CMS classes
    /// (pages, documents, categories and relationship names).
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for class in builtin_classes() {
            registry.register(class);
        }

        registry
    }

    /// Register or replace one class.
    pub fn register(&mut self, class: EntityClass) {
        self.classes.insert(class.code_name.to_ascii_lowercase(), class);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl EntityClassLookup for ClassRegistry {
    fn lookup(&self, code_name: &str) -> Result<EntityClass, InternalError> {
        self.classes
            .get(&code_name.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| InternalError::entity_class_not_found(code_name))
    }
}

fn builtin_classes() -> [EntityClass; 4] {
    [
        EntityClass::new("cms.tree", "CMS_Tree", "NodeID")
            .with_guid_column("NodeGUID")
            .with_code_name_column("NodeAlias"),
        EntityClass::new("cms.document", "CMS_Document", "DocumentID")
            .with_guid_column("DocumentGUID"),
        EntityClass::new("cms.category", "CMS_Category", "CategoryID")
            .with_guid_column("CategoryGUID")
            .with_code_name_column("CategoryName"),
        EntityClass::new(
            "cms.relationshipname",
            "CMS_RelationshipName",
            "RelationshipNameID",
        )
        .with_guid_column("RelationshipGUID")
        .with_code_name_column("RelationshipName"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityKind;

    #[test]
    fn builtin_lookup_is_case_insensitive() {
        let registry = ClassRegistry::with_builtins();
        let class = registry
            .lookup("CMS.Category")
            .expect("built-in category class should resolve");

        assert_eq!(class.table_name, "CMS_Category");
        assert_eq!(class.identity_column(IdentityKind::CodeName), Some("CategoryName"));
    }

    #[test]
    fn missing_class_is_entity_class_not_found() {
        let registry = ClassRegistry::new();
        let err = registry
            .lookup("demo.missing")
            .expect_err("unregistered class should fail lookup");

        assert!(err.is_entity_class_not_found());
        assert!(err.message.contains("demo.missing"));
    }

    #[test]
    fn register_replaces_existing_class() {
        let mut registry = ClassRegistry::new();
        registry.register(EntityClass::new("demo.foo", "Demo_Foo", "FooID"));
        registry.register(EntityClass::new("Demo.Foo", "Demo_FooV2", "FooID"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("demo.foo").unwrap().table_name, "Demo_FooV2");
    }

    #[test]
    fn document_class_has_no_code_name_column() {
        let registry = ClassRegistry::with_builtins();
        let class = registry.lookup("cms.document").unwrap();

        assert_eq!(class.identity_column(IdentityKind::CodeName), None);
        assert_eq!(class.identity_column(IdentityKind::Guid), Some("DocumentGUID"));
    }
}
