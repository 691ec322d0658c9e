use crate::identity::IdentityKind;

///
/// EntityClass
/// Table-backed entity metadata resolved from a class registry.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntityClass {
    /// Registry code name, e.g. `demo.foobar`.
    pub code_name: String,
    /// Physical table name.
    pub table_name: String,
    /// Numeric primary key column.
    pub id_column: String,
    pub guid_column: Option<String>,
    pub code_name_column: Option<String>,
}

impl EntityClass {
    #[must_use]
    pub fn new(
        code_name: impl Into<String>,
        table_name: impl Into<String>,
        id_column: impl Into<String>,
    ) -> Self {
        Self {
            code_name: code_name.into(),
            table_name: table_name.into(),
            id_column: id_column.into(),
            guid_column: None,
            code_name_column: None,
        }
    }

    #[must_use]
    pub fn with_guid_column(mut self, column: impl Into<String>) -> Self {
        self.guid_column = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_code_name_column(mut self, column: impl Into<String>) -> Self {
        self.code_name_column = Some(column.into());
        self
    }

    /// Return the column holding identities of the given kind, if the class has one.
    #[must_use]
    pub fn identity_column(&self, kind: IdentityKind) -> Option<&str> {
        match kind {
            IdentityKind::Id => Some(&self.id_column),
            IdentityKind::Guid => self.guid_column.as_deref(),
            IdentityKind::CodeName => self.code_name_column.as_deref(),
        }
    }
}

///
/// EntityKind
///
/// Compile-time binding of a Rust type to one registered entity class.
/// Typed queries use it to fix their source table.
///

pub trait EntityKind {
    const CODE_NAME: &'static str;
    const TABLE_NAME: &'static str;
}
