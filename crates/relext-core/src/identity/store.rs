use crate::{
    error::InternalError,
    identity::{IdentityKind, IdentityRef},
    model::EntityClass,
    value::Value,
};
use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};
use uuid::Uuid;

///
/// IdentityRow
/// The identity columns of one entity row.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IdentityRow {
    pub id: i64,
    pub guid: Option<Uuid>,
    pub code_name: Option<String>,
}

impl IdentityRow {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self {
            id,
            guid: None,
            code_name: None,
        }
    }

    #[must_use]
    pub const fn with_guid(mut self, guid: Uuid) -> Self {
        self.guid = Some(guid);
        self
    }

    #[must_use]
    pub fn with_code_name(mut self, code_name: impl Into<String>) -> Self {
        self.code_name = Some(code_name.into());
        self
    }

    /// Project this row onto one identity representation.
    #[must_use]
    pub fn value(&self, kind: IdentityKind) -> Option<Value> {
        match kind {
            IdentityKind::Id => Some(Value::Int(self.id)),
            IdentityKind::Guid => self.guid.map(Value::Guid),
            IdentityKind::CodeName => self.code_name.clone().map(Value::Text),
        }
    }

    /// Code names compare case-insensitively, like the default SQL collation.
    #[must_use]
    pub fn matches(&self, identity: &IdentityRef) -> bool {
        match identity {
            IdentityRef::Id(id) => self.id == *id,
            IdentityRef::Guid(guid) => self.guid == Some(*guid),
            IdentityRef::CodeName(name) => self
                .code_name
                .as_deref()
                .is_some_and(|own| own.eq_ignore_ascii_case(name)),
        }
    }
}

///
/// IdentityStore
///
/// Row lookup capability backing identity resolution.
/// `find` returns the rows of `class` whose `kind` column equals any of
/// `values`; rows that match nothing are simply absent from the result.
///

pub trait IdentityStore {
    fn find(
        &self,
        class: &EntityClass,
        kind: IdentityKind,
        values: &[Value],
    ) -> Result<Vec<IdentityRow>, InternalError>;
}

///
/// MemoryIdentityStore
///
/// In-process identity rows keyed by class code name.
/// Counts every `find` call so cache behaviour is observable.
///

#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    rows: HashMap<String, Vec<IdentityRow>>,
    lookups: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryIdentityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class_code_name: &str, row: IdentityRow) {
        self.rows
            .entry(class_code_name.to_ascii_lowercase())
            .or_default()
            .push(row);
    }

    #[must_use]
    pub fn with_row(mut self, class_code_name: &str, row: IdentityRow) -> Self {
        self.insert(class_code_name, row);
        self
    }

    /// Number of `find` calls served so far.
    #[must_use]
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Make subsequent lookups fail, simulating an unavailable store.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn find(
        &self,
        class: &EntityClass,
        kind: IdentityKind,
        values: &[Value],
    ) -> Result<Vec<IdentityRow>, InternalError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(InternalError::identity_store(format!(
                "identity store unavailable: {}",
                class.code_name
            )));
        }

        let wanted: Vec<IdentityRef> = values.iter().filter_map(value_to_identity(kind)).collect();
        let rows = self
            .rows
            .get(&class.code_name.to_ascii_lowercase())
            .map(|rows| {
                rows.iter()
                    .filter(|row| wanted.iter().any(|identity| row.matches(identity)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(rows)
    }
}

fn value_to_identity(kind: IdentityKind) -> impl Fn(&Value) -> Option<IdentityRef> {
    move |value| match (kind, value) {
        (IdentityKind::Id, Value::Int(id)) => Some(IdentityRef::Id(*id)),
        (IdentityKind::Guid, Value::Guid(guid)) => Some(IdentityRef::Guid(*guid)),
        (IdentityKind::CodeName, Value::Text(name)) => Some(IdentityRef::CodeName(name.clone())),
        _ => None,
    }
}
