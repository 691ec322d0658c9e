use crate::config::ConfigError;
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Identity misses never become an `InternalError`; only caller
/// configuration faults and collaborator failures do.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an InternalError without a structured detail payload.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct the registry miss raised for an unregistered class code name.
    pub fn entity_class_not_found(code_name: impl Into<String>) -> Self {
        let code_name = code_name.into();

        Self {
            class: ErrorClass::Configuration,
            origin: ErrorOrigin::Registry,
            message: format!("entity class not found: '{code_name}'"),
            detail: Some(ErrorDetail::Registry(RegistryError::EntityClassNotFound {
                code_name,
            })),
        }
    }

    /// Construct an identity-store failure reported by the lookup collaborator.
    pub fn identity_store(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Identity, message)
    }

    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.class, ErrorClass::Configuration)
    }

    #[must_use]
    pub const fn is_entity_class_not_found(&self) -> bool {
        matches!(
            self.detail,
            Some(ErrorDetail::Registry(
                RegistryError::EntityClassNotFound { .. }
            ))
        )
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self {
            class: ErrorClass::Configuration,
            origin: ErrorOrigin::Config,
            message: err.to_string(),
            detail: Some(ErrorDetail::Config(err)),
        }
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Registry(RegistryError),
    #[error("{0}")]
    Config(ConfigError),
}

///
/// RegistryError
///
/// Registry-specific structured error detail.
/// Never returned directly; always wrapped in [`ErrorDetail::Registry`].
///

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("entity class not found: {code_name}")]
    EntityClassNotFound { code_name: String },
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Configuration,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Registry,
    Identity,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Registry => "registry",
            Self::Identity => "identity",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_class_not_found_is_configuration() {
        let err = InternalError::entity_class_not_found("demo.missing");

        assert!(err.is_configuration());
        assert!(err.is_entity_class_not_found());
        assert_eq!(err.origin, ErrorOrigin::Registry);
        assert_eq!(
            err.display_with_class(),
            "registry:configuration: entity class not found: 'demo.missing'"
        );
    }

    #[test]
    fn identity_store_error_is_not_configuration() {
        let err = InternalError::identity_store("connection reset");

        assert!(!err.is_configuration());
        assert!(!err.is_entity_class_not_found());
        assert_eq!(err.to_string(), "connection reset");
    }
}
