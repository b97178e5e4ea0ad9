use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::models::UserId;

/// Field name → violation message, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldViolations(BTreeMap<String, String>);

impl FieldViolations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation; the first message reported for a field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// JSON object form, used as gRPC status details.
    pub fn to_json_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(&self.0).unwrap_or_default()
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> UserResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(UserError::Validation(self))
        }
    }
}

impl fmt::Display for FieldViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl From<validator::ValidationErrors> for FieldViolations {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut violations = FieldViolations::new();
        for (field, errs) in errors.field_errors() {
            if let Some(err) = errs.first() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                violations.add(field.to_string(), message);
            }
        }
        violations
    }
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("validation error: {0}")]
    Validation(FieldViolations),

    #[error("user already exists: {0}")]
    AlreadyExists(String),

    #[error("user not found: {0}")]
    NotFound(UserId),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Prefixes the diagnostic message with `op` without changing the kind.
    pub fn context(self, op: &str) -> Self {
        match self {
            UserError::AlreadyExists(msg) => UserError::AlreadyExists(format!("{op}: {msg}")),
            UserError::Internal(msg) => UserError::Internal(format!("{op}: {msg}")),
            other => other,
        }
    }

    /// Stable machine-readable name of the kind.
    pub fn kind(&self) -> &'static str {
        match self {
            UserError::Validation(_) => "validation_error",
            UserError::AlreadyExists(_) => "already_exists",
            UserError::NotFound(_) => "not_found",
            UserError::Internal(_) => "internal",
        }
    }
}
