//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies deserialize into DTOs whose fields are all optional; the
//! helpers here turn absent or malformed values into field-tagged
//! `invalid_request` errors before anything reaches a domain port.

use serde_json::json;

use crate::domain::{CommentId, Error, QuizId, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidId => "invalid_id",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_id_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} is not a valid identifier"))
        .with_value(ErrorCode::InvalidId, value)
}

/// Require a present, non-blank string; the value is returned untrimmed.
pub(crate) fn required_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| missing_field_error(field))
}

/// Take a present string, treating absence as empty for the domain to judge.
pub(crate) fn text_or_empty(value: Option<String>) -> String {
    value.unwrap_or_default()
}

pub(crate) fn parse_user_id(value: String, field: FieldName) -> Result<UserId, Error> {
    UserId::new(&value).map_err(|_| invalid_id_error(field, &value))
}

pub(crate) fn parse_quiz_id(value: String, field: FieldName) -> Result<QuizId, Error> {
    if value.trim().is_empty() {
        return Err(invalid_id_error(field, &value));
    }
    Ok(QuizId::new(value))
}

pub(crate) fn parse_comment_id(value: String, field: FieldName) -> Result<CommentId, Error> {
    if value.trim().is_empty() {
        return Err(invalid_id_error(field, &value));
    }
    Ok(CommentId::new(value))
}

pub(crate) fn parse_optional_comment_id(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<CommentId>, Error> {
    value
        .filter(|raw| !raw.is_empty())
        .map(|raw| parse_comment_id(raw, field))
        .transpose()
}
