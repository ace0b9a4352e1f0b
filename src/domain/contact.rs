//! Contact form fields and their validation rules.

use serde::Deserialize;

/// The fields a contact submission carries. The transport behind the submit
/// boundary is still a stub, so this is also the documented request shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub service: String,
    pub message: String,
    pub company: String,
}

/// How a field's value is judged beyond plain presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
}

/// One required field of the form.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Required fields, in form order. `company` is optional and absent here.
pub const REQUIRED_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "name",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "email",
        kind: FieldKind::Email,
    },
    FieldSpec {
        name: "service",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "message",
        kind: FieldKind::Text,
    },
];

/// An inline validation failure attached to a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Two-part `local@domain.tld` shape: no whitespace or second `@`, and the
/// domain carries at least one interior dot.
pub fn is_valid_email(value: &str) -> bool {
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty()
        && !tld.is_empty()
        && !domain.chars().any(char::is_whitespace)
}

/// Validate one field value. Runs on blur and again on full submit; a `None`
/// result clears any displayed error.
pub fn validate_field(spec: FieldSpec, value: &str) -> Option<FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(FieldError {
            field: spec.name,
            message: "This field is required",
        });
    }
    if spec.kind == FieldKind::Email && !is_valid_email(trimmed) {
        return Some(FieldError {
            field: spec.name,
            message: "Please enter a valid email address",
        });
    }
    None
}

/// Validate the whole submission, collecting every failing field.
pub fn validate_submission(submission: &ContactSubmission) -> Vec<FieldError> {
    REQUIRED_FIELDS
        .iter()
        .filter_map(|spec| validate_field(*spec, submission.field_value(spec.name)))
        .collect()
}

impl ContactSubmission {
    pub fn field_value(&self, field: &str) -> &str {
        match field {
            "name" => &self.name,
            "email" => &self.email,
            "service" => &self.service,
            "message" => &self.message,
            "company" => &self.company,
            _ => "",
        }
    }
}

/// Look up the spec for a named required field, for per-field blur checks.
pub fn field_spec(name: &str) -> Option<FieldSpec> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .find(|spec| spec.name == name)
}
