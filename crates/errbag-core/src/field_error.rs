//! Field-level validation error records.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Zero-argument closure that recomputes a record's message, used to
/// re-render localized or templated messages after a context change.
pub type Regenerator = Arc<dyn Fn() -> String + Send + Sync>;

/// One validation failure tied to a field.
///
/// `scope` distinguishes same-named fields in different logical sections;
/// `None` is the explicit "no scope" marker. `msg` always holds the current
/// rendered text; records built with [`FieldError::with_regenerator`] can
/// recompute it via [`FieldError::regenerate`].
#[derive(Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub id: String,
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub scope: Option<String>,
    pub rule: String,
    pub msg: String,
    #[serde(skip)]
    pub regenerator: Option<Regenerator>,
}

impl FieldError {
    /// Create an unscoped record with a plain text message.
    pub fn new(
        id: impl Into<String>,
        field: impl Into<String>,
        rule: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            scope: None,
            rule: rule.into(),
            msg: msg.into(),
            regenerator: None,
        }
    }

    /// Attach a scope. An empty string is normalized to "no scope".
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        let scope = scope.into();
        self.scope = if scope.is_empty() { None } else { Some(scope) };
        self
    }

    /// Attach a message regenerator; seeds `msg` with its current output.
    pub fn with_regenerator(mut self, regenerator: Regenerator) -> Self {
        self.msg = regenerator();
        self.regenerator = Some(regenerator);
        self
    }

    /// Recompute `msg` from the regenerator, if one is attached.
    /// Plain text records are left untouched.
    pub fn regenerate(&mut self) {
        if let Some(regenerator) = &self.regenerator {
            self.msg = regenerator();
        }
    }

    /// The scope-qualified field path (`scope.field`, or bare `field`).
    pub fn path(&self) -> String {
        match &self.scope {
            Some(scope) => format!("{scope}.{}", self.field),
            None => self.field.clone(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.msg)
    }
}

impl fmt::Debug for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldError")
            .field("id", &self.id)
            .field("field", &self.field)
            .field("scope", &self.scope)
            .field("rule", &self.rule)
            .field("msg", &self.msg)
            .field("regenerator", &self.regenerator.as_ref().map(|_| "<closure>"))
            .finish()
    }
}

impl PartialEq for FieldError {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.field == other.field
            && self.scope == other.scope
            && self.rule == other.rule
            && self.msg == other.msg
    }
}
