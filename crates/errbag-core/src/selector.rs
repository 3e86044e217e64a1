//! Selector grammar and candidate matching.
//!
//! A selector is a compact string describing which error records to target:
//!
//! ```text
//! (scope '.')? (field | '*') (':' rule)?     path mode
//! '#' id-prefix (':' rule)?                  id mode
//! ```
//!
//! The grammar is fixed and case-sensitive: at most one scope segment, one
//! field segment (a name or the wildcard `*`), one optional rule suffix.
//! Malformed text is rejected with [`BagError::InvalidSelector`] rather
//! than silently misparsed.

use regex::Regex;

use crate::error::BagError;
use crate::field_error::FieldError;

/// Field segment of a path-mode selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMatch {
    /// The wildcard `*`: matches every field name.
    Any,
    /// Exact, case-sensitive field name.
    Name(String),
}

/// What a selector targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Path mode: scope + field.
    Path {
        scope: Option<String>,
        field: FieldMatch,
    },
    /// Id mode: prefix match against the record's raw id.
    Id { prefix: String },
}

/// A compiled selector: a target plus an optional rule filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub target: Target,
    pub rule: Option<String>,
}

impl Selector {
    /// Parse selector text into a typed selector.
    pub fn parse(input: &str) -> Result<Self, BagError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(BagError::InvalidSelector("selector is empty".to_string()));
        }

        if let Some(rest) = text.strip_prefix('#') {
            let (prefix, rule) = match rest.split_once(':') {
                Some((prefix, rule)) => (prefix, Some(rule)),
                None => (rest, None),
            };
            if prefix.is_empty() {
                return Err(BagError::InvalidSelector(format!(
                    "id selector needs a prefix: {text:?}"
                )));
            }
            if rule.is_some_and(str::is_empty) {
                return Err(BagError::InvalidSelector(format!(
                    "empty rule suffix: {text:?}"
                )));
            }
            return Ok(Self {
                target: Target::Id {
                    prefix: prefix.to_string(),
                },
                rule: rule.map(str::to_string),
            });
        }

        let pattern = r"^(?:([^.:*\s]+)\.)?(\*|[^.:*\s]+)(?::([^.:*\s]+))?$";
        let re = Regex::new(pattern)
            .map_err(|err| BagError::InvalidSelector(format!("compile selector grammar: {err}")))?;
        let captures = re
            .captures(text)
            .ok_or_else(|| BagError::InvalidSelector(format!("malformed selector: {text:?}")))?;

        let scope = captures.get(1).map(|m| m.as_str().to_string());
        let field_text = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
        let rule = captures.get(3).map(|m| m.as_str().to_string());
        let field = if field_text == "*" {
            FieldMatch::Any
        } else {
            FieldMatch::Name(field_text.to_string())
        };
        Ok(Self {
            target: Target::Path { scope, field },
            rule,
        })
    }

    /// Primary predicate: rule (when specified) AND scope (exact; a
    /// selector without a scope segment only matches unscoped records)
    /// AND field (exact, or always true for the wildcard). In id mode:
    /// rule AND id-prefix.
    pub fn is_primary(&self, error: &FieldError) -> bool {
        if !self.rule_matches(error) {
            return false;
        }
        match &self.target {
            Target::Id { prefix } => error.id.starts_with(prefix.as_str()),
            Target::Path { scope, field } => {
                let scope_ok = match scope {
                    Some(scope) => error.scope.as_deref() == Some(scope.as_str()),
                    None => error.scope.is_none(),
                };
                let field_ok = match field {
                    FieldMatch::Any => true,
                    FieldMatch::Name(name) => &error.field == name,
                };
                scope_ok && field_ok
            }
        }
    }

    /// Alternate predicate: rule (when specified) AND the record's `field`
    /// attribute equals the literal selector path text (`scope.field`
    /// concatenation). This catches producers that embed the dotted path
    /// in the field name instead of splitting scope out. Id-mode and
    /// wildcard selectors have no alternate form.
    pub fn is_alt(&self, error: &FieldError) -> bool {
        if !self.rule_matches(error) {
            return false;
        }
        match &self.target {
            Target::Id { .. } => false,
            Target::Path { scope, field } => match field {
                FieldMatch::Any => false,
                FieldMatch::Name(name) => match scope {
                    Some(scope) => {
                        error.field.len() == scope.len() + 1 + name.len()
                            && error.field.starts_with(scope.as_str())
                            && error.field.ends_with(name.as_str())
                            && error.field.as_bytes()[scope.len()] == b'.'
                    }
                    None => &error.field == name,
                },
            },
        }
    }

    fn rule_matches(&self, error: &FieldError) -> bool {
        match &self.rule {
            Some(rule) => &error.rule == rule,
            None => true,
        }
    }
}

/// Resolve candidates with the two-tier fallback: every record is checked
/// against the primary predicate first; only when none match at all does
/// the alternate predicate apply. Order of the input is preserved.
pub fn select<'a>(errors: &[&'a FieldError], selector: &Selector) -> Vec<&'a FieldError> {
    let primary: Vec<&FieldError> = errors
        .iter()
        .copied()
        .filter(|e| selector.is_primary(e))
        .collect();
    if !primary.is_empty() {
        return primary;
    }
    errors
        .iter()
        .copied()
        .filter(|e| selector.is_alt(e))
        .collect()
}
