//! The keyed error collection and its query operations.
//!
//! An [`ErrorBag`] owns a mapping from field id to an ordered sequence of
//! [`FieldError`] records and keeps a running count. Every higher-level
//! operation is expressed over two primitives: flattening (all records,
//! ids in first-insertion order, each sequence in insertion order) and
//! selector matching (see [`crate::selector`]).

use std::collections::HashMap;

use crate::error::BagError;
use crate::field_error::FieldError;
use crate::selector::{select, Selector};

/// Behavior switches for an [`ErrorBag`].
#[derive(Debug, Clone)]
pub struct BagConfig {
    /// Emit a warning when the deprecated positional add shape is used.
    /// Production hosts switch this off.
    pub warn_on_deprecated: bool,
}

impl Default for BagConfig {
    fn default() -> Self {
        Self {
            warn_on_deprecated: true,
        }
    }
}

/// Result of a `collect` operation.
///
/// When the candidate set reduces to exactly one distinct field name, the
/// group is returned directly instead of wrapped in a one-key mapping.
/// An empty candidate set is an empty `Grouped`.
#[derive(Debug, Clone, PartialEq)]
pub enum Collected<T> {
    /// Exactly one distinct field name matched; its values, unwrapped.
    Single(Vec<T>),
    /// Zero or several distinct field names; groups in first-seen order.
    Grouped(Vec<(String, Vec<T>)>),
}

impl<T> Collected<T> {
    /// Total number of collected values across all groups.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(values) => values.len(),
            Self::Grouped(groups) => groups.iter().map(|(_, values)| values.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The unwrapped single group, if that is what this is.
    pub fn into_single(self) -> Option<Vec<T>> {
        match self {
            Self::Single(values) => Some(values),
            Self::Grouped(_) => None,
        }
    }

    /// The grouped form, if that is what this is.
    pub fn groups(&self) -> Option<&[(String, Vec<T>)]> {
        match self {
            Self::Single(_) => None,
            Self::Grouped(groups) => Some(groups),
        }
    }
}

/// In-memory keyed collection of validation-error records.
///
/// Owned and mutated by a single validation session; no internal locking.
/// Internal storage is never aliased out to callers.
#[derive(Debug, Clone, Default)]
pub struct ErrorBag {
    items: HashMap<String, Vec<FieldError>>,
    order: Vec<String>,
    length: usize,
    config: BagConfig,
}

impl ErrorBag {
    /// Create an empty bag with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty bag with explicit configuration.
    pub fn with_config(config: BagConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    // -----------------------------------------------------------------------
    // Storage & mutation
    // -----------------------------------------------------------------------

    /// Add one record. An empty scope string is normalized to "no scope";
    /// the record is appended to its id's sequence, creating the sequence
    /// on first insertion.
    pub fn add(&mut self, mut error: FieldError) {
        if error.scope.as_deref() == Some("") {
            error.scope = None;
        }
        if !self.items.contains_key(&error.id) {
            self.order.push(error.id.clone());
        }
        self.items.entry(error.id.clone()).or_default().push(error);
        self.length += 1;
    }

    /// Add several records in order.
    pub fn add_all(&mut self, errors: impl IntoIterator<Item = FieldError>) {
        for error in errors {
            self.add(error);
        }
    }

    /// Legacy four-positional add shape. Records carry no id in this
    /// shape, so the scope-qualified field path becomes the storage key.
    #[deprecated(note = "construct a FieldError and call `add` instead")]
    pub fn add_legacy(&mut self, field: &str, msg: &str, rule: &str, scope: Option<&str>) {
        if self.config.warn_on_deprecated {
            tracing::warn!(
                field,
                rule,
                "add(field, msg, rule, scope) is deprecated; construct a FieldError and call add"
            );
        }
        let scope = scope.filter(|s| !s.is_empty());
        let id = match scope {
            Some(scope) => format!("{scope}.{field}"),
            None => field.to_string(),
        };
        let mut error = FieldError::new(id, field, rule, msg);
        error.scope = scope.map(str::to_string);
        self.add(error);
    }

    /// Rewrite the scope of every record stored under `id`, used when a
    /// field's logical scope changes without re-adding its errors.
    /// An absent id is a silent no-op.
    pub fn update(&mut self, id: &str, scope: Option<&str>) {
        let scope = scope.filter(|s| !s.is_empty()).map(str::to_string);
        if let Some(sequence) = self.items.get_mut(id) {
            for error in sequence {
                error.scope = scope.clone();
            }
        }
    }

    /// Recompute every stored record's message from its regenerator.
    /// Plain text messages are untouched.
    pub fn regenerate(&mut self) {
        for sequence in self.items.values_mut() {
            for error in sequence {
                error.regenerate();
            }
        }
    }

    /// Remove records. `None` empties every sequence; `Some(scope)`
    /// removes only records whose scope equals the given scope exactly.
    /// The running count tracks either way.
    pub fn clear(&mut self, scope: Option<&str>) {
        match scope {
            None => {
                for sequence in self.items.values_mut() {
                    sequence.clear();
                }
                self.length = 0;
            }
            Some(scope) => {
                let mut removed = 0;
                for sequence in self.items.values_mut() {
                    let before = sequence.len();
                    sequence.retain(|e| e.scope.as_deref() != Some(scope));
                    removed += before - sequence.len();
                }
                self.length -= removed;
            }
        }
    }

    /// Empty the sequence stored under `id`, returning how many records
    /// were removed. An absent id is a safe no-op returning 0; use
    /// [`ErrorBag::try_remove_by_id`] when absence should be an error.
    pub fn remove_by_id(&mut self, id: &str) -> usize {
        self.try_remove_by_id(id).unwrap_or(0)
    }

    /// Strict removal: an absent id is [`BagError::NotFound`].
    pub fn try_remove_by_id(&mut self, id: &str) -> Result<usize, BagError> {
        match self.items.get_mut(id) {
            Some(sequence) => {
                let removed = sequence.len();
                sequence.clear();
                self.length -= removed;
                Ok(removed)
            }
            None => Err(BagError::NotFound(format!("id {id:?}"))),
        }
    }

    /// Remove each id in turn (hardened per element), returning the total
    /// number of records removed.
    pub fn remove_by_ids(&mut self, ids: &[&str]) -> usize {
        ids.iter().map(|id| self.remove_by_id(id)).sum()
    }

    /// Remove every record matching the selector's primary predicate,
    /// returning how many were removed. Alternate candidates are not
    /// touched.
    pub fn remove(&mut self, field: &str, scope: Option<&str>) -> Result<usize, BagError> {
        let selector = Selector::parse(&selector_text(field, scope))?;
        let mut removed = 0;
        for id in &self.order {
            if let Some(sequence) = self.items.get_mut(id) {
                let before = sequence.len();
                sequence.retain(|e| !selector.is_primary(e));
                removed += before - sequence.len();
            }
        }
        self.length -= removed;
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // Flatten, count, iteration
    // -----------------------------------------------------------------------

    /// All records in flatten order: ids in first-insertion order, each
    /// id's sequence in insertion order.
    pub fn flatten(&self) -> Vec<&FieldError> {
        self.iter().collect()
    }

    /// Restartable iterator over all records in flatten order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            bag: self,
            id_index: 0,
            item_index: 0,
        }
    }

    /// Total number of stored records. O(1).
    pub fn count(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// With no scope: any records at all. With a scope: any record whose
    /// scope equals the given scope exactly (string equality, not
    /// selector matching).
    pub fn any(&self, scope: Option<&str>) -> bool {
        match scope {
            None => self.length > 0,
            Some(scope) => self.iter().any(|e| e.scope.as_deref() == Some(scope)),
        }
    }

    /// All messages in flatten order, optionally restricted to records
    /// whose scope equals the given scope exactly.
    pub fn all(&self, scope: Option<&str>) -> Vec<String> {
        self.iter()
            .filter(|e| match scope {
                None => true,
                Some(scope) => e.scope.as_deref() == Some(scope),
            })
            .map(|e| e.msg.clone())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Query operations
    // -----------------------------------------------------------------------

    /// First matching record's message under primary/alternate fallback.
    pub fn first(&self, field: &str, scope: Option<&str>) -> Result<Option<String>, BagError> {
        Ok(self.candidates(field, scope)?.first().map(|e| e.msg.clone()))
    }

    /// Whether [`ErrorBag::first`] would return a non-empty message.
    pub fn has(&self, field: &str, scope: Option<&str>) -> Result<bool, BagError> {
        Ok(self
            .first(field, scope)?
            .is_some_and(|msg| !msg.is_empty()))
    }

    /// First record's message stored under `id`, by direct key lookup.
    pub fn first_by_id(&self, id: &str) -> Option<String> {
        self.items
            .get(id)
            .and_then(|sequence| sequence.first())
            .map(|e| e.msg.clone())
    }

    /// Rule name of the first matching record.
    pub fn first_rule(&self, field: &str, scope: Option<&str>) -> Result<Option<String>, BagError> {
        Ok(self.candidates(field, scope)?.first().map(|e| e.rule.clone()))
    }

    /// Message of the first matching record produced by `rule`.
    pub fn first_by_rule(
        &self,
        field: &str,
        rule: &str,
        scope: Option<&str>,
    ) -> Result<Option<String>, BagError> {
        Ok(self
            .candidates(field, scope)?
            .into_iter()
            .find(|e| e.rule == rule)
            .map(|e| e.msg.clone()))
    }

    /// Message of the first matching record NOT produced by `rule`
    /// (defaults to `"required"`).
    pub fn first_not(
        &self,
        field: &str,
        rule: Option<&str>,
        scope: Option<&str>,
    ) -> Result<Option<String>, BagError> {
        let rule = rule.unwrap_or("required");
        Ok(self
            .candidates(field, scope)?
            .into_iter()
            .find(|e| e.rule != rule)
            .map(|e| e.msg.clone()))
    }

    /// Group ALL records by field name, messages per group.
    pub fn collect_all(&self) -> Collected<String> {
        group_by_field(self.flatten(), |e| e.msg.clone())
    }

    /// Group ALL records by field name, full records per group.
    pub fn collect_all_errors(&self) -> Collected<FieldError> {
        group_by_field(self.flatten(), Clone::clone)
    }

    /// Selector-matched records (primary/alternate fallback), grouped by
    /// field name, messages per group.
    pub fn collect(&self, field: &str, scope: Option<&str>) -> Result<Collected<String>, BagError> {
        Ok(group_by_field(self.candidates(field, scope)?, |e| {
            e.msg.clone()
        }))
    }

    /// Selector-matched records, grouped by field name, full records per
    /// group.
    pub fn collect_errors(
        &self,
        field: &str,
        scope: Option<&str>,
    ) -> Result<Collected<FieldError>, BagError> {
        Ok(group_by_field(self.candidates(field, scope)?, Clone::clone))
    }

    fn candidates(&self, field: &str, scope: Option<&str>) -> Result<Vec<&FieldError>, BagError> {
        let selector = Selector::parse(&selector_text(field, scope))?;
        Ok(select(&self.flatten(), &selector))
    }
}

impl<'a> IntoIterator for &'a ErrorBag {
    type Item = &'a FieldError;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Lazy iterator over a bag's records in flatten order.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    bag: &'a ErrorBag,
    id_index: usize,
    item_index: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a FieldError;

    fn next(&mut self) -> Option<&'a FieldError> {
        while self.id_index < self.bag.order.len() {
            let id = &self.bag.order[self.id_index];
            if let Some(sequence) = self.bag.items.get(id) {
                if self.item_index < sequence.len() {
                    let item = &sequence[self.item_index];
                    self.item_index += 1;
                    return Some(item);
                }
            }
            self.id_index += 1;
            self.item_index = 0;
        }
        None
    }
}

/// Selector text for a field/scope pair; the field part may itself carry
/// an id prefix or rule suffix.
fn selector_text(field: &str, scope: Option<&str>) -> String {
    match scope {
        Some(scope) => format!("{scope}.{field}"),
        None => field.to_string(),
    }
}

/// Group candidates by field name, preserving first-seen field order.
/// Exactly one distinct field name unwraps to `Single`.
fn group_by_field<T, F>(candidates: Vec<&FieldError>, map: F) -> Collected<T>
where
    F: Fn(&FieldError) -> T,
{
    let mut groups: Vec<(String, Vec<T>)> = Vec::new();
    for error in candidates {
        match groups.iter_mut().find(|(name, _)| name == &error.field) {
            Some((_, values)) => values.push(map(error)),
            None => groups.push((error.field.clone(), vec![map(error)])),
        }
    }
    if groups.len() == 1 {
        if let Some((_, values)) = groups.pop() {
            return Collected::Single(values);
        }
    }
    Collected::Grouped(groups)
}
