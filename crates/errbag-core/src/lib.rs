//! errbag-core: in-memory keyed collection of validation-error records
//! with a compact selector language for retrieving, grouping, updating,
//! and removing errors by field name, scope, and rule.
//!
//! Callers construct [`FieldError`] records and [`ErrorBag::add`] them;
//! query operations ([`ErrorBag::first`], [`ErrorBag::collect`],
//! [`ErrorBag::has`], [`ErrorBag::remove`], ...) are driven by selector
//! strings of the form `scope.field:rule`, the wildcard `*`, or `#id`
//! prefixes. Matching resolves primary candidates (exact scope + field)
//! before falling back to alternates whose field attribute embeds the
//! dotted path.

pub mod bag;
pub mod error;
pub mod field_error;
pub mod selector;

pub use bag::{BagConfig, Collected, ErrorBag};
pub use error::BagError;
pub use field_error::{FieldError, Regenerator};
pub use selector::Selector;
