//! Domain aggregates exposed by the customer service layer.

pub mod client;
pub mod types;

use std::collections::BTreeMap;

/// Field name to human readable message, ordered by field name.
///
/// The `_global` key carries messages that are not tied to a single field.
pub type FieldErrors = BTreeMap<String, String>;

/// Key used in [`FieldErrors`] for messages not tied to a field.
pub const GLOBAL_ERROR_KEY: &str = "_global";
