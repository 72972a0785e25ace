//! External object id validation.

use crate::errors::{codes, InvalidRequestParameterError};

/// Prefixes accepted when a call site does not pass its own allow-list.
pub const DEFAULT_OBJECT_ID_PREFIXES: &[&str] = &[
    "acct", "ba", "card", "ch", "cus", "dp", "du", "in", "pi", "pm", "po", "py", "re", "seti",
    "src", "tok", "tr",
];

/// Prefixes a charge-like field accepts.
pub const CHARGE_ID_PREFIXES: &[&str] = &["ch", "py"];

/// Validates an id against [`DEFAULT_OBJECT_ID_PREFIXES`].
pub fn validate_object_id(value: &str, field: &str) -> Result<(), InvalidRequestParameterError> {
    validate_object_id_with_prefixes(value, field, DEFAULT_OBJECT_ID_PREFIXES)
}

/// Validates that `value` is `<prefix>_<suffix>` with `prefix` in `prefixes`.
///
/// The suffix is opaque but must be non-empty and alphanumeric (underscores
/// allowed).
pub fn validate_object_id_with_prefixes(
    value: &str,
    field: &str,
    prefixes: &[&str],
) -> Result<(), InvalidRequestParameterError> {
    let valid = value.split_once('_').is_some_and(|(prefix, suffix)| {
        !prefix.is_empty()
            && prefix.chars().all(|c| c.is_ascii_lowercase())
            && prefixes.contains(&prefix)
            && !suffix.is_empty()
            && suffix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    });

    if valid {
        Ok(())
    } else {
        Err(InvalidRequestParameterError::new(
            codes::OBJECT_ID,
            format!(
                "{value} is not a valid id for {field}; expected one of the prefixes: {}",
                prefixes.join(", ")
            ),
        )
        .with_field(field)
        .with_value(value))
    }
}
