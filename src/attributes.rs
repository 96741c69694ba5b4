//! Blank-to-NULL normalization of attribute maps before they are saved.

use serde_json::{Map, Value};

/// Replace blank string values of `nullable` attributes with `null`.
///
/// A value is blank when it is empty after trimming. Other values, and
/// attributes not listed as nullable, are left alone. Returns the number
/// of attributes changed.
pub fn normalize_nullable(attributes: &mut Map<String, Value>, nullable: &[String]) -> usize {
    let mut changed = 0;
    for key in nullable {
        if let Some(value) = attributes.get_mut(key) {
            if matches!(value, Value::String(s) if s.trim().is_empty()) {
                *value = Value::Null;
                changed += 1;
            }
        }
    }
    changed
}
