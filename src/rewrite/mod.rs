//! Recursive field rewriting in untyped YAML trees.
//!
//! Component definitions nest their `version` fields at arbitrary depths
//! (top-level asset version, environment references inside jobs, pipeline
//! steps in sequences). [`rewrite_field`] reaches every one of them.

mod driver;

pub use driver::{BatchReport, FileOutcome, RewriteBatch};

use serde_yaml::Value;

/// Set `field` to `new_value` in every mapping of `tree`, at any depth.
///
/// Returns true iff at least one value actually changed. Fields that already
/// hold `new_value` are left alone, so repeating a rewrite reports no change.
pub fn rewrite_field(tree: &mut Value, field: &str, new_value: &Value) -> bool {
    let mut changed = false;

    match tree {
        Value::Mapping(mapping) => {
            if let Some(current) = mapping.get_mut(field)
                && *current != *new_value
            {
                *current = new_value.clone();
                changed = true;
            }
            for (_, child) in mapping.iter_mut() {
                changed |= rewrite_field(child, field, new_value);
            }
        }
        Value::Sequence(items) => {
            for item in items.iter_mut() {
                changed |= rewrite_field(item, field, new_value);
            }
        }
        Value::Tagged(tagged) => {
            changed |= rewrite_field(&mut tagged.value, field, new_value);
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }

    changed
}
