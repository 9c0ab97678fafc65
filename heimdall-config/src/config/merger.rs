//! Right-biased deep merge of JSON values.

use serde_json::Value;

/// Merges configuration values; the overlay always wins at the leaves.
///
/// # Examples
///
/// ```
/// use heimdall_config::config::ConfigMerger;
/// use serde_json::json;
///
/// let mut base = json!({"bar": {"height": 30, "position": "top"}, "tags": [1, 2]});
/// ConfigMerger::merge_into(&mut base, &json!({"bar": {"height": 40}, "tags": [3]}));
///
/// assert_eq!(base, json!({"bar": {"height": 40, "position": "top"}, "tags": [3]}));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Returns `base` with `overlay` merged over it.
    #[must_use]
    pub fn merge(base: &Value, overlay: &Value) -> Value {
        let mut result = base.clone();
        Self::merge_into(&mut result, overlay);
        result
    }

    /// Merges `overlay` into `target` in place.
    ///
    /// # Merging Rules
    ///
    /// - Both sides mappings: merged key by key, recursively
    /// - Anything else: the overlay value replaces the target value
    ///
    /// Arrays are replaced wholesale, never concatenated. Keys only present in
    /// `target` are kept; new keys from `overlay` are appended in its order.
    pub fn merge_into(target: &mut Value, overlay: &Value) {
        match (target, overlay) {
            (Value::Object(target), Value::Object(overlay)) => {
                for (key, value) in overlay {
                    match target.get_mut(key) {
                        Some(existing) => Self::merge_into(existing, value),
                        None => {
                            target.insert(key.clone(), value.clone());
                        }
                    }
                }
            }
            (target, overlay) => *target = overlay.clone(),
        }
    }
}
