//! JSON merge helpers for layered configuration.

use serde_json::{Map, Value};

/// Overlay `layer` onto `base`, skipping any leaf pinned by `locked`.
///
/// Objects merge key by key; every other value replaces what was there.
/// `locked` mirrors the requirements layer: a non-object value at a key means
/// the key is pinned, an object means only some nested keys are pinned.
pub(super) fn overlay_constrained(base: &mut Value, layer: &Value, locked: Option<&Value>) {
    if !(base.is_object() && layer.is_object()) {
        if locked.is_none() {
            *base = layer.clone();
        }
        return;
    }
    let (Some(base_map), Some(layer_map)) = (base.as_object_mut(), layer.as_object()) else {
        return;
    };
    let locked_map = match locked {
        None => None,
        Some(Value::Object(map)) => Some(map),
        Some(_) => return,
    };
    for (key, value) in layer_map {
        let key_lock = locked_map.and_then(|map| map.get(key));
        match key_lock {
            Some(Value::Object(_)) => {
                let slot = base_map
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                overlay_constrained(slot, value, key_lock);
            }
            Some(_) => {}
            None => match base_map.get_mut(key) {
                Some(slot) => overlay_constrained(slot, value, None),
                None => {
                    base_map.insert(key.clone(), value.clone());
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::overlay_constrained;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn overlay_merges_nested_objects() {
        let mut base = json!({ "history": { "max_attempts": 3, "provider": "memory" } });
        overlay_constrained(&mut base, &json!({ "history": { "provider": "file" } }), None);
        assert_eq!(
            base,
            json!({ "history": { "max_attempts": 3, "provider": "file" } })
        );
    }

    #[test]
    fn locked_leaves_are_not_overridden() {
        let locked = json!({ "history": { "max_attempts": 3 } });
        let mut base = locked.clone();
        overlay_constrained(
            &mut base,
            &json!({ "history": { "max_attempts": 9, "provider": "file" } }),
            Some(&locked),
        );
        assert_eq!(
            base,
            json!({ "history": { "max_attempts": 3, "provider": "file" } })
        );
    }
}
