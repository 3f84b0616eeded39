//! Injection of caller-supplied overrides as schema `default`s.
//!
//! A tool's input schema may ask for credentials or account identifiers that
//! the user already passed on the command line. Every string-typed
//! sub-schema reachable under a name found in the override map gets that
//! value as its `default`, and the name is dropped from every `required`
//! list so the agent host no longer has to supply it.

use std::collections::HashMap;

use serde_json::Value;

use crate::schema::{Dependency, Items, Schema, NAMED_SCHEMA_MAPS, SCHEMA_LISTS, SINGLE_SCHEMAS};

/// Field name to literal default value.
pub type Overrides = HashMap<String, String>;

/// Walk `schema` and inject defaults from `overrides` in place.
///
/// `identifier` is the key this node was reached under in its parent and is
/// `None` for the root and for composition branches.
pub fn apply_defaults(schema: &mut Schema, overrides: &Overrides, identifier: Option<&str>) {
    let Some(node) = schema.as_object_mut() else {
        return;
    };

    if node.is_type("string") {
        if let Some(value) = identifier.and_then(|id| overrides.get(id)) {
            node.set_default(Value::String(value.clone()));
        }
    }

    for field in NAMED_SCHEMA_MAPS {
        if let Some(map) = field(node) {
            for (key, child) in map.iter_mut() {
                apply_defaults(child, overrides, Some(key.as_str()));
            }
        }
    }

    for field in SCHEMA_LISTS {
        if let Some(list) = field(node) {
            apply_to_all(list, overrides);
        }
    }

    for (keyword, field) in SINGLE_SCHEMAS {
        if let Some(child) = field(node) {
            apply_defaults(child, overrides, Some(keyword));
        }
    }

    match node.items.as_mut() {
        Some(Items::Single(child)) => apply_defaults(child, overrides, Some("items")),
        Some(Items::Tuple(list)) => apply_to_all(list, overrides),
        None => {}
    }

    if let Some(dependencies) = node.dependencies.as_mut() {
        for (key, dependency) in dependencies.iter_mut() {
            if let Dependency::Schema(child) = dependency {
                apply_defaults(child, overrides, Some(key.as_str()));
            }
        }
    }

    // Membership alone decides; the matching child may not have taken a default.
    if let Some(required) = node.required.as_mut() {
        required.retain(|name| !overrides.contains_key(name));
    }
}

fn apply_to_all(list: &mut [Schema], overrides: &Overrides) {
    for child in list {
        apply_defaults(child, overrides, None);
    }
}
