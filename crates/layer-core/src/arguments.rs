//! Tool-call argument preparation: fill schema defaults, then validate.

use serde_json::{Map, Value};

use crate::error::{LayerError, Result};
use crate::schema::{Items, Schema};
use crate::types::Tool;

/// Default and validate the arguments of a call to `tool`.
///
/// Missing arguments are treated as an empty object.
pub fn prepare_arguments(tool: &Tool, arguments: Option<Value>) -> Result<Value> {
    let mut arguments = arguments.unwrap_or_else(|| Value::Object(Map::new()));
    fill_defaults(&tool.input_schema, &mut arguments);
    validate(&tool.name, &tool.input_schema, &arguments)?;
    Ok(arguments)
}

/// Insert the `default` of every absent property that declares one.
///
/// Follows `properties`, `items` and `allOf`. Defaults under `anyOf`,
/// `oneOf` and `not` are ignored since no single branch is known to apply.
pub fn fill_defaults(schema: &Schema, instance: &mut Value) {
    let Some(node) = schema.as_object() else {
        return;
    };

    if let (Some(properties), Value::Object(map)) = (&node.properties, &mut *instance) {
        for (name, child) in properties {
            if !map.contains_key(name) {
                if let Some(default) = child.as_object().and_then(|c| c.default_value()) {
                    map.insert(name.clone(), default.clone());
                }
            }
            if let Some(value) = map.get_mut(name) {
                fill_defaults(child, value);
            }
        }
    }

    if let Value::Array(elements) = &mut *instance {
        match &node.items {
            Some(Items::Single(child)) => {
                for element in elements.iter_mut() {
                    fill_defaults(child, element);
                }
            }
            Some(Items::Tuple(children)) => {
                for (child, element) in children.iter().zip(elements.iter_mut()) {
                    fill_defaults(child, element);
                }
            }
            None => {}
        }
    }

    if let Some(all_of) = &node.all_of {
        for child in all_of {
            fill_defaults(child, instance);
        }
    }
}

/// Validate `instance` against `schema` with Draft 7 rules.
pub fn validate(tool: &str, schema: &Schema, instance: &Value) -> Result<()> {
    let schema = schema.to_value()?;
    let validator = jsonschema::draft7::new(&schema)
        .map_err(|e| LayerError::InvalidSchema(format!("tool '{tool}': {e}")))?;

    let errors: Vec<String> = validator.iter_errors(instance).map(|e| e.to_string()).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(LayerError::InvalidArguments {
            tool: tool.to_string(),
            errors,
        })
    }
}
