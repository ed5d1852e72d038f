//! Input-schema normalization.
//!
//! Some tool descriptors arrive tagged with the draft-07 dialect or with no
//! dialect at all, which stricter MCP clients reject. Normalization pins every
//! descriptor to the 2020-12 dialect. Only the `$schema` tag is rewritten; the
//! schema body is never migrated structurally.

use crate::protocol::{ToolDescriptor, ToolList};
use serde_json::{json, Value};

/// Canonical dialect URI every served schema is tagged with.
pub const SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Normalize every descriptor in a tool list. Pure and idempotent.
pub fn normalize_tools(tools: ToolList) -> ToolList {
    tools.into_iter().map(normalize_tool).collect()
}

/// Normalize a single descriptor.
///
/// A descriptor without an input schema gets a minimal closed object schema.
pub fn normalize_tool(mut tool: ToolDescriptor) -> ToolDescriptor {
    match tool.input_schema.as_mut() {
        Some(schema) => normalize_schema(schema),
        None => tool.input_schema = Some(default_schema()),
    }
    tool
}

/// Rewrite the dialect tag in place: absent or draft-07 becomes 2020-12.
/// Any other tag (including 2020-12 itself) is left alone.
pub fn normalize_schema(schema: &mut Value) {
    let Some(obj) = schema.as_object_mut() else {
        return;
    };
    let rewrite = match obj.get("$schema").and_then(Value::as_str) {
        None => !obj.contains_key("$schema"),
        Some(tag) => tag.contains("draft-07"),
    };
    if rewrite {
        obj.insert(
            "$schema".to_string(),
            Value::String(SCHEMA_DIALECT.to_string()),
        );
    }
}

fn default_schema() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "additionalProperties": false,
        "$schema": SCHEMA_DIALECT,
    })
}
