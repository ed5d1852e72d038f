//! Built-in fallback tool list.
//!
//! Served only when no cache exists and the first remote fetch fails, so a
//! freshly installed relay still advertises the endpoint's stable core tools
//! instead of an empty list. Descriptors here are already in normalized form.

use crate::protocol::{ToolDescriptor, ToolList};
use crate::schema::SCHEMA_DIALECT;
use serde_json::json;

/// The bundled default tool list.
pub fn seed_tools() -> ToolList {
    vec![
        ToolDescriptor::new("execute_command")
            .with_description("Execute a command in the integrated terminal and return its output")
            .with_input_schema(json!({
                "type": "object",
                "properties": {
                    "command": {
                        "type": "string",
                        "description": "Command line to execute",
                    },
                    "cwd": {
                        "type": "string",
                        "description": "Working directory for the command",
                    },
                },
                "required": ["command"],
                "additionalProperties": false,
                "$schema": SCHEMA_DIALECT,
            })),
        ToolDescriptor::new("text_editor")
            .with_description("View, create, and edit files in the workspace")
            .with_input_schema(json!({
                "type": "object",
                "properties": {
                    "command": {
                        "type": "string",
                        "enum": ["view", "create", "str_replace", "insert"],
                    },
                    "path": {
                        "type": "string",
                        "description": "Absolute path to the target file",
                    },
                },
                "required": ["command", "path"],
                "additionalProperties": false,
                "$schema": SCHEMA_DIALECT,
            })),
        ToolDescriptor::new("list_directory")
            .with_description("List files and directories under a workspace path")
            .with_input_schema(json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Directory to list",
                    },
                },
                "required": ["path"],
                "additionalProperties": false,
                "$schema": SCHEMA_DIALECT,
            })),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::normalize_tools;
    use pretty_assertions::assert_eq;

    #[test]
    fn seed_is_already_normalized() {
        let seed = seed_tools();
        let normalized = normalize_tools(seed.clone());
        assert_eq!(seed, normalized);
    }

    #[test]
    fn seed_names_are_unique() {
        let seed = seed_tools();
        let mut names: Vec<&str> = seed.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), seed.len());
    }
}
