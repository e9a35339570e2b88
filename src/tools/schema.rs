// ABOUTME: Builders for the JSON Schema objects describing tool parameters
// ABOUTME: Produces the `parameters` value sent with each function declaration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use serde_json::{json, Map, Value};

/// Object schema under construction
#[derive(Debug, Default)]
pub struct ParameterSchema {
    properties: Map<String, Value>,
    required: Vec<&'static str>,
}

impl ParameterSchema {
    /// Empty object schema
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required property
    #[must_use]
    pub fn required(mut self, name: &'static str, property: Value) -> Self {
        self.properties.insert(name.to_owned(), property);
        self.required.push(name);
        self
    }

    /// Add an optional property
    #[must_use]
    pub fn optional(mut self, name: &'static str, property: Value) -> Self {
        self.properties.insert(name.to_owned(), property);
        self
    }

    /// Finish into a JSON Schema object
    #[must_use]
    pub fn build(self) -> Value {
        json!({
            "type": "object",
            "properties": self.properties,
            "required": self.required,
        })
    }
}

/// String property
#[must_use]
pub fn string(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

/// Integer property
#[must_use]
pub fn integer(description: &str) -> Value {
    json!({ "type": "integer", "description": description })
}

/// Floating point property
#[must_use]
pub fn number(description: &str) -> Value {
    json!({ "type": "number", "description": description })
}

/// String property restricted to `values`
#[must_use]
pub fn enumeration(description: &str, values: &[&str]) -> Value {
    json!({ "type": "string", "description": description, "enum": values })
}
