//! Step and variable data model
//!
//! Step files parse into ordered key-value records. A record either
//! describes a runnable action (its `action` field names a keyword) or is
//! an include marker: a record whose sole key is `include`, naming another
//! step file to inline.

use serde_yaml::{Mapping, Value};

use crate::common::Result;

/// An ordered list of step records
pub type StepSequence = Vec<StepRecord>;

/// One ordered key-value record parsed from a step file
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord(Mapping);

impl StepRecord {
    pub fn new(mapping: Mapping) -> Self {
        Self(mapping)
    }

    fn key(name: &str) -> Value {
        Value::String(name.to_string())
    }

    /// Value of a field, if present
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(&Self::key(name))
    }

    /// String value of a field, if present and a string
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// The keyword this record invokes
    pub fn action(&self) -> Option<&str> {
        self.get_str("action")
    }

    /// The file this record includes, when the record is an include marker
    ///
    /// A marker is a record containing a single `include` key whose value
    /// names a file under the test's `steps/` directory.
    pub fn include_file(&self) -> Option<&str> {
        if self.0.len() == 1 {
            self.get_str("include")
        } else {
            None
        }
    }

    /// Fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The record as a JSON value (keys must be strings)
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(&self.0)?)
    }
}

/// Test-scoped variables, available during file parsing and substitution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableContext(Mapping);

impl VariableContext {
    pub fn new(mapping: Mapping) -> Self {
        Self(mapping)
    }

    /// Value of a variable, if defined
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(&Value::String(name.to_string()))
    }

    /// Variables in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
