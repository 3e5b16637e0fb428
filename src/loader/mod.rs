//! Step and variable file loading
//!
//! Parses YAML/JSON files into ordered step records or a variable context,
//! substituting `${name}` variable references during the parse so step
//! definitions can use test-scoped values. JSON files go through the same
//! parser; JSON is a YAML subset.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::common::{Error, Result};
use crate::step::{StepRecord, StepSequence, VariableContext};

/// Loads step and variable files, resolving variable references
#[derive(Debug, Default)]
pub struct FileLoader;

impl FileLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a step file into an ordered record sequence
    ///
    /// The file must contain a sequence of mappings. Variable references in
    /// string values are resolved against `vars` during the parse.
    pub fn load_steps(&self, path: &Path, vars: &VariableContext) -> Result<StepSequence> {
        let value = self.parse(path, vars)?;
        let Value::Sequence(items) = value else {
            return Err(Error::parse(path, "expected a sequence of steps"));
        };

        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                let Value::Mapping(mapping) = item else {
                    return Err(Error::malformed_step(path, i + 1, "expected a mapping"));
                };
                validate_include(path, i + 1, &mapping)?;
                Ok(StepRecord::new(mapping))
            })
            .collect()
    }

    /// Load a variables file into a variable context
    ///
    /// `vars` is the context being built; the file is parsed against it so
    /// the interface matches step loading, but a vars file cannot reference
    /// other test variables.
    pub fn load_vars(&self, path: &Path, vars: &VariableContext) -> Result<VariableContext> {
        match self.parse(path, vars)? {
            Value::Mapping(mapping) => Ok(VariableContext::new(mapping)),
            Value::Null => Ok(VariableContext::default()),
            _ => Err(Error::parse(path, "expected a mapping of variables")),
        }
    }

    fn parse(&self, path: &Path, vars: &VariableContext) -> Result<Value> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read '{}': {}", path.display(), e)))?;
        let value: Value =
            serde_yaml::from_str(&content).map_err(|e| Error::parse(path, e.to_string()))?;
        substitute(value, vars)
    }
}

/// An include marker must name its file as a string
fn validate_include(path: &Path, index: usize, mapping: &Mapping) -> Result<()> {
    if mapping.len() != 1 {
        return Ok(());
    }
    match mapping.get(Value::String("include".to_string())) {
        Some(Value::String(_)) | None => Ok(()),
        Some(_) => Err(Error::malformed_step(
            path,
            index,
            "include value must be a string naming a file under steps/",
        )),
    }
}

/// Resolve variable references in every string of a parsed value tree
fn substitute(value: Value, vars: &VariableContext) -> Result<Value> {
    match value {
        Value::String(s) => substitute_string(s, vars),
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| substitute(item, vars))
            .collect::<Result<Vec<_>>>()
            .map(Value::Sequence),
        Value::Mapping(mapping) => {
            let mut out = Mapping::new();
            for (key, item) in mapping {
                out.insert(key, substitute(item, vars)?);
            }
            Ok(Value::Mapping(out))
        }
        other => Ok(other),
    }
}

fn substitute_string(s: String, vars: &VariableContext) -> Result<Value> {
    if !s.contains("${") {
        return Ok(Value::String(s));
    }

    // A string that is exactly one reference splices the variable's typed
    // value instead of stringifying it.
    if let Some(name) = lone_reference(&s) {
        return vars
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownVariable(name.to_string()));
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s.as_str();
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // unterminated reference, keep the remainder literally
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let name = &after[..end];
        let value = vars
            .get(name)
            .ok_or_else(|| Error::UnknownVariable(name.to_string()))?;
        out.push_str(&scalar_text(name, value)?);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(Value::String(out))
}

/// The variable name when the whole string is a single `${name}` reference
fn lone_reference(s: &str) -> Option<&str> {
    let inner = s.strip_prefix("${")?.strip_suffix('}')?;
    if inner.contains('}') || inner.contains("${") {
        None
    } else {
        Some(inner)
    }
}

fn scalar_text(name: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(Error::Config(format!(
            "variable '{name}' is not a scalar and cannot be interpolated into a string"
        ))),
    }
}
