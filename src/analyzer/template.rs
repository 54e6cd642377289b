//! CloudFormation template loading.
//!
//! Templates are read as JSON when the file ends in `.json` and as YAML
//! otherwise. YAML short-form intrinsics (`!Ref`, `!GetAtt`, `!Sub`, ...) are
//! rewritten to their long JSON form so generators only ever see one shape.

use super::types::{ResourceDescriptor, Template};
use crate::error::{AnalyzerError, Result};
use serde_json::{Map, Number, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Default ceiling on template size (5 MiB).
pub const DEFAULT_MAX_TEMPLATE_BYTES: u64 = 5 * 1024 * 1024;

/// Short-form tags that map to `Fn::<Name>`.
const FN_TAGS: &[&str] = &[
    "Base64",
    "Cidr",
    "Equals",
    "FindInMap",
    "GetAtt",
    "GetAZs",
    "If",
    "ImportValue",
    "Join",
    "Not",
    "And",
    "Or",
    "Select",
    "Split",
    "Sub",
    "Transform",
];

/// Anything that can turn a path into a [`Template`].
pub trait TemplateParser: Send + Sync {
    /// Load and validate the template at `path`.
    fn parse(&self, path: &Path) -> Result<Template>;
}

/// Source syntax of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    Json,
    Yaml,
}

impl TemplateFormat {
    /// Pick the syntax from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// File-backed CloudFormation parser.
#[derive(Debug, Clone)]
pub struct CfnTemplateParser {
    max_size_bytes: u64,
}

impl Default for CfnTemplateParser {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_TEMPLATE_BYTES,
        }
    }
}

impl CfnTemplateParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to change the size ceiling.
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size_bytes = bytes;
        self
    }

    /// Parse template text that has already been read.
    pub fn parse_str(&self, content: &str, format: TemplateFormat, path: &Path) -> Result<Template> {
        let root = match format {
            TemplateFormat::Json => serde_json::from_str::<Value>(content)
                .map_err(|e| parse_error(path, format!("Invalid JSON: {}", e)))?,
            TemplateFormat::Yaml => {
                let yaml = serde_yaml::from_str::<serde_yaml::Value>(content)
                    .map_err(|e| parse_error(path, format!("Invalid YAML: {}", e)))?;
                yaml_to_json(yaml).map_err(|reason| parse_error(path, reason))?
            }
        };
        build_template(root, path)
    }
}

impl TemplateParser for CfnTemplateParser {
    fn parse(&self, path: &Path) -> Result<Template> {
        let metadata = fs::metadata(path).map_err(|e| file_error(path, describe_io(&e)))?;
        if !metadata.is_file() {
            return Err(file_error(path, "Not a regular file".to_string()));
        }
        if metadata.len() > self.max_size_bytes {
            return Err(file_error(
                path,
                format!(
                    "Template is {} bytes, larger than the {} byte limit",
                    metadata.len(),
                    self.max_size_bytes
                ),
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| file_error(path, describe_io(&e)))?;
        let template = self.parse_str(&content, TemplateFormat::from_path(path), path)?;
        log::debug!(
            "Parsed {} with {} resource(s)",
            path.display(),
            template.resources.len()
        );
        Ok(template)
    }
}

fn file_error(path: &Path, reason: String) -> AnalyzerError {
    AnalyzerError::File {
        path: PathBuf::from(path),
        reason,
    }
}

fn parse_error(path: &Path, reason: String) -> AnalyzerError {
    AnalyzerError::Parse {
        path: PathBuf::from(path),
        reason,
    }
}

fn describe_io(e: &std::io::Error) -> String {
    match e.kind() {
        std::io::ErrorKind::NotFound => "Template file not found".to_string(),
        std::io::ErrorKind::PermissionDenied => "Permission denied".to_string(),
        _ => format!("Cannot read template: {}", e),
    }
}

// ============================================================================
// Structure
// ============================================================================

fn build_template(root: Value, path: &Path) -> Result<Template> {
    let Value::Object(mut root) = root else {
        return Err(parse_error(path, "Template must be a mapping".to_string()));
    };

    let resources = match root.remove("Resources") {
        Some(Value::Object(resources)) => resources,
        Some(_) => return Err(parse_error(path, "Resources must be a mapping".to_string())),
        None => return Err(parse_error(path, "Missing Resources section".to_string())),
    };
    if resources.is_empty() {
        return Err(parse_error(path, "Resources section is empty".to_string()));
    }

    let mut descriptors = Vec::with_capacity(resources.len());
    for (logical_id, body) in resources {
        descriptors.push(build_resource(logical_id, body, path)?);
    }

    Ok(Template {
        format_version: root.get("AWSTemplateFormatVersion").map(scalar_text),
        description: root.get("Description").map(scalar_text),
        resources: descriptors,
    })
}

fn build_resource(logical_id: String, body: Value, path: &Path) -> Result<ResourceDescriptor> {
    let Value::Object(mut body) = body else {
        return Err(parse_error(
            path,
            format!("Resource {} must be a mapping", logical_id),
        ));
    };

    let type_identifier = match body.remove("Type") {
        Some(Value::String(ty)) if !ty.is_empty() => ty,
        Some(_) => {
            return Err(parse_error(
                path,
                format!("Resource {} has a non-string Type", logical_id),
            ));
        }
        None => {
            return Err(parse_error(
                path,
                format!("Resource {} is missing Type", logical_id),
            ));
        }
    };

    let properties = match body.remove("Properties") {
        Some(Value::Object(props)) => props,
        Some(Value::Null) | None => Map::new(),
        Some(_) => {
            return Err(parse_error(
                path,
                format!("Resource {} has non-mapping Properties", logical_id),
            ));
        }
    };

    Ok(ResourceDescriptor {
        identifier: logical_id,
        type_identifier,
        properties,
    })
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// YAML Conversion
// ============================================================================

fn yaml_to_json(value: serde_yaml::Value) -> std::result::Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => yaml_number(&n),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(seq) => Value::Array(
            seq.into_iter()
                .map(yaml_to_json)
                .collect::<std::result::Result<_, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => {
            let tag = tagged.tag.to_string();
            expand_intrinsic(tag.trim_start_matches('!'), yaml_to_json(tagged.value)?)?
        }
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(n.to_string()))
    }
}

fn yaml_key(key: serde_yaml::Value) -> std::result::Result<String, String> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Null => Ok("null".to_string()),
        _ => Err("Mapping keys must be scalars".to_string()),
    }
}

/// Rewrite one short-form intrinsic into its long form.
fn expand_intrinsic(tag: &str, value: Value) -> std::result::Result<Value, String> {
    let (key, value) = match tag {
        "Ref" => ("Ref".to_string(), value),
        "Condition" => ("Condition".to_string(), value),
        "GetAtt" => {
            let value = match value {
                Value::String(s) => match s.split_once('.') {
                    Some((resource, attribute)) => Value::Array(vec![
                        Value::String(resource.to_string()),
                        Value::String(attribute.to_string()),
                    ]),
                    None => return Err(format!("!GetAtt '{}' must be Resource.Attribute", s)),
                },
                other => other,
            };
            ("Fn::GetAtt".to_string(), value)
        }
        t if FN_TAGS.contains(&t) => (format!("Fn::{}", t), value),
        other => return Err(format!("Unsupported YAML tag !{}", other)),
    };

    let mut map = Map::with_capacity(1);
    map.insert(key, value);
    Ok(Value::Object(map))
}
