//! Operation schemas.
//!
//! A [`Schema`] declares the parameters of one operation: their names,
//! semantic types, whether they are required, their defaults and, for
//! enumerated parameters, the allowed literal values. Schemas are built once
//! at startup and checked for internal consistency before registration.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value, json};
use thiserror::Error;

use super::validation::coerce;

/// Errors raised while building a schema definition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// Two parameters share the same name.
    #[error("duplicate parameter '{parameter}' in schema '{schema}'")]
    DuplicateParameter { schema: String, parameter: String },

    /// An enumerated parameter has no allowed values.
    #[error("parameter '{parameter}' in schema '{schema}' has an empty allowed-value set")]
    EmptyEnum { schema: String, parameter: String },

    /// A parameter is both required and has a default value.
    #[error("parameter '{parameter}' in schema '{schema}' is required but declares a default")]
    RequiredWithDefault { schema: String, parameter: String },

    /// A default value does not conform to the declared type.
    #[error("default for parameter '{parameter}' in schema '{schema}' is invalid: {reason}")]
    InvalidDefault {
        schema: String,
        parameter: String,
        reason: String,
    },
}

/// Semantic type of a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Integer,
    Float,
    Boolean,
    String,
    /// A string restricted to a fixed set of literals.
    Enum(Vec<String>),
    /// A JSON object with arbitrary keys.
    Mapping,
    /// A JSON array whose items are all of the given type.
    Sequence(Box<ParamType>),
}

impl ParamType {
    /// Build an enumerated type from string literals.
    pub fn one_of<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(allowed.into_iter().map(Into::into).collect())
    }

    /// Build a sequence type with the given item type.
    pub fn sequence_of(item: ParamType) -> Self {
        Self::Sequence(Box::new(item))
    }

    /// Allowed literals, if this is an enumerated type.
    pub fn allowed(&self) -> Option<&[String]> {
        match self {
            Self::Enum(allowed) => Some(allowed),
            _ => None,
        }
    }

    /// Render the type as a JSON Schema fragment.
    pub fn json_schema(&self) -> Value {
        match self {
            Self::Integer => json!({ "type": "integer" }),
            Self::Float => json!({ "type": "number" }),
            Self::Boolean => json!({ "type": "boolean" }),
            Self::String => json!({ "type": "string" }),
            Self::Enum(allowed) => json!({ "type": "string", "enum": allowed }),
            Self::Mapping => json!({ "type": "object" }),
            Self::Sequence(item) => json!({ "type": "array", "items": item.json_schema() }),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => f.write_str("integer"),
            Self::Float => f.write_str("float"),
            Self::Boolean => f.write_str("boolean"),
            Self::String => f.write_str("string"),
            Self::Enum(_) => f.write_str("enum"),
            Self::Mapping => f.write_str("mapping"),
            Self::Sequence(item) => write!(f, "sequence<{}>", item),
        }
    }
}

/// Declaration of a single parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParamType,
    pub required: bool,
    pub default: Option<Value>,
    pub description: String,
}

impl ParameterSpec {
    /// A parameter the caller must supply.
    pub fn required(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            default: None,
            description: String::new(),
        }
    }

    /// A parameter the caller may omit. Without a default it is simply absent.
    pub fn optional(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind)
        }
    }

    /// Attach a default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Attach a description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// The declared contract of one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    description: String,
    parameters: Vec<ParameterSpec>,
}

impl Schema {
    /// Build and check a schema.
    ///
    /// Defaults are coerced with the same rules the validator applies to
    /// caller input, so the stored default is already in canonical form.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<ParameterSpec>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        let mut seen = HashSet::new();
        let mut checked = Vec::with_capacity(parameters.len());

        for mut param in parameters {
            if !seen.insert(param.name.clone()) {
                return Err(SchemaError::DuplicateParameter {
                    schema: name,
                    parameter: param.name,
                });
            }
            if matches!(&param.kind, ParamType::Enum(allowed) if allowed.is_empty()) {
                return Err(SchemaError::EmptyEnum {
                    schema: name,
                    parameter: param.name,
                });
            }
            if let Some(default) = param.default.take() {
                if param.required {
                    return Err(SchemaError::RequiredWithDefault {
                        schema: name,
                        parameter: param.name,
                    });
                }
                let coerced = coerce(&param.name, &param.kind, &default).map_err(|e| {
                    SchemaError::InvalidDefault {
                        schema: name.clone(),
                        parameter: param.name.clone(),
                        reason: e.to_string(),
                    }
                })?;
                param.default = Some(coerced.into_json());
            }
            checked.push(param);
        }

        Ok(Self {
            name,
            description: description.into(),
            parameters: checked,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parameters in declaration order.
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Look up a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// JSON Schema for the argument object, as advertised over MCP.
    pub fn input_schema(&self) -> Map<String, Value> {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            let mut property = param.kind.json_schema();
            if let Value::Object(ref mut obj) = property {
                if !param.description.is_empty() {
                    obj.insert("description".into(), Value::String(param.description.clone()));
                }
                if let Some(default) = &param.default {
                    obj.insert("default".into(), default.clone());
                }
            }
            properties.insert(param.name.clone(), property);
            if param.required {
                required.push(Value::String(param.name.clone()));
            }
        }

        let mut schema = Map::new();
        schema.insert("type".into(), Value::String("object".into()));
        schema.insert("properties".into(), Value::Object(properties));
        schema.insert("required".into(), Value::Array(required));
        schema.insert("additionalProperties".into(), Value::Bool(false));
        schema
    }

    /// Introspection view of the schema.
    pub fn descriptor(&self) -> OperationDescriptor {
        OperationDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self
                .parameters
                .iter()
                .map(|p| ParameterDescriptor {
                    name: p.name.clone(),
                    kind: p.kind.to_string(),
                    required: p.required,
                    default: p.default.clone(),
                    allowed: p.kind.allowed().map(<[String]>::to_vec),
                    description: p.description.clone(),
                })
                .collect(),
        }
    }
}

/// Serializable description of an operation for capability discovery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterDescriptor>,
}

/// Serializable description of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}
