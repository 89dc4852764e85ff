//! Argument validation and coercion.
//!
//! [`validate`] checks an untyped argument bag against a [`Schema`]:
//! presence of required parameters, type compatibility (with lenient
//! coercion of numeric and boolean strings), enum membership, and the
//! absence of undeclared keys. The output is an ordered [`Arguments`] set.

use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use thiserror::Error;

use super::error::ToolFailure;
use super::schema::{ParamType, Schema};

/// Reasons an argument bag is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing argument: {0}")]
    MissingArgument(String),

    #[error("invalid type for argument {name}: expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("invalid value for argument {name}: {value} (allowed: {})", allowed.join(", "))]
    InvalidEnumValue {
        name: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("unknown argument: {0}")]
    UnknownArgument(String),
}

impl ValidationError {
    /// Name of the offending parameter.
    pub fn parameter(&self) -> &str {
        match self {
            Self::MissingArgument(name) | Self::UnknownArgument(name) => name,
            Self::TypeMismatch { name, .. } | Self::InvalidEnumValue { name, .. } => name,
        }
    }
}

/// A coerced argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    /// A member of an enumerated literal set.
    Literal(String),
    Mapping(Map<String, Value>),
    Sequence(Vec<ArgValue>),
}

impl ArgValue {
    /// Convert back to a JSON value.
    pub fn into_json(self) -> Value {
        match self {
            Self::Integer(i) => Value::from(i),
            Self::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            Self::Boolean(b) => Value::Bool(b),
            Self::String(s) | Self::Literal(s) => Value::String(s),
            Self::Mapping(m) => Value::Object(m),
            Self::Sequence(items) => Value::Array(items.into_iter().map(Self::into_json).collect()),
        }
    }

    fn to_json(&self) -> Value {
        self.clone().into_json()
    }
}

/// Typed arguments in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Vec<(String, ArgValue)>,
}

impl Arguments {
    /// Look up an argument. Optional parameters without a default may be absent.
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Iterate over `(name, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The arguments as a JSON object.
    pub fn to_object(&self) -> Map<String, Value> {
        self.values
            .iter()
            .map(|(n, v)| (n.clone(), v.to_json()))
            .collect()
    }

    /// Deserialize into a handler's parameter struct.
    ///
    /// The arguments already conform to the schema, so a failure here means
    /// the struct and the schema disagree.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ToolFailure> {
        serde_json::from_value(Value::Object(self.to_object()))
            .map_err(|e| ToolFailure::internal(format!("argument binding failed: {}", e)))
    }
}

/// Validate a raw argument bag against a schema.
pub fn validate(schema: &Schema, raw: &Map<String, Value>) -> Result<Arguments, ValidationError> {
    let mut values = Vec::with_capacity(schema.parameters().len());

    for param in schema.parameters() {
        match raw.get(&param.name) {
            Some(value) if !(value.is_null() && !param.required) => {
                let coerced = coerce(&param.name, &param.kind, value)?;
                values.push((param.name.clone(), coerced));
            }
            _ if param.required => {
                return Err(ValidationError::MissingArgument(param.name.clone()));
            }
            _ => {
                if let Some(default) = &param.default {
                    let coerced = coerce(&param.name, &param.kind, default)?;
                    values.push((param.name.clone(), coerced));
                }
            }
        }
    }

    if let Some(unknown) = raw.keys().find(|k| schema.parameter(k).is_none()) {
        return Err(ValidationError::UnknownArgument(unknown.clone()));
    }

    Ok(Arguments { values })
}

/// Coerce one value to a declared type.
pub(crate) fn coerce(name: &str, kind: &ParamType, value: &Value) -> Result<ArgValue, ValidationError> {
    let mismatch = || ValidationError::TypeMismatch {
        name: name.to_string(),
        expected: kind.to_string(),
        actual: json_type(value).to_string(),
    };

    match kind {
        ParamType::Integer => match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(integral))
                .map(ArgValue::Integer)
                .ok_or_else(mismatch),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .ok()
                .or_else(|| s.trim().parse::<f64>().ok().and_then(integral))
                .map(ArgValue::Integer)
                .ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
        ParamType::Float => match value {
            Value::Number(n) => n.as_f64().map(ArgValue::Float).ok_or_else(mismatch),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(ArgValue::Float)
                .ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
        ParamType::Boolean => match value {
            Value::Bool(b) => Ok(ArgValue::Boolean(*b)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(ArgValue::Boolean(true)),
                "false" | "0" => Ok(ArgValue::Boolean(false)),
                _ => Err(mismatch()),
            },
            _ => Err(mismatch()),
        },
        ParamType::String => match value {
            Value::String(s) => Ok(ArgValue::String(s.clone())),
            _ => Err(mismatch()),
        },
        ParamType::Enum(allowed) => match value {
            Value::String(s) if allowed.iter().any(|a| a == s) => Ok(ArgValue::Literal(s.clone())),
            Value::String(s) => Err(ValidationError::InvalidEnumValue {
                name: name.to_string(),
                value: s.clone(),
                allowed: allowed.clone(),
            }),
            _ => Err(mismatch()),
        },
        ParamType::Mapping => match value {
            Value::Object(map) => Ok(ArgValue::Mapping(map.clone())),
            _ => Err(mismatch()),
        },
        ParamType::Sequence(item) => match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| coerce(&format!("{}[{}]", name, i), item, v))
                .collect::<Result<Vec<_>, _>>()
                .map(ArgValue::Sequence),
            _ => Err(mismatch()),
        },
    }
}

fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::schema::ParameterSpec;
    use serde::Deserialize;
    use serde_json::json;

    fn temperature_schema() -> Schema {
        let units = ["celsius", "fahrenheit", "kelvin"];
        Schema::new(
            "convert_temperature",
            "",
            vec![
                ParameterSpec::required("value", ParamType::Float),
                ParameterSpec::required("from_unit", ParamType::one_of(units)),
                ParameterSpec::required("to_unit", ParamType::one_of(units)),
            ],
        )
        .unwrap()
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_validate_success_in_schema_order() {
        let out = validate(
            &temperature_schema(),
            &args(json!({ "to_unit": "celsius", "value": 32, "from_unit": "fahrenheit" })),
        )
        .unwrap();
        let names: Vec<_> = out.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["value", "from_unit", "to_unit"]);
        assert_eq!(out.get("value"), Some(&ArgValue::Float(32.0)));
        assert_eq!(out.get("to_unit"), Some(&ArgValue::Literal("celsius".into())));
    }

    #[test]
    fn test_missing_required_argument() {
        let err = validate(
            &temperature_schema(),
            &args(json!({ "value": 32, "from_unit": "fahrenheit" })),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingArgument("to_unit".into()));
        assert_eq!(err.to_string(), "missing argument: to_unit");
    }

    #[test]
    fn test_invalid_enum_value() {
        let err = validate(
            &temperature_schema(),
            &args(json!({ "value": 1, "from_unit": "rankine", "to_unit": "celsius" })),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidEnumValue { ref name, .. } if name == "from_unit"));
        assert!(err.to_string().contains("from_unit"));
    }

    #[test]
    fn test_unknown_argument_rejected() {
        let err = validate(
            &temperature_schema(),
            &args(json!({ "value": 1, "from_unit": "kelvin", "to_unit": "celsius", "precision": 3 })),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::UnknownArgument("precision".into()));
    }

    #[test]
    fn test_defaults_substituted() {
        let schema = Schema::new(
            "tip",
            "",
            vec![
                ParameterSpec::required("bill_amount", ParamType::Float),
                ParameterSpec::optional("tip_percent", ParamType::Float).with_default(18),
                ParameterSpec::optional("split_ways", ParamType::Integer).with_default(1),
                ParameterSpec::optional("note", ParamType::String),
            ],
        )
        .unwrap();
        let out = validate(&schema, &args(json!({ "bill_amount": 50, "note": null }))).unwrap();
        assert_eq!(out.get("tip_percent"), Some(&ArgValue::Float(18.0)));
        assert_eq!(out.get("split_ways"), Some(&ArgValue::Integer(1)));
        assert_eq!(out.get("note"), None);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_numeric_string_coercion() {
        assert_eq!(coerce("n", &ParamType::Integer, &json!("42")).unwrap(), ArgValue::Integer(42));
        assert_eq!(coerce("n", &ParamType::Integer, &json!(7.0)).unwrap(), ArgValue::Integer(7));
        assert_eq!(coerce("f", &ParamType::Float, &json!(" 2.5 ")).unwrap(), ArgValue::Float(2.5));
        assert_eq!(coerce("b", &ParamType::Boolean, &json!("TRUE")).unwrap(), ArgValue::Boolean(true));
    }

    #[test]
    fn test_type_mismatch_names_parameter() {
        let err = coerce("visits", &ParamType::Integer, &json!("many")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                name: "visits".into(),
                expected: "integer".into(),
                actual: "string".into(),
            }
        );
        assert!(coerce("n", &ParamType::Integer, &json!(1.5)).is_err());
        assert!(coerce("s", &ParamType::String, &json!(3)).is_err());
        assert!(coerce("f", &ParamType::Float, &json!("NaN")).is_err());
    }

    #[test]
    fn test_null_required_is_mismatch() {
        let err = validate(
            &temperature_schema(),
            &args(json!({ "value": null, "from_unit": "kelvin", "to_unit": "celsius" })),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { ref actual, .. } if actual == "null"));
    }

    #[test]
    fn test_sequence_items_coerced_with_path() {
        let kind = ParamType::sequence_of(ParamType::Float);
        assert_eq!(
            coerce("values", &kind, &json!([1, "2.5"])).unwrap(),
            ArgValue::Sequence(vec![ArgValue::Float(1.0), ArgValue::Float(2.5)])
        );
        let err = coerce("values", &kind, &json!([1, true])).unwrap_err();
        assert_eq!(err.parameter(), "values[1]");
    }

    #[test]
    fn test_parse_into_struct() {
        #[derive(Deserialize)]
        struct Params {
            value: f64,
            to_unit: String,
        }

        let out = validate(
            &temperature_schema(),
            &args(json!({ "value": "100", "from_unit": "celsius", "to_unit": "kelvin" })),
        )
        .unwrap();
        let params: Params = out.parse().unwrap();
        assert_eq!(params.value, 100.0);
        assert_eq!(params.to_unit, "kelvin");
    }

    #[test]
    fn test_validation_is_deterministic() {
        let schema = temperature_schema();
        let raw = args(json!({ "value": 10, "from_unit": "kelvin", "to_unit": "celsius" }));
        assert_eq!(validate(&schema, &raw), validate(&schema, &raw));
    }
}
