use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::SchemaError;
use crate::core::ParamValue;

/// The value types a schema field can declare.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Int,
    Double,
    Str,
    Bool,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Double => "double",
            DataType::Str => "str",
            DataType::Bool => "bool",
        }
    }

    /// Converts `value` into this type. `null` fits every type.
    pub fn coerce(&self, field: &str, value: &ParamValue) -> Result<ParamValue, SchemaError> {
        let coerced = match (self, value) {
            (_, ParamValue::Null) => Some(ParamValue::Null),
            (DataType::Int, ParamValue::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(whole_i64))
                .map(ParamValue::from),
            (DataType::Int, ParamValue::String(s)) => {
                s.trim().parse::<i64>().ok().map(ParamValue::from)
            }
            (DataType::Double, ParamValue::Number(n)) => n.as_f64().map(ParamValue::from),
            (DataType::Double, ParamValue::String(s)) => {
                s.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(ParamValue::from)
            }
            (DataType::Str, ParamValue::String(_)) => Some(value.clone()),
            (DataType::Str, ParamValue::Number(n)) => Some(ParamValue::from(n.to_string())),
            (DataType::Str, ParamValue::Bool(b)) => Some(ParamValue::from(b.to_string())),
            (DataType::Bool, ParamValue::Bool(_)) => Some(value.clone()),
            (DataType::Bool, ParamValue::String(s)) => match s.trim() {
                "true" => Some(ParamValue::Bool(true)),
                "false" => Some(ParamValue::Bool(false)),
                _ => None,
            },
            _ => None,
        };

        coerced.ok_or_else(|| SchemaError::Coerce {
            field: field.to_string(),
            dtype: self.to_string(),
            value: value.to_string(),
        })
    }
}

/// `f` as an i64, if it is a whole number the type can hold exactly.
fn whole_i64(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" | "long" | "int64" => Ok(DataType::Int),
            "double" | "float" | "float64" => Ok(DataType::Double),
            "str" | "string" => Ok(DataType::Str),
            "bool" | "boolean" => Ok(DataType::Bool),
            other => Err(SchemaError::UnknownType(other.to_string())),
        }
    }
}

/// A single named column of a schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub dtype: DataType,
}

impl Field {
    pub fn new(name: impl Into<String>, dtype: DataType) -> Self {
        Self {
            name: name.into(),
            dtype,
        }
    }
}

/// An ordered table schema. A schema with no fields means "unspecified".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, rejecting names that are already taken.
    pub fn field(mut self, name: impl Into<String>, dtype: DataType) -> Result<Self, SchemaError> {
        let name = name.into();
        if self.index_of(&name).is_some() {
            return Err(SchemaError::DuplicateField(name));
        }
        self.fields.push(Field::new(name, dtype));
        Ok(self)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Validates a row's width and coerces every cell to its field type.
    pub fn coerce_row(&self, row_index: usize, row: &[ParamValue]) -> Result<Vec<ParamValue>, SchemaError> {
        if row.len() != self.fields.len() {
            return Err(SchemaError::ColumnCount {
                row: row_index,
                expected: self.fields.len(),
                found: row.len(),
            });
        }
        self.fields
            .iter()
            .zip(row)
            .map(|(field, value)| field.dtype.coerce(&field.name, value))
            .collect()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|field| format!("{}:{}", field.name, field.dtype))
            .collect();
        f.write_str(&parts.join(","))
    }
}

impl FromStr for Schema {
    type Err = SchemaError;

    /// Parses shorthand syntax: "a:int,b:str"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .try_fold(Schema::new(), |schema, part| {
                let (name, dtype) = part
                    .split_once(':')
                    .ok_or_else(|| SchemaError::InvalidField(part.to_string()))?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(SchemaError::InvalidField(part.to_string()));
                }
                schema.field(name, dtype.parse()?)
            })
    }
}

/// Anything a schema can be built from: a literal, another schema, or nothing.
pub trait IntoSchema {
    fn into_schema(self) -> Result<Schema, SchemaError>;
}

impl IntoSchema for Schema {
    fn into_schema(self) -> Result<Schema, SchemaError> {
        Ok(self)
    }
}

impl IntoSchema for &Schema {
    fn into_schema(self) -> Result<Schema, SchemaError> {
        Ok(self.clone())
    }
}

impl IntoSchema for &str {
    fn into_schema(self) -> Result<Schema, SchemaError> {
        self.parse()
    }
}

impl IntoSchema for String {
    fn into_schema(self) -> Result<Schema, SchemaError> {
        self.parse()
    }
}

impl IntoSchema for () {
    fn into_schema(self) -> Result<Schema, SchemaError> {
        Ok(Schema::new())
    }
}

impl<S: IntoSchema> IntoSchema for Option<S> {
    fn into_schema(self) -> Result<Schema, SchemaError> {
        self.map_or_else(|| Ok(Schema::new()), IntoSchema::into_schema)
    }
}
