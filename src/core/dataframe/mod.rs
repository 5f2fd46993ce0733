//! Table collaborators consumed by Creators.
//!
//! - [`DataFrame`] is the object-safe table contract every Creator returns
//! - [`LocalDataFrame`] is the in-memory, row-major implementation
//! - `ArrowDataFrame` (feature `arrow`) wraps a native arrow `RecordBatch`

#[cfg(feature = "arrow")]
pub mod arrow;

use std::collections::HashMap;
use std::fmt::Debug;

use crate::core::error::SchemaError;
use crate::core::schema::Schema;
use crate::core::{AsAny, ParamValue};

/// A structured table with a known schema.
pub trait DataFrame: AsAny + Debug + Send + Sync {
    /// The schema of this dataframe.
    fn schema(&self) -> &Schema;

    /// Number of rows.
    fn count(&self) -> usize;

    /// Whether the data lives in this process.
    fn is_local(&self) -> bool;

    /// Materializes the data as a [`LocalDataFrame`].
    fn as_local(&self) -> Result<LocalDataFrame, SchemaError>;

    /// Create a boxed clone of this trait object.
    fn clone_box(&self) -> Box<dyn DataFrame>;
}

impl Clone for Box<dyn DataFrame> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl dyn DataFrame {
    /// Downcasts to a concrete dataframe type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// An in-memory dataframe holding rows of JSON values.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalDataFrame {
    schema: Schema,
    rows: Vec<Vec<ParamValue>>,
}

impl LocalDataFrame {
    /// Builds a dataframe, coercing every row to `schema`.
    pub fn new(schema: Schema, rows: Vec<Vec<ParamValue>>) -> Result<Self, SchemaError> {
        let rows = rows
            .iter()
            .enumerate()
            .map(|(i, row)| schema.coerce_row(i, row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { schema, rows })
    }

    /// An empty dataframe with the given schema.
    pub fn empty(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Builds a dataframe from keyed records.
    ///
    /// Values are picked by schema field name: missing keys become `null`
    /// and keys outside the schema are ignored.
    pub fn from_records<'a, I>(schema: Schema, records: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = RecordRef<'a>>,
    {
        let rows = records
            .into_iter()
            .map(|record| {
                schema
                    .names()
                    .into_iter()
                    .map(|name| record.get(name).cloned().unwrap_or(ParamValue::Null))
                    .collect()
            })
            .collect();
        Self::new(schema, rows)
    }

    pub fn rows(&self) -> &[Vec<ParamValue>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<ParamValue>> {
        self.rows
    }

    /// Returns the value at `row` in column `name`.
    pub fn value(&self, row: usize, name: &str) -> Option<&ParamValue> {
        let column = self.schema.index_of(name)?;
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

impl DataFrame for LocalDataFrame {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn count(&self) -> usize {
        self.rows.len()
    }

    fn is_local(&self) -> bool {
        true
    }

    fn as_local(&self) -> Result<LocalDataFrame, SchemaError> {
        Ok(self.clone())
    }

    fn clone_box(&self) -> Box<dyn DataFrame> {
        Box::new(self.clone())
    }
}

/// A borrowed keyed record, from either map flavour a function may return.
#[derive(Debug, Clone, Copy)]
pub enum RecordRef<'a> {
    Json(&'a serde_json::Map<String, ParamValue>),
    Hash(&'a HashMap<String, ParamValue>),
}

impl<'a> RecordRef<'a> {
    pub fn get(&self, key: &str) -> Option<&'a ParamValue> {
        match *self {
            RecordRef::Json(map) => map.get(key),
            RecordRef::Hash(map) => map.get(key),
        }
    }
}

impl<'a> From<&'a serde_json::Map<String, ParamValue>> for RecordRef<'a> {
    fn from(map: &'a serde_json::Map<String, ParamValue>) -> Self {
        RecordRef::Json(map)
    }
}

impl<'a> From<&'a HashMap<String, ParamValue>> for RecordRef<'a> {
    fn from(map: &'a HashMap<String, ParamValue>) -> Self {
        RecordRef::Hash(map)
    }
}
