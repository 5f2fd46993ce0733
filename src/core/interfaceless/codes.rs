use serde::de::DeserializeOwned;
use std::collections::{HashMap, VecDeque};
use std::fmt;

use crate::core::dataframe::{DataFrame, LocalDataFrame, RecordRef};
use crate::core::engine::EngineRef;
use crate::core::error::{CreatorError, CreatorResult};
use crate::core::schema::Schema;
use crate::core::{ParamDict, ParamValue};

/// Classification code of a function parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamCode {
    /// The execution engine handle.
    Engine,
    /// A dataframe of any kind.
    DataFrame,
    /// An in-memory dataframe.
    LocalDataFrame,
    /// Anything bound from the parameter map.
    Other,
}

impl ParamCode {
    pub fn as_char(&self) -> char {
        match self {
            ParamCode::Engine => 'e',
            ParamCode::DataFrame => 'd',
            ParamCode::LocalDataFrame => 'l',
            ParamCode::Other => 'x',
        }
    }
}

impl fmt::Display for ParamCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Classification code of a function's return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputCode {
    /// A dataframe of any kind.
    DataFrame,
    /// An in-memory dataframe.
    LocalDataFrame,
    /// Raw rows or records that only become a table with a declared schema.
    SchemaBearing,
    /// A native frame that describes its own schema.
    Native,
    /// The function returns nothing.
    Nothing,
}

impl OutputCode {
    pub fn as_char(&self) -> char {
        match self {
            OutputCode::DataFrame => 'd',
            OutputCode::LocalDataFrame => 'l',
            OutputCode::SchemaBearing => 's',
            OutputCode::Native => 'p',
            OutputCode::Nothing => 'n',
        }
    }
}

impl fmt::Display for OutputCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Everything a wrapped function's arguments can be drawn from.
#[derive(Debug, Default)]
pub struct CallInput {
    pub engine: Option<EngineRef>,
    pub dataframes: VecDeque<Box<dyn DataFrame>>,
    pub params: ParamDict,
}

impl CallInput {
    pub fn new(params: ParamDict) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn with_engine(mut self, engine: EngineRef) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn with_dataframe(mut self, df: Box<dyn DataFrame>) -> Self {
        self.dataframes.push_back(df);
        self
    }
}

/// A type that can appear as a parameter of a wrapped function.
pub trait FunctionArg: Sized {
    const CODE: ParamCode;

    /// Pulls this argument out of the call input.
    fn extract(input: &mut CallInput) -> CreatorResult<Self>;
}

impl FunctionArg for EngineRef {
    const CODE: ParamCode = ParamCode::Engine;

    fn extract(input: &mut CallInput) -> CreatorResult<Self> {
        input.engine.clone().ok_or(CreatorError::MissingEngine)
    }
}

impl FunctionArg for Box<dyn DataFrame> {
    const CODE: ParamCode = ParamCode::DataFrame;

    fn extract(input: &mut CallInput) -> CreatorResult<Self> {
        input.dataframes.pop_front().ok_or(CreatorError::MissingDataFrame)
    }
}

impl FunctionArg for LocalDataFrame {
    const CODE: ParamCode = ParamCode::LocalDataFrame;

    fn extract(input: &mut CallInput) -> CreatorResult<Self> {
        let df = input
            .dataframes
            .pop_front()
            .ok_or(CreatorError::MissingDataFrame)?;
        Ok(df.as_local()?)
    }
}

/// The whole parameter map, unchanged.
impl FunctionArg for ParamDict {
    const CODE: ParamCode = ParamCode::Other;

    fn extract(input: &mut CallInput) -> CreatorResult<Self> {
        Ok(input.params.clone())
    }
}

/// Keyword arguments: the parameter map deserialized into `T`.
///
/// ```rust
/// use serde::Deserialize;
/// use tessera::Params;
///
/// #[derive(Deserialize)]
/// struct Args {
///     x: i64,
/// }
///
/// fn rows(Params(args): Params<Args>) -> Vec<Vec<tessera::ParamValue>> {
///     vec![vec![args.x.into()]]
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Params<T>(pub T);

impl<T> Params<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned> FunctionArg for Params<T> {
    const CODE: ParamCode = ParamCode::Other;

    fn extract(input: &mut CallInput) -> CreatorResult<Self> {
        let map: serde_json::Map<String, ParamValue> = input
            .params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(Params(serde_json::from_value(ParamValue::Object(map))?))
    }
}

/// A type that can be returned by a wrapped function.
pub trait FunctionOutput {
    const CODE: OutputCode;

    /// Turns the raw output into a dataframe. `schema` is set for schema-bearing outputs.
    fn into_dataframe(self, schema: Option<&Schema>) -> CreatorResult<Box<dyn DataFrame>>;
}

fn required_schema(schema: Option<&Schema>) -> Schema {
    schema.cloned().unwrap_or_default()
}

impl FunctionOutput for Box<dyn DataFrame> {
    const CODE: OutputCode = OutputCode::DataFrame;

    fn into_dataframe(self, _schema: Option<&Schema>) -> CreatorResult<Box<dyn DataFrame>> {
        Ok(self)
    }
}

impl FunctionOutput for LocalDataFrame {
    const CODE: OutputCode = OutputCode::LocalDataFrame;

    fn into_dataframe(self, _schema: Option<&Schema>) -> CreatorResult<Box<dyn DataFrame>> {
        Ok(Box::new(self))
    }
}

/// Row-major values.
impl FunctionOutput for Vec<Vec<ParamValue>> {
    const CODE: OutputCode = OutputCode::SchemaBearing;

    fn into_dataframe(self, schema: Option<&Schema>) -> CreatorResult<Box<dyn DataFrame>> {
        Ok(Box::new(LocalDataFrame::new(required_schema(schema), self)?))
    }
}

impl FunctionOutput for Vec<serde_json::Map<String, ParamValue>> {
    const CODE: OutputCode = OutputCode::SchemaBearing;

    fn into_dataframe(self, schema: Option<&Schema>) -> CreatorResult<Box<dyn DataFrame>> {
        let records = self.iter().map(RecordRef::from);
        Ok(Box::new(LocalDataFrame::from_records(required_schema(schema), records)?))
    }
}

/// A single record, producing a one row table.
impl FunctionOutput for serde_json::Map<String, ParamValue> {
    const CODE: OutputCode = OutputCode::SchemaBearing;

    fn into_dataframe(self, schema: Option<&Schema>) -> CreatorResult<Box<dyn DataFrame>> {
        let records = std::iter::once(RecordRef::from(&self));
        Ok(Box::new(LocalDataFrame::from_records(required_schema(schema), records)?))
    }
}

impl FunctionOutput for HashMap<String, ParamValue> {
    const CODE: OutputCode = OutputCode::SchemaBearing;

    fn into_dataframe(self, schema: Option<&Schema>) -> CreatorResult<Box<dyn DataFrame>> {
        let records = std::iter::once(RecordRef::from(&self));
        Ok(Box::new(LocalDataFrame::from_records(required_schema(schema), records)?))
    }
}

#[cfg(feature = "arrow")]
impl FunctionOutput for arrow::array::RecordBatch {
    const CODE: OutputCode = OutputCode::Native;

    fn into_dataframe(self, _schema: Option<&Schema>) -> CreatorResult<Box<dyn DataFrame>> {
        let df = crate::core::dataframe::arrow::ArrowDataFrame::try_new(self)?;
        Ok(Box::new(df))
    }
}

impl FunctionOutput for () {
    const CODE: OutputCode = OutputCode::Nothing;

    fn into_dataframe(self, _schema: Option<&Schema>) -> CreatorResult<Box<dyn DataFrame>> {
        Err(CreatorError::NoOutput)
    }
}

/// Errors returned by the wrapped function are passed through as
/// [`CreatorError::Function`].
impl<T, E> FunctionOutput for Result<T, E>
where
    T: FunctionOutput,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    const CODE: OutputCode = T::CODE;

    fn into_dataframe(self, schema: Option<&Schema>) -> CreatorResult<Box<dyn DataFrame>> {
        self.map_err(|e| CreatorError::Function(e.into()))?
            .into_dataframe(schema)
    }
}
