use thiserror::Error;

/// Raised when a function's classified codes do not fit the required patterns.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("input code '{code}' of ({params}) does not match pattern {pattern}")]
    InputMismatch {
        code: String,
        pattern: String,
        params: String,
    },

    #[error("output code '{code}' of return type {return_type} does not match pattern {pattern}")]
    OutputMismatch {
        code: char,
        pattern: String,
        return_type: &'static str,
    },

    #[error("invalid code pattern {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Raised when a schema cannot be parsed, or a value does not fit a schema.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    #[error("invalid field expression '{0}', expected name:type")]
    InvalidField(String),

    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("unknown data type '{0}'")]
    UnknownType(String),

    #[error("row {row} has {found} values but the schema has {expected} fields")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("can't convert {value} to {dtype} for field '{field}'")]
    Coerce {
        field: String,
        dtype: String,
        value: String,
    },

    #[cfg(feature = "arrow")]
    #[error("arrow type {0} has no tessera equivalent")]
    UnsupportedArrowType(String),
}

/// Errors raised while registering, resolving or running a Creator.
#[derive(Debug, Error)]
pub enum CreatorError {
    #[error("signature error: {0}")]
    Signature(#[from] SignatureError),

    #[error("schema must {} provided for return type {return_type}", requirement(.required))]
    SchemaContract {
        return_type: &'static str,
        required: bool,
    },

    #[error("{candidate} is not a valid creator: {source}")]
    Interfaceless {
        candidate: String,
        #[source]
        source: Box<CreatorError>,
    },

    #[error("{0} is not a Creator instance")]
    NotACreator(String),

    #[error("'{0}' is not a valid function expression")]
    InvalidExpression(String),

    #[error("no function named '{0}' is registered")]
    UnknownFunction(String),

    #[error("an execution engine parameter was requested but none was supplied")]
    MissingEngine,

    #[error("a dataframe parameter was requested but no dataframe is left to pass")]
    MissingDataFrame,

    #[error("the function returned no data")]
    NoOutput,

    #[error("failed to bind parameters: {0}")]
    Params(#[from] serde_json::Error),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Function(Box<dyn std::error::Error + Send + Sync>),
}

fn requirement(required: &bool) -> &'static str {
    if *required { "be" } else { "not be" }
}

/// Result alias used across the crate.
pub type CreatorResult<T> = Result<T, CreatorError>;
