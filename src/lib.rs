//! # Tessera
//!
//! Register plain Rust functions as table [`Creator`]s, without implementing
//! the interface by hand.
//!
//! ## Features
//!
//! - **Static signature classification**: every parameter and return type carries
//!   a one character code, checked once at registration against the shapes a
//!   Creator accepts
//! - **Schema contracts**: functions returning raw rows or records must be
//!   registered with a schema, everything else must not
//! - **Two registration styles**: the [`creator`] decorator, and the
//!   [`to_creator`] resolver for instances, functions, and registered names
//! - **Duplicate-before-bind**: templates are copied per use, never shared
//!
//! ## Quick Start
//!
//! ```rust
//! use tessera::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Args {
//!     n: i64,
//! }
//!
//! // Declare the logic as a plain function
//! fn numbers(_engine: EngineRef, Params(args): Params<Args>) -> Vec<Vec<ParamValue>> {
//!     (0..args.n).map(|i| vec![i.into()]).collect()
//! }
//!
//! // Register it, then run it against a context
//! let numbers = creator("i:int").decorate(numbers).unwrap();
//! let ctx = CreatorContext::new(NativeExecutionEngine::new().into_ref()).with_param("n", 3);
//! let task = CreatorTask::bind(&numbers, ctx);
//! assert_eq!(task.run().unwrap().count(), 3);
//! ```
//!
//! ## Module Organization
//!
//! - [`interfaceless`]: codes, signatures and the function wrapper
//! - [`prelude`]: Commonly used types and traits (import with `use tessera::prelude::*`)

// ============================================================================
// Core Module
// ============================================================================

mod core;

// ============================================================================
// Public Re-exports - Granular Imports
// ============================================================================

// Creator
pub use core::creator::convert::{
    creator, to_creator, to_creator_in, CreatorCandidate, CreatorDecorator, FuncAsCreator,
    CREATOR_INPUT_PATTERN, CREATOR_OUTPUT_PATTERN,
};
pub use core::creator::registry::{
    normalize_expression, register_global_creator, register_global_function, CreatorFactory,
    FnFactory, FunctionRegistry, RegistryEntry,
};
pub use core::creator::{same_engine, Creator, CreatorContext, CreatorTask};

// Collaborators
#[cfg(feature = "arrow")]
pub use core::dataframe::arrow::ArrowDataFrame;
pub use core::dataframe::{DataFrame, LocalDataFrame, RecordRef};
pub use core::engine::{EngineRef, ExecutionEngine, NativeExecutionEngine};
pub use core::schema::{DataType, Field, IntoSchema, Schema};
pub use core::{AsAny, ParamDict, ParamValue};

// Errors
pub use core::error::{CreatorError, CreatorResult, SchemaError, SignatureError};

// Interfaceless
pub use core::interfaceless::Params;

/// Signature classification and function wrapping, independent of the Creator interface.
pub mod interfaceless {
    pub use crate::core::interfaceless::{
        classify, CallInput, CodePattern, ContextFn, FunctionArg, FunctionOutput, FunctionSignature,
        FunctionWrapper, OutputCode, ParamCode, Params,
    };
}

// ============================================================================
// Prelude Module - Convenient Bulk Imports
// ============================================================================

/// The main prelude: imports everything needed to register and run Creators.
///
/// # Example
/// ```rust
/// use tessera::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        creator,
        to_creator,
        to_creator_in,
        // Creator
        Creator,
        CreatorCandidate,
        CreatorContext,
        CreatorError,
        CreatorResult,
        CreatorTask,
        // Collaborators
        DataFrame,
        EngineRef,
        ExecutionEngine,
        FuncAsCreator,
        FunctionRegistry,
        LocalDataFrame,
        NativeExecutionEngine,
        ParamDict,
        ParamValue,
        Params,
        Schema,
    };
}

// ============================================================================
// Re-export commonly used external types for convenience
// ============================================================================

pub use serde_json::Value as JsonValue;

// ============================================================================
// Library Metadata
// ============================================================================

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");
