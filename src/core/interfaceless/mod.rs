//! Interfaceless support: turning plain functions into extension instances.
//!
//! A function's parameter types and return type each carry a one character
//! code ([`ParamCode`], [`OutputCode`]). The codes are collected once into a
//! [`FunctionSignature`] and matched against a pair of patterns, so every
//! extension kind only has to state which shapes it accepts:
//!
//! | code | parameter                 | return                              |
//! |------|---------------------------|-------------------------------------|
//! | `e`  | `EngineRef`               |                                     |
//! | `d`  | `Box<dyn DataFrame>`      | `Box<dyn DataFrame>`                |
//! | `l`  | `LocalDataFrame`          | `LocalDataFrame`                    |
//! | `x`  | `Params<T>`, `ParamDict`  |                                     |
//! | `s`  |                           | rows or records, needs a schema     |
//! | `p`  |                           | arrow `RecordBatch`                 |
//! | `n`  |                           | `()`                                |

pub mod codes;
pub mod signature;
pub mod wrapper;

pub use codes::{CallInput, FunctionArg, FunctionOutput, OutputCode, ParamCode, Params};
pub use signature::{classify, CodePattern, FunctionSignature};
pub use wrapper::{ContextFn, FunctionWrapper};
