use std::fmt::Debug;
use std::sync::Arc;

use crate::core::{AsAny, ParamDict, ParamValue};

/// The handle of the engine a Creator runs against.
///
/// Creators never introspect it: the handle is passed through to functions
/// that ask for it and is otherwise compared only by identity.
pub trait ExecutionEngine: AsAny + Debug + Send + Sync {
    /// A short name for diagnostics.
    fn name(&self) -> &str;

    /// Engine level configuration.
    fn conf(&self) -> &ParamDict;
}

impl dyn ExecutionEngine {
    /// Downcasts to a concrete engine type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Shared engine handle, as passed to functions.
pub type EngineRef = Arc<dyn ExecutionEngine>;

/// An engine that runs everything in the current process.
#[derive(Debug, Clone, Default)]
pub struct NativeExecutionEngine {
    conf: ParamDict,
}

impl NativeExecutionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a configuration entry.
    pub fn with_conf(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.conf.insert(key.into(), value.into());
        self
    }

    /// Wraps the engine into a shareable handle.
    pub fn into_ref(self) -> EngineRef {
        Arc::new(self)
    }
}

impl ExecutionEngine for NativeExecutionEngine {
    fn name(&self) -> &str {
        "native"
    }

    fn conf(&self) -> &ParamDict {
        &self.conf
    }
}
