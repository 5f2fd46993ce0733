//! The Creator extension: produce a single dataframe from parameters.
//!
//! - [`Creator`] is the interface, implemented by hand or through
//!   [`FuncAsCreator`](convert::FuncAsCreator) for plain functions
//! - [`CreatorContext`] carries the engine, params and expected schema of one use
//! - [`CreatorTask`] binds a copy of a Creator to a context
//! - [`convert`] has the decorator and the resolver, [`registry`] the named functions

pub mod convert;
pub mod registry;

use std::sync::Arc;

use crate::core::dataframe::DataFrame;
use crate::core::engine::EngineRef;
use crate::core::error::CreatorResult;
use crate::core::schema::Schema;
use crate::core::{AsAny, ParamDict, ParamValue};

/// Generates a single dataframe from `params`. Reading data from files is a kind of Creator.
///
/// Creators run on the driver side and are engine aware. Before implementing
/// this trait, consider registering a plain function with
/// [`creator`](convert::creator) instead, which keeps the code decoupled from
/// this crate.
pub trait Creator: AsAny + Send + Sync + 'static {
    /// Creates the dataframe.
    ///
    /// The output is not necessarily local, and the implementation may use
    /// engine specific code through `ctx.execution_engine()` at the cost of
    /// portability.
    fn create(&self, ctx: &CreatorContext) -> CreatorResult<Box<dyn DataFrame>>;

    /// The schema declared at registration, if any.
    fn output_schema(&self) -> Option<&Schema> {
        None
    }

    /// Create a boxed clone of this trait object.
    fn clone_box(&self) -> Box<dyn Creator>;
}

impl Clone for Box<dyn Creator> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

impl dyn Creator {
    /// Downcasts to a concrete Creator type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Everything a Creator receives at invocation time.
#[derive(Debug, Clone)]
pub struct CreatorContext {
    engine: EngineRef,
    params: ParamDict,
    output_schema: Option<Schema>,
}

impl CreatorContext {
    pub fn new(engine: EngineRef) -> Self {
        Self {
            engine,
            params: ParamDict::new(),
            output_schema: None,
        }
    }

    /// Replaces the parameter map.
    pub fn with_params(mut self, params: ParamDict) -> Self {
        self.params = params;
        self
    }

    /// Sets a single parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Sets the schema the caller expects the output to have.
    pub fn with_output_schema(mut self, schema: Schema) -> Self {
        self.output_schema = Some(schema);
        self
    }

    pub fn execution_engine(&self) -> &EngineRef {
        &self.engine
    }

    pub fn params(&self) -> &ParamDict {
        &self.params
    }

    pub fn output_schema(&self) -> Option<&Schema> {
        self.output_schema.as_ref()
    }
}

/// A Creator bound to the context of one use.
///
/// Binding always copies the template first, so a template registered in
/// several places never shares per-use state.
pub struct CreatorTask {
    task_id: String,
    context: CreatorContext,
    behaviour: Box<dyn Creator>,
}

impl Clone for CreatorTask {
    fn clone(&self) -> Self {
        Self {
            task_id: self.task_id.clone(),
            context: self.context.clone(),
            behaviour: self.behaviour.clone_box(),
        }
    }
}

impl CreatorTask {
    /// Copies `template` and attaches `context` to the copy.
    pub fn bind(template: &dyn Creator, context: CreatorContext) -> Self {
        let task_id = format!("creator_{}", uuid::Uuid::new_v4().simple());
        log::debug!(
            "Binding creator task '{}' to engine '{}'",
            task_id,
            context.execution_engine().name()
        );
        Self {
            task_id,
            context,
            behaviour: template.clone_box(),
        }
    }

    /// Replaces the autogenerated task id.
    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = task_id.into();
        self
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn execution_engine(&self) -> &EngineRef {
        self.context.execution_engine()
    }

    pub fn params(&self) -> &ParamDict {
        self.context.params()
    }

    /// The expected schema of the context, falling back to the declared one.
    pub fn output_schema(&self) -> Option<&Schema> {
        self.context
            .output_schema()
            .or_else(|| self.behaviour.output_schema())
    }

    pub fn context(&self) -> &CreatorContext {
        &self.context
    }

    pub fn creator(&self) -> &dyn Creator {
        self.behaviour.as_ref()
    }

    /// Runs the bound Creator.
    pub fn run(&self) -> CreatorResult<Box<dyn DataFrame>> {
        self.behaviour.create(&self.context)
    }
}

/// Whether two engine handles are the same engine.
pub fn same_engine(a: &EngineRef, b: &EngineRef) -> bool {
    Arc::ptr_eq(a, b)
}
