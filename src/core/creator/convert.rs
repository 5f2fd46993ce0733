use std::fmt;

use crate::core::creator::registry::{CreatorFactory, FnFactory, FunctionRegistry, RegistryEntry};
use crate::core::creator::{Creator, CreatorContext};
use crate::core::dataframe::DataFrame;
use crate::core::error::{CreatorError, CreatorResult};
use crate::core::interfaceless::{
    CallInput, ContextFn, FunctionSignature, FunctionWrapper, OutputCode, ParamCode,
};
use crate::core::schema::{IntoSchema, Schema};

/// Parameter shapes a Creator function may have: an optional leading engine, then keyword arguments.
pub const CREATOR_INPUT_PATTERN: &str = "^e?x*$";

/// Return shapes a Creator function may have.
pub const CREATOR_OUTPUT_PATTERN: &str = "^[dlsp]$";

/// A plain function adapted to the [`Creator`] interface.
pub struct FuncAsCreator<F, Args> {
    wrapper: FunctionWrapper<F, Args>,
    needs_engine: bool,
    needs_output_schema: bool,
    output_schema: Option<Schema>,
}

impl<F: Clone, Args> Clone for FuncAsCreator<F, Args> {
    fn clone(&self) -> Self {
        Self {
            wrapper: self.wrapper.clone(),
            needs_engine: self.needs_engine,
            needs_output_schema: self.needs_output_schema,
            output_schema: self.output_schema.clone(),
        }
    }
}

impl<F, Args> fmt::Debug for FuncAsCreator<F, Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FuncAsCreator")
            .field("wrapper", &self.wrapper)
            .field("needs_engine", &self.needs_engine)
            .field("needs_output_schema", &self.needs_output_schema)
            .field("output_schema", &self.output_schema)
            .finish()
    }
}

impl<F, Args> FuncAsCreator<F, Args>
where
    F: ContextFn<Args>,
{
    /// Classifies `func` and checks `schema` against its return type.
    ///
    /// Schema-bearing returns (rows, records) require a non-empty schema,
    /// every other return type forbids one.
    pub fn from_func(func: F, schema: impl IntoSchema) -> CreatorResult<Self> {
        let wrapper = FunctionWrapper::new(func, CREATOR_INPUT_PATTERN, CREATOR_OUTPUT_PATTERN)?;
        let schema = schema.into_schema()?;
        let signature = wrapper.signature();
        let needs_engine = signature.inputs.first() == Some(&ParamCode::Engine);
        let needs_output_schema = signature.output == OutputCode::SchemaBearing;

        if schema.is_empty() == needs_output_schema {
            return Err(CreatorError::SchemaContract {
                return_type: wrapper.return_type(),
                required: needs_output_schema,
            });
        }

        Ok(Self {
            needs_engine,
            needs_output_schema,
            output_schema: needs_output_schema.then_some(schema),
            wrapper,
        })
    }

    pub fn needs_engine(&self) -> bool {
        self.needs_engine
    }

    pub fn needs_output_schema(&self) -> bool {
        self.needs_output_schema
    }

    pub fn signature(&self) -> &FunctionSignature {
        self.wrapper.signature()
    }

    /// Builds the call input for `ctx`: the engine goes first iff the function asks for it,
    /// and the params become keyword arguments.
    pub fn call_input(&self, ctx: &CreatorContext) -> CallInput {
        let input = CallInput::new(ctx.params().clone());
        if self.needs_engine {
            input.with_engine(ctx.execution_engine().clone())
        } else {
            input
        }
    }

    /// Calls the original function directly, bypassing the Creator contract.
    pub fn call(&self, args: Args) -> F::Output {
        self.wrapper.call(args)
    }
}

impl<F, Args> Creator for FuncAsCreator<F, Args>
where
    F: ContextFn<Args>,
    Args: 'static,
{
    fn create(&self, ctx: &CreatorContext) -> CreatorResult<Box<dyn DataFrame>> {
        let schema = if self.needs_output_schema {
            self.output_schema.as_ref()
        } else {
            None
        };
        self.wrapper.run(self.call_input(ctx), schema)
    }

    fn output_schema(&self) -> Option<&Schema> {
        self.output_schema.as_ref()
    }

    fn clone_box(&self) -> Box<dyn Creator> {
        Box::new(self.clone())
    }
}

/// Decorator form: `creator(schema).decorate(func)`.
///
/// ```rust
/// use tessera::{creator, ParamValue};
///
/// fn numbers() -> Vec<Vec<ParamValue>> {
///     vec![vec![1.into()], vec![2.into()]]
/// }
///
/// let numbers = creator("n:int").decorate(numbers).unwrap();
/// assert!(numbers.needs_output_schema());
/// ```
pub fn creator(schema: impl IntoSchema) -> CreatorDecorator {
    CreatorDecorator {
        schema: schema.into_schema(),
    }
}

/// Holds the declared schema until the function is known.
#[derive(Debug, Clone)]
pub struct CreatorDecorator {
    schema: Result<Schema, crate::core::error::SchemaError>,
}

impl CreatorDecorator {
    pub fn decorate<F, Args>(self, func: F) -> CreatorResult<FuncAsCreator<F, Args>>
    where
        F: ContextFn<Args>,
    {
        FuncAsCreator::from_func(func, self.schema?)
    }
}

/// Shorthand for [`creator`]: `creator!(func)` or `creator!(func, schema = "a:int")`.
#[macro_export]
macro_rules! creator {
    ($func:expr) => {
        $crate::creator(()).decorate($func)
    };
    ($func:expr, schema = $schema:expr) => {
        $crate::creator($schema).decorate($func)
    };
}

/// The forms [`to_creator`] accepts.
pub enum CreatorCandidate {
    /// An existing Creator instance.
    Instance(Box<dyn Creator>),
    /// An expression naming a registered function or Creator.
    Expression(String),
    /// A function not registered anywhere.
    Callable(Box<dyn CreatorFactory>),
}

impl CreatorCandidate {
    pub fn instance<C: Creator>(creator: C) -> Self {
        CreatorCandidate::Instance(Box::new(creator))
    }

    pub fn callable<F, Args>(func: F) -> Self
    where
        F: ContextFn<Args>,
        Args: 'static,
    {
        CreatorCandidate::Callable(Box::new(FnFactory::new(func)))
    }
}

impl fmt::Display for CreatorCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreatorCandidate::Instance(_) => write!(f, "Creator instance"),
            CreatorCandidate::Expression(expr) => write!(f, "'{}'", expr),
            CreatorCandidate::Callable(factory) => write!(f, "function {}", factory.type_name()),
        }
    }
}

impl From<&str> for CreatorCandidate {
    fn from(expr: &str) -> Self {
        CreatorCandidate::Expression(expr.to_string())
    }
}

impl From<String> for CreatorCandidate {
    fn from(expr: String) -> Self {
        CreatorCandidate::Expression(expr)
    }
}

impl From<Box<dyn Creator>> for CreatorCandidate {
    fn from(creator: Box<dyn Creator>) -> Self {
        CreatorCandidate::Instance(creator)
    }
}

impl From<&dyn Creator> for CreatorCandidate {
    fn from(creator: &dyn Creator) -> Self {
        CreatorCandidate::Instance(creator.clone_box())
    }
}

/// One way of reading a candidate as a Creator.
type Attempt = fn(&FunctionRegistry, &CreatorCandidate, &Schema) -> CreatorResult<Box<dyn Creator>>;

/// Attempts in priority order; the first success wins.
const ATTEMPTS: [Attempt; 2] = [as_instance, as_function];

fn as_instance(_: &FunctionRegistry, candidate: &CreatorCandidate, _: &Schema) -> CreatorResult<Box<dyn Creator>> {
    match candidate {
        CreatorCandidate::Instance(creator) => Ok(creator.clone_box()),
        other => Err(CreatorError::NotACreator(other.to_string())),
    }
}

fn as_function(
    registry: &FunctionRegistry,
    candidate: &CreatorCandidate,
    schema: &Schema,
) -> CreatorResult<Box<dyn Creator>> {
    match candidate {
        CreatorCandidate::Instance(_) => Err(CreatorError::NotACreator(candidate.to_string())),
        CreatorCandidate::Callable(factory) => factory.build(schema),
        CreatorCandidate::Expression(expr) => match registry.get(expr)? {
            RegistryEntry::Creator(creator) => Ok(creator.clone_box()),
            RegistryEntry::Function(factory) => factory.build(schema),
        },
    }
}

/// Resolves `candidate` against `registry`, returning a fresh Creator.
///
/// Instances (and registered Creators) are copied, never shared. When no form
/// applies the error names the candidate and carries the last failure.
pub fn to_creator_in(
    registry: &FunctionRegistry,
    candidate: impl Into<CreatorCandidate>,
    schema: impl IntoSchema,
) -> CreatorResult<Box<dyn Creator>> {
    let candidate = candidate.into();
    let schema = match schema.into_schema() {
        Ok(schema) => schema,
        Err(e) => return Err(interfaceless(&candidate, e.into())),
    };

    let mut last_error = None;
    for attempt in ATTEMPTS {
        match attempt(registry, &candidate, &schema) {
            Ok(creator) => return Ok(creator),
            Err(e) => {
                log::debug!("{} did not resolve: {}", candidate, e);
                last_error = Some(e);
            }
        }
    }

    let source = last_error.unwrap_or_else(|| CreatorError::NotACreator(candidate.to_string()));
    Err(interfaceless(&candidate, source))
}

/// [`to_creator_in`] against the global registry.
pub fn to_creator(candidate: impl Into<CreatorCandidate>, schema: impl IntoSchema) -> CreatorResult<Box<dyn Creator>> {
    to_creator_in(&FunctionRegistry::read_global(), candidate, schema)
}

fn interfaceless(candidate: &CreatorCandidate, source: CreatorError) -> CreatorError {
    CreatorError::Interfaceless {
        candidate: candidate.to_string(),
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dataframe::LocalDataFrame;
    use crate::core::engine::{EngineRef, NativeExecutionEngine};
    use crate::core::interfaceless::Params;
    use crate::core::{ParamDict, ParamValue};
    use serde_json::json;

    fn frame(_e: EngineRef, p: ParamDict) -> LocalDataFrame {
        let schema: Schema = "x:int".parse().unwrap();
        LocalDataFrame::new(schema, vec![vec![p.get("x").cloned().unwrap_or_default()]]).unwrap()
    }

    fn record(Params(x): Params<ParamValue>) -> serde_json::Map<String, ParamValue> {
        x.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_from_func_flags() {
        let f = FuncAsCreator::from_func(frame, ()).unwrap();
        assert!(f.needs_engine());
        assert!(!f.needs_output_schema());
        assert!(f.output_schema.is_none());

        let g = FuncAsCreator::from_func(record, "a:int").unwrap();
        assert!(!g.needs_engine());
        assert!(g.needs_output_schema());
        assert_eq!(Creator::output_schema(&g).unwrap().to_string(), "a:int");
    }

    #[test]
    fn test_schema_contract() {
        assert!(matches!(
            FuncAsCreator::from_func(frame, "a:int"),
            Err(CreatorError::SchemaContract { required: false, .. })
        ));
        assert!(matches!(
            FuncAsCreator::from_func(record, ()),
            Err(CreatorError::SchemaContract { required: true, .. })
        ));
        assert!(matches!(
            FuncAsCreator::from_func(record, "a:nope"),
            Err(CreatorError::Schema(_))
        ));
    }

    #[test]
    fn test_call_input_places_engine_only_when_needed() {
        let engine = NativeExecutionEngine::new().into_ref();
        let ctx = CreatorContext::new(engine).with_param("x", 5);

        let f = FuncAsCreator::from_func(frame, ()).unwrap();
        assert!(f.call_input(&ctx).engine.is_some());

        let g = FuncAsCreator::from_func(record, "a:int").unwrap();
        let input = g.call_input(&ctx);
        assert!(input.engine.is_none());
        assert_eq!(input.params.get("x"), Some(&json!(5)));
    }

    #[test]
    fn test_create_coerces_schema_bearing_output() {
        let engine = NativeExecutionEngine::new().into_ref();
        let ctx = CreatorContext::new(engine)
            .with_param("a", "1")
            .with_param("b", 2);
        let g = FuncAsCreator::from_func(record, "a:int,b:str").unwrap();
        let df = g.create(&ctx).unwrap().as_local().unwrap();
        assert_eq!(df.rows(), &[vec![json!(1), json!("2")]]);
    }

    #[test]
    fn test_decorator_reports_bad_schema_on_decorate() {
        assert!(matches!(
            creator("a").decorate(record),
            Err(CreatorError::Schema(_))
        ));
        assert!(creator(None::<Schema>).decorate(frame).is_ok());
    }

    #[test]
    fn test_candidate_display() {
        assert_eq!(CreatorCandidate::from("io.read").to_string(), "'io.read'");
        assert!(CreatorCandidate::callable(frame).to_string().starts_with("function "));
    }

    #[test]
    fn test_bad_schema_is_interfaceless() {
        let registry = FunctionRegistry::new();
        let result = to_creator_in(&registry, CreatorCandidate::callable(record), "a");
        let Err(CreatorError::Interfaceless { source, .. }) = result else {
            panic!("expected an interfaceless error");
        };
        assert!(matches!(*source, CreatorError::Schema(_)));
    }
}
