//! Resolving instances, functions and registered names into Creators.

use serde_json::json;
use tessera::prelude::*;
use tessera::{register_global_function, SignatureError};

#[derive(Clone, Debug, PartialEq)]
struct Fixed {
    schema: Schema,
    value: i64,
}

impl Creator for Fixed {
    fn create(&self, _ctx: &CreatorContext) -> CreatorResult<Box<dyn DataFrame>> {
        let df = LocalDataFrame::new(self.schema.clone(), vec![vec![json!(self.value)]])?;
        Ok(Box::new(df))
    }

    fn output_schema(&self) -> Option<&Schema> {
        Some(&self.schema)
    }

    fn clone_box(&self) -> Box<dyn Creator> {
        Box::new(self.clone())
    }
}

fn fixed() -> Fixed {
    Fixed {
        schema: "v:int".parse().unwrap(),
        value: 7,
    }
}

fn ctx() -> CreatorContext {
    CreatorContext::new(NativeExecutionEngine::new().into_ref())
}

fn rows(dict: ParamDict) -> Vec<Vec<ParamValue>> {
    vec![vec![dict.get("a").cloned().unwrap_or(json!(0))]]
}

fn frame(_e: EngineRef) -> LocalDataFrame {
    LocalDataFrame::empty("z:str".parse().unwrap())
}

fn transform(df: LocalDataFrame) -> LocalDataFrame {
    df
}

fn source_error(err: CreatorError) -> CreatorError {
    match err {
        CreatorError::Interfaceless { source, .. } => *source,
        other => panic!("expected an interfaceless error, got {other}"),
    }
}

fn resolve_err(
    registry: &FunctionRegistry,
    candidate: impl Into<CreatorCandidate>,
    schema: &str,
) -> CreatorError {
    match to_creator_in(registry, candidate, schema) {
        Err(e) => e,
        Ok(_) => panic!("resolution should have failed"),
    }
}

#[test]
fn test_instance_resolves_to_a_copy() {
    let original = fixed();
    let registry = FunctionRegistry::new();
    let resolved = to_creator_in(&registry, CreatorCandidate::instance(original.clone()), ()).unwrap();

    let copy = resolved.downcast_ref::<Fixed>().unwrap();
    assert_eq!(copy, &original);
    assert!(!std::ptr::eq(copy, &original));
    assert_eq!(resolved.output_schema(), original.output_schema());
}

#[test]
fn test_instance_ignores_schema_argument() {
    let registry = FunctionRegistry::new();
    let template: Box<dyn Creator> = Box::new(fixed());
    let resolved = to_creator_in(&registry, &*template, "other:str").unwrap();
    assert_eq!(resolved.output_schema().unwrap().to_string(), "v:int");
}

type FrameFn = fn(EngineRef) -> LocalDataFrame;

#[test]
fn test_decorated_function_resolves_to_a_copy() {
    let registry = FunctionRegistry::new();
    let decorated = creator(()).decorate(frame as FrameFn).unwrap();
    let resolved = to_creator_in(&registry, CreatorCandidate::instance(decorated.clone()), ()).unwrap();

    let copy = resolved
        .downcast_ref::<FuncAsCreator<FrameFn, (EngineRef,)>>()
        .unwrap();
    assert!(!std::ptr::eq(copy, &decorated));
    assert!(copy.needs_engine());
    assert_eq!(copy.needs_output_schema(), decorated.needs_output_schema());
    assert_eq!(copy.signature(), decorated.signature());
    assert!(resolved.output_schema().is_none());

    let df = resolved.create(&ctx()).unwrap();
    assert_eq!(df.schema().to_string(), "z:str");
}

#[test]
fn test_callable_is_wrapped_with_schema() {
    let registry = FunctionRegistry::new();
    let resolved = to_creator_in(&registry, CreatorCandidate::callable(rows), "a:int").unwrap();
    assert_eq!(resolved.output_schema().unwrap().to_string(), "a:int");

    let df = resolved.create(&ctx().with_param("a", "12")).unwrap();
    assert_eq!(df.as_local().unwrap().value(0, "a"), Some(&json!(12)));
}

#[test]
fn test_callable_without_required_schema_fails() {
    let registry = FunctionRegistry::new();
    let err = resolve_err(&registry, CreatorCandidate::callable(rows), "");
    assert!(err.to_string().contains("is not a valid creator"));
    assert!(matches!(
        source_error(err),
        CreatorError::SchemaContract { required: true, .. }
    ));
}

#[test]
fn test_expression_resolves_registered_function() {
    let mut registry = FunctionRegistry::new();
    registry.register_function("io.rows", rows).unwrap();
    registry.register_function("io.frame", frame).unwrap();

    let resolved = to_creator_in(&registry, "io::rows", "a:int").unwrap();
    assert_eq!(resolved.create(&ctx()).unwrap().count(), 1);

    let resolved = to_creator_in(&registry, String::from("io.frame"), ()).unwrap();
    assert!(resolved.output_schema().is_none());
}

#[test]
fn test_expression_resolves_registered_creator() {
    let mut registry = FunctionRegistry::new();
    registry.register_creator("io.fixed", fixed()).unwrap();

    let first = to_creator_in(&registry, "io.fixed", ()).unwrap();
    let second = to_creator_in(&registry, "io.fixed", ()).unwrap();
    let (a, b) = (
        first.downcast_ref::<Fixed>().unwrap(),
        second.downcast_ref::<Fixed>().unwrap(),
    );
    assert_eq!(a, b);
    assert!(!std::ptr::eq(a, b));
}

#[test]
fn test_expression_with_invalid_signature() {
    let mut registry = FunctionRegistry::new();
    registry.register_function("ops.transform", transform).unwrap();

    let err = resolve_err(&registry, "ops.transform", "");
    assert!(err.to_string().starts_with("'ops.transform' is not a valid creator"));
    assert!(matches!(
        source_error(err),
        CreatorError::Signature(SignatureError::InputMismatch { .. })
    ));
}

#[test]
fn test_unknown_expression() {
    let registry = FunctionRegistry::new();
    assert!(matches!(
        source_error(resolve_err(&registry, "io.missing", "")),
        CreatorError::UnknownFunction(name) if name == "io.missing"
    ));
    assert!(matches!(
        source_error(resolve_err(&registry, "not an expression", "")),
        CreatorError::InvalidExpression(_)
    ));
}

#[test]
fn test_global_registry() {
    register_global_function("resolver_tests.rows", rows).unwrap();
    assert!(FunctionRegistry::read_global().contains("resolver_tests::rows"));

    let resolved = to_creator("resolver_tests.rows", "a:int").unwrap();
    let task = CreatorTask::bind(&*resolved, ctx().with_param("a", 3));
    assert_eq!(task.run().unwrap().as_local().unwrap().value(0, "a"), Some(&json!(3)));
}
