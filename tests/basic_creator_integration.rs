//! Integration test for the basic_creator demo
//!
//! This test ensures that the demo in `demos/basic_creator.rs` works correctly.

use serde::Deserialize;
use serde_json::json;
use tessera::prelude::*;

#[test]
fn test_basic_creator_demo_logic() {
    // Recreate the logic from the demo to test it in isolation

    #[derive(Deserialize)]
    struct Squares {
        n: i64,
    }

    fn squares(Params(args): Params<Squares>) -> Vec<Vec<ParamValue>> {
        (0..args.n).map(|i| vec![i.into(), (i * i).into()]).collect()
    }

    fn engine_info(engine: EngineRef, params: ParamDict) -> Result<LocalDataFrame, CreatorError> {
        let schema: Schema = "engine:str,params:int".parse()?;
        let row = vec![engine.name().into(), params.len().into()];
        Ok(LocalDataFrame::new(schema, vec![row])?)
    }

    let engine = NativeExecutionEngine::new().into_ref();

    let squares = creator("i:int,square:int").decorate(squares).unwrap();
    let task = CreatorTask::bind(&squares, CreatorContext::new(engine.clone()).with_param("n", 4));
    assert!(task.task_id().starts_with("creator_"));

    let df = task.run().unwrap().as_local().unwrap();
    assert_eq!(df.count(), 4);
    assert_eq!(df.value(3, "square"), Some(&json!(9)));

    let mut registry = FunctionRegistry::new();
    registry.register_function("demo.engine_info", engine_info).unwrap();
    let info = to_creator_in(&registry, "demo::engine_info", ()).unwrap();
    let ctx = CreatorContext::new(engine).with_param("verbose", true);
    let df = info.create(&ctx).unwrap().as_local().unwrap();
    assert_eq!(df.rows(), &[vec![json!("native"), json!(1)]]);
}

#[test]
fn test_rows_without_schema_are_rejected() {
    fn rows() -> Vec<Vec<ParamValue>> {
        Vec::new()
    }

    let registry = FunctionRegistry::new();
    let result = to_creator_in(&registry, CreatorCandidate::callable(rows), ());
    let Err(err) = result else {
        panic!("rows cannot be resolved without a schema");
    };
    assert!(err.to_string().contains("schema must be provided for return type"));
}
