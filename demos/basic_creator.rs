//! A complete example showing how to turn plain functions into Creators.
//!
//! This example demonstrates:
//! - Declaring a Creator with the `creator` decorator
//! - Returning raw records and letting the declared schema shape them
//! - Registering functions by name and resolving them with `to_creator`
//! - Binding Creators to a context and running them

use serde::Deserialize;
use tessera::prelude::*;
use tessera::register_global_function;

// ============================================================================
// Step 1: A Creator that returns raw rows
// ============================================================================

#[derive(Deserialize)]
struct Squares {
    n: i64,
}

/// Rows of `(i, i * i)`. The function knows nothing about tables, so the
/// schema is declared at registration.
fn squares(Params(args): Params<Squares>) -> Vec<Vec<ParamValue>> {
    (0..args.n).map(|i| vec![i.into(), (i * i).into()]).collect()
}

// ============================================================================
// Step 2: A Creator that talks to the engine
// ============================================================================

/// Builds a one row table describing the engine it ran on.
fn engine_info(engine: EngineRef, params: ParamDict) -> Result<LocalDataFrame, CreatorError> {
    let schema: Schema = "engine:str,params:int".parse()?;
    let row = vec![engine.name().into(), params.len().into()];
    Ok(LocalDataFrame::new(schema, vec![row])?)
}

fn print_frame(title: &str, df: &dyn DataFrame) -> CreatorResult<()> {
    println!("{} ({} rows, schema {})", title, df.count(), df.schema());
    for row in df.as_local()?.rows() {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        println!("  {}", cells.join(" | "));
    }
    Ok(())
}

fn main() -> CreatorResult<()> {
    let engine = NativeExecutionEngine::new().into_ref();

    // ========================================================================
    // Decorator form
    // ========================================================================

    let squares = creator("i:int,square:int").decorate(squares)?;
    let task = CreatorTask::bind(&squares, CreatorContext::new(engine.clone()).with_param("n", 4));
    print_frame(&format!("Task {}", task.task_id()), task.run()?.as_ref())?;

    // ========================================================================
    // Resolver form
    // ========================================================================

    register_global_function("demo.engine_info", engine_info)?;
    let info = to_creator("demo::engine_info", ())?;
    let ctx = CreatorContext::new(engine.clone()).with_param("verbose", true);
    print_frame("Engine info", info.create(&ctx)?.as_ref())?;

    // A function without a schema cannot describe its rows
    match to_creator(CreatorCandidate::callable(squares_without_schema), ()) {
        Ok(_) => println!("unexpected: resolved without a schema"),
        Err(e) => println!("Rejected: {}", e),
    }

    Ok(())
}

fn squares_without_schema() -> Vec<Vec<ParamValue>> {
    Vec::new()
}
