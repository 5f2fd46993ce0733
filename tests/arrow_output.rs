#![cfg(feature = "arrow")]

use std::sync::Arc;

use arrow::array::{Int32Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema as ArrowSchema};
use serde::Deserialize;
use serde_json::json;
use tessera::interfaceless::OutputCode;
use tessera::prelude::*;
use tessera::ArrowDataFrame;

#[derive(Deserialize)]
struct Range {
    n: i32,
}

fn batch(Params(range): Params<Range>) -> Result<RecordBatch, arrow::error::ArrowError> {
    let schema = ArrowSchema::new(vec![
        Field::new("id", DataType::Int32, false),
        Field::new("name", DataType::Utf8, true),
    ]);
    let ids: Vec<i32> = (0..range.n).collect();
    let names: Vec<Option<String>> = (0..range.n)
        .map(|i| (i % 2 == 0).then(|| format!("row{i}")))
        .collect();
    RecordBatch::try_new(
        Arc::new(schema),
        vec![Arc::new(Int32Array::from(ids)), Arc::new(StringArray::from(names))],
    )
}

#[test]
fn test_native_frame_is_classified_and_forbids_schema() {
    let f = creator(()).decorate(batch).unwrap();
    assert_eq!(f.signature().output, OutputCode::Native);
    assert!(!f.needs_output_schema());

    assert!(matches!(
        creator("id:int").decorate(batch),
        Err(CreatorError::SchemaContract { required: false, .. })
    ));
}

#[test]
fn test_native_frame_keeps_its_own_schema() {
    let f = creator(()).decorate(batch).unwrap();
    let ctx = CreatorContext::new(NativeExecutionEngine::new().into_ref()).with_param("n", 3);
    let df = f.create(&ctx).unwrap();

    assert_eq!(df.schema().to_string(), "id:int,name:str");
    assert_eq!(df.count(), 3);
    assert!(df.is_local());

    let arrow_df = df.downcast_ref::<ArrowDataFrame>().unwrap();
    assert_eq!(arrow_df.batch().num_rows(), 3);

    let local = df.as_local().unwrap();
    assert_eq!(local.value(1, "name"), Some(&json!(null)));
    assert_eq!(local.value(2, "name"), Some(&json!("row2")));
}
