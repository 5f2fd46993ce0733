use arrow::array::{Array, ArrayRef, AsArray, RecordBatch};
use arrow::compute::{cast_with_options, CastOptions};
use arrow::datatypes::{DataType as ArrowType, Float64Type, Int64Type};

use crate::core::dataframe::{DataFrame, LocalDataFrame};
use crate::core::error::SchemaError;
use crate::core::schema::{DataType, Field, Schema};
use crate::core::ParamValue;

/// A dataframe backed by an arrow [`RecordBatch`], which carries its own schema.
#[derive(Debug, Clone)]
pub struct ArrowDataFrame {
    batch: RecordBatch,
    schema: Schema,
}

impl ArrowDataFrame {
    pub fn try_new(batch: RecordBatch) -> Result<Self, SchemaError> {
        let schema = batch
            .schema()
            .fields()
            .iter()
            .try_fold(Schema::new(), |schema, field| {
                schema.field(field.name().as_str(), to_data_type(field.data_type())?)
            })?;
        Ok(Self { batch, schema })
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }
}

fn to_data_type(arrow_type: &ArrowType) -> Result<DataType, SchemaError> {
    match arrow_type {
        ArrowType::Int8
        | ArrowType::Int16
        | ArrowType::Int32
        | ArrowType::Int64
        | ArrowType::UInt8
        | ArrowType::UInt16
        | ArrowType::UInt32
        | ArrowType::UInt64 => Ok(DataType::Int),
        ArrowType::Float16 | ArrowType::Float32 | ArrowType::Float64 => Ok(DataType::Double),
        ArrowType::Utf8 | ArrowType::LargeUtf8 => Ok(DataType::Str),
        ArrowType::Boolean => Ok(DataType::Bool),
        other => Err(SchemaError::UnsupportedArrowType(other.to_string())),
    }
}

/// Casts a column to `to`, failing on values the target type can't hold.
fn checked_cast(column: &ArrayRef, field: &Field, to: &ArrowType) -> Result<ArrayRef, SchemaError> {
    let options = CastOptions {
        safe: false,
        ..Default::default()
    };
    cast_with_options(column, to, &options).map_err(|e| SchemaError::Coerce {
        field: field.name.clone(),
        dtype: field.dtype.to_string(),
        value: e.to_string(),
    })
}

/// Reads one arrow column as JSON values.
fn column_values(column: &ArrayRef, field: &Field) -> Result<Vec<ParamValue>, SchemaError> {
    let read = |i: usize, value: ParamValue| if column.is_null(i) { ParamValue::Null } else { value };
    let values = match field.dtype {
        DataType::Int => {
            let array = checked_cast(column, field, &ArrowType::Int64)?;
            let array = array.as_primitive::<Int64Type>();
            (0..array.len()).map(|i| read(i, array.value(i).into())).collect()
        }
        DataType::Double => {
            let array = checked_cast(column, field, &ArrowType::Float64)?;
            let array = array.as_primitive::<Float64Type>();
            (0..array.len()).map(|i| read(i, array.value(i).into())).collect()
        }
        DataType::Str => {
            let array = checked_cast(column, field, &ArrowType::Utf8)?;
            let array = array.as_string::<i32>();
            (0..array.len()).map(|i| read(i, array.value(i).into())).collect()
        }
        DataType::Bool => {
            let array = column.as_boolean();
            (0..array.len()).map(|i| read(i, array.value(i).into())).collect()
        }
    };
    Ok(values)
}

impl DataFrame for ArrowDataFrame {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn count(&self) -> usize {
        self.batch.num_rows()
    }

    fn is_local(&self) -> bool {
        true
    }

    fn as_local(&self) -> Result<LocalDataFrame, SchemaError> {
        let columns = self
            .schema
            .fields()
            .iter()
            .zip(self.batch.columns())
            .map(|(field, column)| column_values(column, field))
            .collect::<Result<Vec<_>, _>>()?;

        let rows = (0..self.batch.num_rows())
            .map(|row| columns.iter().map(|column| column[row].clone()).collect())
            .collect();
        LocalDataFrame::new(self.schema.clone(), rows)
    }

    fn clone_box(&self) -> Box<dyn DataFrame> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int32Array, StringArray};
    use arrow::datatypes::{Field, Schema as ArrowSchema};
    use serde_json::json;
    use std::sync::Arc;

    fn batch() -> RecordBatch {
        let schema = ArrowSchema::new(vec![
            Field::new("a", ArrowType::Int32, true),
            Field::new("b", ArrowType::Utf8, false),
        ]);
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(Int32Array::from(vec![Some(1), None])),
                Arc::new(StringArray::from(vec!["x", "y"])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_schema_from_record_batch() {
        let df = ArrowDataFrame::try_new(batch()).unwrap();
        assert_eq!(df.schema().to_string(), "a:int,b:str");
        assert_eq!(df.count(), 2);
    }

    #[test]
    fn test_as_local() {
        let df = ArrowDataFrame::try_new(batch()).unwrap();
        let local = df.as_local().unwrap();
        assert_eq!(local.rows(), &[vec![json!(1), json!("x")], vec![json!(null), json!("y")]]);
    }

    #[test]
    fn test_unsupported_column_type() {
        let schema = ArrowSchema::new(vec![Field::new("d", ArrowType::Date32, false)]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(arrow::array::Date32Array::from(vec![1]))],
        )
        .unwrap();
        assert!(matches!(
            ArrowDataFrame::try_new(batch),
            Err(SchemaError::UnsupportedArrowType(_))
        ));
    }

    #[test]
    fn test_as_local_rejects_out_of_range_unsigned() {
        let schema = ArrowSchema::new(vec![Field::new("u", ArrowType::UInt64, true)]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(arrow::array::UInt64Array::from(vec![Some(7), None, Some(u64::MAX)]))],
        )
        .unwrap();
        let df = ArrowDataFrame::try_new(batch).unwrap();
        assert_eq!(df.schema().to_string(), "u:int");
        assert!(matches!(
            df.as_local(),
            Err(SchemaError::Coerce { field, .. }) if field == "u"
        ));
    }
}
