use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::model::{
    Record, Table, COL_CATEGORY, COL_ORDER_ID, COL_ORDER_MONTH, COL_ORDER_YEAR, COL_PROFIT,
    COL_REGION, COL_SALES, COL_SHIP_MODE, REQUIRED_COLUMNS,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Fatal failure while reading the source dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: invalid value in column '{column}'")]
    InvalidValue { row: usize, column: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a top-level JSON array of objects")]
    JsonShape,

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the sales table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-delimited with a header row
/// * `.tsv`          – tab-delimited with a header row
/// * `.json`         – `[{ "Region": "East", "Sales": 12.5, ... }, ...]`
/// * `.parquet`      – flat columns named as in the CSV header
pub fn load(path: &Path) -> Result<Table, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" | "txt" => load_delimited(path, b',')?,
        "tsv" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!("Loaded {} records from {}", table.len(), path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// Delimited-text loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<Table, LoadError> {
    let file = open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::Headers)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(LoadError::MissingColumn(col.to_string()));
        }
    }

    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<Record>().enumerate() {
        records.push(result.map_err(|e| csv_cell_error(e, row, &headers))?);
    }

    Ok(Table::from_records(records))
}

/// A cell that fails to deserialize is reported by row and header name, like
/// the JSON and Parquet loaders do. Other CSV failures stay as `Csv`.
fn csv_cell_error(e: csv::Error, row: usize, headers: &csv::StringRecord) -> LoadError {
    let column = match e.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err
            .field()
            .and_then(|idx| headers.get(idx as usize))
            .map(str::to_string),
        _ => None,
    };
    match column {
        Some(column) => LoadError::InvalidValue { row, column },
        None => LoadError::Csv(e),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// `Order ID` may be written as a string or a number.
fn load_json(path: &Path) -> Result<Table, LoadError> {
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(open(path)?))?;
    let rows = root.as_array().ok_or(LoadError::JsonShape)?;

    let mut records = Vec::with_capacity(rows.len());
    for (row, value) in rows.iter().enumerate() {
        let obj = value.as_object().ok_or(LoadError::JsonShape)?;
        records.push(Record {
            region: json_string(obj, row, COL_REGION)?,
            category: json_string(obj, row, COL_CATEGORY)?,
            ship_mode: json_string(obj, row, COL_SHIP_MODE)?,
            sales: json_f64(obj, row, COL_SALES)?,
            profit: json_f64(obj, row, COL_PROFIT)?,
            order_id: json_string(obj, row, COL_ORDER_ID)?,
            order_year: json_int(obj, row, COL_ORDER_YEAR)?,
            order_month: json_int(obj, row, COL_ORDER_MONTH)?,
        });
    }

    Ok(Table::from_records(records))
}

fn json_field<'a>(
    obj: &'a Map<String, JsonValue>,
    column: &str,
) -> Result<&'a JsonValue, LoadError> {
    obj.get(column)
        .ok_or_else(|| LoadError::MissingColumn(column.to_string()))
}

fn json_string(obj: &Map<String, JsonValue>, row: usize, column: &str) -> Result<String, LoadError> {
    match json_field(obj, column)? {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        _ => Err(invalid(row, column)),
    }
}

fn json_f64(obj: &Map<String, JsonValue>, row: usize, column: &str) -> Result<f64, LoadError> {
    json_field(obj, column)?
        .as_f64()
        .ok_or_else(|| invalid(row, column))
}

fn json_int<T: TryFrom<i64>>(
    obj: &Map<String, JsonValue>,
    row: usize,
    column: &str,
) -> Result<T, LoadError> {
    json_field(obj, column)?
        .as_i64()
        .and_then(|i| T::try_from(i).ok())
        .ok_or_else(|| invalid(row, column))
}

fn invalid(row: usize, column: &str) -> LoadError {
    LoadError::InvalidValue {
        row,
        column: column.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per header name.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): strings may be Utf8 or LargeUtf8,
/// numbers any of Int32 / Int64 / Float32 / Float64.
fn load_parquet(path: &Path) -> Result<Table, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    for col in REQUIRED_COLUMNS {
        if builder.schema().index_of(col).is_err() {
            return Err(LoadError::MissingColumn(col.to_string()));
        }
    }
    let reader = builder.build()?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;

        let region = column(&batch, COL_REGION)?;
        let category = column(&batch, COL_CATEGORY)?;
        let ship_mode = column(&batch, COL_SHIP_MODE)?;
        let sales = column(&batch, COL_SALES)?;
        let profit = column(&batch, COL_PROFIT)?;
        let order_id = column(&batch, COL_ORDER_ID)?;
        let order_year = column(&batch, COL_ORDER_YEAR)?;
        let order_month = column(&batch, COL_ORDER_MONTH)?;

        // Row numbers in errors count from the start of the file.
        let offset = records.len();
        for i in 0..batch.num_rows() {
            let row = offset + i;
            records.push(Record {
                region: arrow_string(region, i).ok_or_else(|| invalid(row, COL_REGION))?,
                category: arrow_string(category, i).ok_or_else(|| invalid(row, COL_CATEGORY))?,
                ship_mode: arrow_string(ship_mode, i)
                    .ok_or_else(|| invalid(row, COL_SHIP_MODE))?,
                sales: arrow_f64(sales, i).ok_or_else(|| invalid(row, COL_SALES))?,
                profit: arrow_f64(profit, i).ok_or_else(|| invalid(row, COL_PROFIT))?,
                order_id: arrow_string(order_id, i)
                    .or_else(|| arrow_i64(order_id, i).map(|v| v.to_string()))
                    .ok_or_else(|| invalid(row, COL_ORDER_ID))?,
                order_year: arrow_i64(order_year, i)
                    .and_then(|v| i32::try_from(v).ok())
                    .ok_or_else(|| invalid(row, COL_ORDER_YEAR))?,
                order_month: arrow_i64(order_month, i)
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| invalid(row, COL_ORDER_MONTH))?,
            });
        }
    }

    Ok(Table::from_records(records))
}

// -- Arrow helpers: `None` for nulls and unsupported column types --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, LoadError> {
    batch
        .schema_ref()
        .index_of(name)
        .map(|idx| batch.column(idx))
        .map_err(|_| LoadError::MissingColumn(name.to_string()))
}

fn arrow_string(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|s| s.value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        _ => None,
    }
}

fn arrow_i64(col: &ArrayRef, row: usize) -> Option<i64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as i64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row)),
        _ => None,
    }
}

fn arrow_f64(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        _ => arrow_i64(col, row).map(|v| v as f64),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;
    use tempfile::{Builder, NamedTempFile};

    use super::*;

    const HEADER: &str = "Order ID,Region,Category,Ship Mode,Sales,Profit,order year,order month";

    fn temp_with(suffix: &str, contents: &str) -> NamedTempFile {
        let mut tmp = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(tmp, "{contents}").unwrap();
        tmp
    }

    #[test]
    fn csv_rows_parse_into_typed_records() {
        let tmp = temp_with(
            ".csv",
            &format!(
                "{HEADER}\nCA-1,East,Technology,First Class,100.5,-3.25,2020,7\n\
                 CA-2,West,Furniture,Same Day,20,4,2021,12\n"
            ),
        );

        let table = load(tmp.path()).unwrap();
        assert_eq!(table.len(), 2);

        let first = &table.records()[0];
        assert_eq!(first.order_id, "CA-1");
        assert_eq!(first.region, "East");
        assert_eq!(first.ship_mode, "First Class");
        assert_eq!(first.sales, 100.5);
        assert_eq!(first.profit, -3.25);
        assert_eq!(first.order_year, 2020);
        assert_eq!(first.order_month, 7);
        assert_eq!(table.regions(), ["East", "West"]);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let tmp = temp_with(
            ".csv",
            "Row ID,Region,Category,Ship Mode,Sales,Profit,Order ID,order year,order month,Segment\n\
             1,South,Office Supplies,Standard Class,9.5,1.5,US-9,2019,3,Consumer\n",
        );

        let table = load(tmp.path()).unwrap();
        assert_eq!(table.records()[0].category, "Office Supplies");
        assert_eq!(table.records()[0].order_id, "US-9");
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let tmp = temp_with(
            ".csv",
            "Order ID,Region,Category,Sales,Profit,order year,order month\n1,East,Tech,1,1,2020,1\n",
        );

        match load(tmp.path()) {
            Err(LoadError::MissingColumn(col)) => assert_eq!(col, "Ship Mode"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load(Path::new("/definitely/not/here/kpi.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let tmp = temp_with(".xlsx", "");
        let err = load(tmp.path()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn non_numeric_sales_fails_the_load() {
        let tmp = temp_with(
            ".csv",
            &format!("{HEADER}\n1,East,Tech,First Class,lots,1,2020,1\n"),
        );
        match load(tmp.path()) {
            Err(LoadError::InvalidValue { row, column }) => {
                assert_eq!(row, 0);
                assert_eq!(column, "Sales");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn bad_cell_reports_its_data_row() {
        let tmp = temp_with(
            ".csv",
            &format!(
                "{HEADER}\n1,East,Tech,First Class,5,1,2020,1\n\
                 2,West,Tech,First Class,5,1,2020,thirteen\n"
            ),
        );
        assert!(matches!(
            load(tmp.path()),
            Err(LoadError::InvalidValue { row: 1, column }) if column == "order month"
        ));
    }

    #[test]
    fn tsv_uses_tab_delimiter() {
        let tmp = temp_with(
            ".tsv",
            &format!(
                "{}\n1\tEast\tTech\tFirst Class\t5\t1\t2020\t1\n",
                HEADER.replace(',', "\t")
            ),
        );
        let table = load(tmp.path()).unwrap();
        assert_eq!(table.records()[0].sales, 5.0);
    }

    #[test]
    fn json_accepts_numeric_order_ids() {
        let tmp = temp_with(
            ".json",
            r#"[{"Order ID": 7, "Region": "East", "Category": "Tech", "Ship Mode": "Same Day",
                 "Sales": 10, "Profit": -1.5, "order year": 2022, "order month": 4}]"#,
        );

        let table = load(tmp.path()).unwrap();
        let rec = &table.records()[0];
        assert_eq!(rec.order_id, "7");
        assert_eq!(rec.sales, 10.0);
        assert_eq!(rec.order_month, 4);
    }

    #[test]
    fn json_missing_field_is_a_missing_column() {
        let tmp = temp_with(
            ".json",
            r#"[{"Order ID": "1", "Region": "East", "Category": "Tech",
                 "Sales": 10, "Profit": 1, "order year": 2022, "order month": 4}]"#,
        );
        assert!(matches!(load(tmp.path()), Err(LoadError::MissingColumn(c)) if c == "Ship Mode"));
    }

    #[test]
    fn json_object_root_is_rejected() {
        let tmp = temp_with(".json", r#"{"Region": "East"}"#);
        assert!(matches!(load(tmp.path()), Err(LoadError::JsonShape)));
    }

    #[test]
    fn empty_parquet_without_required_columns_is_rejected() {
        let schema = Arc::new(Schema::new(vec![Field::new(COL_REGION, DataType::Utf8, false)]));
        let tmp = Builder::new().suffix(".parquet").tempfile().unwrap();
        let writer = ArrowWriter::try_new(File::create(tmp.path()).unwrap(), schema, None).unwrap();
        writer.close().unwrap();

        match load(tmp.path()) {
            Err(LoadError::MissingColumn(col)) => assert_eq!(col, COL_CATEGORY),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn parquet_columns_accept_mixed_numeric_types() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_REGION, DataType::Utf8, false),
            Field::new(COL_CATEGORY, DataType::Utf8, false),
            Field::new(COL_SHIP_MODE, DataType::Utf8, false),
            Field::new(COL_SALES, DataType::Float64, false),
            Field::new(COL_PROFIT, DataType::Int64, false),
            Field::new(COL_ORDER_ID, DataType::Int64, false),
            Field::new(COL_ORDER_YEAR, DataType::Int32, false),
            Field::new(COL_ORDER_MONTH, DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["East", "West"])),
                Arc::new(StringArray::from(vec!["Tech", "Office"])),
                Arc::new(StringArray::from(vec!["First Class", "Same Day"])),
                Arc::new(Float64Array::from(vec![12.5, 3.0])),
                Arc::new(Int64Array::from(vec![-2, 1])),
                Arc::new(Int64Array::from(vec![10, 11])),
                Arc::new(Int32Array::from(vec![2020, 2021])),
                Arc::new(Int64Array::from(vec![1, 12])),
            ],
        )
        .unwrap();

        let tmp = Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(File::create(tmp.path()).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load(tmp.path()).unwrap();
        assert_eq!(table.len(), 2);
        let second = &table.records()[1];
        assert_eq!(second.order_id, "11");
        assert_eq!(second.profit, 1.0);
        assert_eq!(second.order_year, 2021);
        assert_eq!(second.order_month, 12);
    }
}
