use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{Brew, BrewLog, RoastLevel};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a brew log from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "name": ..., "dose": 18, "yield": 36, ... }, ...]`
/// * `.csv`     – header row with the brew field names
/// * `.parquet` – one flat column per brew field
pub fn load_file(path: &Path) -> Result<BrewLog> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let brews = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    Ok(BrewLog::from_brews(brews))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented array, as returned by the brews endpoint:
///
/// ```json
/// [
///   { "name": "Morning shot", "bean": "Huila", "dose": 18.0,
///     "yield": 36.0, "brew_time": 28.5, "rating": 8 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<Brew>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: Vec<serde_json::Value> =
        serde_json::from_str(&text).context("Expected top-level JSON array")?;

    root.into_iter()
        .enumerate()
        .map(|(i, rec)| serde_json::from_value(rec).with_context(|| format!("Row {i}")))
        .collect()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with brew field names, empty cells are absent.
fn load_csv(path: &Path) -> Result<Vec<Brew>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?;
    if !headers.iter().any(|h| h == "name") {
        bail!("CSV missing 'name' column");
    }

    reader
        .deserialize::<Brew>()
        .enumerate()
        .map(|(row_no, rec)| rec.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per brew field.
///
/// Only `name` is required; other columns may be missing or null. Numeric
/// columns may be Int32/Int64/Float32/Float64 and `roast_level` is text.
fn load_parquet(path: &Path) -> Result<Vec<Brew>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    // Checked on the file schema so a file with no row groups is rejected too.
    if builder.schema().index_of("name").is_err() {
        bail!("Parquet file missing 'name' column");
    }
    let reader = builder.build().context("building parquet reader")?;

    let mut brews = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let cols = BatchColumns { batch: &batch };

        for row in 0..batch.num_rows() {
            let name = cols
                .text("name", row)
                .with_context(|| format!("Row {row}: null 'name'"))?;
            let roast_level = cols
                .text("roast_level", row)
                .map(|s| s.parse::<RoastLevel>())
                .transpose()
                .with_context(|| format!("Row {row}: bad 'roast_level'"))?;

            brews.push(Brew {
                id: cols.number("id", row).map(|v| v as i64),
                name,
                bean: cols.text("bean", row),
                roaster: cols.text("roaster", row),
                bag: cols.text("bag", row),
                barista: cols.text("barista", row),
                machine: cols.text("machine", row),
                grinder: cols.text("grinder", row),
                roast_level,
                brew_time: cols.number("brew_time", row),
                dose: cols.number("dose", row),
                yield_: cols.number("yield", row),
                rating: cols.number("rating", row),
                timestamp: cols.text("timestamp", row),
                tasting_notes: cols.text("tasting_notes", row),
                reflections: cols.text("reflections", row),
            });
        }
    }

    Ok(brews)
}

// -- Parquet / Arrow helpers --

/// Column lookup by name for one record batch.
struct BatchColumns<'a> {
    batch: &'a RecordBatch,
}

impl<'a> BatchColumns<'a> {
    fn column(&self, name: &str) -> Option<&'a Arc<dyn Array>> {
        let idx = self.batch.schema().index_of(name).ok()?;
        Some(self.batch.column(idx))
    }

    fn text(&self, name: &str, row: usize) -> Option<String> {
        let col = self.column(name)?;
        extract_text(col, row)
    }

    fn number(&self, name: &str, row: usize) -> Option<f64> {
        let col = self.column(name)?;
        extract_f64(col, row)
    }
}

/// Extract a string cell; numeric columns are formatted as text.
fn extract_text(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => {
            let s = col.as_any().downcast_ref::<StringArray>()?;
            Some(s.value(row).to_string())
        }
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        _ => extract_f64(col, row).map(|v| v.to_string()),
    }
}

/// Extract a numeric cell as `f64` from any integer or float column.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row) as f64),
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::LargeStringArray;
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;
    use std::path::PathBuf;

    fn temp_path(file: &str) -> PathBuf {
        std::env::temp_dir().join(format!("brew-lens-{}-{file}", std::process::id()))
    }

    fn write_parquet(path: &Path, schema: Arc<Schema>, batches: &[RecordBatch]) {
        let file = std::fs::File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        for batch in batches {
            writer.write(batch).unwrap();
        }
        writer.close().unwrap();
    }

    #[test]
    fn test_load_json() {
        let path = temp_path("log.json");
        std::fs::write(
            &path,
            r#"[
                {"id": 1, "name": "Shot", "bean": "Huila", "roast_level": "Medium Light",
                 "dose": 18, "yield": 36.5, "brew_time": 28, "rating": 8},
                {"name": "Bare"}
            ]"#,
        )
        .unwrap();

        let log = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(log.len(), 2);
        let shot = &log.brews[0];
        assert_eq!(shot.id, Some(1));
        assert_eq!(shot.roast_level, Some(RoastLevel::MediumLight));
        assert_eq!(shot.yield_, Some(36.5));
        assert_eq!(shot.rating, Some(8.0));
        assert_eq!(log.brews[1], Brew { name: "Bare".into(), ..Brew::default() });
    }

    #[test]
    fn test_load_json_rejects_bad_row() {
        let path = temp_path("bad.json");
        std::fs::write(&path, r#"[{"name": "ok"}, {"dose": 18}]"#).unwrap();
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(format!("{err:#}").contains("Row 1"));
    }

    #[test]
    fn test_load_csv_with_empty_cells() {
        let path = temp_path("log.csv");
        std::fs::write(
            &path,
            "name,bean,roast_level,dose,yield,brew_time,rating\n\
             Shot,Huila,Dark,18,36,27.5,7\n\
             Pour,,,15,250,,\n",
        )
        .unwrap();

        let log = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(log.len(), 2);
        assert_eq!(log.brews[0].roast_level, Some(RoastLevel::Dark));
        assert_eq!(log.brews[0].ratio(), Some(2.0));
        assert_eq!(log.brews[1].bean, None);
        assert_eq!(log.brews[1].rating, None);
        assert_eq!(log.brews[1].brew_time, None);
    }

    #[test]
    fn test_load_csv_requires_name() {
        let path = temp_path("noname.csv");
        std::fs::write(&path, "bean,dose\nHuila,18\n").unwrap();
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(format!("{err:#}").contains("'name'"));
    }

    #[test]
    fn test_load_parquet_mixed_types() {
        let path = temp_path("log.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("name", DataType::Utf8, false),
            Field::new("roast_level", DataType::Utf8, true),
            Field::new("dose", DataType::Float64, true),
            Field::new("yield", DataType::Float32, true),
            Field::new("rating", DataType::Int32, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["a", "b"])),
                Arc::new(StringArray::from(vec![Some("medium_dark"), None])),
                Arc::new(Float64Array::from(vec![Some(18.0), None])),
                Arc::new(Float32Array::from(vec![Some(40.0), Some(30.0)])),
                Arc::new(Int32Array::from(vec![Some(9), None])),
            ],
        )
        .unwrap();
        write_parquet(&path, schema, &[batch]);

        let log = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(log.len(), 2);
        let a = &log.brews[0];
        assert_eq!(a.roast_level, Some(RoastLevel::MediumDark));
        assert_eq!(a.rating, Some(9.0));
        assert_eq!(a.yield_, Some(40.0));
        assert_eq!(a.barista, None);
        let b = &log.brews[1];
        assert_eq!(b.dose, None);
        assert_eq!(b.rating, None);
    }

    #[test]
    fn test_load_parquet_large_utf8_and_int64() {
        let path = temp_path("large.parquet");
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("name", DataType::LargeUtf8, false),
            Field::new("bean", DataType::LargeUtf8, true),
            Field::new("brew_time", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![7, 8])),
                Arc::new(LargeStringArray::from(vec!["long", "short"])),
                Arc::new(LargeStringArray::from(vec![Some("Huila"), None])),
                Arc::new(Int64Array::from(vec![Some(31), None])),
            ],
        )
        .unwrap();
        write_parquet(&path, schema, &[batch]);

        let log = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(log.len(), 2);
        assert_eq!(log.brews[0].id, Some(7));
        assert_eq!(log.brews[0].name, "long");
        assert_eq!(log.brews[0].bean.as_deref(), Some("Huila"));
        assert_eq!(log.brews[0].brew_time, Some(31.0));
        assert_eq!(log.brews[1].bean, None);
        assert_eq!(log.brews[1].brew_time, None);
    }

    #[test]
    fn test_load_parquet_requires_name() {
        let schema = Arc::new(Schema::new(vec![Field::new("dose", DataType::Float64, true)]));

        let path = temp_path("noname.parquet");
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![Arc::new(Float64Array::from(vec![18.0]))],
        )
        .unwrap();
        write_parquet(&path, schema.clone(), &[batch]);
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(format!("{err:#}").contains("missing 'name'"));

        // No row groups at all: still rejected.
        let empty = temp_path("noname-empty.parquet");
        write_parquet(&empty, schema, &[]);
        let err = load_file(&empty).unwrap_err();
        std::fs::remove_file(&empty).ok();
        assert!(format!("{err:#}").contains("missing 'name'"));
    }

    #[test]
    fn test_loose_roast_labels_in_json_and_csv() {
        let json = temp_path("loose.json");
        std::fs::write(
            &json,
            r#"[{"name": "a", "roast_level": "MEDIUM_DARK"}, {"name": "b", "roast_level": "medium-light"}]"#,
        )
        .unwrap();
        let log = load_file(&json).unwrap();
        std::fs::remove_file(&json).ok();
        assert_eq!(log.brews[0].roast_level, Some(RoastLevel::MediumDark));
        assert_eq!(log.brews[1].roast_level, Some(RoastLevel::MediumLight));

        let csv = temp_path("loose.csv");
        std::fs::write(&csv, "name,roast_level\nShot,medium light\nPour,DARK\nBare,\n").unwrap();
        let log = load_file(&csv).unwrap();
        std::fs::remove_file(&csv).ok();
        assert_eq!(log.brews[0].roast_level, Some(RoastLevel::MediumLight));
        assert_eq!(log.brews[1].roast_level, Some(RoastLevel::Dark));
        assert_eq!(log.brews[2].roast_level, None);
    }

    #[test]
    fn test_unknown_roast_label_names_the_row() {
        let path = temp_path("charcoal.csv");
        std::fs::write(&path, "name,roast_level\nShot,Light\nBurnt,charcoal\n").unwrap();
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        let msg = format!("{err:#}");
        assert!(msg.contains("CSV row 1"));
        assert!(msg.contains("charcoal"));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("brews.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}
