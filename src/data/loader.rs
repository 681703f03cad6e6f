use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{ClassificationColumn, Table};

/// Header names plus positional cells, as read from any source format.
type RawSheet = (Vec<String>, Vec<Vec<Option<String>>>);

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a bacteria × antibiotic table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first worksheet, header row first
/// * `.csv`     – header row with column names
/// * `.json`    – `[{ "Bacteria": "E. coli", "Ampicillin": "R", ... }, ...]`
/// * `.parquet` – one column per header, any scalar type
pub fn load_file(path: &Path, classification: &ClassificationColumn) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let sheet = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path)?,
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let (columns, rows) = name_blank_headers(sheet);
    Table::build(columns, rows, classification)
        .with_context(|| format!("building table from {}", path.display()))
}

/// Normalise a raw text cell: surrounding whitespace trimmed, blanks absent.
fn text_cell(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Trailing blank headers are dropped together with their cells. Blank headers
/// between named ones become `Unnamed: {i}`.
fn name_blank_headers((mut columns, mut rows): RawSheet) -> RawSheet {
    let width = columns
        .iter()
        .rposition(|c| !c.trim().is_empty())
        .map_or(0, |i| i + 1);
    if width < columns.len() {
        log::debug!("Dropping {} blank trailing columns", columns.len() - width);
        columns.truncate(width);
        for row in &mut rows {
            row.truncate(width);
        }
    }
    for (i, col) in columns.iter_mut().enumerate() {
        if col.trim().is_empty() {
            *col = format!("Unnamed: {i}");
        }
    }
    (columns, rows)
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn load_workbook(path: &Path) -> Result<RawSheet> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| anyhow!("opening workbook: {e}"))?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .map_err(|e| anyhow!("reading first worksheet: {e}"))?;

    let mut rows = range.rows();
    let header = rows.next().context("worksheet is empty")?;
    let columns = header
        .iter()
        .map(|c| spreadsheet_cell(c).unwrap_or_default())
        .collect();
    let rows = rows
        .map(|r| r.iter().map(spreadsheet_cell).collect())
        .collect();

    Ok((columns, rows))
}

fn spreadsheet_cell(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => text_cell(s),
        other => text_cell(&other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<RawSheet> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(text_cell).collect());
    }

    Ok((columns, rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Column order is the first-seen key order across records.
fn load_json(path: &Path) -> Result<RawSheet> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).and_then(json_cell))
                .collect()
        })
        .collect();

    Ok((columns, rows))
}

fn json_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => text_cell(s),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Every column is rendered as text.
fn load_parquet(path: &Path) -> Result<RawSheet> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| {
                    if col.is_null(row) {
                        return Ok(None);
                    }
                    array_value_to_string(col, row)
                        .map(|s| text_cell(&s))
                        .with_context(|| format!("Row {row}: unreadable cell"))
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
    }

    Ok((columns, rows))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use calamine::CellErrorType;
    use parquet::arrow::ArrowWriter;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    use super::*;
    use crate::data::category::CellCategory;
    use crate::data::lookup::{lookup, LookupResult};

    fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn csv_with_type_column() {
        let dir = tempdir().unwrap();
        let path = write(
            dir.path(),
            "abo.csv",
            "Bacteria,Type,Ampicillin,Ceftriaxone,Gentamicin\n\
             E. coli,Gram Negative,R,,V\n\
             ,,,,\n\
             S. aureus,Gram Positive, ,S\n",
        );
        let t = load_file(&path, &ClassificationColumn::Auto).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.classification_column(), Some("Type"));
        assert_eq!(t.rows()[0].get(3), None);
        assert_eq!(t.rows()[1].get(2), None);
        assert_eq!(t.rows()[1].get(4), None);
    }

    #[test]
    fn second_column_is_classification_whatever_its_header() {
        let dir = tempdir().unwrap();
        let path = write(
            dir.path(),
            "abo.csv",
            "Bacteria,Organism Type,Ampicillin\nE. coli,Gram Negative,\n",
        );
        let t = load_file(&path, &ClassificationColumn::Auto).unwrap();
        assert_eq!(t.classification_column(), Some("Organism Type"));
        assert_eq!(t.antibiotic_columns().collect::<Vec<_>>(), ["Ampicillin"]);
        assert_eq!(
            lookup(&t, "E. coli"),
            LookupResult::NoData {
                classification: Some("Gram Negative".into())
            }
        );
    }

    #[test]
    fn blank_headers_do_not_empty_the_table() {
        let dir = tempdir().unwrap();
        let trailing = write(
            dir.path(),
            "trailing.csv",
            "Bacteria,Type,Ampicillin,,\nE. coli,Gram Negative,R,,\n",
        );
        let t = load_file(&trailing, &ClassificationColumn::Auto).unwrap();
        assert_eq!(t.columns(), ["Bacteria", "Type", "Ampicillin"]);
        assert!(matches!(lookup(&t, "E. coli"), LookupResult::Found(_)));

        let inner = write(
            dir.path(),
            "inner.csv",
            "Bacteria,Type,,Ampicillin,\nE. coli,Gram Negative,,R,\n",
        );
        let t = load_file(&inner, &ClassificationColumn::Auto).unwrap();
        assert_eq!(t.columns(), ["Bacteria", "Type", "Unnamed: 2", "Ampicillin"]);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn xlsx_first_sheet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ABO_data.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let header = ["Bacteria", "Organism Type", "Ampicillin", "Gentamicin", "Dose", "Oral"];
        for (col, name) in header.iter().enumerate() {
            sheet.write_string(0, col as u16, *name).unwrap();
        }
        sheet.write_string(1, 0, "E. coli").unwrap();
        sheet.write_string(1, 1, "Gram Negative").unwrap();
        sheet.write_string(1, 2, "R").unwrap();
        sheet.write_string(1, 3, "V").unwrap();
        sheet.write_number(1, 4, 2.5).unwrap();
        sheet.write_boolean(1, 5, true).unwrap();
        sheet.write_string(2, 0, "Listeria").unwrap();
        sheet.write_string(2, 1, "Gram Positive").unwrap();
        sheet.write_string(2, 2, "none").unwrap();
        workbook.save(&path).unwrap();

        let t = load_file(&path, &ClassificationColumn::Auto).unwrap();
        assert_eq!(t.columns(), header);
        assert_eq!(t.classification_column(), Some("Organism Type"));
        assert_eq!(t.len(), 2);

        let LookupResult::Found(list) = lookup(&t, "E. coli") else {
            panic!("E. coli should have coverage");
        };
        let values: Vec<(&str, &str, CellCategory)> = list
            .entries
            .iter()
            .map(|e| (e.antibiotic.as_str(), e.value.as_str(), e.category))
            .collect();
        assert_eq!(
            values,
            [
                ("Ampicillin", "R", CellCategory::Covered),
                ("Gentamicin", "V", CellCategory::Variable),
                ("Dose", "2.5", CellCategory::Covered),
                ("Oral", "true", CellCategory::Covered),
            ]
        );
        assert_eq!(
            lookup(&t, "Listeria"),
            LookupResult::NoData {
                classification: Some("Gram Positive".into())
            }
        );
    }

    #[test]
    fn spreadsheet_cells_to_text() {
        assert_eq!(spreadsheet_cell(&Data::Empty), None);
        assert_eq!(spreadsheet_cell(&Data::Error(CellErrorType::Div0)), None);
        assert_eq!(spreadsheet_cell(&Data::String("  S ".into())), Some("S".into()));
        assert_eq!(spreadsheet_cell(&Data::Float(2.5)), Some("2.5".into()));
        assert_eq!(spreadsheet_cell(&Data::Int(4)), Some("4".into()));
        assert_eq!(spreadsheet_cell(&Data::Bool(false)), Some("false".into()));
    }

    #[test]
    fn json_keeps_key_order() {
        let dir = tempdir().unwrap();
        let path = write(
            dir.path(),
            "abo.json",
            r#"[
                {"Organism": "E. coli", "Gentamicin": "V", "Ampicillin": "R", "Ceftriaxone": null},
                {"Organism": "Listeria", "Gentamicin": null, "Ampicillin": "S", "Ceftriaxone": 1}
            ]"#,
        );
        let t = load_file(&path, &ClassificationColumn::Absent).unwrap();
        assert_eq!(
            t.columns(),
            ["Organism", "Gentamicin", "Ampicillin", "Ceftriaxone"]
        );
        assert_eq!(t.classification_column(), None);
        assert_eq!(t.antibiotic_columns().count(), 3);
        assert_eq!(t.rows()[1].get(3), Some("1"));
    }

    #[test]
    fn parquet_columns_rendered_as_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("abo.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("Bacteria", DataType::Utf8, false),
            Field::new("Gram", DataType::Utf8, true),
            Field::new("Ampicillin", DataType::Utf8, true),
            Field::new("Doses", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["E. coli", "Listeria"])),
                Arc::new(StringArray::from(vec![Some("Gram Negative"), Some("Gram Positive")])),
                Arc::new(StringArray::from(vec![Some("R"), None])),
                Arc::new(Int64Array::from(vec![None, Some(2)])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let t = load_file(&path, &ClassificationColumn::Auto).unwrap();
        assert_eq!(t.classification_column(), Some("Gram"));
        assert_eq!(t.rows()[1].get(2), None);
        assert_eq!(t.rows()[1].get(3), Some("2"));
        assert!(matches!(lookup(&t, "Listeria"), LookupResult::Found(_)));
    }

    #[test]
    fn unsupported_and_missing_files_fail() {
        let dir = tempdir().unwrap();
        let txt = write(dir.path(), "abo.txt", "Bacteria\n");
        assert!(load_file(&txt, &ClassificationColumn::Auto).is_err());
        assert!(load_file(&dir.path().join("missing.csv"), &ClassificationColumn::Auto).is_err());
        assert!(load_file(&dir.path().join("ABO_data.xlsx"), &ClassificationColumn::Auto).is_err());
    }

    #[test]
    fn duplicate_headers_fail() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "dup.csv", "Bacteria,Ampicillin,Ampicillin\nE. coli,R,S\n");
        let err = load_file(&path, &ClassificationColumn::Auto).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate column name 'Ampicillin'"));
    }
}
