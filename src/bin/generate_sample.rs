use std::sync::Arc;

use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const ANTIBIOTICS: [&str; 8] = [
    "Penicillin",
    "Ampicillin",
    "Oxacillin",
    "Ceftriaxone",
    "Meropenem",
    "Vancomycin",
    "Gentamicin",
    "Doxycycline",
];

/// (bacterium, type, one cell per antibiotic: "✔", "V" or "")
const ROWS: [(&str, &str, [&str; 8]); 10] = [
    ("Streptococcus pyogenes", "Gram Positive", ["✔", "✔", "✔", "✔", "✔", "✔", "", "V"]),
    ("Streptococcus pneumoniae", "Gram Positive", ["V", "V", "", "✔", "✔", "✔", "", "V"]),
    ("Enterococcus faecalis", "Gram Positive", ["✔", "✔", "", "", "V", "✔", "", ""]),
    ("Staphylococcus aureus (MSSA)", "Gram Positive", ["", "", "✔", "✔", "✔", "✔", "V", "V"]),
    ("Staphylococcus aureus (MRSA)", "Gram Positive", ["", "", "", "", "", "✔", "", "V"]),
    ("Escherichia coli", "Gram Negative", ["", "V", "", "✔", "✔", "", "✔", "V"]),
    ("Klebsiella pneumoniae", "Gram Negative", ["", "", "", "✔", "✔", "", "✔", "V"]),
    ("Pseudomonas aeruginosa", "Gram Negative", ["", "", "", "", "✔", "", "V", ""]),
    ("Haemophilus influenzae", "Gram Negative", ["", "V", "", "✔", "✔", "", "", "✔"]),
    ("Mycoplasma pneumoniae", "Atypical", ["", "", "", "", "", "", "", "✔"]),
];

fn write_csv(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut header = vec!["Bacteria", "Type"];
    header.extend(ANTIBIOTICS);
    writer.write_record(&header)?;
    for (bacterium, kind, cells) in &ROWS {
        let mut record = vec![*bacterium, *kind];
        record.extend(cells);
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut fields = vec![
        Field::new("Bacteria", DataType::Utf8, false),
        Field::new("Type", DataType::Utf8, false),
    ];
    fields.extend(ANTIBIOTICS.iter().map(|a| Field::new(*a, DataType::Utf8, true)));
    let schema = Arc::new(Schema::new(fields));

    let mut arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(ROWS.iter().map(|r| r.0).collect::<Vec<_>>())),
        Arc::new(StringArray::from(ROWS.iter().map(|r| r.1).collect::<Vec<_>>())),
    ];
    for i in 0..ANTIBIOTICS.len() {
        let column: Vec<Option<&str>> = ROWS
            .iter()
            .map(|r| Some(r.2[i]).filter(|v| !v.is_empty()))
            .collect();
        arrays.push(Arc::new(StringArray::from(column)));
    }

    let batch = RecordBatch::try_new(schema.clone(), arrays)?;
    let file = std::fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() {
    write_csv("sample_data.csv").expect("Failed to write sample_data.csv");
    write_parquet("sample_data.parquet").expect("Failed to write sample_data.parquet");

    println!(
        "Wrote {} bacteria × {} antibiotics to sample_data.csv and sample_data.parquet",
        ROWS.len(),
        ANTIBIOTICS.len()
    );
}
