//! Writes a small research-element sheet for trying the explorer locally:
//! `sample_elements.parquet` and `sample_elements.csv` in the current directory.
//!
//! ```bash
//! cargo run --bin generate_sample
//! cargo run -- --data sample_elements.csv
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// (name, symbol, category, action, definition)
type Element = (&'static str, &'static str, &'static str, &'static str, &'static str);

const ELEMENTS: &[Element] = &[
    ("Research Problem", "RP", "Framing", "Define", "The gap or tension a study sets out to address."),
    ("Research Question", "RQ", "Framing", "Define", "The precise question the study answers."),
    ("Theory", "Th", "Theory", "Adopt", "An explanation of how and why constructs relate."),
    ("Construct", "Co", "Theory", "Define", "An abstract concept a theory reasons about."),
    ("Hypothesis", "Hy", "Theory", "Test", "A falsifiable statement derived from theory."),
    ("Boundary Condition", "BC", "Theory", "Specify", "Where a theory's predictions stop holding."),
    ("Sampling", "Sa", "Method", "Justify", "How cases were selected from the population."),
    ("Measurement", "Me", "Method", "Validate", "How constructs are turned into observed variables."),
    ("Research Design", "RD", "Method", "Justify", "The overall plan linking question to evidence."),
    ("Endogeneity", "En", "Method", "Address", "Bias from omitted variables, simultaneity or selection."),
    ("Effect Size", "ES", "Analysis", "Report", "How large an observed relationship is."),
    ("Robustness Check", "RC", "Analysis", "Report", "Re-estimation under alternative assumptions."),
    ("Replication", "Rp", "Integrity", "Encourage", "Repeating a study to see whether findings hold."),
    ("Transparency", "Tr", "Integrity", "Disclose", "Open reporting of data, code and decisions."),
    ("Contribution", "Cn", "Framing", "Articulate", "What the study adds to existing knowledge."),
];

const COLUMNS: [&str; 7] = [
    "Element No",
    "Element Name",
    "Symbol",
    "Category",
    "Action",
    "Definition",
    "AMJ Article Reference",
];

fn reference(i: usize) -> String {
    format!("AMJ editorial essay, vol. {}, issue {}", 50 + i / 4, 1 + i % 6)
}

fn build_batch() -> Result<RecordBatch> {
    let strings = |pick: fn(&Element) -> &'static str| -> ArrayRef {
        Arc::new(StringArray::from(ELEMENTS.iter().map(pick).collect::<Vec<_>>()))
    };

    let numbers: ArrayRef = Arc::new(Int64Array::from(
        (1..=ELEMENTS.len() as i64).collect::<Vec<_>>(),
    ));
    let references: ArrayRef = Arc::new(StringArray::from(
        (0..ELEMENTS.len()).map(reference).collect::<Vec<_>>(),
    ));

    let schema = Arc::new(Schema::new(
        COLUMNS
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let dtype = if i == 0 { DataType::Int64 } else { DataType::Utf8 };
                Field::new(*name, dtype, false)
            })
            .collect::<Vec<_>>(),
    ));

    RecordBatch::try_new(
        schema,
        vec![
            numbers,
            strings(|e| e.0),
            strings(|e| e.1),
            strings(|e| e.2),
            strings(|e| e.3),
            strings(|e| e.4),
            references,
        ],
    )
    .context("building record batch")
}

fn write_parquet(batch: &RecordBatch, path: &str) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_csv(path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(COLUMNS)?;
    for (i, &(name, symbol, category, action, definition)) in ELEMENTS.iter().enumerate() {
        let no = (i + 1).to_string();
        let article = reference(i);
        writer.write_record([
            no.as_str(),
            name,
            symbol,
            category,
            action,
            definition,
            article.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let batch = build_batch()?;
    write_parquet(&batch, "sample_elements.parquet")?;
    write_csv("sample_elements.csv")?;

    println!(
        "Wrote {} elements to sample_elements.parquet and sample_elements.csv",
        ELEMENTS.len()
    );
    Ok(())
}
