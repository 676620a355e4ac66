use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use super::render_report;
use crate::application::{AppError, ExpenseReport};
use crate::domain::format_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(AppError::UnknownFormat(s.to_string())),
        }
    }
}

/// Write `report` to `writer` in the given format.
pub fn write_report<W: Write>(report: &ExpenseReport, format: OutputFormat, mut writer: W) -> Result<()> {
    match format {
        OutputFormat::Table => write!(writer, "{}", render_report(report))?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, report)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => write_csv(report, &mut writer)?,
    }
    writer.flush()?;
    Ok(())
}

/// Write `report` to a file, replacing any previous content.
pub fn write_report_file(report: &ExpenseReport, format: OutputFormat, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    write_report(report, format, BufWriter::new(file))
}

/// One table for both views: `summary` rows leave category empty,
/// `category` rows leave paid empty.
fn write_csv<W: Write>(report: &ExpenseReport, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["section", "currency", "category", "owed", "paid"])?;

    for row in &report.summary {
        csv_writer.write_record([
            "summary",
            row.currency.as_str(),
            "",
            format_amount(row.owed).as_str(),
            format_amount(row.paid).as_str(),
        ])?;
    }

    for row in &report.categories {
        csv_writer.write_record([
            "category",
            row.currency.as_str(),
            row.category.as_str(),
            format_amount(row.owed).as_str(),
            "",
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
