use crate::application::{CategoryRow, ExpenseReport, SummaryRow};
use crate::domain::format_amount;

/// Printed in place of a table that has no rows.
pub const NO_EXPENSES: &str = "No expenses found for the selected criteria.";

/// A table column: a header and how to render one row's cell.
pub struct Column<R> {
    pub header: &'static str,
    pub cell: fn(&R) -> String,
}

impl<R> Column<R> {
    pub fn new(header: &'static str, cell: fn(&R) -> String) -> Self {
        Self { header, cell }
    }
}

/// Render rows as a left-justified, fixed-width text table.
///
/// Each column is as wide as its widest cell or header. Columns are
/// separated by two spaces and a dashed divider follows the header.
pub fn render_table<R>(rows: &[R], columns: &[Column<R>]) -> String {
    if rows.is_empty() {
        return NO_EXPENSES.to_string();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|column| (column.cell)(row)).collect())
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.header.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = join_padded(columns.iter().map(|c| c.header), &widths);
    let divider = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ");
    let body = cells
        .iter()
        .map(|row| join_padded(row.iter().map(String::as_str), &widths))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n{}\n{}", header, divider, body)
}

fn join_padded<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn render_summary(rows: &[SummaryRow]) -> String {
    render_table(
        rows,
        &[
            Column::new("Currency", |r: &SummaryRow| r.currency.clone()),
            Column::new("My total share", |r: &SummaryRow| format_amount(r.owed)),
            Column::new("Total I paid", |r: &SummaryRow| format_amount(r.paid)),
        ],
    )
}

pub fn render_categories(rows: &[CategoryRow]) -> String {
    render_table(
        rows,
        &[
            Column::new("Currency", |r: &CategoryRow| r.currency.clone()),
            Column::new("Category", |r: &CategoryRow| r.category.clone()),
            Column::new("My share", |r: &CategoryRow| format_amount(r.owed)),
        ],
    )
}

/// The full text report: date range, summary table, category table.
pub fn render_report(report: &ExpenseReport) -> String {
    format!(
        "Date range: {}\n\nSUMMARY (non-payment expenses only)\n{}\n\nCATEGORY TOTALS (by my share)\n{}\n",
        report.window.describe(),
        render_summary(&report.summary),
        render_categories(&report.categories)
    )
}
