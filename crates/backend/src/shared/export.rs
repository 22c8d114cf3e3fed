//! CSV export of record sets and the downloadable import template.
//!
//! The export is comma-delimited with a fixed column order so downstream
//! tooling can rely on positions. The template is the one file meant to be
//! opened in Excel directly, so it ships semicolon-delimited with a UTF-8
//! BOM for regional settings that treat commas as decimal separators.

use contracts::domain::a002_return_record::ReturnRecord;
use contracts::usecases::u101_bulk_import::request::{
    COL_BRANCH, COL_CUSTOMER_ID, COL_DESTINATION, COL_MEASURED_WEIGHT, COL_MODEL,
    COL_REGISTERED_AT,
};

const EXPORT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Types that can be flattened into CSV rows.
pub trait CsvExportable {
    /// Column headers, in output order
    fn headers() -> Vec<&'static str>;

    /// The row values, matching `headers()` positionally
    fn to_csv_row(&self) -> Vec<String>;
}

impl CsvExportable for ReturnRecord {
    fn headers() -> Vec<&'static str> {
        vec![
            COL_CUSTOMER_ID,
            COL_MODEL,
            COL_BRANCH,
            COL_DESTINATION,
            "valor_recuperado",
            COL_REGISTERED_AT,
        ]
    }

    fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.customer_id.to_string(),
            self.product_model.clone(),
            self.branch.clone(),
            self.destination.label().to_string(),
            self.recovered_value
                .map(|v| format!("{:.2}", v))
                .unwrap_or_default(),
            self.registered_at.format(EXPORT_DATE_FORMAT).to_string(),
        ]
    }
}

/// Render the given (already filtered) items as a comma-delimited CSV
/// document with a header row.
pub fn export_csv<T: CsvExportable>(items: &[T]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(T::headers())?;
    for item in items {
        writer.write_record(item.to_csv_row())?;
    }
    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

/// The import template: expected columns plus one example row,
/// semicolon-delimited, BOM-prefixed.
pub fn import_template_csv() -> String {
    let header = [
        COL_CUSTOMER_ID,
        COL_MODEL,
        COL_MEASURED_WEIGHT,
        COL_BRANCH,
        COL_DESTINATION,
        COL_REGISTERED_AT,
    ]
    .join(";");
    let example = ["1", "HP-26A", "125.5", "Matriz", "Estoque", "16/06/2024"].join(";");
    format!("\u{FEFF}{}\n{}\n", header, example)
}
