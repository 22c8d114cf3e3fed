//! File boundary of the bulk import: turns an uploaded CSV or XLSX into
//! [`ImportRow`]s. Files are read fully buffered; nothing here talks to the
//! store or validates business rules.

use calamine::{Data, Reader, Xlsx};
use contracts::usecases::u101_bulk_import::request::{
    ImportRow, COL_BRANCH, COL_CUSTOMER_ID, COL_DESTINATION, COL_MEASURED_WEIGHT, COL_MODEL,
    COL_REGISTERED_AT,
};
use std::io::Cursor;

/// Positional column order assumed when a file has no header row
/// (the template's order).
const DEFAULT_COLUMN_ORDER: [&str; 6] = [
    COL_CUSTOMER_ID,
    COL_MODEL,
    COL_MEASURED_WEIGHT,
    COL_BRANCH,
    COL_DESTINATION,
    COL_REGISTERED_AT,
];

/// Parse CSV bytes (UTF-8, optional BOM, comma or semicolon delimited,
/// optional header row) into import rows.
pub fn rows_from_csv(bytes: &[u8]) -> anyhow::Result<Vec<ImportRow>> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim_start_matches('\u{FEFF}');

    let delimiter = sniff_delimiter(text);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        raw_rows.push(record.iter().map(|cell| cell.trim().to_string()).collect());
    }

    Ok(assemble_rows(raw_rows))
}

/// Parse XLSX bytes (first sheet, first row as header) into import rows.
/// Numeric cells keep their raw form so Excel serial dates survive for the
/// date normalizer.
pub fn rows_from_xlsx(bytes: &[u8]) -> anyhow::Result<Vec<ImportRow>> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow::anyhow!("Arquivo XLSX sem planilhas"))??;

    let raw_rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(assemble_rows(raw_rows))
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::String(s) => s.trim().to_string(),
        Data::Bool(b) => b.to_string(),
        // Keep the raw serial; the date normalizer knows the epoch offset
        Data::DateTime(dt) => format_number(dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        _ => String::new(),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn sniff_delimiter(text: &str) -> u8 {
    let first_line = text.lines().next().unwrap_or("");
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// Map a header cell to one of the expected column names; `None` for
/// columns the import does not consume (e.g. an exported valor_recuperado).
fn match_header(cell: &str) -> Option<&'static str> {
    let normalized = cell.trim().trim_start_matches('\u{FEFF}').to_lowercase();
    match normalized.as_str() {
        "id_cliente" | "cliente" => Some(COL_CUSTOMER_ID),
        "modelo" => Some(COL_MODEL),
        "peso_aferido" | "peso" => Some(COL_MEASURED_WEIGHT),
        "filial" => Some(COL_BRANCH),
        "destino_final" | "destino" => Some(COL_DESTINATION),
        "data_registro" | "data" => Some(COL_REGISTERED_AT),
        _ => None,
    }
}

/// Turn raw cell grids into keyed rows. When the first line contains at
/// least one recognized header the mapping follows it; otherwise every line
/// is data in the template's column order.
fn assemble_rows(raw_rows: Vec<Vec<String>>) -> Vec<ImportRow> {
    let mut iter = raw_rows.into_iter().peekable();

    let header_mapping: Option<Vec<Option<&'static str>>> = iter.peek().and_then(|first| {
        let mapping: Vec<Option<&'static str>> =
            first.iter().map(|cell| match_header(cell)).collect();
        if mapping.iter().any(|m| m.is_some()) {
            Some(mapping)
        } else {
            None
        }
    });

    let mapping: Vec<Option<&'static str>> = match header_mapping {
        Some(mapping) => {
            iter.next();
            mapping
        }
        None => DEFAULT_COLUMN_ORDER.iter().map(|c| Some(*c)).collect(),
    };

    let mut rows = Vec::new();
    for (index, cells) in iter.enumerate() {
        // Skip fully blank lines (trailing newlines in hand-edited files)
        if cells.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let mut row = ImportRow::new(index + 1);
        for (position, value) in cells.into_iter().enumerate() {
            if let Some(Some(column)) = mapping.get(position) {
                row.cells.insert((*column).to_string(), value);
            }
        }
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_with_header_and_commas() {
        let csv = "id_cliente,modelo,peso_aferido,filial,destino_final,data_registro\n\
                   7,HP-26A,125.5,Matriz,Estoque,16/06/2024\n";
        let rows = rows_from_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line, 1);
        assert_eq!(rows[0].cell(COL_MODEL), Some("HP-26A"));
        assert_eq!(rows[0].cell(COL_REGISTERED_AT), Some("16/06/2024"));
    }

    #[test]
    fn test_template_semicolons_and_bom() {
        let template = crate::shared::export::import_template_csv();
        let rows = rows_from_csv(template.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cell(COL_CUSTOMER_ID), Some("1"));
        assert_eq!(rows[0].cell(COL_DESTINATION), Some("Estoque"));
    }

    #[test]
    fn test_headerless_file_uses_template_order() {
        let csv = "7,HP-26A,125.5,Matriz,Estoque,16/06/2024\n";
        let rows = rows_from_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cell(COL_BRANCH), Some("Matriz"));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let csv = "7,HP-26A,125.5,Matriz,Estoque,16/06/2024\n\n,,,,,\n";
        let rows = rows_from_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_exported_csv_maps_back() {
        // The export carries valor_recuperado, which the import ignores
        let csv = "id_cliente,modelo,filial,destino_final,valor_recuperado,data_registro\n\
                   7,HP-26A,Matriz,Garantia,,16/06/2024\n";
        let rows = rows_from_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].cell(COL_DESTINATION), Some("Garantia"));
        assert_eq!(rows[0].cell(COL_MEASURED_WEIGHT), None);
        assert_eq!(rows[0].cell("valor_recuperado"), None);
    }
}
