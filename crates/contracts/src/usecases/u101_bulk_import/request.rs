use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column names the import understands. Readers map file headers onto these
/// keys; anything else in the file is ignored.
pub const COL_CUSTOMER_ID: &str = "id_cliente";
pub const COL_MODEL: &str = "modelo";
pub const COL_MEASURED_WEIGHT: &str = "peso_aferido";
pub const COL_BRANCH: &str = "filial";
pub const COL_DESTINATION: &str = "destino_final";
pub const COL_REGISTERED_AT: &str = "data_registro";

/// One spreadsheet line, untouched: raw cell text keyed by expected column
/// name, plus its 1-based position for error messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRow {
    /// 1-based line number in the source file (header excluded)
    pub line: usize,
    pub cells: HashMap<String, String>,
}

impl ImportRow {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            cells: HashMap::new(),
        }
    }

    /// Cell value, with blank cells treated as absent.
    pub fn cell(&self, column: &str) -> Option<&str> {
        self.cells
            .get(column)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

/// What to do when a row's customer id is missing or not a positive integer.
///
/// The legacy system silently fell back to customer 1; here the choice is
/// explicit configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingCustomerIdPolicy {
    /// Reject the row with a descriptive error
    Reject,
    /// Attribute the row to a fixed customer id
    DefaultTo(i64),
}

/// Bulk import request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    pub rows: Vec<ImportRow>,

    #[serde(rename = "onMissingCustomerId")]
    pub on_missing_customer_id: MissingCustomerIdPolicy,
}
