use crate::domain::a002_return_record::ReturnRecord;
use crate::usecases::common::UseCaseError;
use serde::{Deserialize, Serialize};

/// One rejected row. `message` is user-facing, of the form "Linha {n}: {reason}";
/// `code` carries the machine-readable error code for clients that group
/// failures by kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    pub code: String,
    pub message: String,
}

impl RowError {
    pub fn from_usecase_error(row: usize, error: &UseCaseError) -> Self {
        Self {
            row,
            code: error.code.clone(),
            message: format!("Linha {}: {}", row, error.message),
        }
    }
}

/// Aggregate result of a bulk import run.
///
/// Rows are processed independently; a batch always yields both the stored
/// records and the full error list, never an early abort.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImportOutcome {
    pub imported: Vec<ReturnRecord>,
    pub errors: Vec<RowError>,
}

impl ImportOutcome {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// End-of-batch summary shown to the user.
    pub fn summary(&self) -> String {
        format!(
            "{} importados, {} erros",
            self.imported_count(),
            self.error_count()
        )
    }
}
