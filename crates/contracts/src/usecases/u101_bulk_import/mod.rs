pub mod request;
pub mod response;

pub use request::{ImportRequest, ImportRow, MissingCustomerIdPolicy};
pub use response::{ImportOutcome, RowError};

use crate::usecases::common::UseCaseMetadata;

pub struct BulkImport;

impl UseCaseMetadata for BulkImport {
    fn usecase_index() -> &'static str {
        "u101"
    }

    fn usecase_name() -> &'static str {
        "bulk_import"
    }

    fn display_name() -> &'static str {
        "Importação em Massa de Retornos"
    }

    fn description() -> &'static str {
        "Carga de retornos de toner a partir de planilha CSV/XLSX"
    }
}
