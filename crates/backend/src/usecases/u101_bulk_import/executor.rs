//! Bulk import executor: validates each row, fills in defaults, and writes
//! through the return record service. Rows are independent; one bad line
//! never aborts the batch.

use crate::domain::a001_product_profile::repository::ProductProfileStore;
use crate::domain::a002_return_record::repository::ReturnRecordStore;
use crate::domain::a002_return_record::service as return_record_service;
use crate::shared::config::ImportConfig;
use crate::shared::dates;
use contracts::domain::a002_return_record::{ReturnRecord, ReturnRecordDto};
use contracts::domain::common::Origin;
use contracts::enums::Destination;
use contracts::usecases::common::{UseCaseError, UseCaseResult};
use contracts::usecases::u101_bulk_import::request::{
    ImportRequest, ImportRow, MissingCustomerIdPolicy, COL_BRANCH, COL_CUSTOMER_ID,
    COL_DESTINATION, COL_MEASURED_WEIGHT, COL_MODEL, COL_REGISTERED_AT,
};
use contracts::usecases::u101_bulk_import::response::{ImportOutcome, RowError};
use std::sync::Arc;

pub struct ImportExecutor {
    profiles: Arc<dyn ProductProfileStore>,
    records: Arc<dyn ReturnRecordStore>,
    config: ImportConfig,
}

impl ImportExecutor {
    pub fn new(
        profiles: Arc<dyn ProductProfileStore>,
        records: Arc<dyn ReturnRecordStore>,
        config: ImportConfig,
    ) -> Self {
        Self {
            profiles,
            records,
            config,
        }
    }

    /// Process a batch sequentially. Every row either lands in `imported` or
    /// produces exactly one coded entry in `errors`.
    pub async fn run(&self, request: ImportRequest) -> ImportOutcome {
        let mut outcome = ImportOutcome::default();

        tracing::info!("Starting bulk import of {} rows", request.rows.len());

        for row in &request.rows {
            match self.process_row(row, request.on_missing_customer_id).await {
                Ok(record) => outcome.imported.push(record),
                Err(e) => outcome
                    .errors
                    .push(RowError::from_usecase_error(row.line, &e)),
            }
        }

        tracing::info!("Bulk import finished: {}", outcome.summary());

        outcome
    }

    async fn process_row(
        &self,
        row: &ImportRow,
        policy: MissingCustomerIdPolicy,
    ) -> UseCaseResult<ReturnRecord> {
        let customer_id = self.resolve_customer_id(row, policy)?;

        let product_model = match row.cell(COL_MODEL) {
            Some(model) => model.to_string(),
            None => return Err(UseCaseError::validation("modelo é obrigatório")),
        };

        let destination_label = row
            .cell(COL_DESTINATION)
            .unwrap_or(self.config.default_destination.as_str());
        let destination = match Destination::from_label(destination_label) {
            Some(d) => d,
            None => {
                return Err(UseCaseError::validation(format!(
                    "destino_final desconhecido: '{}'",
                    destination_label
                )))
            }
        };

        let branch = row
            .cell(COL_BRANCH)
            .unwrap_or(self.config.default_branch.as_str())
            .to_string();

        let raw_date = row.cell(COL_REGISTERED_AT).unwrap_or("");
        let normalized = dates::normalize(raw_date);
        if normalized.assumed_today {
            tracing::warn!(
                "Linha {}: data_registro não reconhecida ('{}'), usando a data atual",
                row.line,
                raw_date
            );
        }

        let measured_weight_g = match row.cell(COL_MEASURED_WEIGHT) {
            Some(raw) => match raw.replace(',', ".").parse::<f64>() {
                Ok(w) if w >= 0.0 => Some(w),
                Ok(_) => {
                    return Err(UseCaseError::validation(
                        "peso_aferido não pode ser negativo",
                    ))
                }
                Err(_) => {
                    return Err(UseCaseError::validation(format!(
                        "peso_aferido inválido: '{}'",
                        raw
                    )))
                }
            },
            None => None,
        };

        let dto = ReturnRecordDto {
            id: None,
            code: None,
            description: None,
            comment: None,
            customer_id,
            product_model,
            measured_weight_g,
            destination,
            branch,
            registered_at: normalized.date,
        };

        return_record_service::create(
            self.profiles.as_ref(),
            self.records.as_ref(),
            dto,
            Origin::BulkImport,
        )
        .await
        .map_err(|e| UseCaseError::store(e.to_string()))
    }

    fn resolve_customer_id(
        &self,
        row: &ImportRow,
        policy: MissingCustomerIdPolicy,
    ) -> UseCaseResult<i64> {
        let parsed = row
            .cell(COL_CUSTOMER_ID)
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|id| *id > 0);

        match (parsed, policy) {
            (Some(id), _) => Ok(id),
            (None, MissingCustomerIdPolicy::DefaultTo(fallback)) => {
                tracing::warn!(
                    "Linha {}: id_cliente ausente ou inválido, atribuindo ao cliente {}",
                    row.line,
                    fallback
                );
                Ok(fallback)
            }
            (None, MissingCustomerIdPolicy::Reject) => {
                Err(UseCaseError::validation("id_cliente ausente ou inválido"))
            }
        }
    }
}
