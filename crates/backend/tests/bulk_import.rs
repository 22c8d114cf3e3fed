//! End-to-end bulk import runs over the in-memory stores: file parsing,
//! per-row validation, valuation against the catalog and the export
//! round trip.

use std::sync::Arc;

use backend::domain::a001_product_profile::repository::{
    InMemoryProductProfileStore, ProductProfileStore,
};
use backend::domain::a002_return_record::repository::InMemoryReturnRecordStore;
use backend::shared::config::ImportConfig;
use backend::shared::export;
use backend::usecases::u101_bulk_import::{row_reader, ImportExecutor};
use contracts::domain::a001_product_profile::ProductProfile;
use contracts::domain::common::Origin;
use contracts::enums::Destination;
use contracts::usecases::u101_bulk_import::request::{ImportRequest, MissingCustomerIdPolicy};

fn hp_26a_profile() -> ProductProfile {
    ProductProfile::new_for_insert(
        "PRF-HP26A".into(),
        "Toner HP 26A".into(),
        "HP-26A".into(),
        50.0,
        500.0,
        2700,
        0.05,
        None,
    )
}

struct Fixture {
    profiles: Arc<InMemoryProductProfileStore>,
    executor: ImportExecutor,
}

async fn fixture_with_catalog() -> Fixture {
    let profiles = Arc::new(InMemoryProductProfileStore::new());
    let records = Arc::new(InMemoryReturnRecordStore::new());
    profiles
        .create(hp_26a_profile())
        .await
        .expect("seed profile");

    let executor = ImportExecutor::new(profiles.clone(), records, ImportConfig::default());

    Fixture { profiles, executor }
}

fn request(csv: &str, policy: MissingCustomerIdPolicy) -> ImportRequest {
    let rows = row_reader::rows_from_csv(csv.as_bytes()).expect("csv parses");
    ImportRequest {
        rows,
        on_missing_customer_id: policy,
    }
}

#[tokio::test]
async fn test_one_bad_row_does_not_abort_the_batch() {
    let fixture = fixture_with_catalog().await;

    let mut csv =
        String::from("id_cliente,modelo,peso_aferido,filial,destino_final,data_registro\n");
    for i in 1..=10 {
        if i == 5 {
            // Missing the mandatory modelo column
            csv.push_str(&format!("{},,125.5,Matriz,Estoque,16/06/2024\n", i));
        } else {
            csv.push_str(&format!("{},HP-26A,125.5,Matriz,Estoque,16/06/2024\n", i));
        }
    }

    let outcome = fixture
        .executor
        .run(request(&csv, MissingCustomerIdPolicy::Reject))
        .await;

    assert_eq!(outcome.imported_count(), 9);
    assert_eq!(outcome.error_count(), 1);
    assert_eq!(outcome.errors[0].row, 5);
    assert_eq!(outcome.errors[0].code, "VALIDATION_ERROR");
    assert!(outcome.errors[0].message.starts_with("Linha 5:"));
    assert_eq!(outcome.summary(), "9 importados, 1 erros");
}

#[tokio::test]
async fn test_valuation_runs_for_known_model() {
    let fixture = fixture_with_catalog().await;

    let csv = "id_cliente,modelo,peso_aferido,filial,destino_final,data_registro\n\
               7,HP-26A,125.5,Matriz,Estoque,16/06/2024\n";
    let outcome = fixture
        .executor
        .run(request(csv, MissingCustomerIdPolicy::Reject))
        .await;

    assert_eq!(outcome.imported_count(), 1);
    let record = &outcome.imported[0];
    assert_eq!(record.customer_id, 7);
    assert_eq!(record.destination, Destination::Stock);
    assert_eq!(record.origin, Origin::BulkImport);

    // remaining 75.5g of 450g grammage, 2700 sheets at 0.05 per sheet
    let expected = (75.5 / 450.0) * 2700.0 * 0.05;
    let value = record.recovered_value.expect("value-bearing destination");
    assert!((value - expected).abs() < 1e-9);
}

#[tokio::test]
async fn test_unknown_model_imports_without_value() {
    let fixture = fixture_with_catalog().await;

    let csv = "id_cliente,modelo,peso_aferido,filial,destino_final,data_registro\n\
               7,XX-99,125.5,Matriz,Estoque,16/06/2024\n";
    let outcome = fixture
        .executor
        .run(request(csv, MissingCustomerIdPolicy::Reject))
        .await;

    assert_eq!(outcome.imported_count(), 1);
    assert_eq!(outcome.imported[0].recovered_value, None);
}

#[tokio::test]
async fn test_discard_destination_never_bears_value() {
    let fixture = fixture_with_catalog().await;

    let csv = "id_cliente,modelo,peso_aferido,filial,destino_final,data_registro\n\
               7,HP-26A,125.5,Matriz,Descarte,16/06/2024\n";
    let outcome = fixture
        .executor
        .run(request(csv, MissingCustomerIdPolicy::Reject))
        .await;

    assert_eq!(outcome.imported_count(), 1);
    assert_eq!(outcome.imported[0].destination, Destination::Discard);
    assert_eq!(outcome.imported[0].recovered_value, None);
}

#[tokio::test]
async fn test_missing_customer_id_reject_policy() {
    let fixture = fixture_with_catalog().await;

    let csv = "id_cliente,modelo,peso_aferido,filial,destino_final,data_registro\n\
               ,HP-26A,125.5,Matriz,Estoque,16/06/2024\n\
               abc,HP-26A,125.5,Matriz,Estoque,16/06/2024\n";
    let outcome = fixture
        .executor
        .run(request(csv, MissingCustomerIdPolicy::Reject))
        .await;

    assert_eq!(outcome.imported_count(), 0);
    assert_eq!(outcome.error_count(), 2);
    assert!(outcome.errors[0].message.contains("id_cliente"));
    assert!(outcome.errors.iter().all(|e| e.code == "VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_missing_customer_id_default_policy() {
    let fixture = fixture_with_catalog().await;

    let csv = "id_cliente,modelo,peso_aferido,filial,destino_final,data_registro\n\
               ,HP-26A,125.5,Matriz,Estoque,16/06/2024\n";
    let outcome = fixture
        .executor
        .run(request(csv, MissingCustomerIdPolicy::DefaultTo(1)))
        .await;

    assert_eq!(outcome.imported_count(), 1);
    assert_eq!(outcome.imported[0].customer_id, 1);
}

#[tokio::test]
async fn test_branch_and_destination_defaults() {
    let fixture = fixture_with_catalog().await;

    let csv = "id_cliente,modelo,peso_aferido,filial,destino_final,data_registro\n\
               7,HP-26A,125.5,,,16/06/2024\n";
    let outcome = fixture
        .executor
        .run(request(csv, MissingCustomerIdPolicy::Reject))
        .await;

    assert_eq!(outcome.imported_count(), 1);
    assert_eq!(outcome.imported[0].branch, "Matriz");
    assert_eq!(outcome.imported[0].destination, Destination::Stock);
}

#[tokio::test]
async fn test_unknown_destination_is_rejected() {
    let fixture = fixture_with_catalog().await;

    let csv = "id_cliente,modelo,peso_aferido,filial,destino_final,data_registro\n\
               7,HP-26A,125.5,Matriz,Sucata,16/06/2024\n";
    let outcome = fixture
        .executor
        .run(request(csv, MissingCustomerIdPolicy::Reject))
        .await;

    assert_eq!(outcome.imported_count(), 0);
    assert!(outcome.errors[0].message.contains("Sucata"));
}

#[tokio::test]
async fn test_unreadable_date_falls_back_to_today() {
    let fixture = fixture_with_catalog().await;

    let csv = "id_cliente,modelo,peso_aferido,filial,destino_final,data_registro\n\
               7,HP-26A,125.5,Matriz,Estoque,sem data\n";
    let outcome = fixture
        .executor
        .run(request(csv, MissingCustomerIdPolicy::Reject))
        .await;

    assert_eq!(outcome.imported_count(), 1);
    assert_eq!(
        outcome.imported[0].registered_at,
        chrono::Utc::now().date_naive()
    );
}

#[tokio::test]
async fn test_excel_serial_dates_import() {
    let fixture = fixture_with_catalog().await;

    let csv = "id_cliente,modelo,peso_aferido,filial,destino_final,data_registro\n\
               7,HP-26A,125.5,Matriz,Estoque,45458\n";
    let outcome = fixture
        .executor
        .run(request(csv, MissingCustomerIdPolicy::Reject))
        .await;

    assert_eq!(outcome.imported_count(), 1);
    assert_eq!(
        outcome.imported[0].registered_at,
        chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    );
}

#[tokio::test]
async fn test_xlsx_import_preserves_serial_dates() {
    let fixture = fixture_with_catalog().await;

    let rows = row_reader::rows_from_xlsx(include_bytes!("fixtures/returns.xlsx"))
        .expect("workbook parses");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].cell("id_cliente"), Some("7"));
    assert_eq!(rows[0].cell("modelo"), Some("HP-26A"));
    assert_eq!(rows[0].cell("peso_aferido"), Some("125.5"));
    // The date cell arrives as its raw serial for the normalizer
    assert_eq!(rows[0].cell("data_registro"), Some("45458"));

    let outcome = fixture
        .executor
        .run(ImportRequest {
            rows,
            on_missing_customer_id: MissingCustomerIdPolicy::Reject,
        })
        .await;

    assert_eq!(outcome.imported_count(), 1);
    let record = &outcome.imported[0];
    assert_eq!(record.customer_id, 7);
    assert_eq!(record.branch, "Matriz");
    assert_eq!(record.destination, Destination::Stock);
    assert_eq!(
        record.registered_at,
        chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    );
    let expected = (75.5 / 450.0) * 2700.0 * 0.05;
    let value = record.recovered_value.expect("value-bearing destination");
    assert!((value - expected).abs() < 1e-9);
}

#[tokio::test]
async fn test_export_then_import_round_trip() {
    let fixture = fixture_with_catalog().await;

    let csv = "id_cliente,modelo,peso_aferido,filial,destino_final,data_registro\n\
               7,HP-26A,125.5,Filial Sul,Garantia,16/06/2024\n";
    let first = fixture
        .executor
        .run(request(csv, MissingCustomerIdPolicy::Reject))
        .await;
    assert_eq!(first.imported_count(), 1);

    let exported = export::export_csv(&first.imported).expect("export succeeds");

    // Re-import the export into a fresh record store
    let executor = ImportExecutor::new(
        fixture.profiles.clone(),
        Arc::new(InMemoryReturnRecordStore::new()),
        ImportConfig::default(),
    );
    let second = executor
        .run(request(&exported, MissingCustomerIdPolicy::Reject))
        .await;

    assert_eq!(second.imported_count(), 1);
    let record = &second.imported[0];
    assert_eq!(record.customer_id, 7);
    assert_eq!(record.product_model, "HP-26A");
    assert_eq!(record.branch, "Filial Sul");
    assert_eq!(record.destination, Destination::Warranty);
    assert_eq!(
        record.registered_at,
        chrono::NaiveDate::from_ymd_opt(2024, 6, 16).unwrap()
    );
    // The export carries no weight column, so no value is recomputed
    assert_eq!(record.recovered_value, None);
}
