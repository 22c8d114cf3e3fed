use super::repository::ReturnRecordStore;
use crate::domain::a001_product_profile::repository::ProductProfileStore;
use crate::shared::valuation::{self, Recovery, ValuationError};
use contracts::domain::a001_product_profile::ProductProfile;
use contracts::domain::a002_return_record::{ReturnRecord, ReturnRecordDto};
use contracts::domain::common::Origin;
use contracts::enums::Destination;
use uuid::Uuid;

/// Weigh-in suggestion for the registration form: computed recovery plus the
/// destination the fill percentage maps to.
pub fn suggest(
    profile: &ProductProfile,
    measured_weight_g: f64,
) -> Result<(Recovery, Destination), ValuationError> {
    let recovery = valuation::compute_recovery(measured_weight_g, profile)?;
    Ok((recovery, valuation::classify(recovery.fill_percent)))
}

/// Create one return record. The single funnel for both the form and the
/// bulk import: valuation runs here whenever a weight and a known profile
/// are available, and the value is kept only for value-bearing destinations.
pub async fn create(
    profiles: &dyn ProductProfileStore,
    records: &dyn ReturnRecordStore,
    dto: ReturnRecordDto,
    origin: Origin,
) -> anyhow::Result<ReturnRecord> {
    let model = dto.product_model.trim().to_string();

    let recovered_value = match (
        profiles.get_by_model(&model).await?,
        dto.measured_weight_g,
    ) {
        (Some(profile), Some(weight)) => match valuation::compute_recovery(weight, &profile) {
            Ok(recovery) if dto.destination.bears_value() => Some(recovery.recovered_value),
            Ok(_) => None,
            Err(e) => {
                // Catalog invariant violated; register without a value.
                tracing::warn!("Valuation skipped for model {}: {}", model, e);
                None
            }
        },
        _ => None,
    };

    let code = dto
        .code
        .clone()
        .unwrap_or_else(|| format!("RET-{}", Uuid::new_v4()));
    let description = dto
        .description
        .clone()
        .unwrap_or_else(|| format!("Retorno {} ({})", model, dto.destination.label()));

    let mut aggregate = ReturnRecord::new_for_insert(
        code,
        description,
        dto.customer_id,
        model,
        dto.measured_weight_g,
        dto.destination,
        recovered_value,
        dto.branch.trim().to_string(),
        dto.registered_at,
        origin,
        dto.comment,
    );

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    aggregate.before_write();

    records.create(aggregate).await
}

pub async fn list_all(records: &dyn ReturnRecordStore) -> anyhow::Result<Vec<ReturnRecord>> {
    records.list().await
}

pub async fn delete(records: &dyn ReturnRecordStore, id: Uuid) -> anyhow::Result<bool> {
    records.delete(id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ProductProfile {
        ProductProfile::new_for_insert(
            "PRF-26A".into(),
            "Toner HP 26A".into(),
            "HP-26A".into(),
            50.0,
            500.0,
            2700,
            0.05,
            None,
        )
    }

    #[test]
    fn test_suggest_worked_example() {
        let (recovery, destination) = suggest(&profile(), 125.5).unwrap();
        assert_eq!(destination, Destination::Stock);
        let expected = 75.5 / 450.0 * 2700.0 * 0.05;
        assert!((recovery.recovered_value - expected).abs() < 1e-9);
    }

    #[test]
    fn test_suggest_low_fill_maps_to_discard() {
        // 10g of 450g grammage is 2.2%, below the warranty band
        let (recovery, destination) = suggest(&profile(), 60.0).unwrap();
        assert_eq!(destination, Destination::Discard);
        assert!(recovery.fill_percent < 5.0);
    }

    #[test]
    fn test_suggest_propagates_invalid_profile() {
        let mut bad = profile();
        bad.grammage_g = 0.0;
        assert!(suggest(&bad, 100.0).is_err());
    }
}
