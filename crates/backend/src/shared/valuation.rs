//! Recovery valuation for returned containers.
//!
//! Every screen and the bulk import go through these two functions; the
//! weight formula exists exactly once. The calculator has no opinion about
//! destinations: it always computes, and callers decide whether the value is
//! surfaced (only value-bearing destinations keep it).

use contracts::domain::a001_product_profile::ProductProfile;
use contracts::enums::Destination;
use thiserror::Error;

/// Fill percentage at or above which a return goes back to stock.
pub const STOCK_MIN_FILL_PERCENT: f64 = 15.0;
/// Fill percentage at or above which a return is kept for warranty swaps.
pub const WARRANTY_MIN_FILL_PERCENT: f64 = 5.0;

#[derive(Debug, Error)]
pub enum ValuationError {
    /// Catalog invariants (grammage > 0, capacity > 0) were violated; the
    /// calculator signals instead of dividing.
    #[error("invalid product profile '{model}': {reason}")]
    InvalidProductProfile { model: String, reason: String },
}

/// Outcome of weighing a returned container against its catalog profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recovery {
    /// Usable mass still inside, grams; floored at zero
    pub remaining_grammage_g: f64,
    /// Remaining mass as a percentage of the profile grammage
    pub fill_percent: f64,
    /// Estimated reclaimable value, never negative
    pub recovered_value: f64,
}

/// Map a scale reading to remaining mass, fill percentage and value.
pub fn compute_recovery(
    measured_weight_g: f64,
    profile: &ProductProfile,
) -> Result<Recovery, ValuationError> {
    if profile.grammage_g <= 0.0 {
        return Err(ValuationError::InvalidProductProfile {
            model: profile.model.clone(),
            reason: format!("grammage must be positive, got {}", profile.grammage_g),
        });
    }
    if profile.sheet_capacity <= 0 {
        return Err(ValuationError::InvalidProductProfile {
            model: profile.model.clone(),
            reason: format!(
                "sheet capacity must be positive, got {}",
                profile.sheet_capacity
            ),
        });
    }

    let remaining_grammage_g = (measured_weight_g - profile.empty_weight_g).max(0.0);
    let fill_percent = remaining_grammage_g / profile.grammage_g * 100.0;
    let remaining_sheets = fill_percent / 100.0 * profile.sheet_capacity as f64;
    let recovered_value = (remaining_sheets * profile.price_per_sheet).max(0.0);

    Ok(Recovery {
        remaining_grammage_g,
        fill_percent,
        recovered_value,
    })
}

/// Classify a fill percentage into a destination.
///
/// Total over all inputs: values outside [0, 100] are treated as the nearest
/// boundary. Lower bounds are inclusive, so exactly 15 is Stock and exactly
/// 5 is Warranty; downstream reporting depends on these tie-breaks.
pub fn classify(fill_percent: f64) -> Destination {
    let fill = fill_percent.clamp(0.0, 100.0);
    if fill >= STOCK_MIN_FILL_PERCENT {
        Destination::Stock
    } else if fill >= WARRANTY_MIN_FILL_PERCENT {
        Destination::Warranty
    } else {
        Destination::Discard
    }
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
    fn test_worked_example() {
        let recovery = compute_recovery(125.5, &profile()).unwrap();
        assert!((recovery.remaining_grammage_g - 75.5).abs() < 1e-9);
        assert!((recovery.fill_percent - 16.777_777_777_8).abs() < 1e-6);
        // 16.78% of 2700 sheets at 0.05 each
        let expected = 75.5 / 450.0 * 2700.0 * 0.05;
        assert!((recovery.recovered_value - expected).abs() < 1e-9);
        assert_eq!(classify(recovery.fill_percent), Destination::Stock);
    }

    #[test]
    fn test_weight_at_or_below_empty_floors_to_zero() {
        for weight in [50.0, 49.9, 10.0, 0.0] {
            let recovery = compute_recovery(weight, &profile()).unwrap();
            assert_eq!(recovery.remaining_grammage_g, 0.0);
            assert_eq!(recovery.fill_percent, 0.0);
            assert_eq!(recovery.recovered_value, 0.0);
        }
    }

    #[test]
    fn test_invalid_profile_signals_instead_of_dividing() {
        let mut bad = profile();
        bad.grammage_g = 0.0;
        assert!(matches!(
            compute_recovery(100.0, &bad),
            Err(ValuationError::InvalidProductProfile { .. })
        ));

        let mut bad = profile();
        bad.sheet_capacity = 0;
        assert!(compute_recovery(100.0, &bad).is_err());
    }

    #[test]
    fn test_classifier_boundaries() {
        assert_eq!(classify(15.0), Destination::Stock);
        assert_eq!(classify(14.999), Destination::Warranty);
        assert_eq!(classify(5.0), Destination::Warranty);
        assert_eq!(classify(4.999), Destination::Discard);
    }

    #[test]
    fn test_classifier_clamps_out_of_range() {
        assert_eq!(classify(-3.0), Destination::Discard);
        assert_eq!(classify(250.0), Destination::Stock);
    }

    #[test]
    fn test_classifier_is_monotonic() {
        let rank = |d: Destination| match d {
            Destination::Discard => 0,
            Destination::Warranty => 1,
            _ => 2,
        };
        let mut previous = 0;
        for step in 0..=1000 {
            let fill = step as f64 / 10.0;
            let current = rank(classify(fill));
            assert!(current >= previous, "rank dropped at fill {}", fill);
            previous = current;
        }
    }
}
