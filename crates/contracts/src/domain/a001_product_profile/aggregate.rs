use crate::domain::common::{
    AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, Origin,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Typed id for product profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductProfileId(pub Uuid);

impl ProductProfileId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for ProductProfileId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }
    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ProductProfileId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// Catalog profile of one toner model (aggregate).
///
/// Immutable once created: corrections are delete + recreate, so past
/// valuations stay reproducible. There is deliberately no `update(dto)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductProfile {
    #[serde(flatten)]
    pub base: BaseAggregate<ProductProfileId>,

    /// Model code used by return rows to reference this profile (e.g. "HP-26A")
    pub model: String,

    /// Weight of the empty container, grams
    #[serde(rename = "emptyWeightG")]
    pub empty_weight_g: f64,

    /// Weight of a factory-full container, grams
    #[serde(rename = "fullWeightG")]
    pub full_weight_g: f64,

    /// Usable fill mass, grams (full minus empty)
    #[serde(rename = "grammageG")]
    pub grammage_g: f64,

    /// Rated page yield of a full container
    #[serde(rename = "sheetCapacity")]
    pub sheet_capacity: i32,

    /// Monetary value of one printed sheet
    #[serde(rename = "pricePerSheet")]
    pub price_per_sheet: f64,
}

impl ProductProfile {
    pub fn new_for_insert(
        code: String,
        description: String,
        model: String,
        empty_weight_g: f64,
        full_weight_g: f64,
        sheet_capacity: i32,
        price_per_sheet: f64,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(ProductProfileId::new_v4(), code, description);
        base.comment = comment;
        Self {
            base,
            model,
            empty_weight_g,
            full_weight_g,
            grammage_g: full_weight_g - empty_weight_g,
            sheet_capacity,
            price_per_sheet,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Descrição não pode ser vazia".into());
        }
        if self.model.trim().is_empty() {
            return Err("Modelo é obrigatório".into());
        }
        if self.empty_weight_g < 0.0 {
            return Err("Peso vazio não pode ser negativo".into());
        }
        if self.grammage_g <= 0.0 {
            return Err("Gramatura deve ser positiva".into());
        }
        if self.sheet_capacity <= 0 {
            return Err("Capacidade de folhas deve ser positiva".into());
        }
        if self.price_per_sheet < 0.0 {
            return Err("Preço por folha não pode ser negativo".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for ProductProfile {
    type Id = ProductProfileId;
    fn id(&self) -> Self::Id {
        self.base.id
    }
    fn code(&self) -> &str {
        &self.base.code
    }
    fn description(&self) -> &str {
        &self.base.description
    }
    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }
    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }
    fn aggregate_index() -> &'static str {
        "a001"
    }
    fn collection_name() -> &'static str {
        "product_profile"
    }
    fn element_name() -> &'static str {
        "Modelo de Toner"
    }
    fn list_name() -> &'static str {
        "Modelos de Toner"
    }
    fn origin() -> Origin {
        Origin::Manual
    }
}

// =============================================================================
// DTO
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductProfileDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub model: String,
    #[serde(rename = "emptyWeightG")]
    pub empty_weight_g: f64,
    #[serde(rename = "fullWeightG")]
    pub full_weight_g: f64,
    #[serde(rename = "sheetCapacity")]
    pub sheet_capacity: i32,
    #[serde(rename = "pricePerSheet")]
    pub price_per_sheet: f64,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_profile() -> ProductProfile {
        ProductProfile::new_for_insert(
            "PRF-TEST".into(),
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
    fn test_grammage_is_derived() {
        let profile = valid_profile();
        assert_eq!(profile.grammage_g, 450.0);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_zero_grammage_rejected() {
        let mut profile = valid_profile();
        profile.grammage_g = 0.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut profile = valid_profile();
        profile.sheet_capacity = 0;
        assert!(profile.validate().is_err());
    }
}
