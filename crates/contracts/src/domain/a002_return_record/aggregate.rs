use crate::domain::common::{
    AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, Origin,
};
use crate::enums::Destination;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Typed id for return records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReturnRecordId(pub Uuid);

impl ReturnRecordId {
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

impl AggregateId for ReturnRecordId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }
    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ReturnRecordId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// One returned toner container (aggregate).
///
/// Written once, on form submit or bulk import; never updated afterwards.
/// Removal is a soft delete by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnRecord {
    #[serde(flatten)]
    pub base: BaseAggregate<ReturnRecordId>,

    /// Owning customer
    #[serde(rename = "customerId")]
    pub customer_id: i64,

    /// Model code referencing a001_product_profile
    #[serde(rename = "productModel")]
    pub product_model: String,

    /// Scale reading at intake, grams; absent on imports without a weight column
    #[serde(rename = "measuredWeightG")]
    pub measured_weight_g: Option<f64>,

    /// Assigned disposition
    #[serde(rename = "destinoFinal")]
    pub destination: Destination,

    /// Estimated reclaimable value; populated only for value-bearing destinations
    #[serde(rename = "recoveredValue")]
    pub recovered_value: Option<f64>,

    /// Branch the return was registered at
    #[serde(rename = "filial")]
    pub branch: String,

    /// Registration date (YYYY-MM-DD)
    #[serde(with = "serde_date")]
    #[serde(rename = "registeredAt")]
    pub registered_at: chrono::NaiveDate,

    /// Whether the record came from a form or from the bulk import
    pub origin: Origin,
}

impl ReturnRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new_for_insert(
        code: String,
        description: String,
        customer_id: i64,
        product_model: String,
        measured_weight_g: Option<f64>,
        destination: Destination,
        recovered_value: Option<f64>,
        branch: String,
        registered_at: chrono::NaiveDate,
        origin: Origin,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(ReturnRecordId::new_v4(), code, description);
        base.comment = comment;
        Self {
            base,
            customer_id,
            product_model,
            measured_weight_g,
            destination,
            recovered_value,
            branch,
            registered_at,
            origin,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.customer_id <= 0 {
            return Err("Cliente é obrigatório".into());
        }
        if self.product_model.trim().is_empty() {
            return Err("Modelo é obrigatório".into());
        }
        if self.branch.trim().is_empty() {
            return Err("Filial é obrigatória".into());
        }
        if let Some(weight) = self.measured_weight_g {
            if weight < 0.0 {
                return Err("Peso aferido não pode ser negativo".into());
            }
        }
        if let Some(value) = self.recovered_value {
            if value < 0.0 {
                return Err("Valor recuperado não pode ser negativo".into());
            }
            if !self.destination.bears_value() {
                return Err(format!(
                    "Destino '{}' não carrega valor recuperado",
                    self.destination.label()
                ));
            }
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for ReturnRecord {
    type Id = ReturnRecordId;
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
        "a002"
    }
    fn collection_name() -> &'static str {
        "return_record"
    }
    fn element_name() -> &'static str {
        "Retorno de Toner"
    }
    fn list_name() -> &'static str {
        "Retornos de Toner"
    }
    fn origin() -> Origin {
        Origin::Manual
    }
}

// =============================================================================
// DTO
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnRecordDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "customerId")]
    pub customer_id: i64,
    #[serde(rename = "productModel")]
    pub product_model: String,
    #[serde(rename = "measuredWeightG")]
    pub measured_weight_g: Option<f64>,
    #[serde(rename = "destinoFinal")]
    pub destination: Destination,
    #[serde(rename = "filial")]
    pub branch: String,
    #[serde(with = "serde_date")]
    #[serde(rename = "registeredAt")]
    pub registered_at: chrono::NaiveDate,
    pub comment: Option<String>,
}

// Local serde helper for NaiveDate as YYYY-MM-DD
mod serde_date {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = date.format(FORMAT).to_string();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_record() -> ReturnRecord {
        ReturnRecord::new_for_insert(
            "RET-TEST".into(),
            "Retorno HP-26A".into(),
            42,
            "HP-26A".into(),
            Some(125.5),
            Destination::Stock,
            Some(11.33),
            "Matriz".into(),
            chrono::NaiveDate::from_ymd_opt(2024, 6, 16).unwrap(),
            Origin::Manual,
            None,
        )
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(valid_record().validate().is_ok());
    }

    #[test]
    fn test_value_on_non_bearing_destination_rejected() {
        let mut record = valid_record();
        record.destination = Destination::Discard;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_non_positive_customer_rejected() {
        let mut record = valid_record();
        record.customer_id = 0;
        assert!(record.validate().is_err());
    }

    // Stored rows and exports read the same as the legacy system, so the
    // wire names and labels are contractual
    #[test]
    fn test_json_shape_keeps_legacy_names() {
        let json = serde_json::to_value(valid_record()).unwrap();
        assert_eq!(json["destinoFinal"], "Estoque");
        assert_eq!(json["filial"], "Matriz");
        assert_eq!(json["registeredAt"], "2024-06-16");
        assert_eq!(json["origin"], "manual");
        assert_eq!(json["customerId"], 42);
    }
}
