use serde::{Deserialize, Serialize};

/// Final destination assigned to a returned toner container.
///
/// Serialized with the labels the source spreadsheets use, so stored rows
/// and exports read the same as the legacy system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    #[serde(rename = "Estoque")]
    Stock,
    #[serde(rename = "Garantia")]
    Warranty,
    #[serde(rename = "Descarte")]
    Discard,
    #[serde(rename = "Estoque Semi Novo")]
    SemiNewStock,
    #[serde(rename = "Uso Interno")]
    InternalUse,
}

impl Destination {
    /// Label as it appears in spreadsheets and exports.
    pub fn label(&self) -> &'static str {
        match self {
            Destination::Stock => "Estoque",
            Destination::Warranty => "Garantia",
            Destination::Discard => "Descarte",
            Destination::SemiNewStock => "Estoque Semi Novo",
            Destination::InternalUse => "Uso Interno",
        }
    }

    /// Parse a spreadsheet label, tolerant of case and surrounding spaces.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase();
        match normalized.as_str() {
            "estoque" => Some(Destination::Stock),
            "garantia" => Some(Destination::Warranty),
            "descarte" => Some(Destination::Discard),
            "estoque semi novo" | "semi novo" => Some(Destination::SemiNewStock),
            "uso interno" => Some(Destination::InternalUse),
            _ => None,
        }
    }

    pub fn all() -> Vec<Destination> {
        vec![
            Destination::Stock,
            Destination::Warranty,
            Destination::Discard,
            Destination::SemiNewStock,
            Destination::InternalUse,
        ]
    }

    /// Whether records with this destination carry a recovered value.
    pub fn bears_value(&self) -> bool {
        matches!(self, Destination::Stock | Destination::SemiNewStock)
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_tolerates_case_and_spaces() {
        assert_eq!(Destination::from_label(" estoque "), Some(Destination::Stock));
        assert_eq!(Destination::from_label("GARANTIA"), Some(Destination::Warranty));
        assert_eq!(
            Destination::from_label("Estoque Semi Novo"),
            Some(Destination::SemiNewStock)
        );
        assert_eq!(Destination::from_label("reciclagem"), None);
    }

    #[test]
    fn test_value_bearing_categories() {
        assert!(Destination::Stock.bears_value());
        assert!(Destination::SemiNewStock.bears_value());
        assert!(!Destination::Warranty.bears_value());
        assert!(!Destination::Discard.bears_value());
        assert!(!Destination::InternalUse.bears_value());
    }
}
