//! Charging network value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Charging network operating a station
///
/// Only the large North American fast-charging networks are named; anything
/// else (municipal chargers, dealerships, small operators) is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChargingNetwork {
    /// Tesla Supercharger
    Tesla,
    /// Electrify America
    ElectrifyAmerica,
    /// ChargePoint
    ChargePoint,
    /// EVgo
    #[serde(rename = "evgo")]
    EVgo,
    /// Blink
    Blink,
    /// Any other operator
    #[default]
    Other,
}

impl ChargingNetwork {
    /// Classify a free-form operator name as reported by station directories
    /// (e.g. "Tesla Motors (Worldwide)", "Electrify America", "EVgo").
    #[must_use]
    pub fn from_operator(operator: &str) -> Self {
        let normalized: String = operator
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        if normalized.contains("tesla") {
            Self::Tesla
        } else if normalized.contains("electrifyamerica") {
            Self::ElectrifyAmerica
        } else if normalized.contains("chargepoint") {
            Self::ChargePoint
        } else if normalized.starts_with("evgo") {
            Self::EVgo
        } else if normalized.starts_with("blink") {
            Self::Blink
        } else {
            Self::Other
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Tesla => "Tesla",
            Self::ElectrifyAmerica => "Electrify America",
            Self::ChargePoint => "ChargePoint",
            Self::EVgo => "EVgo",
            Self::Blink => "Blink",
            Self::Other => "Other",
        }
    }

    /// All known networks, `Other` last
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::Tesla,
            Self::ElectrifyAmerica,
            Self::ChargePoint,
            Self::EVgo,
            Self::Blink,
            Self::Other,
        ]
    }
}

impl fmt::Display for ChargingNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ChargingNetwork {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "tesla" => Ok(Self::Tesla),
            "electrify_america" | "ea" => Ok(Self::ElectrifyAmerica),
            "chargepoint" | "charge_point" => Ok(Self::ChargePoint),
            "evgo" => Ok(Self::EVgo),
            "blink" => Ok(Self::Blink),
            "other" => Ok(Self::Other),
            _ => Err(format!(
                "Unknown charging network: {s}. Use tesla, electrify_america, chargepoint, evgo, blink or other"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_operator() {
        assert_eq!(
            ChargingNetwork::from_operator("Tesla Motors (Worldwide)"),
            ChargingNetwork::Tesla
        );
        assert_eq!(
            ChargingNetwork::from_operator("Electrify America"),
            ChargingNetwork::ElectrifyAmerica
        );
        assert_eq!(
            ChargingNetwork::from_operator("ChargePoint"),
            ChargingNetwork::ChargePoint
        );
        assert_eq!(ChargingNetwork::from_operator("EVgo"), ChargingNetwork::EVgo);
        assert_eq!(
            ChargingNetwork::from_operator("Blink Charging"),
            ChargingNetwork::Blink
        );
        assert_eq!(
            ChargingNetwork::from_operator("City of Palo Alto"),
            ChargingNetwork::Other
        );
        assert_eq!(ChargingNetwork::from_operator(""), ChargingNetwork::Other);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "electrify-america".parse::<ChargingNetwork>().unwrap(),
            ChargingNetwork::ElectrifyAmerica
        );
        assert_eq!("EVgo".parse::<ChargingNetwork>().unwrap(), ChargingNetwork::EVgo);
        assert_eq!("Tesla".parse::<ChargingNetwork>().unwrap(), ChargingNetwork::Tesla);
        assert!("shell".parse::<ChargingNetwork>().is_err());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&ChargingNetwork::ElectrifyAmerica).unwrap();
        assert_eq!(json, "\"electrify_america\"");
        let json = serde_json::to_string(&ChargingNetwork::EVgo).unwrap();
        assert_eq!(json, "\"evgo\"");
        let parsed: ChargingNetwork = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ChargingNetwork::EVgo);
    }

    #[test]
    fn test_all_ends_with_other() {
        assert_eq!(ChargingNetwork::all().last(), Some(&ChargingNetwork::Other));
    }
}
