use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Self-reported nutrition quality for one checkup.
///
/// Serialized with the spellings the journal has always used on disk and on
/// the wire ("mostly processed", not an identifier-style token). Anything a
/// source hands us outside the enumerated set collapses to [`FoodQuality::Balanced`],
/// which is also the default when the field is absent entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum FoodQuality {
    Healthy,
    #[default]
    Balanced,
    MostlyProcessed,
    Irregular,
}

impl FoodQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodQuality::Healthy => "healthy",
            FoodQuality::Balanced => "balanced",
            FoodQuality::MostlyProcessed => "mostly processed",
            FoodQuality::Irregular => "irregular",
        }
    }

    /// Lenient normalization used at serialization boundaries.
    fn normalize(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "healthy" => FoodQuality::Healthy,
            "balanced" => FoodQuality::Balanced,
            "mostly processed" | "mostly-processed" => FoodQuality::MostlyProcessed,
            "irregular" => FoodQuality::Irregular,
            _ => FoodQuality::Balanced,
        }
    }
}

impl From<String> for FoodQuality {
    fn from(value: String) -> Self {
        Self::normalize(&value)
    }
}

impl From<FoodQuality> for String {
    fn from(value: FoodQuality) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for FoodQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse for user-entered values (CLI flags). Unlike the serde path,
/// typos are rejected instead of silently becoming "balanced".
impl std::str::FromStr for FoodQuality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "healthy" => Ok(FoodQuality::Healthy),
            "balanced" => Ok(FoodQuality::Balanced),
            "mostly processed" | "mostly-processed" => Ok(FoodQuality::MostlyProcessed),
            "irregular" => Ok(FoodQuality::Irregular),
            _ => Err(Error::UnknownVariant {
                kind: "food quality",
                value: s.to_string(),
            }),
        }
    }
}

/// One day's wellness entry.
///
/// Records are immutable once created: there is no update path, a correction
/// is a new entry. `timestamp` (epoch milliseconds) is assigned at creation
/// and is the primary ordering key everywhere downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub id: Uuid,
    pub timestamp: i64,
    /// Hours slept, may be fractional.
    pub sleep: f64,
    /// Hydration units (glasses).
    pub water: u32,
    /// 1-10 scale.
    pub stress: u8,
    /// 1-10 scale.
    pub energy: u8,
    /// Free-text symptom note, may be empty.
    #[serde(default)]
    pub discomfort: String,
    #[serde(default)]
    pub food_quality: FoodQuality,
}

impl HealthRecord {
    /// Materialize a draft into a record, assigning identity and timestamp.
    pub fn from_draft(draft: CheckupDraft, timestamp: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            sleep: draft.sleep,
            water: draft.water,
            stress: draft.stress,
            energy: draft.energy,
            discomfort: draft.discomfort,
            food_quality: draft.food_quality,
        }
    }

    /// Numeric projection of a field by (lowercase) name.
    ///
    /// Returns `None` for fields that are not numeric (`id`, `discomfort`,
    /// `food_quality`) and for names that are not fields at all. The query
    /// engine builds its filter and sort semantics on this distinction.
    pub fn numeric_field(&self, name: &str) -> Option<f64> {
        match name {
            "timestamp" => Some(self.timestamp as f64),
            "sleep" => Some(self.sleep),
            "water" => Some(f64::from(self.water)),
            "stress" => Some(f64::from(self.stress)),
            "energy" => Some(f64::from(self.energy)),
            _ => None,
        }
    }

    /// Field names in declaration order, as exported.
    pub const FIELD_NAMES: [&'static str; 8] = [
        "id",
        "timestamp",
        "sleep",
        "water",
        "stress",
        "energy",
        "discomfort",
        "food_quality",
    ];
}

/// User-entered portion of a checkup, before identity/timestamp assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckupDraft {
    pub sleep: f64,
    pub water: u32,
    pub stress: u8,
    pub energy: u8,
    #[serde(default)]
    pub discomfort: String,
    #[serde(default)]
    pub food_quality: FoodQuality,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> HealthRecord {
        HealthRecord {
            id: Uuid::new_v4(),
            timestamp: 1_700_000_000_000,
            sleep: 7.5,
            water: 6,
            stress: 4,
            energy: 8,
            discomfort: "headache".to_string(),
            food_quality: FoodQuality::Healthy,
        }
    }

    #[test]
    fn numeric_fields_round_trip_as_numbers() {
        let original = record();
        let json = serde_json::to_string(&original).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["sleep"].is_f64());
        assert!(value["water"].is_u64());
        assert!(value["timestamp"].is_i64());

        let back: HealthRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn food_quality_defaults_when_absent() {
        let json = r#"{
            "id": "6e9a1c52-0d1c-4b6e-9a64-0a5a8b2f7a10",
            "timestamp": 1,
            "sleep": 8.0,
            "water": 4,
            "stress": 2,
            "energy": 9,
            "discomfort": ""
        }"#;
        let record: HealthRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.food_quality, FoodQuality::Balanced);
    }

    #[test]
    fn food_quality_accepts_legacy_spellings() {
        assert_eq!(
            FoodQuality::from("mostly-processed".to_string()),
            FoodQuality::MostlyProcessed
        );
        assert_eq!(
            FoodQuality::from("Mostly Processed".to_string()),
            FoodQuality::MostlyProcessed
        );
        // Unknown values normalize rather than fail.
        assert_eq!(FoodQuality::from("keto".to_string()), FoodQuality::Balanced);
    }

    #[test]
    fn food_quality_strict_parse_rejects_unknown() {
        assert!("keto".parse::<FoodQuality>().is_err());
        assert_eq!("healthy".parse::<FoodQuality>().unwrap(), FoodQuality::Healthy);
    }

    #[test]
    fn numeric_field_projection() {
        let r = record();
        assert_eq!(r.numeric_field("sleep"), Some(7.5));
        assert_eq!(r.numeric_field("water"), Some(6.0));
        assert_eq!(r.numeric_field("discomfort"), None);
        assert_eq!(r.numeric_field("no_such_field"), None);
    }
}
