use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vitalog_types::{FoodQuality, HealthRecord};

/// External row shape for a health record.
///
/// The backend's table speaks snake_case with `user_id` ownership scoping;
/// older deployments wrote `foodQuality`, so reads accept both spellings.
/// This type is the single point where external naming meets the domain
/// model; nothing outside this module converts between the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRow {
    /// Row id. Absent on rows from deployments where the table generates
    /// its own keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub user_id: String,
    pub timestamp: i64,
    pub sleep: f64,
    pub water: u32,
    pub stress: u8,
    pub energy: u8,
    #[serde(default)]
    pub discomfort: String,
    #[serde(default, alias = "foodQuality", skip_serializing_if = "Option::is_none")]
    pub food_quality: Option<String>,
}

impl RecordRow {
    pub fn from_record(record: &HealthRecord, owner_id: &str) -> Self {
        Self {
            id: Some(record.id),
            user_id: owner_id.to_string(),
            timestamp: record.timestamp,
            sleep: record.sleep,
            water: record.water,
            stress: record.stress,
            energy: record.energy,
            discomfort: record.discomfort.clone(),
            food_quality: Some(record.food_quality.to_string()),
        }
    }

    pub fn into_record(self) -> HealthRecord {
        HealthRecord {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            timestamp: self.timestamp,
            sleep: self.sleep,
            water: self.water,
            stress: self.stress,
            energy: self.energy,
            discomfort: self.discomfort,
            food_quality: self
                .food_quality
                .map(FoodQuality::from)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_external_field_names() {
        let record = HealthRecord {
            id: Uuid::new_v4(),
            timestamp: 42,
            sleep: 6.5,
            water: 4,
            stress: 8,
            energy: 3,
            discomfort: "sore throat".to_string(),
            food_quality: FoodQuality::MostlyProcessed,
        };
        let row = RecordRow::from_record(&record, "owner-1");
        let value = serde_json::to_value(&row).unwrap();

        assert_eq!(value["user_id"], "owner-1");
        assert_eq!(value["food_quality"], "mostly processed");
        assert_eq!(value["water"], 4);
        assert!(value.get("foodQuality").is_none());
    }

    #[test]
    fn reads_legacy_camel_case_food_quality() {
        let json = r#"{
            "user_id": "owner-1",
            "timestamp": 42,
            "sleep": 6.5,
            "water": 4,
            "stress": 8,
            "energy": 3,
            "discomfort": "",
            "foodQuality": "healthy"
        }"#;
        let row: RecordRow = serde_json::from_str(json).unwrap();
        let record = row.into_record();
        assert_eq!(record.food_quality, FoodQuality::Healthy);
    }

    #[test]
    fn absent_food_quality_defaults_to_balanced() {
        let json = r#"{
            "user_id": "owner-1",
            "timestamp": 42,
            "sleep": 6.5,
            "water": 4,
            "stress": 8,
            "energy": 3
        }"#;
        let row: RecordRow = serde_json::from_str(json).unwrap();
        let record = row.into_record();
        assert_eq!(record.food_quality, FoodQuality::Balanced);
        assert_eq!(record.discomfort, "");
    }

    #[test]
    fn round_trip_keeps_domain_id() {
        let record = HealthRecord {
            id: Uuid::new_v4(),
            timestamp: 7,
            sleep: 8.0,
            water: 6,
            stress: 1,
            energy: 10,
            discomfort: String::new(),
            food_quality: FoodQuality::Balanced,
        };
        let row = RecordRow::from_record(&record, "owner-1");
        assert_eq!(row.clone().into_record(), record);
    }
}
