//! Sample domain data for tests.

use uuid::Uuid;

use vitalog_types::{
    FoodQuality, HealthRecord, Recurrence, ReminderCategory, ReminderRule, SessionIdentity,
};

/// A record with the three fields query tests care about; everything else
/// gets fixed, unremarkable values.
pub fn record_with(stress: u8, sleep: f64, timestamp: i64) -> HealthRecord {
    HealthRecord {
        id: Uuid::new_v4(),
        timestamp,
        sleep,
        water: 5,
        stress,
        energy: 6,
        discomfort: String::new(),
        food_quality: FoodQuality::Balanced,
    }
}

/// `count` records with ascending timestamps `1000, 2000, ...` and mildly
/// varying vitals.
pub fn sample_records(count: usize) -> Vec<HealthRecord> {
    (0..count)
        .map(|i| {
            record_with(
                (i % 10 + 1) as u8,
                5.0 + (i % 4) as f64,
                1000 * (i as i64 + 1),
            )
        })
        .collect()
}

pub fn identity() -> SessionIdentity {
    SessionIdentity {
        user_id: "user-1".to_string(),
        email: "ada@example.com".to_string(),
        display_name: Some("Ada".to_string()),
    }
}

pub fn sample_reminder(label: &str) -> ReminderRule {
    ReminderRule {
        id: Uuid::new_v4(),
        category: ReminderCategory::Medicine,
        label: label.to_string(),
        time: "08:00".parse().expect("valid fixture time"),
        recurrence: Recurrence::Daily,
        active: true,
    }
}
