use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// What a reminder is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderCategory {
    Medicine,
    Checkup,
}

impl std::fmt::Display for ReminderCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReminderCategory::Medicine => f.write_str("medicine"),
            ReminderCategory::Checkup => f.write_str("checkup"),
        }
    }
}

impl std::str::FromStr for ReminderCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "medicine" => Ok(ReminderCategory::Medicine),
            "checkup" => Ok(ReminderCategory::Checkup),
            _ => Err(Error::UnknownVariant {
                kind: "reminder category",
                value: s.to_string(),
            }),
        }
    }
}

/// How often a reminder fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekdays,
    Weekends,
    Once,
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recurrence::Daily => f.write_str("daily"),
            Recurrence::Weekdays => f.write_str("weekdays"),
            Recurrence::Weekends => f.write_str("weekends"),
            Recurrence::Once => f.write_str("once"),
        }
    }
}

impl std::str::FromStr for Recurrence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Recurrence::Daily),
            "weekdays" => Ok(Recurrence::Weekdays),
            "weekends" => Ok(Recurrence::Weekends),
            "once" => Ok(Recurrence::Once),
            _ => Err(Error::UnknownVariant {
                kind: "recurrence",
                value: s.to_string(),
            }),
        }
    }
}

/// Wall-clock hour and minute, no timezone. Serializes as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Result<Self, Error> {
        if hour > 23 || minute > 59 {
            return Err(Error::InvalidTimeOfDay(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(Self { hour, minute })
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl std::str::FromStr for TimeOfDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidTimeOfDay(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        TimeOfDay::new(hour, minute).map_err(|_| invalid())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// A scheduled nudge: take medicine, do the daily checkup.
///
/// `active` is a toggle, not a lifecycle state; deactivating keeps the rule.
/// Deletion is permanent, there is no soft delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderRule {
    pub id: Uuid,
    pub category: ReminderCategory,
    pub label: String,
    pub time: TimeOfDay,
    pub recurrence: Recurrence,
    pub active: bool,
}

impl ReminderRule {
    /// New rules start active, matching how they are created in the UI.
    pub fn from_draft(draft: ReminderDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: draft.category,
            label: draft.label,
            time: draft.time,
            recurrence: draft.recurrence,
            active: true,
        }
    }
}

/// User-entered portion of a reminder rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderDraft {
    pub category: ReminderCategory,
    pub label: String,
    pub time: TimeOfDay,
    pub recurrence: Recurrence,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_round_trip() {
        let time: TimeOfDay = "08:30".parse().unwrap();
        assert_eq!(time, TimeOfDay { hour: 8, minute: 30 });
        assert_eq!(time.to_string(), "08:30");

        let json = serde_json::to_string(&time).unwrap();
        assert_eq!(json, r#""08:30""#);
        let back: TimeOfDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, time);
    }

    #[test]
    fn time_of_day_rejects_out_of_range() {
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("12:60".parse::<TimeOfDay>().is_err());
        assert!("eight".parse::<TimeOfDay>().is_err());
        assert!("12".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn reminder_serializes_with_lowercase_enums() {
        let rule = ReminderRule::from_draft(ReminderDraft {
            category: ReminderCategory::Medicine,
            label: "Morning Vitamins".to_string(),
            time: "08:00".parse().unwrap(),
            recurrence: Recurrence::Daily,
        });
        assert!(rule.active);

        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["category"], "medicine");
        assert_eq!(value["recurrence"], "daily");
        assert_eq!(value["time"], "08:00");
    }
}
