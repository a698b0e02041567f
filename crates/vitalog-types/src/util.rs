use chrono::Utc;

/// Current wall-clock time as epoch milliseconds, the unit every record
/// timestamp uses.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
