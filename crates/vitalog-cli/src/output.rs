use std::path::Path;

use is_terminal::IsTerminal;

use chrono::DateTime;
use owo_colors::OwoColorize;

use vitalog_runtime::Mode;
use vitalog_types::{HealthRecord, ReminderRule};

fn use_color() -> bool {
    std::io::stdout().is_terminal()
}

fn format_day(timestamp: i64) -> String {
    DateTime::from_timestamp_millis(timestamp)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

pub fn print_records(records: &[HealthRecord]) {
    if records.is_empty() {
        println!("No matching entries.");
        return;
    }

    println!(
        "{:<17} {:>6} {:>6} {:>7} {:>7}  {:<18} {}",
        "OBSERVED", "SLEEP", "WATER", "STRESS", "ENERGY", "FOOD", "NOTE"
    );
    for record in records {
        println!(
            "{:<17} {:>5}h {:>5}u {:>6}/10 {:>5}/10  {:<18} {}",
            format_day(record.timestamp),
            record.sleep,
            record.water,
            record.stress,
            record.energy,
            record.food_quality,
            if record.discomfort.is_empty() {
                "-"
            } else {
                &record.discomfort
            },
        );
    }
    println!("{} entr{}", records.len(), if records.len() == 1 { "y" } else { "ies" });
}

pub fn print_recorded(record: &HealthRecord, mode: &Mode) {
    println!("Recorded checkup for {}", format_day(record.timestamp));
    match mode {
        Mode::Cloud(_) => println!("Saved locally and synced to your account."),
        _ => println!("Saved locally."),
    }
}

pub fn print_reminders(reminders: &[ReminderRule]) {
    if reminders.is_empty() {
        println!("No reminders configured.");
        return;
    }
    for rule in reminders {
        let state = if rule.active { "on " } else { "off" };
        println!(
            "{} [{}] {:<5} {} {:<9} {}",
            rule.id, state, rule.time, rule.category, rule.recurrence, rule.label
        );
    }
}

pub fn print_status(mode: &Mode, record_count: usize, data_dir: &Path) {
    let label = match mode {
        Mode::Cloud(identity) => {
            let text = format!("cloud ({})", identity.email);
            if use_color() {
                text.green().to_string()
            } else {
                text
            }
        }
        Mode::Guest => {
            if use_color() {
                "guest".yellow().to_string()
            } else {
                "guest".to_string()
            }
        }
        Mode::Initializing => "initializing".to_string(),
    };
    println!("mode:     {}", label);
    println!("records:  {}", record_count);
    println!("data dir: {}", data_dir.display());
}
