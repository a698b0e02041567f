use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vitalog_types::{FoodQuality, Recurrence, ReminderCategory, TimeOfDay};

#[derive(Parser)]
#[command(name = "vitalog")]
#[command(about = "Offline-first health journal with optional cloud sync", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory (defaults to VITALOG_PATH or the platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Config file (defaults to config.toml inside the data directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record today's checkup entry
    Checkup {
        /// Hours slept
        #[arg(long)]
        sleep: f64,

        /// Hydration units (glasses)
        #[arg(long)]
        water: u32,

        /// Stress level, 1-10
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        stress: u8,

        /// Energy level, 1-10
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        energy: u8,

        /// Free-text symptom note
        #[arg(long, default_value = "")]
        discomfort: String,

        /// healthy | balanced | mostly-processed | irregular
        #[arg(long, default_value = "balanced")]
        food: FoodQuality,
    },

    /// Show recent entries, newest first
    History {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Run an ad-hoc query (WHERE / ORDER BY / LIMIT) over your history
    Query {
        /// e.g. "WHERE sleep < 7 ORDER BY timestamp DESC LIMIT 10"
        query: String,
    },

    /// Export your history as CSV
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Create an account on the configured backend
    Signup {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        name: String,
    },

    /// Sign in to the configured backend
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Sign out and clear the local record cache
    Logout,

    /// Show the current session identity
    Whoami,

    /// Manage reminder rules
    Reminder {
        #[command(subcommand)]
        command: ReminderCommand,
    },

    /// Show mode, record count, and data location
    Status,
}

#[derive(Subcommand)]
pub enum ReminderCommand {
    /// Add a reminder rule (starts active)
    Add {
        #[arg(long)]
        label: String,

        /// medicine | checkup
        #[arg(long, default_value = "medicine")]
        category: ReminderCategory,

        /// Wall-clock time, HH:MM
        #[arg(long)]
        time: TimeOfDay,

        /// daily | weekdays | weekends | once
        #[arg(long, default_value = "daily")]
        repeat: Recurrence,
    },

    /// List reminder rules
    List,

    /// Flip a rule's active flag
    Toggle { id: uuid::Uuid },

    /// Delete a rule permanently
    Remove { id: uuid::Uuid },
}
