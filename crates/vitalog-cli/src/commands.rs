use anyhow::{Context, Result};

use vitalog_runtime::{resolve_data_path, Config, Mode, Vitalog};
use vitalog_types::{CheckupDraft, ReminderDraft};

use crate::args::{Cli, Commands, ReminderCommand};
use crate::output;

pub fn run(cli: Cli) -> Result<()> {
    // Coordinator state is only ever touched from this one thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(dispatch(cli))
}

async fn dispatch(cli: Cli) -> Result<()> {
    let data_dir = resolve_data_path(cli.data_dir.as_deref())?;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| data_dir.join("config.toml"));
    let config = Config::load_from(&config_path)?;

    let app = Vitalog::open(config, data_dir.clone()).await?;
    let coordinator = app.coordinator();

    match cli.command {
        Commands::Checkup {
            sleep,
            water,
            stress,
            energy,
            discomfort,
            food,
        } => {
            let record = coordinator
                .record_checkup(CheckupDraft {
                    sleep,
                    water,
                    stress,
                    energy,
                    discomfort,
                    food_quality: food,
                })
                .await?;
            output::print_recorded(&record, &coordinator.mode());
        }

        Commands::History { limit } => {
            let mut records = coordinator.history();
            if let Some(limit) = limit {
                records.truncate(limit);
            }
            output::print_records(&records);
        }

        Commands::Query { query } => {
            let records = coordinator.query(&query)?;
            output::print_records(&records);
        }

        Commands::Export { out } => {
            let csv = coordinator.export_csv()?;
            match out {
                Some(path) => {
                    std::fs::write(&path, csv)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("Exported {} record(s) to {}", coordinator.history().len(), path.display());
                }
                None => print!("{}", csv),
            }
        }

        Commands::Signup {
            email,
            password,
            name,
        } => {
            let identity = coordinator.sign_up(&email, &password, &name).await?;
            println!("Welcome, {}. Cloud sync is on.", identity.short_name());
        }

        Commands::Login { email, password } => {
            let identity = coordinator.sign_in(&email, &password).await?;
            println!(
                "Hello, {}. Synced {} record(s) from the cloud.",
                identity.short_name(),
                coordinator.history().len()
            );
        }

        Commands::Logout => {
            coordinator.sign_out().await?;
            println!("Signed out. Your journal is now local-only.");
        }

        Commands::Whoami => match coordinator.mode() {
            Mode::Cloud(identity) => {
                println!("{} <{}>", identity.short_name(), identity.email)
            }
            _ => println!("guest (not signed in)"),
        },

        Commands::Reminder { command } => match command {
            ReminderCommand::Add {
                label,
                category,
                time,
                repeat,
            } => {
                let rule = coordinator.add_reminder(ReminderDraft {
                    category,
                    label,
                    time,
                    recurrence: repeat,
                })?;
                println!("Added reminder {} ({} at {})", rule.id, rule.label, rule.time);
            }
            ReminderCommand::List => output::print_reminders(&coordinator.reminders()),
            ReminderCommand::Toggle { id } => {
                if coordinator.toggle_reminder(id)? {
                    println!("Toggled {}", id);
                } else {
                    anyhow::bail!("no reminder with id {}", id);
                }
            }
            ReminderCommand::Remove { id } => {
                if coordinator.remove_reminder(id)? {
                    println!("Removed {}", id);
                } else {
                    anyhow::bail!("no reminder with id {}", id);
                }
            }
        },

        Commands::Status => {
            output::print_status(&coordinator.mode(), coordinator.history().len(), &data_dir);
        }
    }

    Ok(())
}
