mod args;
mod commands;
mod output;

pub use args::{Cli, Commands, ReminderCommand};
pub use commands::run;
