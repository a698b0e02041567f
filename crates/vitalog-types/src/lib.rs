pub mod error;
pub mod identity;
pub mod record;
pub mod reminder;
mod util;

pub use error::{Error, Result};
pub use identity::SessionIdentity;
pub use record::{CheckupDraft, FoodQuality, HealthRecord};
pub use reminder::{Recurrence, ReminderCategory, ReminderDraft, ReminderRule, TimeOfDay};
pub use util::now_millis;
