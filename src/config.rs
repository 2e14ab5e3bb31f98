use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::warn;

use crate::limits::MIN_SLOT_DURATION_MINUTES;
use crate::model::Minutes;

pub const DEFAULT_FIXTURE: &str = "./data/demo.json";
pub const DEFAULT_BRANCH: &str = "branch-1";
pub const DEFAULT_SLOT_MINUTES: Minutes = 30;

/// Demo binary settings, read from `SLOTWISE_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub fixture: PathBuf,
    pub branch_id: String,
    /// `None` means today.
    pub date: Option<NaiveDate>,
    pub slot_minutes: Minutes,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fixture = lookup("SLOTWISE_FIXTURE").unwrap_or_else(|| DEFAULT_FIXTURE.into());
        let branch_id = lookup("SLOTWISE_BRANCH").unwrap_or_else(|| DEFAULT_BRANCH.into());

        let date = lookup("SLOTWISE_DATE").and_then(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .inspect_err(|e| warn!("ignoring SLOTWISE_DATE={s:?}: {e}"))
                .ok()
        });

        let slot_minutes = match lookup("SLOTWISE_SLOT_MINUTES") {
            None => DEFAULT_SLOT_MINUTES,
            Some(s) => match s.parse::<Minutes>() {
                Ok(m) if m >= MIN_SLOT_DURATION_MINUTES => m,
                _ => {
                    warn!("ignoring SLOTWISE_SLOT_MINUTES={s:?}, using {DEFAULT_SLOT_MINUTES}");
                    DEFAULT_SLOT_MINUTES
                }
            },
        };

        Self {
            fixture: PathBuf::from(fixture),
            branch_id,
            date,
            slot_minutes,
        }
    }
}
