//! When a deployed pipeline runs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Schedule {
    /// Runs only when triggered by an operator.
    #[default]
    Manual,
    Interval { minutes: u32 },
    Cron { expression: String },
}

impl Schedule {
    pub fn every_minutes(minutes: u32) -> Self {
        Schedule::Interval { minutes }
    }

    pub fn every_5_minutes() -> Self {
        Self::every_minutes(5)
    }

    pub fn every_15_minutes() -> Self {
        Self::every_minutes(15)
    }

    pub fn every_30_minutes() -> Self {
        Self::every_minutes(30)
    }

    pub fn hourly() -> Self {
        Self::every_minutes(60)
    }

    pub fn daily() -> Self {
        Self::every_minutes(24 * 60)
    }

    pub fn weekly() -> Self {
        Self::every_minutes(7 * 24 * 60)
    }

    pub fn monthly() -> Self {
        Self::cron("0 0 1 * *")
    }

    pub fn cron(expression: impl Into<String>) -> Self {
        Schedule::Cron {
            expression: expression.into(),
        }
    }

    /// Describes what is wrong with the schedule, if anything.
    ///
    /// Cron expressions are only checked for shape (5 or 6 fields); field
    /// semantics belong to whatever scheduler runs the pipeline.
    pub fn problem(&self) -> Option<String> {
        match self {
            Schedule::Manual => None,
            Schedule::Interval { minutes: 0 } => Some("interval must be at least 1 minute".into()),
            Schedule::Interval { .. } => None,
            Schedule::Cron { expression } => {
                let fields = expression.split_whitespace().count();
                if fields == 0 {
                    Some("cron expression must not be empty".into())
                } else if !(5..=6).contains(&fields) {
                    Some(format!("cron expression needs 5 or 6 fields, found {fields}"))
                } else {
                    None
                }
            }
        }
    }
}
