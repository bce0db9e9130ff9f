use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

use std::fmt;

/// Discriminator for how an entity sits on a timeline.
#[derive(Clone, Copy, DbEnum, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[DieselType = "Time_type"]
#[serde(rename_all = "kebab-case")]
pub enum TimeType {
    /// The entity covers a range of time; both start and end fields are
    /// meaningful.
    Span,
    /// The entity is a point in time. Only start fields are meaningful, and
    /// any stored end fields must be ignored.
    Instant,
}

impl Default for TimeType {
    fn default() -> TimeType {
        TimeType::Span
    }
}

impl fmt::Display for TimeType {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(match *self {
            TimeType::Span => "span",
            TimeType::Instant => "instant",
        })
    }
}
