//! The temporal field convention shared by every entity that can be placed
//! on a timeline.
//!
//! Dates are stored as separate nullable year/month/day/time components
//! rather than a single date type: historical and fictional dates may be
//! partially unknown, or fall outside the range of conventional calendar
//! types (negative years included). A missing component means "unknown",
//! never zero.

use chrono::NaiveTime;
use failure::Fail;
use std::cmp::Ordering;

pub use crate::db::types::TimeType;

/// One end of a temporal range, broken into optional components.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct DateParts {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub day: Option<i32>,
    pub time: Option<NaiveTime>,
}

impl DateParts {
    /// A date with no known components.
    pub fn unknown() -> DateParts {
        DateParts::default()
    }

    /// Are all components unknown?
    pub fn is_unknown(&self) -> bool {
        self.year.is_none()
            && self.month.is_none()
            && self.day.is_none()
            && self.time.is_none()
    }

    /// Check component ranges.
    ///
    /// Years are unconstrained (fictional calendars may predate year one);
    /// months and days, when known, must fall in their calendar ranges.
    pub fn validate(&self) -> Result<(), InvalidDateError> {
        if let Some(month) = self.month {
            if month < 1 || month > 12 {
                return Err(InvalidDateError::MonthOutOfRange(month));
            }
        }

        if let Some(day) = self.day {
            if day < 1 || day > 31 {
                return Err(InvalidDateError::DayOutOfRange(day));
            }
        }

        Ok(())
    }
}

/// Timeline placement of an entity: a span with a start and an end, or an
/// instant with only a start.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Temporal {
    #[serde(default)]
    pub time_type: TimeType,
    #[serde(default)]
    pub start: DateParts,
    #[serde(default)]
    pub end: DateParts,
}

impl Temporal {
    /// A span with both ends unknown.
    pub fn unknown_span() -> Temporal {
        Temporal {
            time_type: TimeType::Span,
            start: DateParts::unknown(),
            end: DateParts::unknown(),
        }
    }

    /// An instant at the given date.
    pub fn instant(start: DateParts) -> Temporal {
        Temporal {
            time_type: TimeType::Instant,
            start,
            end: DateParts::unknown(),
        }
    }

    /// A span between two dates.
    pub fn span(start: DateParts, end: DateParts) -> Temporal {
        Temporal {
            time_type: TimeType::Span,
            start,
            end,
        }
    }

    /// The meaningful end of this range.
    ///
    /// Instants have no end, regardless of what end fields happen to be
    /// stored for them.
    pub fn end(&self) -> Option<DateParts> {
        match self.time_type {
            TimeType::Span => Some(self.end),
            TimeType::Instant => None,
        }
    }

    /// Check component ranges on both ends.
    pub fn validate(&self) -> Result<(), InvalidDateError> {
        self.start.validate()?;
        self.end.validate()
    }

    /// Timeline ordering key.
    ///
    /// Ascending by start components then end components, with unknown
    /// components sorting after known ones, matching the `NULLS LAST`
    /// default of the database's ascending indexes.
    pub fn sort_key(&self) -> SortKey {
        SortKey {
            parts: [
                part(self.start.year.map(i64::from)),
                part(self.start.month.map(i64::from)),
                part(self.start.day.map(i64::from)),
                part(self.start.time.map(time_to_i64)),
                part(self.end.year.map(i64::from)),
                part(self.end.month.map(i64::from)),
                part(self.end.day.map(i64::from)),
                part(self.end.time.map(time_to_i64)),
            ],
        }
    }
}

impl Default for Temporal {
    fn default() -> Temporal {
        Temporal::unknown_span()
    }
}

/// Comparable timeline position. Unknown components order last.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct SortKey {
    parts: [UnknownLast; 8],
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct UnknownLast(Option<i64>);

fn part(v: Option<i64>) -> UnknownLast {
    UnknownLast(v)
}

fn time_to_i64(time: NaiveTime) -> i64 {
    use chrono::Timelike;
    i64::from(time.num_seconds_from_midnight())
}

impl Ord for UnknownLast {
    fn cmp(&self, other: &UnknownLast) -> Ordering {
        match (self.0, other.0) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl PartialOrd for UnknownLast {
    fn partial_cmp(&self, other: &UnknownLast) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Fail)]
pub enum InvalidDateError {
    #[fail(display = "month {} is out of range 1-12", _0)]
    MonthOutOfRange(i32),
    #[fail(display = "day {} is out of range 1-31", _0)]
    DayOutOfRange(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year(y: i32) -> DateParts {
        DateParts { year: Some(y), ..DateParts::unknown() }
    }

    #[test]
    fn instant_has_no_end() {
        // Stored end fields on an instant are leftovers and must be ignored.
        let temporal = Temporal {
            time_type: TimeType::Instant,
            start: year(1205),
            end: year(1299),
        };

        assert_eq!(temporal.end(), None);
        assert_eq!(
            Temporal::span(year(1205), year(1299)).end(),
            Some(year(1299)),
        );
    }

    #[test]
    fn unknown_components_are_not_defaulted() {
        let parts = DateParts { year: Some(-312), ..DateParts::unknown() };

        assert_eq!(parts.month, None);
        assert_eq!(parts.day, None);
        assert!(!parts.is_unknown());
        assert!(parts.validate().is_ok());
    }

    #[test]
    fn month_and_day_ranges() {
        assert!(DateParts { month: Some(12), ..DateParts::unknown() }
            .validate().is_ok());
        assert!(DateParts { month: Some(13), ..DateParts::unknown() }
            .validate().is_err());
        assert!(DateParts { day: Some(0), ..DateParts::unknown() }
            .validate().is_err());
        // Negative years are fine.
        assert!(year(-4000).validate().is_ok());
    }

    #[test]
    fn timeline_ordering() {
        let early = Temporal::instant(year(983));
        let late = Temporal::instant(year(1205));
        let unknown = Temporal::unknown_span();

        assert!(early.sort_key() < late.sort_key());
        // Unknown dates sort after known ones, like NULLS LAST.
        assert!(late.sort_key() < unknown.sort_key());
    }

    #[test]
    fn ordering_refines_by_smaller_components() {
        let spring = Temporal::instant(DateParts {
            year: Some(1205),
            month: Some(3),
            ..DateParts::unknown()
        });
        let autumn = Temporal::instant(DateParts {
            year: Some(1205),
            month: Some(9),
            ..DateParts::unknown()
        });
        let sometime = Temporal::instant(year(1205));

        assert!(spring.sort_key() < autumn.sort_key());
        // A date known only to the year sorts after any month of it.
        assert!(autumn.sort_key() < sometime.sort_key());
    }
}
