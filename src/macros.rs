/// Implement [`From`] for a type, one source type per arm.
#[macro_export]
macro_rules! impl_from {
    { for $type:ty ;
        $(
            $from:ty => | $pat:pat | $value:expr
        ),+
        $(,)*
    } => {
        $(
            impl From<$from> for $type {
                fn from(f: $from) -> $type {
                    let $pat = f;
                    $value
                }
            }
        )+
    };
}

/// Build a [`crate::temporal::Temporal`] from the flattened columns of
/// a database row.
macro_rules! temporal_from_row {
    ($row:expr) => {
        $crate::temporal::Temporal {
            time_type: $row.time_type,
            start: $crate::temporal::DateParts {
                year: $row.start_year,
                month: $row.start_month,
                day: $row.start_day,
                time: $row.start_time,
            },
            end: $crate::temporal::DateParts {
                year: $row.end_year,
                month: $row.end_month,
                day: $row.end_day,
                time: $row.end_time,
            },
        }
    };
}

/// Changeset tuple assigning all temporal columns of `$table` from
/// a [`crate::temporal::Temporal`].
macro_rules! temporal_changeset {
    ($table:ident, $temporal:expr) => {
        (
            $table::time_type.eq($temporal.time_type),
            $table::start_year.eq($temporal.start.year),
            $table::start_month.eq($temporal.start.month),
            $table::start_day.eq($temporal.start.day),
            $table::start_time.eq($temporal.start.time),
            $table::end_year.eq($temporal.end.year),
            $table::end_month.eq($temporal.end.month),
            $table::end_day.eq($temporal.end.day),
            $table::end_time.eq($temporal.end.time),
        )
    };
}
