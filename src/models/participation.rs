use diesel::{prelude::*, result::{DatabaseErrorKind, Error as DbError}};

use crate::{
    db::{
        Connection,
        models as db,
        schema::event_participations,
    },
    temporal::{InvalidDateError, Temporal},
};
use super::{UpdateTemporalError, character::Character, event::Event};

/// Role given to participations created without one.
pub const DEFAULT_ROLE: &str = "participant";

/// A character's part in an event.
///
/// The role is free text ("victor", "casualty", "witness"). A character
/// appears in an event at most once.
#[derive(Debug)]
pub struct Participation {
    data: db::EventParticipation,
}

/// A subset of a participation's data that can safely be publicly exposed.
#[derive(Debug, Serialize)]
pub struct PublicData {
    pub id: i32,
    pub event: i32,
    pub character: i32,
    pub role: String,
    pub temporal: Temporal,
}

impl Participation {
    pub(super) fn from_db(data: db::EventParticipation) -> Participation {
        Participation { data }
    }

    /// Find a participation by ID.
    pub fn by_id(dbcon: &Connection, id: i32)
    -> Result<Participation, FindParticipationError> {
        event_participations::table
            .filter(event_participations::id.eq(id))
            .get_result::<db::EventParticipation>(dbcon)
            .optional()?
            .ok_or(FindParticipationError::NotFound)
            .map(Participation::from_db)
    }

    /// Record `character`'s part in `event`.
    ///
    /// Both must belong to the same world. An empty role is stored as
    /// [`DEFAULT_ROLE`].
    pub fn create(
        dbcon: &Connection,
        character: &Character,
        event: &Event,
        role: &str,
        temporal: Temporal,
    ) -> Result<Participation, AddParticipantError> {
        if character.world != event.world {
            return Err(AddParticipantError::WorldMismatch);
        }
        temporal.validate()?;

        let role = if role.trim().is_empty() { DEFAULT_ROLE } else { role };

        diesel::insert_into(event_participations::table)
            .values(db::NewEventParticipation {
                event: event.id,
                character: character.id,
                role,
                time_type: temporal.time_type,
                start_year: temporal.start.year,
                start_month: temporal.start.month,
                start_day: temporal.start.day,
                start_time: temporal.start.time,
                end_year: temporal.end.year,
                end_month: temporal.end.month,
                end_day: temporal.end.day,
                end_time: temporal.end.time,
            })
            .get_result::<db::EventParticipation>(dbcon)
            .map(Participation::from_db)
            .map_err(Into::into)
    }

    /// Delete this participation. Neither the event nor the character is
    /// affected.
    pub fn delete(self, dbcon: &Connection) -> Result<(), DbError> {
        diesel::delete(&self.data).execute(dbcon)?;
        Ok(())
    }

    /// Set this participation's role.
    pub fn set_role(&mut self, dbcon: &Connection, role: &str)
    -> Result<(), DbError> {
        let role = if role.trim().is_empty() { DEFAULT_ROLE } else { role };

        self.data = diesel::update(&self.data)
            .set(event_participations::role.eq(role))
            .get_result::<db::EventParticipation>(dbcon)?;

        Ok(())
    }

    /// Set this participation's timeline placement.
    pub fn set_temporal(&mut self, dbcon: &Connection, temporal: Temporal)
    -> Result<(), UpdateTemporalError> {
        temporal.validate()?;

        self.data = diesel::update(&self.data)
            .set(temporal_changeset!(event_participations, temporal))
            .get_result::<db::EventParticipation>(dbcon)?;

        Ok(())
    }

    /// This participation's timeline placement.
    pub fn temporal(&self) -> Temporal {
        temporal_from_row!(self.data)
    }

    /// Get the public portion of this participation's data.
    pub fn get_public(&self) -> PublicData {
        PublicData {
            id: self.data.id,
            event: self.data.event,
            character: self.data.character,
            role: self.data.role.clone(),
            temporal: self.temporal(),
        }
    }
}

#[derive(Debug, Fail)]
pub enum FindParticipationError {
    /// Database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// No participation found matching given criteria.
    #[fail(display = "No such participation")]
    NotFound,
}

impl_from! { for FindParticipationError ;
    DbError => |e| FindParticipationError::Database(e),
}

#[derive(Debug, Fail)]
pub enum AddParticipantError {
    /// Database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// This character already participates in this event.
    #[fail(display = "Character already participates in this event")]
    DuplicateParticipant,
    /// Character and event belong to different worlds.
    #[fail(display = "Character and event belong to different worlds")]
    WorldMismatch,
    /// A date component is out of range.
    #[fail(display = "{}", _0)]
    InvalidDate(#[cause] InvalidDateError),
}

impl_from! { for AddParticipantError ;
    DbError => |e| match e {
        DbError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
            => AddParticipantError::DuplicateParticipant,
        _ => AddParticipantError::Database(e),
    },
    InvalidDateError => |e| AddParticipantError::InvalidDate(e),
}

impl std::ops::Deref for Participation {
    type Target = db::EventParticipation;

    fn deref(&self) -> &db::EventParticipation {
        &self.data
    }
}
