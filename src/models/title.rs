use diesel::{prelude::*, result::Error as DbError};

use crate::{
    db::{
        Connection,
        models as db,
        schema::titles,
    },
    temporal::{InvalidDateError, Temporal},
};
use super::{UpdateTemporalError, character::Character, place::Place};

/// A character's claim to a place, held for a stretch of the timeline.
#[derive(Debug)]
pub struct Title {
    data: db::Title,
}

/// A subset of a title's data that can safely be publicly exposed.
#[derive(Debug, Serialize)]
pub struct PublicData {
    pub id: i32,
    pub character: i32,
    pub place: i32,
    pub rank: String,
    pub temporal: Temporal,
}

impl Title {
    pub(super) fn from_db(data: db::Title) -> Title {
        Title { data }
    }

    /// Find a title by ID.
    pub fn by_id(dbcon: &Connection, id: i32)
    -> Result<Title, FindTitleError> {
        titles::table
            .filter(titles::id.eq(id))
            .get_result::<db::Title>(dbcon)
            .optional()?
            .ok_or(FindTitleError::NotFound)
            .map(Title::from_db)
    }

    /// Record `character` as holding `rank` over `place`.
    pub fn create(
        dbcon: &Connection,
        character: &Character,
        place: &Place,
        rank: &str,
        temporal: Temporal,
    ) -> Result<Title, CreateTitleError> {
        if character.world != place.world {
            return Err(CreateTitleError::WorldMismatch);
        }
        temporal.validate()?;

        diesel::insert_into(titles::table)
            .values(db::NewTitle {
                character: character.id,
                place: place.id,
                rank,
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
            .get_result::<db::Title>(dbcon)
            .map(Title::from_db)
            .map_err(CreateTitleError::Database)
    }

    /// Delete this title.
    pub fn delete(self, dbcon: &Connection) -> Result<(), DbError> {
        diesel::delete(&self.data).execute(dbcon)?;
        Ok(())
    }

    /// Set this title's rank.
    pub fn set_rank(&mut self, dbcon: &Connection, rank: &str)
    -> Result<(), DbError> {
        self.data = diesel::update(&self.data)
            .set(titles::rank.eq(rank))
            .get_result::<db::Title>(dbcon)?;

        Ok(())
    }

    /// Set this title's timeline placement.
    pub fn set_temporal(&mut self, dbcon: &Connection, temporal: Temporal)
    -> Result<(), UpdateTemporalError> {
        temporal.validate()?;

        self.data = diesel::update(&self.data)
            .set(temporal_changeset!(titles, temporal))
            .get_result::<db::Title>(dbcon)?;

        Ok(())
    }

    /// This title's timeline placement.
    pub fn temporal(&self) -> Temporal {
        temporal_from_row!(self.data)
    }

    /// Get the public portion of this title's data.
    pub fn get_public(&self) -> PublicData {
        PublicData {
            id: self.data.id,
            character: self.data.character,
            place: self.data.place,
            rank: self.data.rank.clone(),
            temporal: self.temporal(),
        }
    }
}

#[derive(Debug, Fail)]
pub enum FindTitleError {
    /// Database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// No title found matching given criteria.
    #[fail(display = "No such title")]
    NotFound,
}

impl_from! { for FindTitleError ;
    DbError => |e| FindTitleError::Database(e),
}

#[derive(Debug, Fail)]
pub enum CreateTitleError {
    /// Creation failed due to a database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// Character and place belong to different worlds.
    #[fail(display = "Character and place belong to different worlds")]
    WorldMismatch,
    /// A date component is out of range.
    #[fail(display = "{}", _0)]
    InvalidDate(#[cause] InvalidDateError),
}

impl_from! { for CreateTitleError ;
    InvalidDateError => |e| CreateTitleError::InvalidDate(e),
}

impl std::ops::Deref for Title {
    type Target = db::Title;

    fn deref(&self) -> &db::Title {
        &self.data
    }
}
