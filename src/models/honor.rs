use diesel::{prelude::*, result::Error as DbError};

use crate::{
    db::{
        Connection,
        models as db,
        schema::honors,
    },
    temporal::{InvalidDateError, Temporal},
};
use super::{
    UpdateTemporalError,
    character::Character,
    organization::Organization,
};

/// A character's membership in an organization, held for a stretch of the
/// timeline.
#[derive(Debug)]
pub struct Honor {
    data: db::Honor,
}

/// A subset of an honor's data that can safely be publicly exposed.
#[derive(Debug, Serialize)]
pub struct PublicData {
    pub id: i32,
    pub character: i32,
    pub organization: i32,
    pub temporal: Temporal,
}

impl Honor {
    pub(super) fn from_db(data: db::Honor) -> Honor {
        Honor { data }
    }

    /// Find an honor by ID.
    pub fn by_id(dbcon: &Connection, id: i32)
    -> Result<Honor, FindHonorError> {
        honors::table
            .filter(honors::id.eq(id))
            .get_result::<db::Honor>(dbcon)
            .optional()?
            .ok_or(FindHonorError::NotFound)
            .map(Honor::from_db)
    }

    /// Record `character` as a member of `organization`.
    pub fn create(
        dbcon: &Connection,
        character: &Character,
        organization: &Organization,
        temporal: Temporal,
    ) -> Result<Honor, CreateHonorError> {
        if character.world != organization.world {
            return Err(CreateHonorError::WorldMismatch);
        }
        temporal.validate()?;

        diesel::insert_into(honors::table)
            .values(db::NewHonor {
                character: character.id,
                organization: organization.id,
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
            .get_result::<db::Honor>(dbcon)
            .map(Honor::from_db)
            .map_err(CreateHonorError::Database)
    }

    /// Delete this honor.
    pub fn delete(self, dbcon: &Connection) -> Result<(), DbError> {
        diesel::delete(&self.data).execute(dbcon)?;
        Ok(())
    }

    /// Set this honor's timeline placement.
    pub fn set_temporal(&mut self, dbcon: &Connection, temporal: Temporal)
    -> Result<(), UpdateTemporalError> {
        temporal.validate()?;

        self.data = diesel::update(&self.data)
            .set(temporal_changeset!(honors, temporal))
            .get_result::<db::Honor>(dbcon)?;

        Ok(())
    }

    /// This honor's timeline placement.
    pub fn temporal(&self) -> Temporal {
        temporal_from_row!(self.data)
    }

    /// Get the public portion of this honor's data.
    pub fn get_public(&self) -> PublicData {
        PublicData {
            id: self.data.id,
            character: self.data.character,
            organization: self.data.organization,
            temporal: self.temporal(),
        }
    }
}

#[derive(Debug, Fail)]
pub enum FindHonorError {
    /// Database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// No honor found matching given criteria.
    #[fail(display = "No such honor")]
    NotFound,
}

impl_from! { for FindHonorError ;
    DbError => |e| FindHonorError::Database(e),
}

#[derive(Debug, Fail)]
pub enum CreateHonorError {
    /// Creation failed due to a database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// Character and organization belong to different worlds.
    #[fail(display = "Character and organization belong to different worlds")]
    WorldMismatch,
    /// A date component is out of range.
    #[fail(display = "{}", _0)]
    InvalidDate(#[cause] InvalidDateError),
}

impl_from! { for CreateHonorError ;
    InvalidDateError => |e| CreateHonorError::InvalidDate(e),
}

impl std::ops::Deref for Honor {
    type Target = db::Honor;

    fn deref(&self) -> &db::Honor {
        &self.data
    }
}
