use diesel::Connection as _;
use diesel::{prelude::*, result::{DatabaseErrorKind, Error as DbError}};

use crate::{
    db::{
        Connection,
        models as db,
        schema::{characters, event_participations, events, taggings},
    },
    temporal::{InvalidDateError, Temporal},
    utils::is_valid_slug,
};
use super::{
    UpdateTemporalError,
    character::Character,
    participation::{AddParticipantError, Participation},
    tag::{self, ItemKind},
};

/// An occurrence at a fixed place and time, even if place and time are
/// unknown.
#[derive(Debug)]
pub struct Event {
    data: db::Event,
}

/// A subset of an event's data that can safely be publicly exposed.
#[derive(Debug, Serialize)]
pub struct PublicData {
    pub id: i32,
    pub world: i32,
    pub name: String,
    pub slug: String,
    pub notes: Option<String>,
    pub place: Option<i32>,
    pub temporal: Temporal,
    pub tags: Vec<String>,
}

impl Event {
    pub(super) fn from_db(data: db::Event) -> Event {
        Event { data }
    }

    /// Get all events of a world, in timeline order.
    ///
    /// Events with unknown start components sort after known ones, matching
    /// the database's ascending `NULLS LAST` default.
    pub fn in_world(dbcon: &Connection, world: i32)
    -> Result<Vec<Event>, DbError> {
        events::table
            .filter(events::world.eq(world))
            .order((
                events::start_year.asc(),
                events::start_month.asc(),
                events::start_day.asc(),
                events::start_time.asc(),
                events::end_year.asc(),
                events::end_month.asc(),
                events::end_day.asc(),
                events::end_time.asc(),
            ))
            .get_results::<db::Event>(dbcon)
            .map(|v| v.into_iter().map(Event::from_db).collect())
    }

    /// Get all events.
    pub fn all(dbcon: &Connection) -> Result<Vec<Event>, DbError> {
        events::table
            .order((
                events::start_year.asc(),
                events::start_month.asc(),
                events::start_day.asc(),
                events::start_time.asc(),
            ))
            .get_results::<db::Event>(dbcon)
            .map(|v| v.into_iter().map(Event::from_db).collect())
    }

    /// Find an event by ID.
    pub fn by_id(dbcon: &Connection, id: i32) -> Result<Event, FindEventError> {
        events::table
            .filter(events::id.eq(id))
            .get_result::<db::Event>(dbcon)
            .optional()?
            .ok_or(FindEventError::NotFound)
            .map(Event::from_db)
    }

    /// Find an event by slug within a world.
    pub fn by_slug(dbcon: &Connection, world: i32, slug: &str)
    -> Result<Event, FindEventError> {
        events::table
            .filter(events::world.eq(world))
            .filter(events::slug.eq(slug))
            .get_result::<db::Event>(dbcon)
            .optional()?
            .ok_or(FindEventError::NotFound)
            .map(Event::from_db)
    }

    /// Search events by name.
    pub fn search(dbcon: &Connection, world: Option<i32>, query: &str)
    -> Result<Vec<Event>, DbError> {
        let pattern = format!("%{}%", query);
        let mut q = events::table.into_boxed();

        if let Some(world) = world {
            q = q.filter(events::world.eq(world));
        }

        q.filter(events::name.ilike(pattern))
            .order(events::name.asc())
            .get_results::<db::Event>(dbcon)
            .map(|v| v.into_iter().map(Event::from_db).collect())
    }

    /// Create a new event.
    pub fn create(
        dbcon: &Connection,
        world: i32,
        name: &str,
        slug: &str,
        notes: Option<&str>,
        place: Option<i32>,
        temporal: Temporal,
    ) -> Result<Event, CreateEventError> {
        if !is_valid_slug(slug) {
            return Err(CreateEventError::InvalidSlug);
        }
        temporal.validate()?;

        diesel::insert_into(events::table)
            .values(db::NewEvent {
                world,
                name,
                slug,
                notes,
                place,
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
            .get_result::<db::Event>(dbcon)
            .map(Event::from_db)
            .map_err(Into::into)
    }

    /// Delete this event. Participations referencing it cascade away.
    pub fn delete(self, dbcon: &Connection) -> Result<(), DbError> {
        dbcon.transaction(|| {
            diesel::delete(taggings::table
                .filter(taggings::item_kind.eq(ItemKind::Event.as_str()))
                .filter(taggings::item_id.eq(self.data.id)))
                .execute(dbcon)?;
            diesel::delete(&self.data).execute(dbcon)?;

            Ok(())
        })
    }

    /// Set this event's name.
    pub fn set_name(&mut self, dbcon: &Connection, name: &str)
    -> Result<(), DbError> {
        self.data = diesel::update(&self.data)
            .set(events::name.eq(name))
            .get_result::<db::Event>(dbcon)?;

        Ok(())
    }

    /// Set this event's notes.
    pub fn set_notes(&mut self, dbcon: &Connection, notes: Option<&str>)
    -> Result<(), DbError> {
        self.data = diesel::update(&self.data)
            .set(events::notes.eq(notes))
            .get_result::<db::Event>(dbcon)?;

        Ok(())
    }

    /// Set or clear the place where this event happened.
    pub fn set_place(&mut self, dbcon: &Connection, place: Option<i32>)
    -> Result<(), DbError> {
        self.data = diesel::update(&self.data)
            .set(events::place.eq(place))
            .get_result::<db::Event>(dbcon)?;

        Ok(())
    }

    /// Set this event's timeline placement.
    pub fn set_temporal(&mut self, dbcon: &Connection, temporal: Temporal)
    -> Result<(), UpdateTemporalError> {
        temporal.validate()?;

        self.data = diesel::update(&self.data)
            .set(temporal_changeset!(events, temporal))
            .get_result::<db::Event>(dbcon)?;

        Ok(())
    }

    /// Replace this event's tags.
    pub fn set_tags(&self, dbcon: &Connection, names: &[String])
    -> Result<(), DbError> {
        tag::Tag::set_for_item(dbcon, ItemKind::Event, self.data.id, names)
            .map(|_| ())
    }

    /// This event's timeline placement.
    pub fn temporal(&self) -> Temporal {
        temporal_from_row!(self.data)
    }

    /// Get this event's participants, with their participation records.
    pub fn participants(&self, dbcon: &Connection)
    -> Result<Vec<(db::EventParticipation, Character)>, DbError> {
        event_participations::table
            .inner_join(characters::table)
            .filter(event_participations::event.eq(self.data.id))
            .get_results::<(db::EventParticipation, db::Character)>(dbcon)
            .map(|v| v.into_iter()
                .map(|(p, c)| (p, Character::from_db(c)))
                .collect())
    }

    /// Record a character's participation in this event.
    ///
    /// An empty role defaults to `"participant"`.
    pub fn add_participant(
        &self,
        dbcon: &Connection,
        character: &Character,
        role: &str,
        temporal: Temporal,
    ) -> Result<Participation, AddParticipantError> {
        Participation::create(dbcon, character, self, role, temporal)
    }

    /// Get the public portion of this event's data.
    pub fn get_public(&self, dbcon: &Connection)
    -> Result<PublicData, DbError> {
        Ok(PublicData {
            id: self.data.id,
            world: self.data.world,
            name: self.data.name.clone(),
            slug: self.data.slug.clone(),
            notes: self.data.notes.clone(),
            place: self.data.place,
            temporal: self.temporal(),
            tags: tag::names_for_item(dbcon, ItemKind::Event, self.data.id)?,
        })
    }
}

#[derive(Debug, Fail)]
pub enum FindEventError {
    /// Database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// No event found matching given criteria.
    #[fail(display = "No such event")]
    NotFound,
}

impl_from! { for FindEventError ;
    DbError => |e| FindEventError::Database(e),
}

#[derive(Debug, Fail)]
pub enum CreateEventError {
    /// Creation failed due to a database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// An event with this slug already exists in this world.
    #[fail(display = "Duplicate event slug")]
    DuplicateSlug,
    /// The slug is not a well-formed slug.
    #[fail(display = "Malformed slug")]
    InvalidSlug,
    /// A date component is out of range.
    #[fail(display = "{}", _0)]
    InvalidDate(#[cause] InvalidDateError),
}

impl_from! { for CreateEventError ;
    DbError => |e| match e {
        DbError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
            => CreateEventError::DuplicateSlug,
        _ => CreateEventError::Database(e),
    },
    InvalidDateError => |e| CreateEventError::InvalidDate(e),
}

impl std::ops::Deref for Event {
    type Target = db::Event;

    fn deref(&self) -> &db::Event {
        &self.data
    }
}
