use diesel::Connection as _;
use diesel::{prelude::*, result::{DatabaseErrorKind, Error as DbError}};
use std::collections::HashMap;

use crate::{
    db::{
        Connection,
        models as db,
        schema::{characters, event_participations, events, family_ties,
            honors, organizations, places, taggings, titles},
    },
    temporal::{InvalidDateError, Temporal},
    utils::is_valid_slug,
};
use super::{
    UpdateTemporalError,
    family_tie::{CreateFamilyTieError, FamilyTie},
    tag::{self, ItemKind},
};

/// A person (or person-like being) of a world.
///
/// Characters carry two derived family relations, parents and children, both
/// read from the same [`FamilyTie`] join entity by filtering opposite sides.
#[derive(Debug)]
pub struct Character {
    data: db::Character,
}

/// A subset of a character's data that can safely be publicly exposed.
#[derive(Debug, Serialize)]
pub struct PublicData {
    pub id: i32,
    pub world: i32,
    pub name: String,
    pub slug: String,
    pub notes: Option<String>,
    pub temporal: Temporal,
    pub tags: Vec<String>,
}

/// One edge of the family graph as seen from one of its endpoints.
#[derive(Debug, Serialize)]
pub struct Relative {
    /// The tie carrying this relation.
    pub tie: i32,
    pub birth_order: i32,
    pub character: PublicData,
}

impl Character {
    pub(super) fn from_db(data: db::Character) -> Character {
        Character { data }
    }

    /// Get all characters of a world, in name order.
    pub fn in_world(dbcon: &Connection, world: i32)
    -> Result<Vec<Character>, DbError> {
        characters::table
            .filter(characters::world.eq(world))
            .order(characters::name.asc())
            .get_results::<db::Character>(dbcon)
            .map(|v| v.into_iter().map(Character::from_db).collect())
    }

    /// Get all characters.
    pub fn all(dbcon: &Connection) -> Result<Vec<Character>, DbError> {
        characters::table
            .order(characters::name.asc())
            .get_results::<db::Character>(dbcon)
            .map(|v| v.into_iter().map(Character::from_db).collect())
    }

    /// Find a character by ID.
    pub fn by_id(dbcon: &Connection, id: i32)
    -> Result<Character, FindCharacterError> {
        characters::table
            .filter(characters::id.eq(id))
            .get_result::<db::Character>(dbcon)
            .optional()?
            .ok_or(FindCharacterError::NotFound)
            .map(Character::from_db)
    }

    /// Find a character by slug within a world.
    pub fn by_slug(dbcon: &Connection, world: i32, slug: &str)
    -> Result<Character, FindCharacterError> {
        characters::table
            .filter(characters::world.eq(world))
            .filter(characters::slug.eq(slug))
            .get_result::<db::Character>(dbcon)
            .optional()?
            .ok_or(FindCharacterError::NotFound)
            .map(Character::from_db)
    }

    /// Search characters by name.
    pub fn search(dbcon: &Connection, world: Option<i32>, query: &str)
    -> Result<Vec<Character>, DbError> {
        let pattern = format!("%{}%", query);
        let mut q = characters::table.into_boxed();

        if let Some(world) = world {
            q = q.filter(characters::world.eq(world));
        }

        q.filter(characters::name.ilike(pattern))
            .order(characters::name.asc())
            .get_results::<db::Character>(dbcon)
            .map(|v| v.into_iter().map(Character::from_db).collect())
    }

    /// Create a new character.
    pub fn create(
        dbcon: &Connection,
        world: i32,
        name: &str,
        slug: &str,
        notes: Option<&str>,
        temporal: Temporal,
    ) -> Result<Character, CreateCharacterError> {
        if !is_valid_slug(slug) {
            return Err(CreateCharacterError::InvalidSlug);
        }
        temporal.validate()?;

        diesel::insert_into(characters::table)
            .values(db::NewCharacter {
                world,
                name,
                slug,
                notes,
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
            .get_result::<db::Character>(dbcon)
            .map(Character::from_db)
            .map_err(Into::into)
    }

    /// Delete this character.
    ///
    /// Family ties, participations, titles and honors referencing it cascade
    /// away; other characters are unaffected.
    pub fn delete(self, dbcon: &Connection) -> Result<(), DbError> {
        dbcon.transaction(|| {
            diesel::delete(taggings::table
                .filter(taggings::item_kind.eq(ItemKind::Character.as_str()))
                .filter(taggings::item_id.eq(self.data.id)))
                .execute(dbcon)?;
            diesel::delete(&self.data).execute(dbcon)?;

            Ok(())
        })
    }

    /// Set this character's name.
    pub fn set_name(&mut self, dbcon: &Connection, name: &str)
    -> Result<(), DbError> {
        self.data = diesel::update(&self.data)
            .set(characters::name.eq(name))
            .get_result::<db::Character>(dbcon)?;

        Ok(())
    }

    /// Set this character's notes.
    pub fn set_notes(&mut self, dbcon: &Connection, notes: Option<&str>)
    -> Result<(), DbError> {
        self.data = diesel::update(&self.data)
            .set(characters::notes.eq(notes))
            .get_result::<db::Character>(dbcon)?;

        Ok(())
    }

    /// Set this character's timeline placement.
    pub fn set_temporal(&mut self, dbcon: &Connection, temporal: Temporal)
    -> Result<(), UpdateTemporalError> {
        temporal.validate()?;

        self.data = diesel::update(&self.data)
            .set(temporal_changeset!(characters, temporal))
            .get_result::<db::Character>(dbcon)?;

        Ok(())
    }

    /// Replace this character's tags.
    pub fn set_tags(&self, dbcon: &Connection, names: &[String])
    -> Result<(), DbError> {
        tag::Tag::set_for_item(dbcon, ItemKind::Character, self.data.id, names)
            .map(|_| ())
    }

    /// This character's timeline placement.
    pub fn temporal(&self) -> Temporal {
        temporal_from_row!(self.data)
    }

    /// Get this character's parents, in birth order of this character among
    /// each parent's children.
    pub fn parents(&self, dbcon: &Connection)
    -> Result<Vec<(db::FamilyTie, Character)>, DbError> {
        let ties = family_ties::table
            .filter(family_ties::child.eq(self.data.id))
            .order(family_ties::birth_order.asc())
            .load::<db::FamilyTie>(dbcon)?;

        relatives(dbcon, ties, |tie| tie.parent)
    }

    /// Get this character's children, ordered by birth order.
    pub fn children(&self, dbcon: &Connection)
    -> Result<Vec<(db::FamilyTie, Character)>, DbError> {
        let ties = family_ties::table
            .filter(family_ties::parent.eq(self.data.id))
            .order(family_ties::birth_order.asc())
            .load::<db::FamilyTie>(dbcon)?;

        relatives(dbcon, ties, |tie| tie.child)
    }

    /// Record another character as a parent of this one.
    pub fn add_parent(
        &self,
        dbcon: &Connection,
        parent: &Character,
        birth_order: i32,
    ) -> Result<FamilyTie, CreateFamilyTieError> {
        FamilyTie::create(dbcon, parent, self, birth_order)
    }

    /// Record another character as a child of this one.
    pub fn add_child(
        &self,
        dbcon: &Connection,
        child: &Character,
        birth_order: i32,
    ) -> Result<FamilyTie, CreateFamilyTieError> {
        FamilyTie::create(dbcon, self, child, birth_order)
    }

    /// Remove the tie recording `parent` as a parent of this character.
    pub fn remove_parent(&self, dbcon: &Connection, parent: i32)
    -> Result<(), RemoveFamilyTieError> {
        let removed = diesel::delete(family_ties::table
            .filter(family_ties::parent.eq(parent))
            .filter(family_ties::child.eq(self.data.id)))
            .execute(dbcon)?;

        if removed == 0 {
            Err(RemoveFamilyTieError::NotFound)
        } else {
            Ok(())
        }
    }

    /// Get this character's titles, with the places they are over.
    pub fn titles(&self, dbcon: &Connection)
    -> Result<Vec<(db::Title, db::Place)>, DbError> {
        titles::table
            .inner_join(places::table)
            .filter(titles::character.eq(self.data.id))
            .get_results::<(db::Title, db::Place)>(dbcon)
    }

    /// Get this character's honors, with the organizations granting them.
    pub fn honors(&self, dbcon: &Connection)
    -> Result<Vec<(db::Honor, db::Organization)>, DbError> {
        honors::table
            .inner_join(organizations::table)
            .filter(honors::character.eq(self.data.id))
            .get_results::<(db::Honor, db::Organization)>(dbcon)
    }

    /// Get this character's event participations, with the events, in
    /// timeline order of the events.
    pub fn participations(&self, dbcon: &Connection)
    -> Result<Vec<(db::EventParticipation, db::Event)>, DbError> {
        event_participations::table
            .inner_join(events::table)
            .filter(event_participations::character.eq(self.data.id))
            .order((
                events::start_year.asc(),
                events::start_month.asc(),
                events::start_day.asc(),
                events::start_time.asc(),
            ))
            .get_results::<(db::EventParticipation, db::Event)>(dbcon)
    }

    /// Get the public portion of this character's data.
    pub fn get_public(&self, dbcon: &Connection)
    -> Result<PublicData, DbError> {
        Ok(PublicData {
            id: self.data.id,
            world: self.data.world,
            name: self.data.name.clone(),
            slug: self.data.slug.clone(),
            notes: self.data.notes.clone(),
            temporal: self.temporal(),
            tags: tag::names_for_item(
                dbcon, ItemKind::Character, self.data.id)?,
        })
    }
}

/// Resolve the characters on the far side of a list of ties, preserving tie
/// order.
fn relatives<F>(dbcon: &Connection, ties: Vec<db::FamilyTie>, side: F)
-> Result<Vec<(db::FamilyTie, Character)>, DbError>
where
    F: Fn(&db::FamilyTie) -> i32,
{
    let ids = ties.iter().map(&side).collect::<Vec<_>>();

    let mut by_id = characters::table
        .filter(characters::id.eq_any(&ids))
        .load::<db::Character>(dbcon)?
        .into_iter()
        .map(|c| (c.id, c))
        .collect::<HashMap<_, _>>();

    Ok(ties.into_iter()
        .filter_map(|tie| {
            let character = by_id.remove(&side(&tie))?;
            Some((tie, Character::from_db(character)))
        })
        .collect())
}

#[derive(Debug, Fail)]
pub enum FindCharacterError {
    /// Database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// No character found matching given criteria.
    #[fail(display = "No such character")]
    NotFound,
}

impl_from! { for FindCharacterError ;
    DbError => |e| FindCharacterError::Database(e),
}

#[derive(Debug, Fail)]
pub enum CreateCharacterError {
    /// Creation failed due to a database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// A character with this slug already exists in this world.
    #[fail(display = "Duplicate character slug")]
    DuplicateSlug,
    /// The slug is not a well-formed slug.
    #[fail(display = "Malformed slug")]
    InvalidSlug,
    /// A date component is out of range.
    #[fail(display = "{}", _0)]
    InvalidDate(#[cause] InvalidDateError),
}

impl_from! { for CreateCharacterError ;
    DbError => |e| match e {
        DbError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
            => CreateCharacterError::DuplicateSlug,
        _ => CreateCharacterError::Database(e),
    },
    InvalidDateError => |e| CreateCharacterError::InvalidDate(e),
}

#[derive(Debug, Fail)]
pub enum RemoveFamilyTieError {
    /// Database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// No such tie to remove.
    #[fail(display = "No such family tie")]
    NotFound,
}

impl_from! { for RemoveFamilyTieError ;
    DbError => |e| RemoveFamilyTieError::Database(e),
}

impl std::ops::Deref for Character {
    type Target = db::Character;

    fn deref(&self) -> &db::Character {
        &self.data
    }
}
