use diesel::Connection as _;
use diesel::{prelude::*, result::{DatabaseErrorKind, Error as DbError}};

use crate::{
    db::{
        Connection,
        models as db,
        schema::{characters, events, organizations, places, settings,
            taggings, worlds},
    },
    utils::is_valid_slug,
};
use super::tag::ItemKind;

/// A world is the top of the food chain. Everything else lives inside
/// exactly one world.
#[derive(Debug)]
pub struct World {
    data: db::World,
}

/// A subset of a world's data that can safely be publicly exposed.
#[derive(Debug, Serialize)]
pub struct PublicData {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

impl World {
    /// Construct `World` from its database counterpart.
    pub(super) fn from_db(data: db::World) -> World {
        World { data }
    }

    /// Get all worlds.
    pub fn all(dbcon: &Connection) -> Result<Vec<World>, DbError> {
        worlds::table
            .order(worlds::name.asc())
            .get_results::<db::World>(dbcon)
            .map(|v| v.into_iter().map(World::from_db).collect())
    }

    /// Find a world by ID.
    pub fn by_id(dbcon: &Connection, id: i32) -> Result<World, FindWorldError> {
        worlds::table
            .filter(worlds::id.eq(id))
            .get_result::<db::World>(dbcon)
            .optional()?
            .ok_or(FindWorldError::NotFound)
            .map(World::from_db)
    }

    /// Find a world by slug.
    ///
    /// World slugs are unique per deployment, so no scope is needed.
    pub fn by_slug(dbcon: &Connection, slug: &str)
    -> Result<World, FindWorldError> {
        worlds::table
            .filter(worlds::slug.eq(slug))
            .get_result::<db::World>(dbcon)
            .optional()?
            .ok_or(FindWorldError::NotFound)
            .map(World::from_db)
    }

    /// Create a new world.
    pub fn create(dbcon: &Connection, name: &str, slug: &str)
    -> Result<World, CreateWorldError> {
        if !is_valid_slug(slug) {
            return Err(CreateWorldError::InvalidSlug);
        }

        diesel::insert_into(worlds::table)
            .values(db::NewWorld { name, slug })
            .get_result::<db::World>(dbcon)
            .map(World::from_db)
            .map_err(Into::into)
    }

    /// Delete this world and everything in it.
    ///
    /// Foreign keys cascade through every scoped entity and their join
    /// records; taggings carry no foreign key and are removed here, in the
    /// same transaction.
    pub fn delete(self, dbcon: &Connection) -> Result<(), DbError> {
        let id = self.data.id;

        dbcon.transaction(|| {
            let place_ids = places::table
                .filter(places::world.eq(id))
                .select(places::id)
                .load::<i32>(dbcon)?;
            let setting_ids = settings::table
                .filter(settings::world.eq(id))
                .select(settings::id)
                .load::<i32>(dbcon)?;
            let organization_ids = organizations::table
                .filter(organizations::world.eq(id))
                .select(organizations::id)
                .load::<i32>(dbcon)?;
            let character_ids = characters::table
                .filter(characters::world.eq(id))
                .select(characters::id)
                .load::<i32>(dbcon)?;
            let event_ids = events::table
                .filter(events::world.eq(id))
                .select(events::id)
                .load::<i32>(dbcon)?;

            delete_taggings(dbcon, ItemKind::Place, &place_ids)?;
            delete_taggings(dbcon, ItemKind::Setting, &setting_ids)?;
            delete_taggings(dbcon, ItemKind::Organization, &organization_ids)?;
            delete_taggings(dbcon, ItemKind::Character, &character_ids)?;
            delete_taggings(dbcon, ItemKind::Event, &event_ids)?;

            diesel::delete(&self.data).execute(dbcon)?;

            Ok(())
        })
    }

    /// Set this world's name.
    pub fn set_name(&mut self, dbcon: &Connection, name: &str)
    -> Result<(), DbError> {
        let data = diesel::update(&self.data)
            .set(worlds::name.eq(name))
            .get_result::<db::World>(dbcon)?;

        self.data = data;

        Ok(())
    }

    /// Get the public portion of this world's data.
    pub fn get_public(&self) -> PublicData {
        let db::World { id, ref name, ref slug } = self.data;

        PublicData {
            id,
            name: name.clone(),
            slug: slug.clone(),
        }
    }
}

fn delete_taggings(dbcon: &Connection, kind: ItemKind, items: &[i32])
-> Result<usize, DbError> {
    diesel::delete(taggings::table
        .filter(taggings::item_kind.eq(kind.as_str()))
        .filter(taggings::item_id.eq_any(items)))
        .execute(dbcon)
}

#[derive(Debug, Fail)]
pub enum FindWorldError {
    /// Database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// No world found matching given criteria.
    #[fail(display = "No such world")]
    NotFound,
}

impl_from! { for FindWorldError ;
    DbError => |e| FindWorldError::Database(e),
}

#[derive(Debug, Fail)]
pub enum CreateWorldError {
    /// Creation failed due to a database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// A world with this slug already exists.
    #[fail(display = "Duplicate world slug")]
    DuplicateSlug,
    /// The slug is not a well-formed slug.
    #[fail(display = "Malformed slug")]
    InvalidSlug,
}

impl_from! { for CreateWorldError ;
    DbError => |e| match e {
        DbError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
            => CreateWorldError::DuplicateSlug,
        _ => CreateWorldError::Database(e),
    },
}

impl std::ops::Deref for World {
    type Target = db::World;

    fn deref(&self) -> &db::World {
        &self.data
    }
}
