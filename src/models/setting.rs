use diesel::Connection as _;
use diesel::{prelude::*, result::{DatabaseErrorKind, Error as DbError}};

use crate::{
    db::{
        Connection,
        models as db,
        schema::{settings, taggings},
    },
    utils::is_valid_slug,
};
use super::tag::{self, ItemKind};

/// A narrative backdrop within a world.
#[derive(Debug)]
pub struct Setting {
    data: db::Setting,
}

/// A subset of a setting's data that can safely be publicly exposed.
#[derive(Debug, Serialize)]
pub struct PublicData {
    pub id: i32,
    pub world: i32,
    pub name: String,
    pub slug: String,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

impl Setting {
    pub(super) fn from_db(data: db::Setting) -> Setting {
        Setting { data }
    }

    /// Get all settings of a world, in name order.
    pub fn in_world(dbcon: &Connection, world: i32)
    -> Result<Vec<Setting>, DbError> {
        settings::table
            .filter(settings::world.eq(world))
            .order(settings::name.asc())
            .get_results::<db::Setting>(dbcon)
            .map(|v| v.into_iter().map(Setting::from_db).collect())
    }

    /// Get all settings.
    pub fn all(dbcon: &Connection) -> Result<Vec<Setting>, DbError> {
        settings::table
            .order(settings::name.asc())
            .get_results::<db::Setting>(dbcon)
            .map(|v| v.into_iter().map(Setting::from_db).collect())
    }

    /// Find a setting by ID.
    pub fn by_id(dbcon: &Connection, id: i32)
    -> Result<Setting, FindSettingError> {
        settings::table
            .filter(settings::id.eq(id))
            .get_result::<db::Setting>(dbcon)
            .optional()?
            .ok_or(FindSettingError::NotFound)
            .map(Setting::from_db)
    }

    /// Find a setting by slug within a world.
    pub fn by_slug(dbcon: &Connection, world: i32, slug: &str)
    -> Result<Setting, FindSettingError> {
        settings::table
            .filter(settings::world.eq(world))
            .filter(settings::slug.eq(slug))
            .get_result::<db::Setting>(dbcon)
            .optional()?
            .ok_or(FindSettingError::NotFound)
            .map(Setting::from_db)
    }

    /// Search settings by name.
    pub fn search(dbcon: &Connection, world: Option<i32>, query: &str)
    -> Result<Vec<Setting>, DbError> {
        let pattern = format!("%{}%", query);
        let mut q = settings::table.into_boxed();

        if let Some(world) = world {
            q = q.filter(settings::world.eq(world));
        }

        q.filter(settings::name.ilike(pattern))
            .order(settings::name.asc())
            .get_results::<db::Setting>(dbcon)
            .map(|v| v.into_iter().map(Setting::from_db).collect())
    }

    /// Create a new setting.
    pub fn create(
        dbcon: &Connection,
        world: i32,
        name: &str,
        slug: &str,
        notes: Option<&str>,
    ) -> Result<Setting, CreateSettingError> {
        if !is_valid_slug(slug) {
            return Err(CreateSettingError::InvalidSlug);
        }

        diesel::insert_into(settings::table)
            .values(db::NewSetting { world, name, slug, notes })
            .get_result::<db::Setting>(dbcon)
            .map(Setting::from_db)
            .map_err(Into::into)
    }

    /// Delete this setting.
    pub fn delete(self, dbcon: &Connection) -> Result<(), DbError> {
        dbcon.transaction(|| {
            diesel::delete(taggings::table
                .filter(taggings::item_kind.eq(ItemKind::Setting.as_str()))
                .filter(taggings::item_id.eq(self.data.id)))
                .execute(dbcon)?;
            diesel::delete(&self.data).execute(dbcon)?;

            Ok(())
        })
    }

    /// Set this setting's name.
    pub fn set_name(&mut self, dbcon: &Connection, name: &str)
    -> Result<(), DbError> {
        self.data = diesel::update(&self.data)
            .set(settings::name.eq(name))
            .get_result::<db::Setting>(dbcon)?;

        Ok(())
    }

    /// Set this setting's notes.
    pub fn set_notes(&mut self, dbcon: &Connection, notes: Option<&str>)
    -> Result<(), DbError> {
        self.data = diesel::update(&self.data)
            .set(settings::notes.eq(notes))
            .get_result::<db::Setting>(dbcon)?;

        Ok(())
    }

    /// Replace this setting's tags.
    pub fn set_tags(&self, dbcon: &Connection, names: &[String])
    -> Result<(), DbError> {
        tag::Tag::set_for_item(dbcon, ItemKind::Setting, self.data.id, names)
            .map(|_| ())
    }

    /// Get the public portion of this setting's data.
    pub fn get_public(&self, dbcon: &Connection)
    -> Result<PublicData, DbError> {
        Ok(PublicData {
            id: self.data.id,
            world: self.data.world,
            name: self.data.name.clone(),
            slug: self.data.slug.clone(),
            notes: self.data.notes.clone(),
            tags: tag::names_for_item(dbcon, ItemKind::Setting, self.data.id)?,
        })
    }
}

#[derive(Debug, Fail)]
pub enum FindSettingError {
    /// Database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// No setting found matching given criteria.
    #[fail(display = "No such setting")]
    NotFound,
}

impl_from! { for FindSettingError ;
    DbError => |e| FindSettingError::Database(e),
}

#[derive(Debug, Fail)]
pub enum CreateSettingError {
    /// Creation failed due to a database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// A setting with this slug already exists in this world.
    #[fail(display = "Duplicate setting slug")]
    DuplicateSlug,
    /// The slug is not a well-formed slug.
    #[fail(display = "Malformed slug")]
    InvalidSlug,
}

impl_from! { for CreateSettingError ;
    DbError => |e| match e {
        DbError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
            => CreateSettingError::DuplicateSlug,
        _ => CreateSettingError::Database(e),
    },
}

impl std::ops::Deref for Setting {
    type Target = db::Setting;

    fn deref(&self) -> &db::Setting {
        &self.data
    }
}
