use diesel::Connection as _;
use diesel::{prelude::*, result::{DatabaseErrorKind, Error as DbError}};

use crate::{
    db::{
        Connection,
        models as db,
        schema::{characters, honors, organizations, taggings},
    },
    temporal::{InvalidDateError, Temporal},
    utils::is_valid_slug,
};
use super::{
    UpdateTemporalError,
    character::Character,
    tag::{self, ItemKind},
};

/// A group of characters with a lifetime of its own: a dynasty, an order,
/// a guild.
#[derive(Debug)]
pub struct Organization {
    data: db::Organization,
}

/// A subset of an organization's data that can safely be publicly exposed.
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

impl Organization {
    pub(super) fn from_db(data: db::Organization) -> Organization {
        Organization { data }
    }

    /// Get all organizations of a world, in name order.
    pub fn in_world(dbcon: &Connection, world: i32)
    -> Result<Vec<Organization>, DbError> {
        organizations::table
            .filter(organizations::world.eq(world))
            .order(organizations::name.asc())
            .get_results::<db::Organization>(dbcon)
            .map(|v| v.into_iter().map(Organization::from_db).collect())
    }

    /// Get all organizations.
    pub fn all(dbcon: &Connection) -> Result<Vec<Organization>, DbError> {
        organizations::table
            .order(organizations::name.asc())
            .get_results::<db::Organization>(dbcon)
            .map(|v| v.into_iter().map(Organization::from_db).collect())
    }

    /// Find an organization by ID.
    pub fn by_id(dbcon: &Connection, id: i32)
    -> Result<Organization, FindOrganizationError> {
        organizations::table
            .filter(organizations::id.eq(id))
            .get_result::<db::Organization>(dbcon)
            .optional()?
            .ok_or(FindOrganizationError::NotFound)
            .map(Organization::from_db)
    }

    /// Find an organization by slug within a world.
    pub fn by_slug(dbcon: &Connection, world: i32, slug: &str)
    -> Result<Organization, FindOrganizationError> {
        organizations::table
            .filter(organizations::world.eq(world))
            .filter(organizations::slug.eq(slug))
            .get_result::<db::Organization>(dbcon)
            .optional()?
            .ok_or(FindOrganizationError::NotFound)
            .map(Organization::from_db)
    }

    /// Search organizations by name.
    pub fn search(dbcon: &Connection, world: Option<i32>, query: &str)
    -> Result<Vec<Organization>, DbError> {
        let pattern = format!("%{}%", query);
        let mut q = organizations::table.into_boxed();

        if let Some(world) = world {
            q = q.filter(organizations::world.eq(world));
        }

        q.filter(organizations::name.ilike(pattern))
            .order(organizations::name.asc())
            .get_results::<db::Organization>(dbcon)
            .map(|v| v.into_iter().map(Organization::from_db).collect())
    }

    /// Create a new organization.
    pub fn create(
        dbcon: &Connection,
        world: i32,
        name: &str,
        slug: &str,
        notes: Option<&str>,
        temporal: Temporal,
    ) -> Result<Organization, CreateOrganizationError> {
        if !is_valid_slug(slug) {
            return Err(CreateOrganizationError::InvalidSlug);
        }
        temporal.validate()?;

        diesel::insert_into(organizations::table)
            .values(db::NewOrganization {
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
            .get_result::<db::Organization>(dbcon)
            .map(Organization::from_db)
            .map_err(Into::into)
    }

    /// Delete this organization. Honors referencing it cascade away.
    pub fn delete(self, dbcon: &Connection) -> Result<(), DbError> {
        dbcon.transaction(|| {
            diesel::delete(taggings::table
                .filter(taggings::item_kind
                    .eq(ItemKind::Organization.as_str()))
                .filter(taggings::item_id.eq(self.data.id)))
                .execute(dbcon)?;
            diesel::delete(&self.data).execute(dbcon)?;

            Ok(())
        })
    }

    /// Set this organization's name.
    pub fn set_name(&mut self, dbcon: &Connection, name: &str)
    -> Result<(), DbError> {
        self.data = diesel::update(&self.data)
            .set(organizations::name.eq(name))
            .get_result::<db::Organization>(dbcon)?;

        Ok(())
    }

    /// Set this organization's notes.
    pub fn set_notes(&mut self, dbcon: &Connection, notes: Option<&str>)
    -> Result<(), DbError> {
        self.data = diesel::update(&self.data)
            .set(organizations::notes.eq(notes))
            .get_result::<db::Organization>(dbcon)?;

        Ok(())
    }

    /// Set this organization's timeline placement.
    pub fn set_temporal(&mut self, dbcon: &Connection, temporal: Temporal)
    -> Result<(), UpdateTemporalError> {
        temporal.validate()?;

        self.data = diesel::update(&self.data)
            .set(temporal_changeset!(organizations, temporal))
            .get_result::<db::Organization>(dbcon)?;

        Ok(())
    }

    /// Replace this organization's tags.
    pub fn set_tags(&self, dbcon: &Connection, names: &[String])
    -> Result<(), DbError> {
        tag::Tag::set_for_item(
            dbcon, ItemKind::Organization, self.data.id, names)
            .map(|_| ())
    }

    /// This organization's timeline placement.
    pub fn temporal(&self) -> Temporal {
        temporal_from_row!(self.data)
    }

    /// Get characters honored by membership in this organization, along with
    /// the membership records.
    pub fn members(&self, dbcon: &Connection)
    -> Result<Vec<(db::Honor, Character)>, DbError> {
        honors::table
            .inner_join(characters::table)
            .filter(honors::organization.eq(self.data.id))
            .get_results::<(db::Honor, db::Character)>(dbcon)
            .map(|v| v.into_iter()
                .map(|(h, c)| (h, Character::from_db(c)))
                .collect())
    }

    /// Get the public portion of this organization's data.
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
                dbcon, ItemKind::Organization, self.data.id)?,
        })
    }
}

#[derive(Debug, Fail)]
pub enum FindOrganizationError {
    /// Database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// No organization found matching given criteria.
    #[fail(display = "No such organization")]
    NotFound,
}

impl_from! { for FindOrganizationError ;
    DbError => |e| FindOrganizationError::Database(e),
}

#[derive(Debug, Fail)]
pub enum CreateOrganizationError {
    /// Creation failed due to a database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// An organization with this slug already exists in this world.
    #[fail(display = "Duplicate organization slug")]
    DuplicateSlug,
    /// The slug is not a well-formed slug.
    #[fail(display = "Malformed slug")]
    InvalidSlug,
    /// A date component is out of range.
    #[fail(display = "{}", _0)]
    InvalidDate(#[cause] InvalidDateError),
}

impl_from! { for CreateOrganizationError ;
    DbError => |e| match e {
        DbError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
            => CreateOrganizationError::DuplicateSlug,
        _ => CreateOrganizationError::Database(e),
    },
    InvalidDateError => |e| CreateOrganizationError::InvalidDate(e),
}

impl std::ops::Deref for Organization {
    type Target = db::Organization;

    fn deref(&self) -> &db::Organization {
        &self.data
    }
}
