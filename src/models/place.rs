use diesel::Connection as _;
use diesel::{prelude::*, result::{DatabaseErrorKind, Error as DbError}};

use crate::{
    db::{
        Connection,
        models as db,
        schema::{events, places, taggings},
    },
    utils::is_valid_slug,
};
use super::tag::{self, ItemKind};

/// Spatial reference system of all stored geometry.
pub const SRID: u32 = 4326;

/// A geographic entity of a world.
///
/// Geometry is optional: a place may be purely narrative. When present, the
/// point location is a WGS 84 (SRID 4326) coordinate pair and the detailed
/// geography a WKT multipolygon in the same reference system.
#[derive(Debug)]
pub struct Place {
    data: db::Place,
}

/// A point location in SRID 4326.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Point {
    pub lon: f64,
    pub lat: f64,
}

/// A subset of a place's data that can safely be publicly exposed.
#[derive(Debug, Serialize)]
pub struct PublicData {
    pub id: i32,
    pub world: i32,
    pub name: String,
    pub slug: String,
    pub notes: Option<String>,
    pub point_location: Option<Point>,
    pub geo_detail: Option<String>,
    pub tags: Vec<String>,
}

impl Place {
    pub(super) fn from_db(data: db::Place) -> Place {
        Place { data }
    }

    /// Get all places of a world, in name order.
    pub fn in_world(dbcon: &Connection, world: i32)
    -> Result<Vec<Place>, DbError> {
        places::table
            .filter(places::world.eq(world))
            .order(places::name.asc())
            .get_results::<db::Place>(dbcon)
            .map(|v| v.into_iter().map(Place::from_db).collect())
    }

    /// Get all places.
    pub fn all(dbcon: &Connection) -> Result<Vec<Place>, DbError> {
        places::table
            .order(places::name.asc())
            .get_results::<db::Place>(dbcon)
            .map(|v| v.into_iter().map(Place::from_db).collect())
    }

    /// Find a place by ID.
    pub fn by_id(dbcon: &Connection, id: i32) -> Result<Place, FindPlaceError> {
        places::table
            .filter(places::id.eq(id))
            .get_result::<db::Place>(dbcon)
            .optional()?
            .ok_or(FindPlaceError::NotFound)
            .map(Place::from_db)
    }

    /// Find a place by slug within a world.
    pub fn by_slug(dbcon: &Connection, world: i32, slug: &str)
    -> Result<Place, FindPlaceError> {
        places::table
            .filter(places::world.eq(world))
            .filter(places::slug.eq(slug))
            .get_result::<db::Place>(dbcon)
            .optional()?
            .ok_or(FindPlaceError::NotFound)
            .map(Place::from_db)
    }

    /// Search places by name, the field declared in the admin registry.
    pub fn search(dbcon: &Connection, world: Option<i32>, query: &str)
    -> Result<Vec<Place>, DbError> {
        let pattern = format!("%{}%", query);
        let mut q = places::table.into_boxed();

        if let Some(world) = world {
            q = q.filter(places::world.eq(world));
        }

        q.filter(places::name.ilike(pattern))
            .order(places::name.asc())
            .get_results::<db::Place>(dbcon)
            .map(|v| v.into_iter().map(Place::from_db).collect())
    }

    /// Create a new place.
    pub fn create(
        dbcon: &Connection,
        world: i32,
        name: &str,
        slug: &str,
        notes: Option<&str>,
        point_location: Option<Point>,
        geo_detail: Option<&str>,
    ) -> Result<Place, CreatePlaceError> {
        if !is_valid_slug(slug) {
            return Err(CreatePlaceError::InvalidSlug);
        }

        diesel::insert_into(places::table)
            .values(db::NewPlace {
                world,
                name,
                slug,
                notes,
                point_lon: point_location.map(|p| p.lon),
                point_lat: point_location.map(|p| p.lat),
                geo_detail,
            })
            .get_result::<db::Place>(dbcon)
            .map(Place::from_db)
            .map_err(Into::into)
    }

    /// Delete this place.
    ///
    /// Events held here and titles over it cascade away with it.
    pub fn delete(self, dbcon: &Connection) -> Result<(), DbError> {
        dbcon.transaction(|| {
            let events = events::table
                .filter(events::place.eq(self.data.id))
                .select(events::id)
                .load::<i32>(dbcon)?;

            diesel::delete(taggings::table
                .filter(taggings::item_kind.eq(ItemKind::Event.as_str()))
                .filter(taggings::item_id.eq_any(&events)))
                .execute(dbcon)?;
            diesel::delete(taggings::table
                .filter(taggings::item_kind.eq(ItemKind::Place.as_str()))
                .filter(taggings::item_id.eq(self.data.id)))
                .execute(dbcon)?;
            diesel::delete(&self.data).execute(dbcon)?;

            Ok(())
        })
    }

    /// Set this place's name.
    pub fn set_name(&mut self, dbcon: &Connection, name: &str)
    -> Result<(), DbError> {
        self.data = diesel::update(&self.data)
            .set(places::name.eq(name))
            .get_result::<db::Place>(dbcon)?;

        Ok(())
    }

    /// Set this place's notes.
    pub fn set_notes(&mut self, dbcon: &Connection, notes: Option<&str>)
    -> Result<(), DbError> {
        self.data = diesel::update(&self.data)
            .set(places::notes.eq(notes))
            .get_result::<db::Place>(dbcon)?;

        Ok(())
    }

    /// Set or clear this place's point location.
    pub fn set_point_location(
        &mut self,
        dbcon: &Connection,
        point: Option<Point>,
    ) -> Result<(), DbError> {
        self.data = diesel::update(&self.data)
            .set((
                places::point_lon.eq(point.map(|p| p.lon)),
                places::point_lat.eq(point.map(|p| p.lat)),
            ))
            .get_result::<db::Place>(dbcon)?;

        Ok(())
    }

    /// Set or clear this place's detailed geography.
    pub fn set_geo_detail(&mut self, dbcon: &Connection, wkt: Option<&str>)
    -> Result<(), DbError> {
        self.data = diesel::update(&self.data)
            .set(places::geo_detail.eq(wkt))
            .get_result::<db::Place>(dbcon)?;

        Ok(())
    }

    /// Replace this place's tags.
    pub fn set_tags(&self, dbcon: &Connection, names: &[String])
    -> Result<(), DbError> {
        tag::Tag::set_for_item(dbcon, ItemKind::Place, self.data.id, names)
            .map(|_| ())
    }

    /// This place's point location, if known.
    pub fn point_location(&self) -> Option<Point> {
        match (self.data.point_lon, self.data.point_lat) {
            (Some(lon), Some(lat)) => Some(Point { lon, lat }),
            _ => None,
        }
    }

    /// Get the public portion of this place's data.
    pub fn get_public(&self, dbcon: &Connection)
    -> Result<PublicData, DbError> {
        Ok(PublicData {
            id: self.data.id,
            world: self.data.world,
            name: self.data.name.clone(),
            slug: self.data.slug.clone(),
            notes: self.data.notes.clone(),
            point_location: self.point_location(),
            geo_detail: self.data.geo_detail.clone(),
            tags: tag::names_for_item(dbcon, ItemKind::Place, self.data.id)?,
        })
    }
}

#[derive(Debug, Fail)]
pub enum FindPlaceError {
    /// Database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// No place found matching given criteria.
    #[fail(display = "No such place")]
    NotFound,
}

impl_from! { for FindPlaceError ;
    DbError => |e| FindPlaceError::Database(e),
}

#[derive(Debug, Fail)]
pub enum CreatePlaceError {
    /// Creation failed due to a database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// A place with this slug already exists in this world.
    #[fail(display = "Duplicate place slug")]
    DuplicateSlug,
    /// The slug is not a well-formed slug.
    #[fail(display = "Malformed slug")]
    InvalidSlug,
}

impl_from! { for CreatePlaceError ;
    DbError => |e| match e {
        DbError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
            => CreatePlaceError::DuplicateSlug,
        _ => CreatePlaceError::Database(e),
    },
}

impl std::ops::Deref for Place {
    type Target = db::Place;

    fn deref(&self) -> &db::Place {
        &self.data
    }
}
