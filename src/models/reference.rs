use diesel::{prelude::*, result::Error as DbError};

use crate::db::{
    Connection,
    models as db,
    schema::references,
};

/// An external source backing some piece of recorded lore.
#[derive(Debug)]
pub struct Reference {
    data: db::Reference,
}

/// A subset of a reference's data that can safely be publicly exposed.
#[derive(Debug, Serialize)]
pub struct PublicData {
    pub id: i32,
    pub url: String,
    pub cite: Option<String>,
}

impl Reference {
    pub(super) fn from_db(data: db::Reference) -> Reference {
        Reference { data }
    }

    /// Get all references.
    pub fn all(dbcon: &Connection) -> Result<Vec<Reference>, DbError> {
        references::table
            .order(references::url.asc())
            .get_results::<db::Reference>(dbcon)
            .map(|v| v.into_iter().map(Reference::from_db).collect())
    }

    /// Find a reference by ID.
    pub fn by_id(dbcon: &Connection, id: i32)
    -> Result<Reference, FindReferenceError> {
        references::table
            .filter(references::id.eq(id))
            .get_result::<db::Reference>(dbcon)
            .optional()?
            .ok_or(FindReferenceError::NotFound)
            .map(Reference::from_db)
    }

    /// Create a new reference.
    pub fn create(dbcon: &Connection, url: &str, cite: Option<&str>)
    -> Result<Reference, DbError> {
        diesel::insert_into(references::table)
            .values(db::NewReference { url, cite })
            .get_result::<db::Reference>(dbcon)
            .map(Reference::from_db)
    }

    /// Delete this reference.
    pub fn delete(self, dbcon: &Connection) -> Result<(), DbError> {
        diesel::delete(&self.data).execute(dbcon)?;
        Ok(())
    }

    /// Set this reference's URL.
    pub fn set_url(&mut self, dbcon: &Connection, url: &str)
    -> Result<(), DbError> {
        self.data = diesel::update(&self.data)
            .set(references::url.eq(url))
            .get_result::<db::Reference>(dbcon)?;

        Ok(())
    }

    /// Set this reference's citation text.
    pub fn set_cite(&mut self, dbcon: &Connection, cite: Option<&str>)
    -> Result<(), DbError> {
        self.data = diesel::update(&self.data)
            .set(references::cite.eq(cite))
            .get_result::<db::Reference>(dbcon)?;

        Ok(())
    }

    /// Get the public portion of this reference's data.
    pub fn get_public(&self) -> PublicData {
        PublicData {
            id: self.data.id,
            url: self.data.url.clone(),
            cite: self.data.cite.clone(),
        }
    }
}

#[derive(Debug, Fail)]
pub enum FindReferenceError {
    /// Database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// No reference found matching given criteria.
    #[fail(display = "No such reference")]
    NotFound,
}

impl_from! { for FindReferenceError ;
    DbError => |e| FindReferenceError::Database(e),
}

impl std::ops::Deref for Reference {
    type Target = db::Reference;

    fn deref(&self) -> &db::Reference {
        &self.data
    }
}
