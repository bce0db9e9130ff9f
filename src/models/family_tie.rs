use diesel::Connection as _;
use diesel::{prelude::*, result::{DatabaseErrorKind, Error as DbError}};
use std::collections::HashSet;

use crate::db::{
    Connection,
    models as db,
    schema::family_ties,
};
use super::character::Character;

/// A directed parent → child edge in a world's family graph.
///
/// Family relationships are modelled as an explicit join entity rather than
/// a plain foreign key: a child can have any number of parents and a parent
/// any number of children, each edge ranked by `birth_order` for display.
#[derive(Debug)]
pub struct FamilyTie {
    data: db::FamilyTie,
}

/// A subset of a family tie's data that can safely be publicly exposed.
#[derive(Debug, Serialize)]
pub struct PublicData {
    pub id: i32,
    pub parent: i32,
    pub child: i32,
    pub birth_order: i32,
}

impl FamilyTie {
    pub(super) fn from_db(data: db::FamilyTie) -> FamilyTie {
        FamilyTie { data }
    }

    /// Find a family tie by ID.
    pub fn by_id(dbcon: &Connection, id: i32)
    -> Result<FamilyTie, FindFamilyTieError> {
        family_ties::table
            .filter(family_ties::id.eq(id))
            .get_result::<db::FamilyTie>(dbcon)
            .optional()?
            .ok_or(FindFamilyTieError::NotFound)
            .map(FamilyTie::from_db)
    }

    /// Record `parent` as a parent of `child`.
    ///
    /// The edge is validated before insertion: both characters must belong
    /// to the same world, a character cannot be its own parent, the same
    /// parent cannot be recorded twice for one child, and the edge must not
    /// make a character its own ancestor.
    pub fn create(
        dbcon: &Connection,
        parent: &Character,
        child: &Character,
        birth_order: i32,
    ) -> Result<FamilyTie, CreateFamilyTieError> {
        if parent.id == child.id {
            return Err(CreateFamilyTieError::SelfTie);
        }

        if parent.world != child.world {
            return Err(CreateFamilyTieError::WorldMismatch);
        }

        dbcon.transaction(|| {
            if is_ancestor(dbcon, child.id, parent.id)? {
                return Err(CreateFamilyTieError::WouldCreateCycle);
            }

            diesel::insert_into(family_ties::table)
                .values(db::NewFamilyTie {
                    parent: parent.id,
                    child: child.id,
                    birth_order,
                })
                .get_result::<db::FamilyTie>(dbcon)
                .map(FamilyTie::from_db)
                .map_err(Into::into)
        })
    }

    /// Delete this family tie. Neither character is affected.
    pub fn delete(self, dbcon: &Connection) -> Result<(), DbError> {
        diesel::delete(&self.data).execute(dbcon)?;
        Ok(())
    }

    /// Set this tie's birth order.
    pub fn set_birth_order(&mut self, dbcon: &Connection, birth_order: i32)
    -> Result<(), DbError> {
        self.data = diesel::update(&self.data)
            .set(family_ties::birth_order.eq(birth_order))
            .get_result::<db::FamilyTie>(dbcon)?;

        Ok(())
    }

    /// Get the public portion of this tie's data.
    pub fn get_public(&self) -> PublicData {
        let db::FamilyTie { id, parent, child, birth_order } = self.data;

        PublicData { id, parent, child, birth_order }
    }
}

/// Is `ancestor` an ancestor of `character` in the family graph?
///
/// Walks parent edges breadth-first. The visited set keeps the walk
/// terminating even on graphs that predate the acyclicity check.
fn is_ancestor(dbcon: &Connection, ancestor: i32, character: i32)
-> Result<bool, DbError> {
    let mut visited = HashSet::new();
    let mut frontier = vec![character];

    while !frontier.is_empty() {
        let parents = family_ties::table
            .filter(family_ties::child.eq_any(&frontier))
            .select(family_ties::parent)
            .load::<i32>(dbcon)?;

        frontier.clear();

        for parent in parents {
            if parent == ancestor {
                return Ok(true);
            }

            if visited.insert(parent) {
                frontier.push(parent);
            }
        }
    }

    Ok(false)
}

#[derive(Debug, Fail)]
pub enum FindFamilyTieError {
    /// Database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// No family tie found matching given criteria.
    #[fail(display = "No such family tie")]
    NotFound,
}

impl_from! { for FindFamilyTieError ;
    DbError => |e| FindFamilyTieError::Database(e),
}

#[derive(Debug, Fail)]
pub enum CreateFamilyTieError {
    /// Creation failed due to a database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// A character cannot be its own parent.
    #[fail(display = "Character cannot be its own parent")]
    SelfTie,
    /// This parent is already recorded for this child.
    #[fail(display = "Duplicate family tie")]
    DuplicateTie,
    /// Parent and child belong to different worlds.
    #[fail(display = "Characters belong to different worlds")]
    WorldMismatch,
    /// The edge would make a character its own ancestor.
    #[fail(display = "Family tie would create a cycle")]
    WouldCreateCycle,
}

impl_from! { for CreateFamilyTieError ;
    DbError => |e| match e {
        DbError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
            => CreateFamilyTieError::DuplicateTie,
        _ => CreateFamilyTieError::Database(e),
    },
}

impl std::ops::Deref for FamilyTie {
    type Target = db::FamilyTie;

    fn deref(&self) -> &db::FamilyTie {
        &self.data
    }
}
