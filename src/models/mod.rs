//! Data and behaviours modelled as objects.

use diesel::result::Error as DbError;

use crate::temporal::InvalidDateError;

pub mod character;
pub mod event;
pub mod family_tie;
pub mod honor;
pub mod organization;
pub mod participation;
pub mod place;
pub mod reference;
pub mod setting;
pub mod tag;
pub mod title;
pub mod world;

pub use self::{
    character::Character,
    event::Event,
    family_tie::FamilyTie,
    honor::Honor,
    organization::Organization,
    participation::Participation,
    place::Place,
    reference::Reference,
    setting::Setting,
    tag::Tag,
    title::Title,
    world::World,
};

#[derive(Debug, Fail)]
pub enum UpdateTemporalError {
    /// Database error.
    #[fail(display = "Database error: {}", _0)]
    Database(#[cause] DbError),
    /// A date component is out of range.
    #[fail(display = "{}", _0)]
    InvalidDate(#[cause] InvalidDateError),
}

impl_from! { for UpdateTemporalError ;
    DbError => |e| UpdateTemporalError::Database(e),
    InvalidDateError => |e| UpdateTemporalError::InvalidDate(e),
}
