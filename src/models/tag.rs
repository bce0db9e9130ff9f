use diesel::Connection as _;
use diesel::{prelude::*, result::Error as DbError};
use std::fmt;

use crate::db::{
    Connection,
    functions::lower,
    models as db,
    schema::{taggings, tags},
};

/// Kinds of entity a tag can be applied to.
///
/// Taggings reference their item polymorphically by kind and ID, so the
/// kind strings are part of the persisted data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ItemKind {
    Place,
    Setting,
    Organization,
    Character,
    Event,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match *self {
            ItemKind::Place => "place",
            ItemKind::Setting => "setting",
            ItemKind::Organization => "organization",
            ItemKind::Character => "character",
            ItemKind::Event => "event",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

/// A free-form label shared by all taggable entities.
///
/// Tag names are matched case-insensitively; "Dragons" and "dragons" are
/// the same tag, stored with whichever spelling was seen first.
#[derive(Debug)]
pub struct Tag {
    data: db::Tag,
}

impl Tag {
    pub(super) fn from_db(data: db::Tag) -> Tag {
        Tag { data }
    }

    /// Get all tags.
    pub fn all(dbcon: &Connection) -> Result<Vec<Tag>, DbError> {
        tags::table
            .order(tags::name.asc())
            .get_results::<db::Tag>(dbcon)
            .map(|v| v.into_iter().map(Tag::from_db).collect())
    }

    /// Find a tag by name, case-insensitively.
    pub fn by_name(dbcon: &Connection, name: &str)
    -> Result<Option<Tag>, DbError> {
        tags::table
            .filter(lower(tags::name).eq(name.to_lowercase()))
            .get_result::<db::Tag>(dbcon)
            .optional()
            .map(|v| v.map(Tag::from_db))
    }

    /// Find a tag by name, creating it if it doesn't exist yet.
    pub fn get_or_create(dbcon: &Connection, name: &str)
    -> Result<Tag, DbError> {
        if let Some(tag) = Tag::by_name(dbcon, name)? {
            return Ok(tag);
        }

        diesel::insert_into(tags::table)
            .values(db::NewTag { name })
            .get_result::<db::Tag>(dbcon)
            .map(Tag::from_db)
    }

    /// Get all tags applied to an item, in name order.
    pub fn for_item(dbcon: &Connection, kind: ItemKind, item: i32)
    -> Result<Vec<Tag>, DbError> {
        taggings::table
            .inner_join(tags::table)
            .filter(taggings::item_kind.eq(kind.as_str()))
            .filter(taggings::item_id.eq(item))
            .select(tags::all_columns)
            .order(tags::name.asc())
            .get_results::<db::Tag>(dbcon)
            .map(|v| v.into_iter().map(Tag::from_db).collect())
    }

    /// Replace the set of tags applied to an item.
    ///
    /// Names not seen before become new tags; taggings not named are
    /// removed. Applying a tag twice is a no-op.
    pub fn set_for_item(
        dbcon: &Connection,
        kind: ItemKind,
        item: i32,
        names: &[String],
    ) -> Result<Vec<Tag>, DbError> {
        dbcon.transaction(|| {
            let mut keep = Vec::with_capacity(names.len());

            for name in names {
                let tag = Tag::get_or_create(dbcon, name)?;
                keep.push(tag.data.id);

                let exists = taggings::table
                    .filter(taggings::tag.eq(tag.data.id))
                    .filter(taggings::item_kind.eq(kind.as_str()))
                    .filter(taggings::item_id.eq(item))
                    .get_result::<db::Tagging>(dbcon)
                    .optional()?;

                if exists.is_none() {
                    diesel::insert_into(taggings::table)
                        .values(db::NewTagging {
                            tag: tag.data.id,
                            item_kind: kind.as_str(),
                            item_id: item,
                        })
                        .execute(dbcon)?;
                }
            }

            diesel::delete(taggings::table
                .filter(taggings::item_kind.eq(kind.as_str()))
                .filter(taggings::item_id.eq(item))
                .filter(diesel::dsl::not(taggings::tag.eq_any(&keep))))
                .execute(dbcon)?;

            Tag::for_item(dbcon, kind, item)
        })
    }

    /// Get IDs of all items of one kind carrying this tag.
    pub fn items_of_kind(&self, dbcon: &Connection, kind: ItemKind)
    -> Result<Vec<i32>, DbError> {
        taggings::table
            .filter(taggings::tag.eq(self.data.id))
            .filter(taggings::item_kind.eq(kind.as_str()))
            .select(taggings::item_id)
            .load(dbcon)
    }
}

/// Tag names applied to an item, for inclusion in public data.
pub fn names_for_item(dbcon: &Connection, kind: ItemKind, item: i32)
-> Result<Vec<String>, DbError> {
    Tag::for_item(dbcon, kind, item)
        .map(|v| v.into_iter().map(|t| t.data.name).collect())
}

impl std::ops::Deref for Tag {
    type Target = db::Tag;

    fn deref(&self) -> &db::Tag {
        &self.data
    }
}
