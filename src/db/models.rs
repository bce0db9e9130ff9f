use chrono::NaiveTime;

use super::schema::*;
use super::types::TimeType;

#[derive(Clone, Debug, Identifiable, Queryable)]
pub struct World {
    pub id: i32,
    /// Display name of this world.
    pub name: String,
    /// Stable lookup key, unique per deployment.
    pub slug: String,
}

#[derive(Clone, Copy, Debug, Insertable)]
#[table_name = "worlds"]
pub struct NewWorld<'a> {
    pub name: &'a str,
    pub slug: &'a str,
}

#[derive(Clone, Debug, Identifiable, Queryable)]
pub struct Place {
    pub id: i32,
    /// ID of the world this place belongs to.
    pub world: i32,
    pub name: String,
    /// Stable lookup key, unique within `world`.
    pub slug: String,
    pub notes: Option<String>,
    /// Point location, WGS 84 (SRID 4326) longitude.
    pub point_lon: Option<f64>,
    /// Point location, WGS 84 (SRID 4326) latitude.
    pub point_lat: Option<f64>,
    /// Detailed geography as a WKT multipolygon, SRID 4326.
    pub geo_detail: Option<String>,
}

#[derive(Clone, Copy, Debug, Insertable)]
#[table_name = "places"]
pub struct NewPlace<'a> {
    pub world: i32,
    pub name: &'a str,
    pub slug: &'a str,
    pub notes: Option<&'a str>,
    pub point_lon: Option<f64>,
    pub point_lat: Option<f64>,
    pub geo_detail: Option<&'a str>,
}

#[derive(Clone, Debug, Identifiable, Queryable)]
pub struct Setting {
    pub id: i32,
    pub world: i32,
    pub name: String,
    pub slug: String,
    pub notes: Option<String>,
}

#[derive(Clone, Copy, Debug, Insertable)]
#[table_name = "settings"]
pub struct NewSetting<'a> {
    pub world: i32,
    pub name: &'a str,
    pub slug: &'a str,
    pub notes: Option<&'a str>,
}

#[derive(Clone, Debug, Identifiable, Queryable)]
pub struct Organization {
    pub id: i32,
    pub world: i32,
    pub name: String,
    pub slug: String,
    pub notes: Option<String>,
    pub time_type: TimeType,
    pub start_year: Option<i32>,
    pub start_month: Option<i32>,
    pub start_day: Option<i32>,
    pub start_time: Option<NaiveTime>,
    pub end_year: Option<i32>,
    pub end_month: Option<i32>,
    pub end_day: Option<i32>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Clone, Copy, Debug, Insertable)]
#[table_name = "organizations"]
pub struct NewOrganization<'a> {
    pub world: i32,
    pub name: &'a str,
    pub slug: &'a str,
    pub notes: Option<&'a str>,
    pub time_type: TimeType,
    pub start_year: Option<i32>,
    pub start_month: Option<i32>,
    pub start_day: Option<i32>,
    pub start_time: Option<NaiveTime>,
    pub end_year: Option<i32>,
    pub end_month: Option<i32>,
    pub end_day: Option<i32>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Clone, Debug, Identifiable, Queryable)]
pub struct Character {
    pub id: i32,
    pub world: i32,
    pub name: String,
    pub slug: String,
    pub notes: Option<String>,
    pub time_type: TimeType,
    pub start_year: Option<i32>,
    pub start_month: Option<i32>,
    pub start_day: Option<i32>,
    pub start_time: Option<NaiveTime>,
    pub end_year: Option<i32>,
    pub end_month: Option<i32>,
    pub end_day: Option<i32>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Clone, Copy, Debug, Insertable)]
#[table_name = "characters"]
pub struct NewCharacter<'a> {
    pub world: i32,
    pub name: &'a str,
    pub slug: &'a str,
    pub notes: Option<&'a str>,
    pub time_type: TimeType,
    pub start_year: Option<i32>,
    pub start_month: Option<i32>,
    pub start_day: Option<i32>,
    pub start_time: Option<NaiveTime>,
    pub end_year: Option<i32>,
    pub end_month: Option<i32>,
    pub end_day: Option<i32>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Clone, Debug, Identifiable, Queryable)]
pub struct Event {
    pub id: i32,
    pub world: i32,
    pub name: String,
    pub slug: String,
    pub notes: Option<String>,
    /// Where this event happened, if known.
    pub place: Option<i32>,
    pub time_type: TimeType,
    pub start_year: Option<i32>,
    pub start_month: Option<i32>,
    pub start_day: Option<i32>,
    pub start_time: Option<NaiveTime>,
    pub end_year: Option<i32>,
    pub end_month: Option<i32>,
    pub end_day: Option<i32>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Clone, Copy, Debug, Insertable)]
#[table_name = "events"]
pub struct NewEvent<'a> {
    pub world: i32,
    pub name: &'a str,
    pub slug: &'a str,
    pub notes: Option<&'a str>,
    pub place: Option<i32>,
    pub time_type: TimeType,
    pub start_year: Option<i32>,
    pub start_month: Option<i32>,
    pub start_day: Option<i32>,
    pub start_time: Option<NaiveTime>,
    pub end_year: Option<i32>,
    pub end_month: Option<i32>,
    pub end_day: Option<i32>,
    pub end_time: Option<NaiveTime>,
}

/// A directed parent → child edge in the family graph.
#[derive(Clone, Copy, Debug, Identifiable, Queryable)]
pub struct FamilyTie {
    pub id: i32,
    pub parent: i32,
    pub child: i32,
    /// Position of `child` among `parent`'s children, for display.
    pub birth_order: i32,
}

#[derive(Clone, Copy, Debug, Insertable)]
#[table_name = "family_ties"]
pub struct NewFamilyTie {
    pub parent: i32,
    pub child: i32,
    pub birth_order: i32,
}

#[derive(Clone, Debug, Identifiable, Queryable)]
pub struct EventParticipation {
    pub id: i32,
    pub character: i32,
    pub event: i32,
    /// Free-text label for how the character took part.
    pub role: String,
    pub time_type: TimeType,
    pub start_year: Option<i32>,
    pub start_month: Option<i32>,
    pub start_day: Option<i32>,
    pub start_time: Option<NaiveTime>,
    pub end_year: Option<i32>,
    pub end_month: Option<i32>,
    pub end_day: Option<i32>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Clone, Copy, Debug, Insertable)]
#[table_name = "event_participations"]
pub struct NewEventParticipation<'a> {
    pub character: i32,
    pub event: i32,
    pub role: &'a str,
    pub time_type: TimeType,
    pub start_year: Option<i32>,
    pub start_month: Option<i32>,
    pub start_day: Option<i32>,
    pub start_time: Option<NaiveTime>,
    pub end_year: Option<i32>,
    pub end_month: Option<i32>,
    pub end_day: Option<i32>,
    pub end_time: Option<NaiveTime>,
}

/// A fief bestowed on a character.
#[derive(Clone, Debug, Identifiable, Queryable)]
pub struct Title {
    pub id: i32,
    pub character: i32,
    pub place: i32,
    pub rank: String,
    pub time_type: TimeType,
    pub start_year: Option<i32>,
    pub start_month: Option<i32>,
    pub start_day: Option<i32>,
    pub start_time: Option<NaiveTime>,
    pub end_year: Option<i32>,
    pub end_month: Option<i32>,
    pub end_day: Option<i32>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Clone, Copy, Debug, Insertable)]
#[table_name = "titles"]
pub struct NewTitle<'a> {
    pub character: i32,
    pub place: i32,
    pub rank: &'a str,
    pub time_type: TimeType,
    pub start_year: Option<i32>,
    pub start_month: Option<i32>,
    pub start_day: Option<i32>,
    pub start_time: Option<NaiveTime>,
    pub end_year: Option<i32>,
    pub end_month: Option<i32>,
    pub end_day: Option<i32>,
    pub end_time: Option<NaiveTime>,
}

/// A character's membership in an organization.
#[derive(Clone, Copy, Debug, Identifiable, Queryable)]
pub struct Honor {
    pub id: i32,
    pub character: i32,
    pub organization: i32,
    pub time_type: TimeType,
    pub start_year: Option<i32>,
    pub start_month: Option<i32>,
    pub start_day: Option<i32>,
    pub start_time: Option<NaiveTime>,
    pub end_year: Option<i32>,
    pub end_month: Option<i32>,
    pub end_day: Option<i32>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Clone, Copy, Debug, Insertable)]
#[table_name = "honors"]
pub struct NewHonor {
    pub character: i32,
    pub organization: i32,
    pub time_type: TimeType,
    pub start_year: Option<i32>,
    pub start_month: Option<i32>,
    pub start_day: Option<i32>,
    pub start_time: Option<NaiveTime>,
    pub end_year: Option<i32>,
    pub end_month: Option<i32>,
    pub end_day: Option<i32>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Clone, Debug, Identifiable, Queryable)]
#[table_name = "references"]
pub struct Reference {
    pub id: i32,
    pub url: String,
    pub cite: Option<String>,
}

#[derive(Clone, Copy, Debug, Insertable)]
#[table_name = "references"]
pub struct NewReference<'a> {
    pub url: &'a str,
    pub cite: Option<&'a str>,
}

#[derive(Clone, Debug, Identifiable, Queryable)]
pub struct Tag {
    pub id: i32,
    /// Label text, unique case-insensitively.
    pub name: String,
}

#[derive(Clone, Copy, Debug, Insertable)]
#[table_name = "tags"]
pub struct NewTag<'a> {
    pub name: &'a str,
}

/// Application of a tag to one entity.
///
/// `item_kind` + `item_id` form a polymorphic reference; there is no foreign
/// key behind them, so taggings are cleaned up by the owning model's delete.
#[derive(Clone, Debug, Identifiable, Queryable)]
pub struct Tagging {
    pub id: i32,
    pub tag: i32,
    pub item_kind: String,
    pub item_id: i32,
}

#[derive(Clone, Copy, Debug, Insertable)]
#[table_name = "taggings"]
pub struct NewTagging<'a> {
    pub tag: i32,
    pub item_kind: &'a str,
    pub item_id: i32,
}
