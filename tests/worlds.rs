//! Tests for worlds and the reach of their deletion.

use diesel::prelude::*;
use failure::Fallible;
use lazy_static::lazy_static;
use storyworlds::{
    db::schema,
    models::{
        Character,
        Event,
        FamilyTie,
        Honor,
        Organization,
        Place,
        Setting,
        Title,
        World,
        world::CreateWorldError,
    },
    temporal::Temporal,
};

mod common;

use self::common::{Connection, Database, setup_db};

lazy_static! {
    static ref DB: Database = setup_db(seed)
        .expect("Cannot create test database");
}

fn seed(db: &Connection) -> Fallible<()> {
    let world = World::create(db, "Midgard", "midgard")?;
    let other = World::create(db, "Aldervale", "aldervale")?;

    let ford = Place::create(
        db, world.id, "The Ford", "the-ford", None, None, None)?;
    Setting::create(db, world.id, "The Long Peace", "the-long-peace", None)?;
    let house = Organization::create(
        db, world.id, "House of the Oak", "house-of-the-oak", None,
        Temporal::unknown_span())?;

    let aia = Character::create(
        db, world.id, "Aia", "aia", None, Temporal::unknown_span())?;
    let beren = Character::create(
        db, world.id, "Beren", "beren", None, Temporal::unknown_span())?;
    aia.set_tags(db, &["queen".to_string()])?;

    FamilyTie::create(db, &aia, &beren, 0)?;
    Title::create(db, &aia, &ford, "Warden", Temporal::unknown_span())?;
    Honor::create(db, &aia, &house, Temporal::unknown_span())?;

    let battle = Event::create(
        db, world.id, "Battle of the Ford", "battle-of-the-ford", None,
        Some(ford.id), Temporal::unknown_span())?;
    battle.add_participant(db, &aia, "victor", Temporal::unknown_span())?;

    Character::create(
        db, other.id, "Corin", "corin", None, Temporal::unknown_span())?;

    Ok(())
}

#[test]
fn deleting_a_world_cascades_through_everything_in_it() {
    DB.lock(|pool| {
        let db = pool.get()?;

        World::by_slug(&*db, "midgard")?.delete(&*db)?;

        macro_rules! assert_empty {
            ($($table:ident),+ $(,)*) => {
                $(
                    let count = schema::$table::table
                        .count()
                        .get_result::<i64>(&*db)?;
                    assert_eq!(count, 0, "{} not empty", stringify!($table));
                )+
            };
        }

        assert_empty!(
            places,
            settings,
            organizations,
            events,
            family_ties,
            event_participations,
            titles,
            honors,
            taggings,
        );

        // The other world's characters survive.
        let survivors = schema::characters::table
            .count()
            .get_result::<i64>(&*db)?;
        assert_eq!(survivors, 1);

        Ok(())
    }).unwrap();
}

#[test]
fn world_slugs_are_unique() {
    DB.lock(|pool| {
        let db = pool.get()?;

        match World::create(&*db, "Second Midgard", "midgard") {
            Err(CreateWorldError::DuplicateSlug) => (),
            r => panic!("expected DuplicateSlug, got {:?}",
                r.map(|w| w.id)),
        }

        Ok(())
    }).unwrap();
}

#[test]
fn malformed_slugs_are_rejected() {
    DB.lock(|pool| {
        let db = pool.get()?;

        for slug in &["Midgard", "mid gard", "midgård", ""] {
            match World::create(&*db, "Midgard", slug) {
                Err(CreateWorldError::InvalidSlug) => (),
                r => panic!("slug {:?} accepted: {:?}",
                    slug, r.map(|w| w.id)),
            }
        }

        Ok(())
    }).unwrap();
}

#[test]
fn worlds_are_found_by_slug() {
    DB.lock(|pool| {
        let db = pool.get()?;

        let world = World::by_slug(&*db, "midgard")?;
        assert_eq!(world.name, "Midgard");

        Ok(())
    }).unwrap();
}
