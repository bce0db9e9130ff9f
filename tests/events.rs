//! Tests for events, participation, and timeline ordering.

use failure::Fallible;
use lazy_static::lazy_static;
use storyworlds::{
    models::{
        Character,
        Event,
        World,
        participation::AddParticipantError,
    },
    temporal::{DateParts, Temporal},
};

mod common;

use self::common::{Connection, Database, setup_db};

lazy_static! {
    static ref DB: Database = setup_db(seed)
        .expect("Cannot create test database");
}

fn year(y: i32) -> DateParts {
    DateParts { year: Some(y), ..DateParts::unknown() }
}

fn seed(db: &Connection) -> Fallible<()> {
    let world = World::create(db, "Midgard", "midgard")?;
    let other = World::create(db, "Aldervale", "aldervale")?;

    Character::create(
        db, world.id, "Aia", "aia", None, Temporal::unknown_span())?;
    Character::create(
        db, world.id, "Beren", "beren", None, Temporal::unknown_span())?;
    Character::create(
        db, other.id, "Corin", "corin", None, Temporal::unknown_span())?;

    Event::create(
        db, world.id, "Battle of the Ford", "battle-of-the-ford", None, None,
        Temporal::span(year(512), year(513)))?;

    Ok(())
}

fn find_event(db: &Connection, slug: &str) -> Fallible<Event> {
    let world = World::by_slug(db, "midgard")?;
    Ok(Event::by_slug(db, world.id, slug)?)
}

fn find_character(db: &Connection, world: &str, slug: &str)
-> Fallible<Character> {
    let world = World::by_slug(db, world)?;
    Ok(Character::by_slug(db, world.id, slug)?)
}

#[test]
fn participant_roles_are_recorded() {
    DB.lock(|pool| {
        let db = pool.get()?;
        let battle = find_event(&*db, "battle-of-the-ford")?;
        let aia = find_character(&*db, "midgard", "aia")?;
        let beren = find_character(&*db, "midgard", "beren")?;

        battle.add_participant(&*db, &aia, "victor",
            Temporal::unknown_span())?;
        battle.add_participant(&*db, &beren, "",
            Temporal::unknown_span())?;

        let mut roles = battle.participants(&*db)?
            .into_iter()
            .map(|(p, c)| (c.name.clone(), p.role))
            .collect::<Vec<_>>();
        roles.sort();

        assert_eq!(roles, [
            ("Aia".to_string(), "victor".to_string()),
            ("Beren".to_string(), "participant".to_string()),
        ]);

        Ok(())
    }).unwrap();
}

#[test]
fn participants_must_share_the_events_world() {
    DB.lock(|pool| {
        let db = pool.get()?;
        let battle = find_event(&*db, "battle-of-the-ford")?;
        let corin = find_character(&*db, "aldervale", "corin")?;

        match battle.add_participant(&*db, &corin, "witness",
            Temporal::unknown_span())
        {
            Err(AddParticipantError::WorldMismatch) => (),
            r => panic!("expected WorldMismatch, got {:?}",
                r.map(|p| p.id)),
        }

        Ok(())
    }).unwrap();
}

#[test]
fn a_character_participates_at_most_once() {
    DB.lock(|pool| {
        let db = pool.get()?;
        let battle = find_event(&*db, "battle-of-the-ford")?;
        let aia = find_character(&*db, "midgard", "aia")?;

        battle.add_participant(&*db, &aia, "victor",
            Temporal::unknown_span())?;

        match battle.add_participant(&*db, &aia, "casualty",
            Temporal::unknown_span())
        {
            Err(AddParticipantError::DuplicateParticipant) => (),
            r => panic!("expected DuplicateParticipant, got {:?}",
                r.map(|p| p.id)),
        }

        Ok(())
    }).unwrap();
}

#[test]
fn instants_have_no_end() {
    DB.lock(|pool| {
        let db = pool.get()?;
        let world = World::by_slug(&*db, "midgard")?;

        // End fields may arrive populated; for an instant they are noise.
        let temporal = Temporal {
            end: year(600),
            ..Temporal::instant(year(500))
        };

        let founding = Event::create(
            &*db, world.id, "The Founding", "the-founding", None, None,
            temporal)?;

        assert_eq!(founding.temporal().end(), None);
        assert_eq!(founding.temporal().start, year(500));

        Ok(())
    }).unwrap();
}

#[test]
fn events_list_in_timeline_order_with_unknowns_last() {
    DB.lock(|pool| {
        let db = pool.get()?;
        let world = World::by_slug(&*db, "midgard")?;

        Event::create(
            &*db, world.id, "The Founding", "the-founding", None, None,
            Temporal::instant(year(500)))?;
        Event::create(
            &*db, world.id, "The Long Peace Ends", "the-long-peace-ends",
            None, None,
            Temporal::instant(DateParts {
                year: Some(512),
                month: Some(3),
                ..DateParts::unknown()
            }))?;
        Event::create(
            &*db, world.id, "A Forgotten Age", "a-forgotten-age", None, None,
            Temporal::unknown_span())?;

        let names = Event::in_world(&*db, world.id)?
            .iter()
            .map(|e| e.name.clone())
            .collect::<Vec<_>>();

        assert_eq!(names, [
            "The Founding",
            "The Long Peace Ends",
            "Battle of the Ford",
            "A Forgotten Age",
        ]);

        Ok(())
    }).unwrap();
}
