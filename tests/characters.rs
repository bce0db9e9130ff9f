//! Tests for characters and the family graph.

use failure::Fallible;
use lazy_static::lazy_static;
use storyworlds::{
    models::{
        Character,
        World,
        character::RemoveFamilyTieError,
        family_tie::CreateFamilyTieError,
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

    Character::create(
        db, world.id, "Aia", "aia", None, Temporal::unknown_span())?;
    Character::create(
        db, world.id, "Beren", "beren", None, Temporal::unknown_span())?;
    Character::create(
        db, other.id, "Corin", "corin", None, Temporal::unknown_span())?;

    Ok(())
}

fn find(db: &Connection, world: &str, slug: &str) -> Fallible<Character> {
    let world = World::by_slug(db, world)?;
    Ok(Character::by_slug(db, world.id, slug)?)
}

#[test]
fn aia_is_a_parent_of_beren() {
    DB.lock(|pool| {
        let db = pool.get()?;
        let aia = find(&*db, "midgard", "aia")?;
        let beren = find(&*db, "midgard", "beren")?;

        beren.add_parent(&*db, &aia, 0)?;

        let parents = beren.parents(&*db)?;
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].1.name, "Aia");

        let children = aia.children(&*db)?;
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].1.name, "Beren");

        assert!(aia.parents(&*db)?.is_empty());
        assert!(beren.children(&*db)?.is_empty());

        Ok(())
    }).unwrap();
}

#[test]
fn duplicate_parent_edges_are_rejected() {
    DB.lock(|pool| {
        let db = pool.get()?;
        let aia = find(&*db, "midgard", "aia")?;
        let beren = find(&*db, "midgard", "beren")?;

        beren.add_parent(&*db, &aia, 0)?;

        match beren.add_parent(&*db, &aia, 1) {
            Err(CreateFamilyTieError::DuplicateTie) => (),
            r => panic!("expected DuplicateTie, got {:?}",
                r.map(|t| t.id)),
        }

        Ok(())
    }).unwrap();
}

#[test]
fn character_cannot_be_its_own_parent() {
    DB.lock(|pool| {
        let db = pool.get()?;
        let aia = find(&*db, "midgard", "aia")?;

        match aia.add_parent(&*db, &aia, 0) {
            Err(CreateFamilyTieError::SelfTie) => (),
            r => panic!("expected SelfTie, got {:?}", r.map(|t| t.id)),
        }

        Ok(())
    }).unwrap();
}

#[test]
fn family_graph_stays_acyclic() {
    DB.lock(|pool| {
        let db = pool.get()?;
        let aia = find(&*db, "midgard", "aia")?;
        let beren = find(&*db, "midgard", "beren")?;

        beren.add_parent(&*db, &aia, 0)?;

        match aia.add_parent(&*db, &beren, 0) {
            Err(CreateFamilyTieError::WouldCreateCycle) => (),
            r => panic!("expected WouldCreateCycle, got {:?}",
                r.map(|t| t.id)),
        }

        Ok(())
    }).unwrap();
}

#[test]
fn family_ties_stay_within_one_world() {
    DB.lock(|pool| {
        let db = pool.get()?;
        let aia = find(&*db, "midgard", "aia")?;
        let corin = find(&*db, "aldervale", "corin")?;

        match corin.add_parent(&*db, &aia, 0) {
            Err(CreateFamilyTieError::WorldMismatch) => (),
            r => panic!("expected WorldMismatch, got {:?}",
                r.map(|t| t.id)),
        }

        Ok(())
    }).unwrap();
}

#[test]
fn children_are_ordered_by_birth_order() {
    DB.lock(|pool| {
        let db = pool.get()?;
        let aia = find(&*db, "midgard", "aia")?;
        let beren = find(&*db, "midgard", "beren")?;
        let world = World::by_slug(&*db, "midgard")?;
        let ciri = Character::create(
            &*db, world.id, "Ciri", "ciri", None, Temporal::unknown_span())?;

        aia.add_child(&*db, &ciri, 2)?;
        aia.add_child(&*db, &beren, 1)?;

        let children = aia.children(&*db)?;
        let names = children.iter()
            .map(|(_, c)| c.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["Beren", "Ciri"]);

        Ok(())
    }).unwrap();
}

#[test]
fn removing_a_parent_removes_only_the_tie() {
    DB.lock(|pool| {
        let db = pool.get()?;
        let aia = find(&*db, "midgard", "aia")?;
        let beren = find(&*db, "midgard", "beren")?;

        beren.add_parent(&*db, &aia, 0)?;
        beren.remove_parent(&*db, aia.id)?;

        assert!(beren.parents(&*db)?.is_empty());
        assert_eq!(find(&*db, "midgard", "aia")?.name, "Aia");

        match beren.remove_parent(&*db, aia.id) {
            Err(RemoveFamilyTieError::NotFound) => (),
            r => panic!("expected NotFound, got {:?}", r),
        }

        Ok(())
    }).unwrap();
}
