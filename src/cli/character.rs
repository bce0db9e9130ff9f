use structopt::StructOpt;

use crate::{
    Result,
    config::Config,
    db,
    models::{Character, World},
    temporal::Temporal,
    utils::slugify,
};
use super::util::print_table;

#[derive(StructOpt)]
pub struct Opts {
    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
pub enum Command {
    /// List characters of a world
    #[structopt(name = "list")]
    List(ListOpts),
    /// Add a character
    #[structopt(name = "add")]
    Add(AddOpts),
    /// Record one character as a parent of another
    #[structopt(name = "link")]
    Link(LinkOpts),
}

pub fn main(cfg: &Config, opts: Opts) -> Result<()> {
    match opts.command {
        Command::List(opts) => list(cfg, opts),
        Command::Add(opts) => add_character(cfg, opts),
        Command::Link(opts) => link(cfg, opts),
    }
}

#[derive(StructOpt)]
pub struct ListOpts {
    /// Slug of the world to list
    world: String,
}

fn list(cfg: &Config, opts: ListOpts) -> Result<()> {
    let db = db::connect(cfg)?;
    let world = World::by_slug(&db, &opts.world)?;
    let characters = Character::in_world(&db, world.id)?;

    let rows = characters.iter()
        .map(|character| (character.id.to_string(), character.name.as_str(),
            character.slug.as_str()))
        .collect::<Vec<_>>();

    print_table(("ID", "Name", "Slug"), &rows);

    Ok(())
}

#[derive(StructOpt)]
pub struct AddOpts {
    /// Slug of the world the character lives in
    world: String,
    /// Character's name
    name: String,
    /// Character's slug (derived from the name when omitted)
    slug: Option<String>,
}

fn add_character(cfg: &Config, opts: AddOpts) -> Result<()> {
    let db = db::connect(cfg)?;
    let world = World::by_slug(&db, &opts.world)?;
    let slug = match opts.slug {
        Some(slug) => slug,
        None => slugify(&opts.name),
    };
    let character = Character::create(&db, world.id, &opts.name, &slug, None,
        Temporal::unknown_span())?;

    println!("Created character {}", character.id);

    Ok(())
}

#[derive(StructOpt)]
pub struct LinkOpts {
    /// Slug of the world both characters live in
    world: String,
    /// Slug of the parent
    parent: String,
    /// Slug of the child
    child: String,
    /// Birth order of the child among the parent's children
    #[structopt(long = "birth-order", default_value = "0")]
    birth_order: i32,
}

fn link(cfg: &Config, opts: LinkOpts) -> Result<()> {
    let db = db::connect(cfg)?;
    let world = World::by_slug(&db, &opts.world)?;
    let parent = Character::by_slug(&db, world.id, &opts.parent)?;
    let child = Character::by_slug(&db, world.id, &opts.child)?;

    let tie = child.add_parent(&db, &parent, opts.birth_order)?;

    println!("Created family tie {}", tie.id);

    Ok(())
}
