use structopt::StructOpt;

use crate::{
    Result,
    config::Config,
    db,
    models::World,
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
    /// List worlds
    #[structopt(name = "list")]
    List,
    /// Add a world
    #[structopt(name = "add")]
    Add(AddOpts),
}

pub fn main(cfg: &Config, opts: Opts) -> Result<()> {
    match opts.command {
        Command::List => list(cfg),
        Command::Add(opts) => add_world(cfg, opts),
    }
}

fn list(cfg: &Config) -> Result<()> {
    let db = db::connect(cfg)?;
    let worlds = World::all(&db)?;

    let rows = worlds.iter()
        .map(|world| (world.id.to_string(), world.name.as_str(),
            world.slug.as_str()))
        .collect::<Vec<_>>();

    print_table(("ID", "Name", "Slug"), &rows);

    Ok(())
}

#[derive(StructOpt)]
pub struct AddOpts {
    /// World's name
    name: String,
    /// World's slug (derived from the name when omitted)
    slug: Option<String>,
}

fn add_world(cfg: &Config, opts: AddOpts) -> Result<()> {
    let db = db::connect(cfg)?;
    let slug = match opts.slug {
        Some(slug) => slug,
        None => slugify(&opts.name),
    };
    let world = World::create(&db, &opts.name, &slug)?;

    println!("Created world {}", world.id);

    Ok(())
}
