use actix::System;
use actix_web::{
    App,
    middleware::Logger,
    server,
};
use sentry_actix::SentryMiddleware;

use super::{
    Result,
    config::Config,
    db,
};

pub use self::error::{ApiError, Error};

pub(self) use self::error::RouteExt;

pub mod admin;
pub mod characters;
pub mod error;
pub mod events;
pub mod family_ties;
pub mod organizations;
pub mod participations;
pub mod places;
pub mod references;
pub mod settings;
pub mod util;
pub mod worlds;

/// Start an API server.
pub fn start(cfg: &Config) -> Result<()> {
    let system = System::new("storyworlds");
    let state = configure(cfg.clone())?;
    let server = server::new(move || new_app(state.clone()));

    let server = if let Some(fd) = listenfd::ListenFd::from_env().take_tcp_listener(0)? {
        server.listen(fd)
    } else {
        server.bind(cfg.server.address)?
    };

    server
        .server_hostname(cfg.server.domain.clone())
        .start();

    system.run();

    Ok(())
}

#[derive(Clone)]
pub struct State {
    /// Current configuration.
    pub config: Config,
    /// Database connection pool.
    pub db: db::Pool,
}

pub fn configure(cfg: Config) -> Result<State> {
    let db = db::pool(&cfg)?;

    Ok(State {
        config: cfg,
        db,
    })
}

pub fn new_app(state: State) -> App<State> {
    App::with_state(state)
        .middleware(SentryMiddleware::new())
        .middleware(Logger::default())
        .prefix("/api/v1")
        .configure(admin::routes)
        .configure(characters::routes)
        .configure(events::routes)
        .configure(family_ties::routes)
        .configure(organizations::routes)
        .configure(participations::routes)
        .configure(places::routes)
        .configure(references::routes)
        .configure(settings::routes)
        .configure(worlds::routes)
}
