use actix_web::{App, HttpResponse, Json, Path};

use crate::models::world::{World, PublicData as WorldData};
use super::{Error, RouteExt, State, util::Created};

/// Configure routes.
pub fn routes(app: App<State>) -> App<State> {
    app
        .resource("/worlds", |r| {
            r.get().api_with(list_worlds);
            r.post().api_with(create_world);
        })
        .resource("/worlds/{id}", |r| {
            r.get().api_with(get_world);
            r.put().api_with(update_world);
            r.delete().api_with(delete_world);
        })
}

type Result<T, E=Error> = std::result::Result<T, E>;

/// Get list of all worlds.
///
/// ## Method
///
/// ```text
/// GET /worlds
/// ```
pub fn list_worlds(
    state: actix_web::State<State>,
) -> Result<Json<Vec<WorldData>>> {
    let db = state.db.get()?;

    World::all(&*db)
        .map(|v| v.into_iter().map(|w| w.get_public()).collect())
        .map(Json)
        .map_err(Into::into)
}

#[derive(Deserialize)]
pub struct NewWorld {
    name: String,
    slug: String,
}

/// Create a new world.
///
/// ## Method
///
/// ```text
/// POST /worlds
/// ```
pub fn create_world(
    state: actix_web::State<State>,
    data: Json<NewWorld>,
) -> Result<Created<String, Json<WorldData>>> {
    let db = state.db.get()?;
    let world = World::create(&*db, &data.name, &data.slug)?;

    let location = format!("/api/v1/worlds/{}", world.id);

    Ok(Created(location, Json(world.get_public())))
}

/// Get a world by ID.
///
/// ## Method
///
/// ```text
/// GET /worlds/:id
/// ```
pub fn get_world(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<Json<WorldData>> {
    let db = state.db.get()?;
    let world = World::by_id(&*db, id.into_inner())?;

    Ok(Json(world.get_public()))
}

#[derive(Deserialize)]
pub struct WorldUpdate {
    name: Option<String>,
}

/// Update a world.
///
/// ## Method
///
/// ```text
/// PUT /worlds/:id
/// ```
pub fn update_world(
    state: actix_web::State<State>,
    id: Path<i32>,
    update: Json<WorldUpdate>,
) -> Result<Json<WorldData>> {
    let db = state.db.get()?;
    let mut world = World::by_id(&*db, id.into_inner())?;

    if let Some(ref name) = update.name {
        world.set_name(&*db, name)?;
    }

    Ok(Json(world.get_public()))
}

/// Delete a world, and everything recorded in it.
///
/// ## Method
///
/// ```text
/// DELETE /worlds/:id
/// ```
pub fn delete_world(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<HttpResponse> {
    let db = state.db.get()?;

    World::by_id(&*db, id.into_inner())?.delete(&*db)?;

    Ok(HttpResponse::Ok().finish())
}
