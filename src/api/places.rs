use actix_web::{App, HttpResponse, Json, Path, Query};
use diesel::Connection as _;

use crate::models::place::{Place, Point, PublicData as PlaceData};
use super::{
    Error,
    RouteExt,
    State,
    util::{Created, ListScope, resolve_world},
};

/// Configure routes.
pub fn routes(app: App<State>) -> App<State> {
    app
        .resource("/places", |r| {
            r.get().api_with(list_places);
            r.post().api_with(create_place);
        })
        .resource("/places/{id}", |r| {
            r.get().api_with(get_place);
            r.put().api_with(update_place);
            r.delete().api_with(delete_place);
        })
}

type Result<T, E=Error> = std::result::Result<T, E>;

/// Get list of places, optionally scoped to a world or a name search.
///
/// ## Method
///
/// ```text
/// GET /places
/// GET /places?world=:slug
/// GET /places?search=:query
/// ```
pub fn list_places(
    state: actix_web::State<State>,
    scope: Query<ListScope>,
) -> Result<Json<Vec<PlaceData>>> {
    let db = state.db.get()?;
    let world = resolve_world(&*db, &scope)?;

    let places = match scope.search {
        Some(ref query) => Place::search(&*db, world, query)?,
        None => match world {
            Some(world) => Place::in_world(&*db, world)?,
            None => Place::all(&*db)?,
        },
    };

    places.iter()
        .map(|p| p.get_public(&*db))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(Json)
        .map_err(Into::into)
}

#[derive(Deserialize)]
pub struct NewPlace {
    world: i32,
    name: String,
    slug: String,
    notes: Option<String>,
    point_location: Option<Point>,
    geo_detail: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

/// Create a new place.
///
/// ## Method
///
/// ```text
/// POST /places
/// ```
pub fn create_place(
    state: actix_web::State<State>,
    data: Json<NewPlace>,
) -> Result<Created<String, Json<PlaceData>>> {
    let db = state.db.get()?;
    let data = data.into_inner();

    let place = Place::create(
        &*db,
        data.world,
        &data.name,
        &data.slug,
        data.notes.as_ref().map(String::as_str),
        data.point_location,
        data.geo_detail.as_ref().map(String::as_str),
    )?;

    if !data.tags.is_empty() {
        place.set_tags(&*db, &data.tags)?;
    }

    let location = format!("/api/v1/places/{}", place.id);

    Ok(Created(location, Json(place.get_public(&*db)?)))
}

/// Get a place by ID.
///
/// ## Method
///
/// ```text
/// GET /places/:id
/// ```
pub fn get_place(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<Json<PlaceData>> {
    let db = state.db.get()?;
    let place = Place::by_id(&*db, id.into_inner())?;

    Ok(Json(place.get_public(&*db)?))
}

#[derive(Deserialize)]
pub struct PlaceUpdate {
    name: Option<String>,
    notes: Option<String>,
    point_location: Option<Point>,
    geo_detail: Option<String>,
    tags: Option<Vec<String>>,
}

/// Update a place.
///
/// ## Method
///
/// ```text
/// PUT /places/:id
/// ```
pub fn update_place(
    state: actix_web::State<State>,
    id: Path<i32>,
    update: Json<PlaceUpdate>,
) -> Result<Json<PlaceData>> {
    let db = state.db.get()?;
    let mut place = Place::by_id(&*db, id.into_inner())?;

    let dbcon = &*db;
    dbcon.transaction::<_, Error, _>(|| {
        if let Some(ref name) = update.name {
            place.set_name(dbcon, name)?;
        }

        if let Some(ref notes) = update.notes {
            place.set_notes(dbcon, Some(notes))?;
        }

        if let Some(point) = update.point_location {
            place.set_point_location(dbcon, Some(point))?;
        }

        if let Some(ref detail) = update.geo_detail {
            place.set_geo_detail(dbcon, Some(detail))?;
        }

        if let Some(ref tags) = update.tags {
            place.set_tags(dbcon, tags)?;
        }

        Ok(())
    })?;

    Ok(Json(place.get_public(&*db)?))
}

/// Delete a place. Events held there and titles over it go with it.
///
/// ## Method
///
/// ```text
/// DELETE /places/:id
/// ```
pub fn delete_place(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<HttpResponse> {
    let db = state.db.get()?;

    Place::by_id(&*db, id.into_inner())?.delete(&*db)?;

    Ok(HttpResponse::Ok().finish())
}
