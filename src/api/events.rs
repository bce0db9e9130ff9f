use actix_web::{App, HttpResponse, Json, Path, Query};
use diesel::Connection as _;

use crate::{
    models::{
        character::Character,
        event::{Event, PublicData as EventData},
        participation::PublicData as ParticipationData,
    },
    temporal::Temporal,
};
use super::{
    Error,
    RouteExt,
    State,
    util::{Created, ListScope, resolve_world},
};

/// Configure routes.
pub fn routes(app: App<State>) -> App<State> {
    app
        .resource("/events", |r| {
            r.get().api_with(list_events);
            r.post().api_with(create_event);
        })
        .resource("/events/{id}", |r| {
            r.get().api_with(get_event);
            r.put().api_with(update_event);
            r.delete().api_with(delete_event);
        })
        .resource("/events/{id}/participants", |r| {
            r.get().api_with(list_participants);
            r.post().api_with(add_participant);
        })
}

type Result<T, E=Error> = std::result::Result<T, E>;

/// Get list of events in timeline order, optionally scoped to a world or a
/// name search.
///
/// ## Method
///
/// ```text
/// GET /events
/// GET /events?world=:slug
/// GET /events?search=:query
/// ```
pub fn list_events(
    state: actix_web::State<State>,
    scope: Query<ListScope>,
) -> Result<Json<Vec<EventData>>> {
    let db = state.db.get()?;
    let world = resolve_world(&*db, &scope)?;

    let events = match scope.search {
        Some(ref query) => Event::search(&*db, world, query)?,
        None => match world {
            Some(world) => Event::in_world(&*db, world)?,
            None => Event::all(&*db)?,
        },
    };

    events.iter()
        .map(|e| e.get_public(&*db))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(Json)
        .map_err(Into::into)
}

#[derive(Deserialize)]
pub struct NewEvent {
    world: i32,
    name: String,
    slug: String,
    notes: Option<String>,
    place: Option<i32>,
    #[serde(default = "Temporal::unknown_span")]
    temporal: Temporal,
    #[serde(default)]
    tags: Vec<String>,
}

/// Create a new event.
///
/// ## Method
///
/// ```text
/// POST /events
/// ```
pub fn create_event(
    state: actix_web::State<State>,
    data: Json<NewEvent>,
) -> Result<Created<String, Json<EventData>>> {
    let db = state.db.get()?;
    let data = data.into_inner();

    let event = Event::create(
        &*db,
        data.world,
        &data.name,
        &data.slug,
        data.notes.as_ref().map(String::as_str),
        data.place,
        data.temporal,
    )?;

    if !data.tags.is_empty() {
        event.set_tags(&*db, &data.tags)?;
    }

    let location = format!("/api/v1/events/{}", event.id);

    Ok(Created(location, Json(event.get_public(&*db)?)))
}

/// Get an event by ID.
///
/// ## Method
///
/// ```text
/// GET /events/:id
/// ```
pub fn get_event(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<Json<EventData>> {
    let db = state.db.get()?;
    let event = Event::by_id(&*db, id.into_inner())?;

    Ok(Json(event.get_public(&*db)?))
}

#[derive(Deserialize)]
pub struct EventUpdate {
    name: Option<String>,
    notes: Option<String>,
    place: Option<i32>,
    temporal: Option<Temporal>,
    tags: Option<Vec<String>>,
}

/// Update an event.
///
/// ## Method
///
/// ```text
/// PUT /events/:id
/// ```
pub fn update_event(
    state: actix_web::State<State>,
    id: Path<i32>,
    update: Json<EventUpdate>,
) -> Result<Json<EventData>> {
    let db = state.db.get()?;
    let mut event = Event::by_id(&*db, id.into_inner())?;

    let dbcon = &*db;
    dbcon.transaction::<_, Error, _>(|| {
        if let Some(ref name) = update.name {
            event.set_name(dbcon, name)?;
        }

        if let Some(ref notes) = update.notes {
            event.set_notes(dbcon, Some(notes))?;
        }

        if let Some(place) = update.place {
            event.set_place(dbcon, Some(place))?;
        }

        if let Some(temporal) = update.temporal {
            event.set_temporal(dbcon, temporal)?;
        }

        if let Some(ref tags) = update.tags {
            event.set_tags(dbcon, tags)?;
        }

        Ok(())
    })?;

    Ok(Json(event.get_public(&*db)?))
}

/// Delete an event.
///
/// ## Method
///
/// ```text
/// DELETE /events/:id
/// ```
pub fn delete_event(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<HttpResponse> {
    let db = state.db.get()?;

    Event::by_id(&*db, id.into_inner())?.delete(&*db)?;

    Ok(HttpResponse::Ok().finish())
}

#[derive(Serialize)]
pub struct ParticipantData {
    participation: i32,
    role: String,
    temporal: Temporal,
    character: crate::models::character::PublicData,
}

/// Get an event's participants, with their roles.
///
/// ## Method
///
/// ```text
/// GET /events/:id/participants
/// ```
pub fn list_participants(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<Json<Vec<ParticipantData>>> {
    let db = state.db.get()?;
    let event = Event::by_id(&*db, id.into_inner())?;

    event.participants(&*db)?
        .into_iter()
        .map(|(participation, character)| Ok(ParticipantData {
            participation: participation.id,
            role: participation.role.clone(),
            temporal: temporal_from_row!(participation),
            character: character.get_public(&*db)?,
        }))
        .collect::<std::result::Result<Vec<_>, Error>>()
        .map(Json)
}

#[derive(Deserialize)]
pub struct NewParticipant {
    character: i32,
    #[serde(default)]
    role: String,
    #[serde(default = "Temporal::unknown_span")]
    temporal: Temporal,
}

/// Record a character's participation in an event.
///
/// An omitted or empty role is stored as `"participant"`.
///
/// ## Method
///
/// ```text
/// POST /events/:id/participants
/// ```
pub fn add_participant(
    state: actix_web::State<State>,
    id: Path<i32>,
    data: Json<NewParticipant>,
) -> Result<Created<String, Json<ParticipationData>>> {
    let db = state.db.get()?;
    let event = Event::by_id(&*db, id.into_inner())?;
    let character = Character::by_id(&*db, data.character)?;

    let participation = event.add_participant(&*db, &character, &data.role,
        data.temporal)?;

    let location = format!("/api/v1/participations/{}", participation.id);

    Ok(Created(location, Json(participation.get_public())))
}
