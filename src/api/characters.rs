use actix_web::{App, HttpResponse, Json, Path, Query};
use diesel::Connection as _;

use crate::{
    models::{
        character::{Character, PublicData as CharacterData, Relative},
        family_tie::PublicData as FamilyTieData,
        honor::{Honor, PublicData as HonorData},
        organization::Organization,
        place::Place,
        title::{Title, PublicData as TitleData},
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
        .resource("/characters", |r| {
            r.get().api_with(list_characters);
            r.post().api_with(create_character);
        })
        .resource("/characters/{id}", |r| {
            r.get().api_with(get_character);
            r.put().api_with(update_character);
            r.delete().api_with(delete_character);
        })
        .resource("/characters/{id}/parents", |r| {
            r.get().api_with(list_parents);
            r.post().api_with(add_parent);
        })
        .resource("/characters/{id}/parents/{parent}", |r| {
            r.delete().api_with(remove_parent);
        })
        .resource("/characters/{id}/children", |r| {
            r.get().api_with(list_children);
            r.post().api_with(add_child);
        })
        .resource("/characters/{id}/titles", |r| {
            r.get().api_with(list_titles);
            r.post().api_with(add_title);
        })
        .resource("/characters/{id}/honors", |r| {
            r.get().api_with(list_honors);
            r.post().api_with(add_honor);
        })
        .resource("/characters/{id}/participations", |r| {
            r.get().api_with(list_participations);
        })
}

type Result<T, E=Error> = std::result::Result<T, E>;

/// Get list of characters, optionally scoped to a world or a name search.
///
/// ## Method
///
/// ```text
/// GET /characters
/// GET /characters?world=:slug
/// GET /characters?search=:query
/// ```
pub fn list_characters(
    state: actix_web::State<State>,
    scope: Query<ListScope>,
) -> Result<Json<Vec<CharacterData>>> {
    let db = state.db.get()?;
    let world = resolve_world(&*db, &scope)?;

    let characters = match scope.search {
        Some(ref query) => Character::search(&*db, world, query)?,
        None => match world {
            Some(world) => Character::in_world(&*db, world)?,
            None => Character::all(&*db)?,
        },
    };

    characters.iter()
        .map(|c| c.get_public(&*db))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(Json)
        .map_err(Into::into)
}

#[derive(Deserialize)]
pub struct NewCharacter {
    world: i32,
    name: String,
    slug: String,
    notes: Option<String>,
    #[serde(default = "Temporal::unknown_span")]
    temporal: Temporal,
    #[serde(default)]
    tags: Vec<String>,
}

/// Create a new character.
///
/// ## Method
///
/// ```text
/// POST /characters
/// ```
pub fn create_character(
    state: actix_web::State<State>,
    data: Json<NewCharacter>,
) -> Result<Created<String, Json<CharacterData>>> {
    let db = state.db.get()?;
    let data = data.into_inner();

    let character = Character::create(
        &*db,
        data.world,
        &data.name,
        &data.slug,
        data.notes.as_ref().map(String::as_str),
        data.temporal,
    )?;

    if !data.tags.is_empty() {
        character.set_tags(&*db, &data.tags)?;
    }

    let location = format!("/api/v1/characters/{}", character.id);

    Ok(Created(location, Json(character.get_public(&*db)?)))
}

/// Get a character by ID.
///
/// ## Method
///
/// ```text
/// GET /characters/:id
/// ```
pub fn get_character(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<Json<CharacterData>> {
    let db = state.db.get()?;
    let character = Character::by_id(&*db, id.into_inner())?;

    Ok(Json(character.get_public(&*db)?))
}

#[derive(Deserialize)]
pub struct CharacterUpdate {
    name: Option<String>,
    notes: Option<String>,
    temporal: Option<Temporal>,
    tags: Option<Vec<String>>,
}

/// Update a character.
///
/// ## Method
///
/// ```text
/// PUT /characters/:id
/// ```
pub fn update_character(
    state: actix_web::State<State>,
    id: Path<i32>,
    update: Json<CharacterUpdate>,
) -> Result<Json<CharacterData>> {
    let db = state.db.get()?;
    let mut character = Character::by_id(&*db, id.into_inner())?;

    let dbcon = &*db;
    dbcon.transaction::<_, Error, _>(|| {
        if let Some(ref name) = update.name {
            character.set_name(dbcon, name)?;
        }

        if let Some(ref notes) = update.notes {
            character.set_notes(dbcon, Some(notes))?;
        }

        if let Some(temporal) = update.temporal {
            character.set_temporal(dbcon, temporal)?;
        }

        if let Some(ref tags) = update.tags {
            character.set_tags(dbcon, tags)?;
        }

        Ok(())
    })?;

    Ok(Json(character.get_public(&*db)?))
}

/// Delete a character.
///
/// ## Method
///
/// ```text
/// DELETE /characters/:id
/// ```
pub fn delete_character(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<HttpResponse> {
    let db = state.db.get()?;

    Character::by_id(&*db, id.into_inner())?.delete(&*db)?;

    Ok(HttpResponse::Ok().finish())
}

/// Get a character's parents.
///
/// ## Method
///
/// ```text
/// GET /characters/:id/parents
/// ```
pub fn list_parents(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<Json<Vec<Relative>>> {
    let db = state.db.get()?;
    let character = Character::by_id(&*db, id.into_inner())?;

    character.parents(&*db)?
        .into_iter()
        .map(|(tie, parent)| Ok(Relative {
            tie: tie.id,
            birth_order: tie.birth_order,
            character: parent.get_public(&*db)?,
        }))
        .collect::<std::result::Result<Vec<_>, Error>>()
        .map(Json)
}

#[derive(Deserialize)]
pub struct NewParent {
    parent: i32,
    #[serde(default)]
    birth_order: i32,
}

/// Record another character as a parent of this one.
///
/// ## Method
///
/// ```text
/// POST /characters/:id/parents
/// ```
pub fn add_parent(
    state: actix_web::State<State>,
    id: Path<i32>,
    data: Json<NewParent>,
) -> Result<Created<String, Json<FamilyTieData>>> {
    let db = state.db.get()?;
    let character = Character::by_id(&*db, id.into_inner())?;
    let parent = Character::by_id(&*db, data.parent)?;

    let tie = character.add_parent(&*db, &parent, data.birth_order)?;

    let location = format!("/api/v1/family-ties/{}", tie.id);

    Ok(Created(location, Json(tie.get_public())))
}

/// Remove the tie recording another character as a parent of this one.
///
/// ## Method
///
/// ```text
/// DELETE /characters/:id/parents/:parent
/// ```
pub fn remove_parent(
    state: actix_web::State<State>,
    path: Path<(i32, i32)>,
) -> Result<HttpResponse> {
    let db = state.db.get()?;
    let (id, parent) = path.into_inner();
    let character = Character::by_id(&*db, id)?;

    character.remove_parent(&*db, parent)?;

    Ok(HttpResponse::Ok().finish())
}

/// Get a character's children, in birth order.
///
/// ## Method
///
/// ```text
/// GET /characters/:id/children
/// ```
pub fn list_children(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<Json<Vec<Relative>>> {
    let db = state.db.get()?;
    let character = Character::by_id(&*db, id.into_inner())?;

    character.children(&*db)?
        .into_iter()
        .map(|(tie, child)| Ok(Relative {
            tie: tie.id,
            birth_order: tie.birth_order,
            character: child.get_public(&*db)?,
        }))
        .collect::<std::result::Result<Vec<_>, Error>>()
        .map(Json)
}

#[derive(Deserialize)]
pub struct NewChild {
    child: i32,
    #[serde(default)]
    birth_order: i32,
}

/// Record another character as a child of this one.
///
/// ## Method
///
/// ```text
/// POST /characters/:id/children
/// ```
pub fn add_child(
    state: actix_web::State<State>,
    id: Path<i32>,
    data: Json<NewChild>,
) -> Result<Created<String, Json<FamilyTieData>>> {
    let db = state.db.get()?;
    let character = Character::by_id(&*db, id.into_inner())?;
    let child = Character::by_id(&*db, data.child)?;

    let tie = character.add_child(&*db, &child, data.birth_order)?;

    let location = format!("/api/v1/family-ties/{}", tie.id);

    Ok(Created(location, Json(tie.get_public())))
}

#[derive(Serialize)]
pub struct CharacterTitleData {
    id: i32,
    rank: String,
    temporal: Temporal,
    place: i32,
    place_name: String,
}

/// Get a character's titles, with the places they are over.
///
/// ## Method
///
/// ```text
/// GET /characters/:id/titles
/// ```
pub fn list_titles(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<Json<Vec<CharacterTitleData>>> {
    let db = state.db.get()?;
    let character = Character::by_id(&*db, id.into_inner())?;

    let titles = character.titles(&*db)?
        .into_iter()
        .map(|(title, place)| CharacterTitleData {
            id: title.id,
            rank: title.rank.clone(),
            temporal: temporal_from_row!(title),
            place: place.id,
            place_name: place.name,
        })
        .collect();

    Ok(Json(titles))
}

#[derive(Deserialize)]
pub struct NewTitle {
    place: i32,
    rank: String,
    #[serde(default = "Temporal::unknown_span")]
    temporal: Temporal,
}

/// Record a character as holding a rank over a place.
///
/// ## Method
///
/// ```text
/// POST /characters/:id/titles
/// ```
pub fn add_title(
    state: actix_web::State<State>,
    id: Path<i32>,
    data: Json<NewTitle>,
) -> Result<Created<String, Json<TitleData>>> {
    let db = state.db.get()?;
    let character = Character::by_id(&*db, id.into_inner())?;
    let place = Place::by_id(&*db, data.place)?;

    let title = Title::create(&*db, &character, &place, &data.rank,
        data.temporal)?;

    let location = format!("/api/v1/characters/{}/titles", character.id);

    Ok(Created(location, Json(title.get_public())))
}

#[derive(Serialize)]
pub struct CharacterHonorData {
    id: i32,
    temporal: Temporal,
    organization: i32,
    organization_name: String,
}

/// Get a character's honors, with the organizations granting them.
///
/// ## Method
///
/// ```text
/// GET /characters/:id/honors
/// ```
pub fn list_honors(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<Json<Vec<CharacterHonorData>>> {
    let db = state.db.get()?;
    let character = Character::by_id(&*db, id.into_inner())?;

    let honors = character.honors(&*db)?
        .into_iter()
        .map(|(honor, organization)| CharacterHonorData {
            id: honor.id,
            temporal: temporal_from_row!(honor),
            organization: organization.id,
            organization_name: organization.name,
        })
        .collect();

    Ok(Json(honors))
}

#[derive(Deserialize)]
pub struct NewHonor {
    organization: i32,
    #[serde(default = "Temporal::unknown_span")]
    temporal: Temporal,
}

/// Record a character as a member of an organization.
///
/// ## Method
///
/// ```text
/// POST /characters/:id/honors
/// ```
pub fn add_honor(
    state: actix_web::State<State>,
    id: Path<i32>,
    data: Json<NewHonor>,
) -> Result<Created<String, Json<HonorData>>> {
    let db = state.db.get()?;
    let character = Character::by_id(&*db, id.into_inner())?;
    let organization = Organization::by_id(&*db, data.organization)?;

    let honor = Honor::create(&*db, &character, &organization,
        data.temporal)?;

    let location = format!("/api/v1/characters/{}/honors", character.id);

    Ok(Created(location, Json(honor.get_public())))
}

#[derive(Serialize)]
pub struct CharacterParticipationData {
    id: i32,
    role: String,
    temporal: Temporal,
    event: i32,
    event_name: String,
}

/// Get a character's event participations, in timeline order of the events.
///
/// ## Method
///
/// ```text
/// GET /characters/:id/participations
/// ```
pub fn list_participations(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<Json<Vec<CharacterParticipationData>>> {
    let db = state.db.get()?;
    let character = Character::by_id(&*db, id.into_inner())?;

    let participations = character.participations(&*db)?
        .into_iter()
        .map(|(participation, event)| CharacterParticipationData {
            id: participation.id,
            role: participation.role.clone(),
            temporal: temporal_from_row!(participation),
            event: event.id,
            event_name: event.name,
        })
        .collect();

    Ok(Json(participations))
}
