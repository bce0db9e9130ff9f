use actix_web::{App, HttpResponse, Json, Path, Query};
use diesel::Connection as _;

use crate::{
    models::organization::{Organization, PublicData as OrganizationData},
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
        .resource("/organizations", |r| {
            r.get().api_with(list_organizations);
            r.post().api_with(create_organization);
        })
        .resource("/organizations/{id}", |r| {
            r.get().api_with(get_organization);
            r.put().api_with(update_organization);
            r.delete().api_with(delete_organization);
        })
        .resource("/organizations/{id}/members", |r| {
            r.get().api_with(list_members);
        })
}

type Result<T, E=Error> = std::result::Result<T, E>;

/// Get list of organizations, optionally scoped to a world or a name search.
///
/// ## Method
///
/// ```text
/// GET /organizations
/// GET /organizations?world=:slug
/// GET /organizations?search=:query
/// ```
pub fn list_organizations(
    state: actix_web::State<State>,
    scope: Query<ListScope>,
) -> Result<Json<Vec<OrganizationData>>> {
    let db = state.db.get()?;
    let world = resolve_world(&*db, &scope)?;

    let organizations = match scope.search {
        Some(ref query) => Organization::search(&*db, world, query)?,
        None => match world {
            Some(world) => Organization::in_world(&*db, world)?,
            None => Organization::all(&*db)?,
        },
    };

    organizations.iter()
        .map(|o| o.get_public(&*db))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(Json)
        .map_err(Into::into)
}

#[derive(Deserialize)]
pub struct NewOrganization {
    world: i32,
    name: String,
    slug: String,
    notes: Option<String>,
    #[serde(default = "Temporal::unknown_span")]
    temporal: Temporal,
    #[serde(default)]
    tags: Vec<String>,
}

/// Create a new organization.
///
/// ## Method
///
/// ```text
/// POST /organizations
/// ```
pub fn create_organization(
    state: actix_web::State<State>,
    data: Json<NewOrganization>,
) -> Result<Created<String, Json<OrganizationData>>> {
    let db = state.db.get()?;
    let data = data.into_inner();

    let organization = Organization::create(
        &*db,
        data.world,
        &data.name,
        &data.slug,
        data.notes.as_ref().map(String::as_str),
        data.temporal,
    )?;

    if !data.tags.is_empty() {
        organization.set_tags(&*db, &data.tags)?;
    }

    let location = format!("/api/v1/organizations/{}", organization.id);

    Ok(Created(location, Json(organization.get_public(&*db)?)))
}

/// Get an organization by ID.
///
/// ## Method
///
/// ```text
/// GET /organizations/:id
/// ```
pub fn get_organization(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<Json<OrganizationData>> {
    let db = state.db.get()?;
    let organization = Organization::by_id(&*db, id.into_inner())?;

    Ok(Json(organization.get_public(&*db)?))
}

#[derive(Deserialize)]
pub struct OrganizationUpdate {
    name: Option<String>,
    notes: Option<String>,
    temporal: Option<Temporal>,
    tags: Option<Vec<String>>,
}

/// Update an organization.
///
/// ## Method
///
/// ```text
/// PUT /organizations/:id
/// ```
pub fn update_organization(
    state: actix_web::State<State>,
    id: Path<i32>,
    update: Json<OrganizationUpdate>,
) -> Result<Json<OrganizationData>> {
    let db = state.db.get()?;
    let mut organization = Organization::by_id(&*db, id.into_inner())?;

    let dbcon = &*db;
    dbcon.transaction::<_, Error, _>(|| {
        if let Some(ref name) = update.name {
            organization.set_name(dbcon, name)?;
        }

        if let Some(ref notes) = update.notes {
            organization.set_notes(dbcon, Some(notes))?;
        }

        if let Some(temporal) = update.temporal {
            organization.set_temporal(dbcon, temporal)?;
        }

        if let Some(ref tags) = update.tags {
            organization.set_tags(dbcon, tags)?;
        }

        Ok(())
    })?;

    Ok(Json(organization.get_public(&*db)?))
}

/// Delete an organization.
///
/// ## Method
///
/// ```text
/// DELETE /organizations/:id
/// ```
pub fn delete_organization(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<HttpResponse> {
    let db = state.db.get()?;

    Organization::by_id(&*db, id.into_inner())?.delete(&*db)?;

    Ok(HttpResponse::Ok().finish())
}

#[derive(Serialize)]
pub struct MemberData {
    honor: i32,
    temporal: Temporal,
    character: crate::models::character::PublicData,
}

/// Get characters honored by membership in an organization.
///
/// ## Method
///
/// ```text
/// GET /organizations/:id/members
/// ```
pub fn list_members(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<Json<Vec<MemberData>>> {
    let db = state.db.get()?;
    let organization = Organization::by_id(&*db, id.into_inner())?;

    organization.members(&*db)?
        .into_iter()
        .map(|(honor, character)| Ok(MemberData {
            honor: honor.id,
            temporal: temporal_from_row!(honor),
            character: character.get_public(&*db)?,
        }))
        .collect::<std::result::Result<Vec<_>, Error>>()
        .map(Json)
}
