use actix_web::{App, HttpResponse, Json, Path};
use diesel::Connection as _;

use crate::models::reference::{Reference, PublicData as ReferenceData};
use super::{Error, RouteExt, State, util::Created};

/// Configure routes.
pub fn routes(app: App<State>) -> App<State> {
    app
        .resource("/references", |r| {
            r.get().api_with(list_references);
            r.post().api_with(create_reference);
        })
        .resource("/references/{id}", |r| {
            r.get().api_with(get_reference);
            r.put().api_with(update_reference);
            r.delete().api_with(delete_reference);
        })
}

type Result<T, E=Error> = std::result::Result<T, E>;

/// Get list of all references.
///
/// ## Method
///
/// ```text
/// GET /references
/// ```
pub fn list_references(
    state: actix_web::State<State>,
) -> Result<Json<Vec<ReferenceData>>> {
    let db = state.db.get()?;

    Reference::all(&*db)
        .map(|v| v.into_iter().map(|r| r.get_public()).collect())
        .map(Json)
        .map_err(Into::into)
}

#[derive(Deserialize)]
pub struct NewReference {
    url: String,
    cite: Option<String>,
}

/// Create a new reference.
///
/// ## Method
///
/// ```text
/// POST /references
/// ```
pub fn create_reference(
    state: actix_web::State<State>,
    data: Json<NewReference>,
) -> Result<Created<String, Json<ReferenceData>>> {
    let db = state.db.get()?;
    let reference = Reference::create(
        &*db,
        &data.url,
        data.cite.as_ref().map(String::as_str),
    )?;

    let location = format!("/api/v1/references/{}", reference.id);

    Ok(Created(location, Json(reference.get_public())))
}

/// Get a reference by ID.
///
/// ## Method
///
/// ```text
/// GET /references/:id
/// ```
pub fn get_reference(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<Json<ReferenceData>> {
    let db = state.db.get()?;
    let reference = Reference::by_id(&*db, id.into_inner())?;

    Ok(Json(reference.get_public()))
}

#[derive(Deserialize)]
pub struct ReferenceUpdate {
    url: Option<String>,
    cite: Option<String>,
}

/// Update a reference.
///
/// ## Method
///
/// ```text
/// PUT /references/:id
/// ```
pub fn update_reference(
    state: actix_web::State<State>,
    id: Path<i32>,
    update: Json<ReferenceUpdate>,
) -> Result<Json<ReferenceData>> {
    let db = state.db.get()?;
    let mut reference = Reference::by_id(&*db, id.into_inner())?;

    let dbcon = &*db;
    dbcon.transaction::<_, Error, _>(|| {
        if let Some(ref url) = update.url {
            reference.set_url(dbcon, url)?;
        }

        if let Some(ref cite) = update.cite {
            reference.set_cite(dbcon, Some(cite))?;
        }

        Ok(())
    })?;

    Ok(Json(reference.get_public()))
}

/// Delete a reference.
///
/// ## Method
///
/// ```text
/// DELETE /references/:id
/// ```
pub fn delete_reference(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<HttpResponse> {
    let db = state.db.get()?;

    Reference::by_id(&*db, id.into_inner())?.delete(&*db)?;

    Ok(HttpResponse::Ok().finish())
}
