use actix_web::{App, HttpResponse, Json, Path};
use diesel::Connection as _;

use crate::{
    models::participation::{Participation, PublicData as ParticipationData},
    temporal::Temporal,
};
use super::{Error, RouteExt, State};

/// Configure routes.
pub fn routes(app: App<State>) -> App<State> {
    app
        .resource("/participations/{id}", |r| {
            r.get().api_with(get_participation);
            r.put().api_with(update_participation);
            r.delete().api_with(delete_participation);
        })
}

type Result<T, E=Error> = std::result::Result<T, E>;

/// Get a participation by ID.
///
/// Participations are created through `POST /events/:id/participants`.
///
/// ## Method
///
/// ```text
/// GET /participations/:id
/// ```
pub fn get_participation(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<Json<ParticipationData>> {
    let db = state.db.get()?;
    let participation = Participation::by_id(&*db, id.into_inner())?;

    Ok(Json(participation.get_public()))
}

#[derive(Deserialize)]
pub struct ParticipationUpdate {
    role: Option<String>,
    temporal: Option<Temporal>,
}

/// Update a participation.
///
/// ## Method
///
/// ```text
/// PUT /participations/:id
/// ```
pub fn update_participation(
    state: actix_web::State<State>,
    id: Path<i32>,
    update: Json<ParticipationUpdate>,
) -> Result<Json<ParticipationData>> {
    let db = state.db.get()?;
    let mut participation = Participation::by_id(&*db, id.into_inner())?;

    let dbcon = &*db;
    dbcon.transaction::<_, Error, _>(|| {
        if let Some(ref role) = update.role {
            participation.set_role(dbcon, role)?;
        }

        if let Some(temporal) = update.temporal {
            participation.set_temporal(dbcon, temporal)?;
        }

        Ok(())
    })?;

    Ok(Json(participation.get_public()))
}

/// Delete a participation. Neither the event nor the character is affected.
///
/// ## Method
///
/// ```text
/// DELETE /participations/:id
/// ```
pub fn delete_participation(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<HttpResponse> {
    let db = state.db.get()?;

    Participation::by_id(&*db, id.into_inner())?.delete(&*db)?;

    Ok(HttpResponse::Ok().finish())
}
