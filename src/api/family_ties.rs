use actix_web::{App, HttpResponse, Json, Path};

use crate::models::family_tie::{FamilyTie, PublicData as FamilyTieData};
use super::{Error, RouteExt, State};

/// Configure routes.
pub fn routes(app: App<State>) -> App<State> {
    app
        .resource("/family-ties/{id}", |r| {
            r.get().api_with(get_family_tie);
            r.put().api_with(update_family_tie);
            r.delete().api_with(delete_family_tie);
        })
}

type Result<T, E=Error> = std::result::Result<T, E>;

/// Get a family tie by ID.
///
/// Ties are created through `POST /characters/:id/parents` and
/// `POST /characters/:id/children`.
///
/// ## Method
///
/// ```text
/// GET /family-ties/:id
/// ```
pub fn get_family_tie(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<Json<FamilyTieData>> {
    let db = state.db.get()?;
    let tie = FamilyTie::by_id(&*db, id.into_inner())?;

    Ok(Json(tie.get_public()))
}

#[derive(Deserialize)]
pub struct FamilyTieUpdate {
    birth_order: Option<i32>,
}

/// Update a family tie.
///
/// ## Method
///
/// ```text
/// PUT /family-ties/:id
/// ```
pub fn update_family_tie(
    state: actix_web::State<State>,
    id: Path<i32>,
    update: Json<FamilyTieUpdate>,
) -> Result<Json<FamilyTieData>> {
    let db = state.db.get()?;
    let mut tie = FamilyTie::by_id(&*db, id.into_inner())?;

    if let Some(birth_order) = update.birth_order {
        tie.set_birth_order(&*db, birth_order)?;
    }

    Ok(Json(tie.get_public()))
}

/// Delete a family tie. Neither character is affected.
///
/// ## Method
///
/// ```text
/// DELETE /family-ties/:id
/// ```
pub fn delete_family_tie(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<HttpResponse> {
    let db = state.db.get()?;

    FamilyTie::by_id(&*db, id.into_inner())?.delete(&*db)?;

    Ok(HttpResponse::Ok().finish())
}
