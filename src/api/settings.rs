use actix_web::{App, HttpResponse, Json, Path, Query};
use diesel::Connection as _;

use crate::models::setting::{Setting, PublicData as SettingData};
use super::{
    Error,
    RouteExt,
    State,
    util::{Created, ListScope, resolve_world},
};

/// Configure routes.
pub fn routes(app: App<State>) -> App<State> {
    app
        .resource("/settings", |r| {
            r.get().api_with(list_settings);
            r.post().api_with(create_setting);
        })
        .resource("/settings/{id}", |r| {
            r.get().api_with(get_setting);
            r.put().api_with(update_setting);
            r.delete().api_with(delete_setting);
        })
}

type Result<T, E=Error> = std::result::Result<T, E>;

/// Get list of settings, optionally scoped to a world or a name search.
///
/// ## Method
///
/// ```text
/// GET /settings
/// GET /settings?world=:slug
/// GET /settings?search=:query
/// ```
pub fn list_settings(
    state: actix_web::State<State>,
    scope: Query<ListScope>,
) -> Result<Json<Vec<SettingData>>> {
    let db = state.db.get()?;
    let world = resolve_world(&*db, &scope)?;

    let settings = match scope.search {
        Some(ref query) => Setting::search(&*db, world, query)?,
        None => match world {
            Some(world) => Setting::in_world(&*db, world)?,
            None => Setting::all(&*db)?,
        },
    };

    settings.iter()
        .map(|s| s.get_public(&*db))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map(Json)
        .map_err(Into::into)
}

#[derive(Deserialize)]
pub struct NewSetting {
    world: i32,
    name: String,
    slug: String,
    notes: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

/// Create a new setting.
///
/// ## Method
///
/// ```text
/// POST /settings
/// ```
pub fn create_setting(
    state: actix_web::State<State>,
    data: Json<NewSetting>,
) -> Result<Created<String, Json<SettingData>>> {
    let db = state.db.get()?;
    let data = data.into_inner();

    let setting = Setting::create(
        &*db,
        data.world,
        &data.name,
        &data.slug,
        data.notes.as_ref().map(String::as_str),
    )?;

    if !data.tags.is_empty() {
        setting.set_tags(&*db, &data.tags)?;
    }

    let location = format!("/api/v1/settings/{}", setting.id);

    Ok(Created(location, Json(setting.get_public(&*db)?)))
}

/// Get a setting by ID.
///
/// ## Method
///
/// ```text
/// GET /settings/:id
/// ```
pub fn get_setting(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<Json<SettingData>> {
    let db = state.db.get()?;
    let setting = Setting::by_id(&*db, id.into_inner())?;

    Ok(Json(setting.get_public(&*db)?))
}

#[derive(Deserialize)]
pub struct SettingUpdate {
    name: Option<String>,
    notes: Option<String>,
    tags: Option<Vec<String>>,
}

/// Update a setting.
///
/// ## Method
///
/// ```text
/// PUT /settings/:id
/// ```
pub fn update_setting(
    state: actix_web::State<State>,
    id: Path<i32>,
    update: Json<SettingUpdate>,
) -> Result<Json<SettingData>> {
    let db = state.db.get()?;
    let mut setting = Setting::by_id(&*db, id.into_inner())?;

    let dbcon = &*db;
    dbcon.transaction::<_, Error, _>(|| {
        if let Some(ref name) = update.name {
            setting.set_name(dbcon, name)?;
        }

        if let Some(ref notes) = update.notes {
            setting.set_notes(dbcon, Some(notes))?;
        }

        if let Some(ref tags) = update.tags {
            setting.set_tags(dbcon, tags)?;
        }

        Ok(())
    })?;

    Ok(Json(setting.get_public(&*db)?))
}

/// Delete a setting.
///
/// ## Method
///
/// ```text
/// DELETE /settings/:id
/// ```
pub fn delete_setting(
    state: actix_web::State<State>,
    id: Path<i32>,
) -> Result<HttpResponse> {
    let db = state.db.get()?;

    Setting::by_id(&*db, id.into_inner())?.delete(&*db)?;

    Ok(HttpResponse::Ok().finish())
}
