use actix_web::{App, Json};

use crate::admin::{EntityAdmin, REGISTRY};
use super::{Error, RouteExt, State};

/// Configure routes.
pub fn routes(app: App<State>) -> App<State> {
    app
        .resource("/admin", |r| {
            r.get().api_with(get_registry);
        })
}

type Result<T, E=Error> = std::result::Result<T, E>;

/// Get the editing capability table driving generic CRUD frontends.
///
/// ## Method
///
/// ```text
/// GET /admin
/// ```
pub fn get_registry(
    _state: actix_web::State<State>,
) -> Result<Json<&'static [EntityAdmin]>> {
    Ok(Json(&REGISTRY))
}
