use actix_web::{
    HttpRequest,
    HttpResponse,
    Responder,
    http::{
        HttpTryFrom,
        StatusCode,
        header::{LOCATION, HeaderValue},
    },
};
use futures::Future;

use crate::{db::Connection, models::World};
use super::Error;

/// Query parameters accepted by scoped listing endpoints.
#[derive(Deserialize)]
pub struct ListScope {
    /// Limit the listing to one world, given by slug.
    pub world: Option<String>,
    /// Filter by a name search instead of listing everything.
    pub search: Option<String>,
}

/// Resolve the world filter of a listing to a world ID, if one was given.
pub fn resolve_world(dbcon: &Connection, scope: &ListScope)
-> Result<Option<i32>, Error> {
    match scope.world {
        Some(ref slug) => {
            let world = World::by_slug(dbcon, slug)?;
            Ok(Some(world.id))
        }
        None => Ok(None),
    }
}

pub struct Created<L, T>(pub L, pub T);

impl<L, T> Responder for Created<L, T>
where
    T: Responder + 'static,
    L: 'static,
    HeaderValue: HttpTryFrom<L>,
    <HeaderValue as HttpTryFrom<L>>::Error: actix_web::ResponseError,
{
    type Item = Box<dyn Future<Item = HttpResponse, Error = actix_web::Error>>;
    type Error = <T as Responder>::Error;

    fn respond_to<S: 'static>(self, req: &HttpRequest<S>)
    -> Result<Self::Item, Self::Error> {
        let Created(location, responder) = self;

        Ok(Box::new(responder.respond_to(req)?.into().and_then(move |mut rsp| {
            *rsp.status_mut() = StatusCode::CREATED;
            rsp.headers_mut().insert(LOCATION, HeaderValue::try_from(location)?);
            Ok(rsp)
        })))
    }
}
