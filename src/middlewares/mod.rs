use actix_web::{
    Error, HttpMessage, HttpRequest, ResponseError,
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};

use crate::{api::error, constants::SESSION_COOKIE, modules::session::service::SessionService};

fn cookie_token(req: &ServiceRequest) -> Option<String> {
    req.request().cookie(SESSION_COOKIE).map(|cookie| cookie.value().to_string())
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Resolves the session token to an account and stores it in the request extensions.
/// The `jwt` cookie is tried first; a Bearer header is used when there is no cookie
/// or the cookie's token is rejected.
///
/// Rejections are rendered here rather than returned as `Err`, so outer middleware
/// (CORS in particular) still decorates the response.
pub async fn authentication<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error>
where
    B: MessageBody + 'static,
{
    let Some(sessions) = req.app_data::<web::Data<SessionService>>().cloned() else {
        log::error!("SessionService is not registered as app data");
        let res = error::Error::internal_server_error().error_response();
        return Ok(req.into_response(res).map_into_right_body());
    };

    let cookie = cookie_token(&req);
    let bearer = bearer_token(&req);

    let mut resolved = sessions.validate(cookie.as_deref().or(bearer.as_deref())).await;
    if resolved.is_err() && cookie.is_some() && bearer.is_some() {
        log::debug!("Session cookie rejected, falling back to Authorization header");
        resolved = sessions.validate(bearer.as_deref()).await;
    }

    match resolved {
        Ok(account) => {
            req.extensions_mut().insert(account);
            next.call(req).await.map(ServiceResponse::map_into_left_body)
        }
        Err(e) => {
            let res = error::Error::from(e).error_response();
            Ok(req.into_response(res).map_into_right_body())
        }
    }
}

pub fn get_extensions<T: Clone + 'static>(req: &HttpRequest) -> Result<T, error::Error> {
    req.extensions()
        .get::<T>()
        .cloned()
        .ok_or_else(|| error::Error::unauthorized("Not authorized, no token provided"))
}
