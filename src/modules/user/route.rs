use crate::{middlewares::authentication, modules::friend, modules::user::handle::*};
use actix_web::{
    middleware::from_fn,
    web::{ServiceConfig, scope},
};

pub fn auth_configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/auth")
            .service(sign_up)
            .service(login)
            .service(logout)
            .service(scope("").wrap(from_fn(authentication)).service(onboard).service(me)),
    );
}

/// Everything under `/users`; the friend routes share the scope.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/users")
            .wrap(from_fn(authentication))
            .service(get_recommended_users)
            .configure(friend::route::configure),
    );
}
