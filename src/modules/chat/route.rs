use crate::{middlewares::authentication, modules::chat::handle::*};
use actix_web::{
    middleware::from_fn,
    web::{ServiceConfig, scope},
};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/chat").wrap(from_fn(authentication)).service(get_stream_token));
}
