use actix_web::cookie::{Cookie, SameSite, time};
use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::error,
    constants::SESSION_COOKIE,
    modules::user::{model::AccountResponse, repository::UserRepository},
    utils::Claims,
};

/// Issues and validates session tokens. There is no server-side revocation: a token
/// stays valid until it expires, whatever happens to the cookie.
#[derive(Clone)]
pub struct SessionService {
    secret: Arc<[u8]>,
    expiration: u64,
    cookie_secure: bool,
    users: Arc<dyn UserRepository + Send + Sync>,
}

impl SessionService {
    pub fn with_dependencies(
        secret: &str,
        expiration: u64,
        cookie_secure: bool,
        users: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        info!("SessionService initialized with dependencies");
        SessionService { secret: Arc::from(secret.as_bytes()), expiration, cookie_secure, users }
    }

    pub fn issue(&self, account_id: &Uuid) -> Result<String, error::SystemError> {
        Claims::new(account_id, self.expiration).encode(&self.secret)
    }

    pub async fn validate(
        &self,
        token: Option<&str>,
    ) -> Result<AccountResponse, error::SystemError> {
        let token =
            token.ok_or_else(|| error::SystemError::unauthorized("Not authorized, no token provided"))?;

        let claims = Claims::decode(token, &self.secret)
            .map_err(|_| error::SystemError::unauthorized("Not authorized, invalid token"))?;

        let user = self
            .users
            .find_by_id(&claims.sub)
            .await?
            .ok_or(error::SystemError::AccountNotFound)?;

        Ok(AccountResponse::from(user))
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        // browsers drop SameSite=None cookies that are not Secure
        let same_site = if self.cookie_secure { SameSite::None } else { SameSite::Lax };
        Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .secure(self.cookie_secure)
            .same_site(same_site)
            .max_age(time::Duration::seconds(self.expiration as i64))
            .finish()
    }

    pub fn clear_cookie(&self) -> Cookie<'static> {
        let same_site = if self.cookie_secure { SameSite::None } else { SameSite::Lax };
        Cookie::build(SESSION_COOKIE, "")
            .path("/")
            .http_only(true)
            .secure(self.cookie_secure)
            .same_site(same_site)
            .max_age(time::Duration::seconds(0))
            .expires(time::OffsetDateTime::UNIX_EPOCH)
            .finish()
    }
}
