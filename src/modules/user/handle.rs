use actix_web::{HttpRequest, get, post, web};

use crate::{
    api::{error, success},
    middlewares::get_extensions,
    modules::{
        session::service::SessionService,
        user::{
            model::{AccountResponse, OnboardingModel, PublicProfile, SignInModel, SignUpModel},
            service::UserService,
        },
    },
    utils::JsonBody,
};

#[post("/signup")]
pub async fn sign_up(
    user_service: web::Data<UserService>,
    session_service: web::Data<SessionService>,
    user_data: JsonBody<SignUpModel>,
) -> Result<success::Success<AccountResponse>, error::Error> {
    let account = user_service.sign_up(user_data.0).await?;
    let token = session_service.issue(&account.id)?;

    Ok(success::Success::created(Some(account))
        .message("User registered successfully")
        .cookie(session_service.session_cookie(token)))
}

#[post("/login")]
pub async fn login(
    user_service: web::Data<UserService>,
    session_service: web::Data<SessionService>,
    user_data: JsonBody<SignInModel>,
) -> Result<success::Success<AccountResponse>, error::Error> {
    // unknown emails get the same answer as wrong passwords
    let account = user_service.sign_in(user_data.0).await.map_err(|e| match e {
        error::SystemError::NotFound(_) => error::SystemError::InvalidCredential,
        other => other,
    })?;
    let token = session_service.issue(&account.id)?;

    Ok(success::Success::ok(Some(account))
        .message("Login successful")
        .cookie(session_service.session_cookie(token)))
}

#[post("/logout")]
pub async fn logout(
    session_service: web::Data<SessionService>,
) -> Result<success::Success<()>, error::Error> {
    Ok(success::Success::ok(None)
        .message("Logged out successfully")
        .cookie(session_service.clear_cookie()))
}

#[post("/onboarding")]
pub async fn onboard(
    user_service: web::Data<UserService>,
    profile: JsonBody<OnboardingModel>,
    req: HttpRequest,
) -> Result<success::Success<AccountResponse>, error::Error> {
    let id = get_extensions::<AccountResponse>(&req)?.id;
    let account = user_service.complete_onboarding(id, profile.0).await?;
    Ok(success::Success::ok(Some(account)).message("Onboarding completed successfully"))
}

#[get("/me")]
pub async fn me(req: HttpRequest) -> Result<success::Success<AccountResponse>, error::Error> {
    let account = get_extensions::<AccountResponse>(&req)?;
    Ok(success::Success::ok(Some(account)))
}

#[get("")]
pub async fn get_recommended_users(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<PublicProfile>>, error::Error> {
    let id = get_extensions::<AccountResponse>(&req)?.id;
    let users = user_service.find_candidates(id).await?;
    Ok(success::Success::ok(Some(users)))
}
