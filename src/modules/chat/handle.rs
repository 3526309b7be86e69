use actix_web::{HttpMessage, HttpRequest, get, web};

use crate::{
    api::{error, success},
    modules::{
        chat::{model::TokenResponse, service::ChatService},
        user::model::AccountResponse,
    },
};

#[get("/token")]
pub async fn get_stream_token(
    chat_service: web::Data<ChatService>,
    req: HttpRequest,
) -> Result<success::Success<TokenResponse>, error::Error> {
    let identity = req.extensions().get::<AccountResponse>().map(|account| account.id);
    let token = chat_service.mint_token(identity).await?;
    Ok(success::Success::ok(Some(TokenResponse { token })).message("Chat token created"))
}
