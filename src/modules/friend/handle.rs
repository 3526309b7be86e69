use actix_web::{HttpRequest, get, post, put, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_extensions,
    modules::{
        friend::{
            model::{FriendRequestResponse, FriendRequestsView, FriendResponse},
            schema::FriendRequestEntity,
            service::FriendService,
        },
        user::model::AccountResponse,
    },
};

#[get("/friends")]
pub async fn get_my_friends(
    friend_service: web::Data<FriendService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendResponse>>, error::Error> {
    let user_id = get_extensions::<AccountResponse>(&req)?.id;
    let friends = friend_service.get_friends(user_id).await?;

    Ok(success::Success::ok(Some(friends)))
}

#[post("/friend-request/{id}")]
pub async fn send_friend_request(
    friend_service: web::Data<FriendService>,
    recipient_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestEntity>, error::Error> {
    let requester_id = get_extensions::<AccountResponse>(&req)?.id;
    let request = friend_service.send_friend_request(requester_id, *recipient_id).await?;

    Ok(success::Success::created(Some(request)).message("Friend request sent successfully"))
}

#[put("/friend-request/{id}/accept")]
pub async fn accept_friend_request(
    friend_service: web::Data<FriendService>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let recipient_id = get_extensions::<AccountResponse>(&req)?.id;
    friend_service.accept_friend_request(recipient_id, *request_id).await?;

    Ok(success::Success::ok(None).message("Friend request accepted"))
}

#[get("/friend-requests")]
pub async fn get_friend_requests(
    friend_service: web::Data<FriendService>,
    req: HttpRequest,
) -> Result<success::Success<FriendRequestsView>, error::Error> {
    let user_id = get_extensions::<AccountResponse>(&req)?.id;
    let view = friend_service.get_friend_requests(user_id).await?;

    Ok(success::Success::ok(Some(view)))
}

#[get("/outgoing-friend-requests")]
pub async fn get_outgoing_friend_requests(
    friend_service: web::Data<FriendService>,
    req: HttpRequest,
) -> Result<success::Success<Vec<FriendRequestResponse>>, error::Error> {
    let user_id = get_extensions::<AccountResponse>(&req)?.id;
    let requests = friend_service.get_outgoing_requests(user_id).await?;

    Ok(success::Success::ok(Some(requests)))
}
