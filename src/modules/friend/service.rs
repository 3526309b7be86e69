use log::info;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{
            model::{FriendRequestResponse, FriendRequestsView, FriendResponse},
            repository::FriendRepo,
            schema::{FriendRequestEntity, FriendRequestStatus},
        },
        user::repository::UserRepository,
    },
};

#[derive(Clone)]
pub struct FriendService {
    friend_repo: Arc<dyn FriendRepo>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
}

impl FriendService {
    pub fn with_dependencies(
        friend_repo: Arc<dyn FriendRepo>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        info!("FriendService initialized with dependencies");
        FriendService { friend_repo, user_repo }
    }

    pub async fn get_friends(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        self.friend_repo.find_friends(&user_id).await
    }

    pub async fn send_friend_request(
        &self,
        requester_id: Uuid,
        recipient_id: Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        if requester_id == recipient_id {
            return Err(error::SystemError::SelfRequest);
        }

        if self.user_repo.find_by_id(&recipient_id).await?.is_none() {
            return Err(error::SystemError::not_found("Recipient user not found"));
        }

        let (friendship, pending) = tokio::try_join!(
            self.friend_repo.find_friendship(&requester_id, &recipient_id),
            self.friend_repo.find_pending_between(&requester_id, &recipient_id),
        )?;

        if friendship.is_some() {
            return Err(error::SystemError::AlreadyFriends);
        }

        if pending.is_some() {
            return Err(error::SystemError::DuplicateRequest);
        }

        let request =
            self.friend_repo.create_friend_request(&requester_id, &recipient_id).await?;
        info!("Friend request {} sent from {} to {}", request.id, requester_id, recipient_id);

        Ok(request)
    }

    pub async fn accept_friend_request(
        &self,
        recipient_id: Uuid,
        request_id: Uuid,
    ) -> Result<(), error::SystemError> {
        let request = self
            .friend_repo
            .find_friend_request_by_id(&request_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        if request.recipient_id != recipient_id {
            return Err(error::SystemError::forbidden(
                "You are not authorized to accept this friend request",
            ));
        }

        if request.status == FriendRequestStatus::Accepted {
            return Err(error::SystemError::AlreadyAccepted);
        }

        // a concurrent accept may have won between the read above and this write
        self.friend_repo
            .accept_friend_request_atomic(&request_id)
            .await?
            .ok_or(error::SystemError::AlreadyAccepted)?;

        info!(
            "Friend request {} accepted, {} and {} are now friends",
            request_id, request.requester_id, request.recipient_id
        );
        Ok(())
    }

    pub async fn get_incoming_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        self.friend_repo.find_incoming(&user_id).await
    }

    pub async fn get_outgoing_requests(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        self.friend_repo.find_outgoing(&user_id).await
    }

    pub async fn get_friend_requests(
        &self,
        user_id: Uuid,
    ) -> Result<FriendRequestsView, error::SystemError> {
        let (incoming_requests, accepted_requests) = tokio::try_join!(
            self.get_incoming_requests(user_id),
            self.friend_repo.find_accepted_outgoing(&user_id),
        )?;

        Ok(FriendRequestsView { incoming_requests, accepted_requests })
    }
}
