use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::modules::{friend::schema::FriendRequestStatus, user::schema::UserEntity};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FriendResponse {
    pub id: Uuid,
    pub full_name: String,
    pub profile_pic: String,
    pub native_language: Option<String>,
    pub learning_language: Option<String>,
    pub location: Option<String>,
}

impl From<UserEntity> for FriendResponse {
    fn from(user: UserEntity) -> Self {
        FriendResponse {
            id: user.id,
            full_name: user.full_name,
            profile_pic: user.profile_pic,
            native_language: user.native_language,
            learning_language: user.learning_language,
            location: user.location,
        }
    }
}

/// The side of a request the caller already knows is sent as a bare id,
/// the other side as a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdOrInfo {
    Id(Uuid),
    Info(FriendResponse),
}

#[derive(sqlx::FromRow)]
pub struct FriendUserRow {
    pub req_id: Uuid,
    pub status: FriendRequestStatus,
    pub user_id: Uuid,
    pub full_name: String,
    pub profile_pic: String,
    pub native_language: Option<String>,
    pub learning_language: Option<String>,
    pub location: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl FriendUserRow {
    /// Builds the response for `owner`'s list. The row's user is the other party;
    /// `owner_sent` tells which side of the request `owner` is on.
    pub fn into_response(self, owner: Uuid, owner_sent: bool) -> FriendRequestResponse {
        let other = IdOrInfo::Info(FriendResponse {
            id: self.user_id,
            full_name: self.full_name,
            profile_pic: self.profile_pic,
            native_language: self.native_language,
            learning_language: self.learning_language,
            location: self.location,
        });
        let (requester, recipient) =
            if owner_sent { (IdOrInfo::Id(owner), other) } else { (other, IdOrInfo::Id(owner)) };

        FriendRequestResponse {
            id: self.req_id,
            requester,
            recipient,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestResponse {
    pub id: Uuid,
    pub requester: IdOrInfo,
    pub recipient: IdOrInfo,
    pub status: FriendRequestStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestsView {
    pub incoming_requests: Vec<FriendRequestResponse>,
    pub accepted_requests: Vec<FriendRequestResponse>,
}
