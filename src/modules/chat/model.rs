use serde::{Deserialize, Serialize};

use crate::modules::user::model::AccountResponse;

/// Profile fields mirrored into the vendor's user directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: String,
}

impl From<&AccountResponse> for ChatUser {
    fn from(account: &AccountResponse) -> Self {
        ChatUser {
            id: account.id.to_string(),
            name: account.full_name.clone(),
            email: account.email.clone(),
            image: account.profile_pic.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}
