use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::user::schema::UserEntity;
use crate::utils::validate_email;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignUpModel {
    #[serde(default)]
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[serde(default)]
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignInModel {
    #[serde(default)]
    #[validate(length(min = 1, message = "Please provide the credentials"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Please provide the credentials"))]
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingModel {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub native_language: Option<String>,
    pub learning_language: Option<String>,
    pub location: Option<String>,
    pub profile_pic: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

impl OnboardingModel {
    /// Required profile fields that are absent or blank, by their wire names.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("fullName", &self.full_name),
            ("bio", &self.bio),
            ("nativeLanguage", &self.native_language),
            ("learningLanguage", &self.learning_language),
            ("location", &self.location),
        ]
        .into_iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(name, _)| name)
        .collect()
    }
}

pub struct InsertUser {
    pub email: String,
    pub hash_password: String,
    pub full_name: String,
    pub profile_pic: String,
}

pub struct OnboardUser {
    pub full_name: String,
    pub bio: String,
    pub native_language: String,
    pub learning_language: String,
    pub location: String,
    pub profile_pic: Option<String>,
}

/// The caller's own account. Never carries the password hash.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub bio: Option<String>,
    pub profile_pic: String,
    pub native_language: Option<String>,
    pub learning_language: Option<String>,
    pub location: Option<String>,
    pub is_onboarded: bool,
    pub friends: Vec<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserEntity> for AccountResponse {
    fn from(entity: UserEntity) -> Self {
        AccountResponse {
            id: entity.id,
            email: entity.email,
            full_name: entity.full_name,
            bio: entity.bio,
            profile_pic: entity.profile_pic,
            native_language: entity.native_language,
            learning_language: entity.learning_language,
            location: entity.location,
            is_onboarded: entity.is_onboarded,
            friends: entity.friends,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// What other learners see in the discovery feed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: Uuid,
    pub full_name: String,
    pub bio: Option<String>,
    pub profile_pic: String,
    pub native_language: Option<String>,
    pub learning_language: Option<String>,
    pub location: Option<String>,
}

impl From<UserEntity> for PublicProfile {
    fn from(entity: UserEntity) -> Self {
        PublicProfile {
            id: entity.id,
            full_name: entity.full_name,
            bio: entity.bio,
            profile_pic: entity.profile_pic,
            native_language: entity.native_language,
            learning_language: entity.learning_language,
            location: entity.location,
        }
    }
}
