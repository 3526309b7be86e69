use log::info;
use rand::Rng;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::api::error;
use crate::constants::DEFAULT_AVATAR_COUNT;
use crate::modules::chat::service::ChatService;
use crate::modules::user::model::{
    AccountResponse, InsertUser, OnboardUser, OnboardingModel, PublicProfile, SignInModel,
    SignUpModel,
};
use crate::modules::user::repository::UserRepository;
use crate::utils::{hash_password, verify_dummy_password, verify_password};

fn random_avatar() -> String {
    let idx = rand::thread_rng().gen_range(1..=DEFAULT_AVATAR_COUNT);
    format!("https://avatar.iran.liara.run/public/{idx}.png")
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    chat: ChatService,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        chat: ChatService,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, chat }
    }

    pub async fn sign_up(&self, user: SignUpModel) -> Result<AccountResponse, error::SystemError> {
        user.validate()?;

        if self.repo.find_by_email(&user.email).await?.is_some() {
            return Err(error::SystemError::DuplicateEmail);
        }

        let new_user = InsertUser {
            email: user.email,
            hash_password: hash_password(&user.password)?,
            full_name: user.full_name,
            profile_pic: random_avatar(),
        };

        let account = AccountResponse::from(self.repo.create(&new_user).await?);
        info!("User {} registered", account.id);

        self.chat.sync_profile(&account).await;
        Ok(account)
    }

    /// Verifies an email/password pair. `NotFound` when no account uses the email,
    /// `InvalidCredential` when the password does not match.
    pub async fn sign_in(&self, user: SignInModel) -> Result<AccountResponse, error::SystemError> {
        user.validate()?;

        let Some(user_entity) = self.repo.find_by_email(&user.email).await? else {
            verify_dummy_password(&user.password);
            return Err(error::SystemError::not_found("No account registered with this email"));
        };

        if !verify_password(&user_entity.hash_password, &user.password)? {
            return Err(error::SystemError::InvalidCredential);
        }

        Ok(AccountResponse::from(user_entity))
    }

    pub async fn complete_onboarding(
        &self,
        id: Uuid,
        profile: OnboardingModel,
    ) -> Result<AccountResponse, error::SystemError> {
        let missing = profile.missing_fields();
        if !missing.is_empty() {
            return Err(error::SystemError::missing_fields(missing));
        }

        let onboard = OnboardUser {
            full_name: profile.full_name.unwrap_or_default(),
            bio: profile.bio.unwrap_or_default(),
            native_language: profile.native_language.unwrap_or_default(),
            learning_language: profile.learning_language.unwrap_or_default(),
            location: profile.location.unwrap_or_default(),
            profile_pic: profile.profile_pic.filter(|pic| !pic.trim().is_empty()),
        };

        let account = self
            .repo
            .complete_onboarding(&id, &onboard)
            .await?
            .map(AccountResponse::from)
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;
        info!("User {} completed onboarding", account.id);

        self.chat.sync_profile(&account).await;
        Ok(account)
    }

    pub async fn find_candidates(
        &self,
        id: Uuid,
    ) -> Result<Vec<PublicProfile>, error::SystemError> {
        let users = self.repo.find_candidates(&id).await?;
        Ok(users.into_iter().map(PublicProfile::from).collect())
    }
}
