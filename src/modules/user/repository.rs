use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{
        model::{InsertUser, OnboardUser},
        schema::UserEntity,
    },
};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError>;

    /// Exact, case-sensitive match.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError>;

    /// Fails with `DuplicateEmail` when the email is taken.
    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError>;

    async fn complete_onboarding(
        &self,
        id: &Uuid,
        profile: &OnboardUser,
    ) -> Result<Option<UserEntity>, error::SystemError>;

    /// Onboarded users other than `id` who are not yet friends with `id`.
    async fn find_candidates(&self, id: &Uuid) -> Result<Vec<UserEntity>, error::SystemError>;
}
