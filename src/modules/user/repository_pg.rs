use uuid::Uuid;

use crate::{
    api::error,
    modules::user::{
        model::{InsertUser, OnboardUser},
        repository::UserRepository,
        schema::UserEntity,
    },
};

// the friend list is derived from the `friends` table on every read
const FRIEND_IDS: &str = r#"
    ARRAY(
        SELECT CASE WHEN f.user_a = u.id THEN f.user_b ELSE f.user_a END
        FROM friends f
        WHERE f.user_a = u.id OR f.user_b = u.id
    ) AS friends
"#;

#[derive(Clone)]
pub struct UserRepositoryPg {
    pool: sqlx::PgPool,
}

impl UserRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserRepository for UserRepositoryPg {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT u.*, {FRIEND_IDS} FROM users u WHERE u.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT u.*, {FRIEND_IDS} FROM users u WHERE u.email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (id, email, hash_password, full_name, profile_pic)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *, ARRAY[]::uuid[] AS friends
            "#,
        )
        .bind(id)
        .bind(&user.email)
        .bind(&user.hash_password)
        .bind(&user.full_name)
        .bind(&user.profile_pic)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn complete_onboarding(
        &self,
        id: &Uuid,
        profile: &OnboardUser,
    ) -> Result<Option<UserEntity>, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            UPDATE users u
            SET
                full_name         = $2,
                bio               = $3,
                native_language   = $4,
                learning_language = $5,
                location          = $6,
                profile_pic       = COALESCE($7, profile_pic),
                is_onboarded      = TRUE,
                updated_at        = NOW()
            WHERE u.id = $1
            RETURNING u.*, {FRIEND_IDS}
            "#
        ))
        .bind(id)
        .bind(&profile.full_name)
        .bind(&profile.bio)
        .bind(&profile.native_language)
        .bind(&profile.learning_language)
        .bind(&profile.location)
        .bind(&profile.profile_pic) // $7: Option<String>, keeps the current avatar when None
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_candidates(&self, id: &Uuid) -> Result<Vec<UserEntity>, error::SystemError> {
        let users = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            SELECT u.*, {FRIEND_IDS}
            FROM users u
            WHERE u.id <> $1
              AND u.is_onboarded
              AND NOT EXISTS (
                  SELECT 1 FROM friends f
                  WHERE f.user_a = LEAST(u.id, $1) AND f.user_b = GREATEST(u.id, $1)
              )
            ORDER BY u.created_at DESC
            "#
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}
