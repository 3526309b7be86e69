use uuid::Uuid;

use crate::{
    api::error,
    modules::friend::{
        model::{FriendRequestResponse, FriendResponse, FriendUserRow},
        repository::{FriendRepo, FriendRepository, FriendRequestRepository},
        schema::{FriendEntity, FriendRequestEntity, FriendRequestStatus, ordered_pair},
    },
};

#[derive(Clone)]
pub struct FriendRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    /// Requests where `user_id` sits in `owner_column`, joined with the user in
    /// `other_column`.
    async fn find_requests_with_profile(
        &self,
        user_id: &Uuid,
        owner_column: &str,
        other_column: &str,
        status: FriendRequestStatus,
    ) -> Result<Vec<FriendUserRow>, error::SystemError> {
        let rows = sqlx::query_as::<_, FriendUserRow>(&format!(
            r#"
            SELECT
                fr.id AS req_id,
                fr.status,
                u.id AS user_id,
                u.full_name,
                u.profile_pic,
                u.native_language,
                u.learning_language,
                u.location,
                fr.created_at,
                fr.updated_at
            FROM friend_requests fr
            JOIN users u
                ON fr.{other_column} = u.id
            WHERE fr.{owner_column} = $1
              AND fr.status = $2
            ORDER BY fr.created_at DESC
            "#
        ))
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait::async_trait]
impl FriendRepository for FriendRepositoryPg {
    async fn find_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendEntity>, error::SystemError> {
        let (user_a, user_b) = ordered_pair(*user_id_a, *user_id_b);

        let friendship = sqlx::query_as::<_, FriendEntity>(
            "SELECT * FROM friends WHERE user_a = $1 AND user_b = $2",
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(friendship)
    }

    async fn find_friends(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        let friends = sqlx::query_as::<_, FriendResponse>(
            r#"
        SELECT
            u.id,
            u.full_name,
            u.profile_pic,
            u.native_language,
            u.learning_language,
            u.location
        FROM friends f
        JOIN users u
            ON u.id = CASE
                WHEN f.user_a = $1 THEN f.user_b
                ELSE f.user_a
            END
        WHERE f.user_a = $1
           OR f.user_b = $1
        ORDER BY u.full_name
        "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(friends)
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for FriendRepositoryPg {
    async fn find_pending_between(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            SELECT *
            FROM friend_requests
            WHERE status = 'pending'
              AND (
                    (requester_id = $1 AND recipient_id = $2)
                 OR (requester_id = $2 AND recipient_id = $1)
              )
            "#,
        )
        .bind(user_id_a)
        .bind(user_id_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn find_friend_request_by_id(
        &self,
        request_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request =
            sqlx::query_as::<_, FriendRequestEntity>("SELECT * FROM friend_requests WHERE id = $1")
                .bind(request_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(request)
    }

    async fn find_incoming(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let rows = self
            .find_requests_with_profile(
                user_id,
                "recipient_id",
                "requester_id",
                FriendRequestStatus::Pending,
            )
            .await?;
        Ok(rows.into_iter().map(|r| r.into_response(*user_id, false)).collect())
    }

    async fn find_outgoing(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let rows = self
            .find_requests_with_profile(
                user_id,
                "requester_id",
                "recipient_id",
                FriendRequestStatus::Pending,
            )
            .await?;
        Ok(rows.into_iter().map(|r| r.into_response(*user_id, true)).collect())
    }

    async fn find_accepted_outgoing(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let rows = self
            .find_requests_with_profile(
                user_id,
                "requester_id",
                "recipient_id",
                FriendRequestStatus::Accepted,
            )
            .await?;
        Ok(rows.into_iter().map(|r| r.into_response(*user_id, true)).collect())
    }

    async fn create_friend_request(
        &self,
        requester_id: &Uuid,
        recipient_id: &Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        // friend_requests_pending_pair_key rejects a concurrent duplicate
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            INSERT INTO friend_requests (id, requester_id, recipient_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(requester_id)
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }
}

#[async_trait::async_trait]
impl FriendRepo for FriendRepositoryPg {
    async fn accept_friend_request_atomic(
        &self,
        request_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let mut tx = self.pool.begin().await?;

        let accepted = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            UPDATE friend_requests
            SET status = 'accepted', updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(request) = accepted else {
            tx.rollback().await?;
            return Ok(None);
        };

        let (u1, u2) = ordered_pair(request.requester_id, request.recipient_id);

        sqlx::query(
            "INSERT INTO friends (user_a, user_b) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(u1)
        .bind(u2)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(request))
    }
}
