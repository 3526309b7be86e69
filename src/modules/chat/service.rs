use log::{info, warn};
use std::{sync::Arc, time::Duration};
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        chat::{model::ChatUser, provider::ChatProvider},
        user::model::AccountResponse,
    },
};

#[derive(Clone)]
pub struct ChatService {
    provider: Arc<dyn ChatProvider + Send + Sync>,
    sync_timeout: Duration,
}

impl ChatService {
    pub fn with_dependencies(
        provider: Arc<dyn ChatProvider + Send + Sync>,
        sync_timeout: Duration,
    ) -> Self {
        info!("ChatService initialized with dependencies");
        ChatService { provider, sync_timeout }
    }

    pub async fn mint_token(&self, identity: Option<Uuid>) -> Result<String, error::SystemError> {
        let user_id = identity.ok_or_else(|| error::SystemError::unauthorized("User not authenticated"))?;

        let token = self.provider.create_token(&user_id.to_string()).await.map_err(|e| {
            error::SystemError::upstream(format!("token creation failed for {user_id}: {e}"))
        })?;

        info!("Chat token created for {}", user_id);
        Ok(token)
    }

    /// Best-effort push of the account's profile to the vendor directory.
    ///
    /// Never fails and never waits longer than the configured timeout; problems are
    /// logged and dropped so the account operation that triggered the sync goes through.
    pub async fn sync_profile(&self, account: &AccountResponse) {
        let user = ChatUser::from(account);

        match tokio::time::timeout(self.sync_timeout, self.provider.upsert_user(&user)).await {
            Ok(Ok(())) => info!("User {} synced with chat service", account.id),
            Ok(Err(e)) => warn!("Failed to sync user {} with chat service: {}", account.id, e),
            Err(_) => warn!(
                "Syncing user {} with chat service timed out after {:?}",
                account.id, self.sync_timeout
            ),
        }
    }
}
