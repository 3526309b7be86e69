use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

use crate::{api::error, modules::chat::model::ChatUser};

/// Boundary to the hosted chat/video platform.
#[async_trait::async_trait]
pub trait ChatProvider {
    /// Token the client-side SDK uses to connect as `user_id`.
    async fn create_token(&self, user_id: &str) -> Result<String, error::SystemError>;

    /// Create or update the user in the vendor's directory.
    async fn upsert_user(&self, user: &ChatUser) -> Result<(), error::SystemError>;
}

#[derive(Serialize)]
struct UserTokenClaims<'a> {
    user_id: &'a str,
}

#[derive(Serialize)]
struct ServerTokenClaims {
    server: bool,
}

/// Stream Chat server-side client.
pub struct StreamChatClient {
    api_key: String,
    api_secret: String,
    base_url: String,
    http: reqwest::Client,
}

impl StreamChatClient {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, error::SystemError> {
        let http = reqwest::Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, error::SystemError> {
        let token = encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.api_secret.as_bytes()),
        )?;
        Ok(token)
    }
}

#[async_trait::async_trait]
impl ChatProvider for StreamChatClient {
    async fn create_token(&self, user_id: &str) -> Result<String, error::SystemError> {
        self.sign(&UserTokenClaims { user_id })
    }

    async fn upsert_user(&self, user: &ChatUser) -> Result<(), error::SystemError> {
        let server_token = self.sign(&ServerTokenClaims { server: true })?;
        let mut users = serde_json::Map::new();
        users.insert(user.id.clone(), serde_json::to_value(user)?);
        let body = json!({ "users": users });

        let response = self
            .http
            .post(format!("{}/users", self.base_url))
            .query(&[("api_key", self.api_key.as_str())])
            .header("Authorization", server_token)
            .header("stream-auth-type", "jwt")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(error::SystemError::upstream(format!(
                "user upsert rejected with {status}: {detail}"
            )));
        }

        Ok(())
    }
}
