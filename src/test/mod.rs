//! Shared fixtures for unit and HTTP tests.
//!
//! `MemoryStore` stands in for PostgreSQL and enforces the same guarantees as the
//! schema: unique emails, at most one pending request per pair and an
//! all-or-nothing accept.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        chat::{model::ChatUser, provider::ChatProvider, service::ChatService},
        friend::{
            model::{FriendRequestResponse, FriendResponse, FriendUserRow},
            repository::{FriendRepo, FriendRepository, FriendRequestRepository},
            schema::{FriendEntity, FriendRequestEntity, FriendRequestStatus, ordered_pair},
            service::FriendService,
        },
        session::service::SessionService,
        user::{
            model::{AccountResponse, InsertUser, OnboardUser, OnboardingModel, SignUpModel},
            repository::UserRepository,
            schema::UserEntity,
            service::UserService,
        },
    },
};

pub const TEST_SECRET: &str = "test-secret-key";

/// Builds an actix test service wired to the given `TestContext`.
macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($ctx.users.clone()))
                .app_data(actix_web::web::Data::new($ctx.friends.clone()))
                .app_data(actix_web::web::Data::new($ctx.sessions.clone()))
                .app_data(actix_web::web::Data::new($ctx.chat_service.clone()))
                .app_data(crate::path_config())
                .configure(crate::api_configure),
        )
        .await
    };
}
pub(crate) use test_app;

#[derive(Default)]
struct StoreState {
    users: Vec<UserEntity>,
    requests: Vec<FriendRequestEntity>,
    friendships: Vec<FriendEntity>,
    accept_calls: usize,
    race_on_read: Option<Uuid>,
}

impl StoreState {
    fn user(&self, id: Uuid) -> Option<&UserEntity> {
        self.users.iter().find(|u| u.id == id)
    }

    fn friend_ids(&self, id: Uuid) -> Vec<Uuid> {
        self.friendships
            .iter()
            .filter_map(|f| match (f.user_a == id, f.user_b == id) {
                (true, _) => Some(f.user_b),
                (_, true) => Some(f.user_a),
                _ => None,
            })
            .collect()
    }

    fn hydrate(&self, user: &UserEntity) -> UserEntity {
        let mut user = user.clone();
        user.friends = self.friend_ids(user.id);
        user
    }

    fn friendship(&self, a: Uuid, b: Uuid) -> Option<&FriendEntity> {
        let (user_a, user_b) = ordered_pair(a, b);
        self.friendships.iter().find(|f| f.user_a == user_a && f.user_b == user_b)
    }

    fn add_friendship(&mut self, a: Uuid, b: Uuid) {
        if self.friendship(a, b).is_none() {
            let (user_a, user_b) = ordered_pair(a, b);
            self.friendships.push(FriendEntity { user_a, user_b, created_at: chrono::Utc::now() });
        }
    }

    fn pending_between(&self, a: Uuid, b: Uuid) -> Option<&FriendRequestEntity> {
        self.requests.iter().find(|r| {
            r.status == FriendRequestStatus::Pending
                && ((r.requester_id == a && r.recipient_id == b)
                    || (r.requester_id == b && r.recipient_id == a))
        })
    }

    fn accept(&mut self, request_id: Uuid) -> Option<FriendRequestEntity> {
        let request = self
            .requests
            .iter_mut()
            .find(|r| r.id == request_id && r.status == FriendRequestStatus::Pending)?;
        request.status = FriendRequestStatus::Accepted;
        request.updated_at = chrono::Utc::now();
        let accepted = request.clone();
        self.add_friendship(accepted.requester_id, accepted.recipient_id);
        Some(accepted)
    }

    /// Newest first, like the SQL listing.
    fn requests_with_profile(
        &self,
        owner: Uuid,
        owner_sent: bool,
        status: FriendRequestStatus,
    ) -> Vec<FriendRequestResponse> {
        self.requests
            .iter()
            .rev()
            .filter(|r| r.status == status)
            .filter(|r| if owner_sent { r.requester_id == owner } else { r.recipient_id == owner })
            .filter_map(|r| {
                let other_id = if owner_sent { r.recipient_id } else { r.requester_id };
                let other = self.user(other_id)?;
                let row = FriendUserRow {
                    req_id: r.id,
                    status: r.status,
                    user_id: other.id,
                    full_name: other.full_name.clone(),
                    profile_pic: other.profile_pic.clone(),
                    native_language: other.native_language.clone(),
                    learning_language: other.learning_language.clone(),
                    location: other.location.clone(),
                    created_at: r.created_at,
                    updated_at: r.updated_at,
                };
                Some(row.into_response(owner, owner_sent))
            })
            .collect()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn user(&self, id: Uuid) -> Option<UserEntity> {
        let state = self.state.lock().unwrap();
        state.user(id).map(|u| state.hydrate(u))
    }

    pub fn user_count(&self) -> usize {
        self.state.lock().unwrap().users.len()
    }

    pub fn make_friends(&self, a: Uuid, b: Uuid) {
        self.state.lock().unwrap().add_friendship(a, b);
    }

    pub fn friendship_count(&self) -> usize {
        self.state.lock().unwrap().friendships.len()
    }

    pub fn accept_calls(&self) -> usize {
        self.state.lock().unwrap().accept_calls
    }

    /// The next lookup of `request_id` returns it as pending, then accepts it, as a
    /// concurrent accept landing between the read and the write would.
    pub fn accept_behind_the_scenes_on_next_read(&self, request_id: Uuid) {
        self.state.lock().unwrap().race_on_read = Some(request_id);
    }
}

#[async_trait::async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserEntity>, error::SystemError> {
        Ok(self.user(*id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.email == email).map(|u| state.hydrate(u)))
    }

    async fn create(&self, user: &InsertUser) -> Result<UserEntity, error::SystemError> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(error::SystemError::DuplicateEmail);
        }

        let now = chrono::Utc::now();
        let entity = UserEntity {
            id: Uuid::now_v7(),
            email: user.email.clone(),
            hash_password: user.hash_password.clone(),
            full_name: user.full_name.clone(),
            bio: None,
            profile_pic: user.profile_pic.clone(),
            native_language: None,
            learning_language: None,
            location: None,
            is_onboarded: false,
            friends: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        state.users.push(entity.clone());
        Ok(entity)
    }

    async fn complete_onboarding(
        &self,
        id: &Uuid,
        profile: &OnboardUser,
    ) -> Result<Option<UserEntity>, error::SystemError> {
        let mut state = self.state.lock().unwrap();
        let Some(user) = state.users.iter_mut().find(|u| u.id == *id) else {
            return Ok(None);
        };

        user.full_name = profile.full_name.clone();
        user.bio = Some(profile.bio.clone());
        user.native_language = Some(profile.native_language.clone());
        user.learning_language = Some(profile.learning_language.clone());
        user.location = Some(profile.location.clone());
        if let Some(pic) = &profile.profile_pic {
            user.profile_pic = pic.clone();
        }
        user.is_onboarded = true;
        user.updated_at = chrono::Utc::now();

        let user = user.clone();
        Ok(Some(state.hydrate(&user)))
    }

    async fn find_candidates(&self, id: &Uuid) -> Result<Vec<UserEntity>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .rev()
            .filter(|u| u.id != *id && u.is_onboarded && state.friendship(*id, u.id).is_none())
            .map(|u| state.hydrate(u))
            .collect())
    }
}

#[async_trait::async_trait]
impl FriendRepository for MemoryStore {
    async fn find_friendship(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendEntity>, error::SystemError> {
        Ok(self.state.lock().unwrap().friendship(*user_id_a, *user_id_b).cloned())
    }

    async fn find_friends(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendResponse>, error::SystemError> {
        let state = self.state.lock().unwrap();
        let mut friends: Vec<FriendResponse> = state
            .friend_ids(*user_id)
            .into_iter()
            .filter_map(|id| state.user(id).cloned())
            .map(FriendResponse::from)
            .collect();
        friends.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(friends)
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for MemoryStore {
    async fn find_pending_between(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        Ok(self.state.lock().unwrap().pending_between(*user_id_a, *user_id_b).cloned())
    }

    async fn find_friend_request_by_id(
        &self,
        request_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let mut state = self.state.lock().unwrap();
        let found = state.requests.iter().find(|r| r.id == *request_id).cloned();
        if state.race_on_read == Some(*request_id) {
            state.race_on_read = None;
            state.accept(*request_id);
        }
        Ok(found)
    }

    async fn find_incoming(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state.requests_with_profile(*user_id, false, FriendRequestStatus::Pending))
    }

    async fn find_outgoing(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state.requests_with_profile(*user_id, true, FriendRequestStatus::Pending))
    }

    async fn find_accepted_outgoing(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<FriendRequestResponse>, error::SystemError> {
        let state = self.state.lock().unwrap();
        Ok(state.requests_with_profile(*user_id, true, FriendRequestStatus::Accepted))
    }

    async fn create_friend_request(
        &self,
        requester_id: &Uuid,
        recipient_id: &Uuid,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let mut state = self.state.lock().unwrap();
        if requester_id == recipient_id {
            return Err(error::SystemError::SelfRequest);
        }
        if state.pending_between(*requester_id, *recipient_id).is_some() {
            return Err(error::SystemError::DuplicateRequest);
        }

        let now = chrono::Utc::now();
        let request = FriendRequestEntity {
            id: Uuid::now_v7(),
            requester_id: *requester_id,
            recipient_id: *recipient_id,
            status: FriendRequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.requests.push(request.clone());
        Ok(request)
    }
}

#[async_trait::async_trait]
impl FriendRepo for MemoryStore {
    async fn accept_friend_request_atomic(
        &self,
        request_id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let mut state = self.state.lock().unwrap();
        state.accept_calls += 1;
        Ok(state.accept(*request_id))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum ProviderMode {
    #[default]
    Healthy,
    Failing,
    Hanging,
}

/// Records every profile pushed to it; can be told to fail or never answer.
#[derive(Default)]
pub struct FakeChatProvider {
    mode: ProviderMode,
    synced: Mutex<Vec<ChatUser>>,
}

impl FakeChatProvider {
    pub fn failing() -> Self {
        Self { mode: ProviderMode::Failing, ..Default::default() }
    }

    pub fn hanging() -> Self {
        Self { mode: ProviderMode::Hanging, ..Default::default() }
    }

    pub fn synced(&self) -> Vec<ChatUser> {
        self.synced.lock().unwrap().clone()
    }

    async fn respond(&self) -> Result<(), error::SystemError> {
        match self.mode {
            ProviderMode::Healthy => Ok(()),
            ProviderMode::Failing => Err(error::SystemError::upstream("chat vendor is down")),
            ProviderMode::Hanging => std::future::pending().await,
        }
    }
}

#[async_trait::async_trait]
impl ChatProvider for FakeChatProvider {
    async fn create_token(&self, user_id: &str) -> Result<String, error::SystemError> {
        self.respond().await?;
        Ok(format!("token-for-{user_id}"))
    }

    async fn upsert_user(&self, user: &ChatUser) -> Result<(), error::SystemError> {
        self.respond().await?;
        self.synced.lock().unwrap().push(user.clone());
        Ok(())
    }
}

pub fn sample_account(email: &str) -> AccountResponse {
    let now = chrono::Utc::now();
    AccountResponse {
        id: Uuid::now_v7(),
        email: email.to_string(),
        full_name: "Ana".to_string(),
        bio: None,
        profile_pic: "https://avatar.iran.liara.run/public/7.png".to_string(),
        native_language: None,
        learning_language: None,
        location: None,
        is_onboarded: false,
        friends: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

pub fn sign_up_model(full_name: &str, email: &str, password: &str) -> SignUpModel {
    SignUpModel {
        full_name: full_name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}

pub fn onboarding(full_name: &str) -> OnboardingModel {
    OnboardingModel {
        full_name: Some(full_name.to_string()),
        bio: Some("Hola!".to_string()),
        native_language: Some("Spanish".to_string()),
        learning_language: Some("English".to_string()),
        location: Some("Madrid".to_string()),
        profile_pic: None,
    }
}

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub chat: Arc<FakeChatProvider>,
    pub chat_service: ChatService,
    pub users: UserService,
    pub friends: FriendService,
    pub sessions: SessionService,
}

impl TestContext {
    pub fn new() -> Self {
        Self::build(Arc::new(MemoryStore::default()), Arc::new(FakeChatProvider::default()))
    }

    pub fn with_chat(provider: FakeChatProvider) -> Self {
        Self::build(Arc::new(MemoryStore::default()), Arc::new(provider))
    }

    pub fn with_store(store: Arc<MemoryStore>) -> Self {
        Self::build(store, Arc::new(FakeChatProvider::default()))
    }

    fn build(store: Arc<MemoryStore>, chat: Arc<FakeChatProvider>) -> Self {
        let chat_service = ChatService::with_dependencies(chat.clone(), Duration::from_millis(200));
        let users = UserService::with_dependencies(store.clone(), chat_service.clone());
        let friends = FriendService::with_dependencies(store.clone(), store.clone());
        let sessions = SessionService::with_dependencies(TEST_SECRET, 604800, true, store.clone());

        TestContext { store, chat, chat_service, users, friends, sessions }
    }

    /// Signs up and onboards `User <email>`, a Spanish speaker learning English.
    pub async fn onboarded_user(&self, email: &str) -> AccountResponse {
        let name = format!("User {email}");
        let account = self.users.sign_up(sign_up_model(&name, email, "secret1")).await.unwrap();
        self.users.complete_onboarding(account.id, onboarding(&name)).await.unwrap()
    }
}
