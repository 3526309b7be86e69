pub const SESSION_COOKIE: &str = "jwt";
pub const DEFAULT_AVATAR_COUNT: u32 = 100;
pub const PROFILE_SYNC_TIMEOUT_SECS: u64 = 5;

pub struct Env {
    pub jwt_secret: String,
    pub session_expiration: u64,
    pub cookie_secure: bool,
    pub database_url: String,
    pub stream_api_key: String,
    pub stream_api_secret: String,
    pub stream_base_url: String,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
}

impl Env {
    fn new() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET_KEY")
            .expect("JWT_SECRET_KEY must be set in .env file or environment variable");

        let session_expiration = std::env::var("SESSION_EXPIRATION")
            .unwrap_or_else(|_| "604800".to_string())
            .parse::<u64>()
            .expect("SESSION_EXPIRATION must be a valid u64 integer");
        let cookie_secure = std::env::var("COOKIE_SECURE")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .expect("COOKIE_SECURE must be true or false");

        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set in .env file or environment variable");

        let stream_api_key = std::env::var("STREAM_API_KEY")
            .expect("STREAM_API_KEY must be set in .env file or environment variable");
        let stream_api_secret = std::env::var("STREAM_API_SECRET")
            .expect("STREAM_API_SECRET must be set in .env file or environment variable");
        let stream_base_url = std::env::var("STREAM_BASE_URL")
            .unwrap_or_else(|_| "https://chat.stream-io-api.com".to_string());

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16 integer");
        Env {
            jwt_secret,
            session_expiration,
            cookie_secure,
            database_url,
            stream_api_key,
            stream_api_secret,
            stream_base_url,
            frontend_url,
            ip,
            port,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
