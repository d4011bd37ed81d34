pub struct Env {
    pub jwt_secret: String,
    pub access_token_expiration: u64,
    pub refresh_token_expiration: u64,
    pub database_url: String,
    pub redis_url: String,
    pub frontend_url: String,
    pub ip: String,
    pub port: u16,
    pub user_search_limit: i64,
}

impl Env {
    fn new() -> Self {
        let jwt_secret = std::env::var("SECRET_KEY")
            .expect("SECRET_KEY must be set in .env file or environment variable");

        let access_token_expiration = std::env::var("ACCESS_TOKEN_EXPIRATION")
            .unwrap_or_else(|_| "900".to_string())
            .parse::<u64>()
            .expect("ACCESS_TOKEN_EXPIRATION must be a valid u64 integer");
        let refresh_token_expiration = std::env::var("REFRESH_TOKEN_EXPIRATION")
            .unwrap_or_else(|_| "604800".to_string())
            .parse::<u64>()
            .expect("REFRESH_TOKEN_EXPIRATION must be a valid u64 integer");

        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set in .env file or environment variable");
        let redis_url = std::env::var("REDIS_URL")
            .expect("REDIS_URL must be set in .env file or environment variable");

        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());
        let ip = std::env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid u16 integer");
        let user_search_limit = std::env::var("USER_SEARCH_LIMIT")
            .unwrap_or_else(|_| "50".to_string())
            .parse::<i64>()
            .expect("USER_SEARCH_LIMIT must be a valid i64 integer");
        Env {
            jwt_secret,
            access_token_expiration,
            refresh_token_expiration,
            database_url,
            redis_url,
            frontend_url,
            ip,
            port,
            user_search_limit,
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

/// The slice of `Env` the account service needs.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub access_token_expiration: u64,
    pub refresh_token_expiration: u64,
    pub user_search_limit: i64,
}

impl From<&Env> for AuthSettings {
    fn from(env: &Env) -> Self {
        AuthSettings {
            jwt_secret: env.jwt_secret.clone(),
            access_token_expiration: env.access_token_expiration,
            refresh_token_expiration: env.refresh_token_expiration,
            user_search_limit: env.user_search_limit,
        }
    }
}

pub const USER_CACHE_TTL_SECS: usize = 3600;

pub const DEFAULT_TASK_PRIORITY: i16 = 3;

pub const DEFAULT_MIN_DURATION_MINUTES: i32 = 30;
pub const DEFAULT_MAX_DURATION_MINUTES: i32 = 120;

pub fn user_cache_key(id: &uuid::Uuid) -> String {
    format!("user:{id}")
}

pub fn refresh_token_key(jti: &uuid::Uuid) -> String {
    format!("refresh_token:{jti}")
}
