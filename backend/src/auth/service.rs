//! Core business logic for the authentication flows.

use crate::auth::models::{LoginRequest, RegisterRequest};
use crate::auth::{DUPLICATE_USERNAME, LOGIN_FAILED, REFRESH_TOKEN_ERROR, USER_NOT_FOUND};
use crate::config::Config;
use crate::database::models::{CreateUser, User};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::user_repository::UserRepository;
use crate::utils::jwt::{TokenErrorMessages, TokenService};
use bcrypt::{DEFAULT_COST, hash, verify};
use sqlx::SqlitePool;

/// Outcome of a successful auth operation. `refresh_token` is set only by
/// transitions that (re)issue the refresh cookie; refresh itself leaves the
/// existing cookie in place.
#[derive(Debug)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Authentication service for registration, login, and token refresh.
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    tokens: TokenService,
}

impl<'a> AuthService<'a> {
    pub fn new(pool: &'a SqlitePool, config: &Config) -> Self {
        AuthService {
            pool,
            tokens: TokenService::new(config),
        }
    }

    /// Creates the user and opens a session. The validation pipeline has
    /// already run its duplicate pre-check, but two concurrent
    /// registrations can both pass it; the store's unique constraint is the
    /// backstop and its violation maps to the same conflict.
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthSession> {
        let password_hash = Self::hash_password(&request.password)?;
        let repo = UserRepository::new(self.pool);

        let user = match repo
            .create_user(CreateUser {
                username: request.username,
                password_hash,
                role: request.role,
            })
            .await
        {
            Ok(user) => user,
            Err(e) if is_unique_violation(&e) => {
                return Err(ServiceError::already_exists(DUPLICATE_USERNAME));
            }
            Err(e) => return Err(e.into()),
        };

        self.open_session(user)
    }

    /// Authenticates by username and password. Unknown usernames and wrong
    /// passwords fail identically.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthSession> {
        let repo = UserRepository::new(self.pool);
        let Some(user) = repo.get_user_by_username(&request.username).await? else {
            return Err(ServiceError::unauthorized(LOGIN_FAILED));
        };

        if !Self::verify_password(&request.password, &user.password_hash)? {
            return Err(ServiceError::unauthorized(LOGIN_FAILED));
        }

        self.open_session(user)
    }

    /// Verifies the refresh token and mints a new access token. The
    /// refresh token itself is not rotated.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> ServiceResult<AuthSession> {
        let claims = self.tokens.verify(
            refresh_token,
            TokenErrorMessages::general_only(REFRESH_TOKEN_ERROR),
        )?;

        let repo = UserRepository::new(self.pool);
        let user = repo
            .get_user_by_id(&claims.sub)
            .await?
            .ok_or_else(|| ServiceError::not_found(USER_NOT_FOUND))?;

        let access_token = self.tokens.issue_access_token(&user.id)?;
        Ok(AuthSession {
            user,
            access_token,
            refresh_token: None,
        })
    }

    fn open_session(&self, user: User) -> ServiceResult<AuthSession> {
        let refresh_token = self.tokens.issue_refresh_token(&user.id)?;
        let access_token = self.tokens.issue_access_token(&user.id)?;
        Ok(AuthSession {
            user,
            access_token,
            refresh_token: Some(refresh_token),
        })
    }

    fn hash_password(password: &str) -> ServiceResult<String> {
        hash(password, DEFAULT_COST)
            .map_err(|e| ServiceError::internal(format!("Password hashing failed: {}", e)))
    }

    fn verify_password(password: &str, hash: &str) -> ServiceResult<bool> {
        verify(password, hash)
            .map_err(|e| ServiceError::internal(format!("Password verification failed: {}", e)))
    }
}

fn is_unique_violation(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|db| db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::UserRole;
    use crate::utils::jwt::TokenErrorMessages;
    use sqlx::sqlite::SqlitePoolOptions;

    fn test_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            server_port: 0,
            jwt_secret: "test-secret".to_string(),
            access_token_ttl_seconds: 60,
            refresh_token_ttl_seconds: 3600,
        }
    }

    async fn test_pool() -> SqlitePool {
        // A single connection keeps every query on the same in-memory db.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();
        pool
    }

    fn register_request(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            role: UserRole::default(),
        }
    }

    #[tokio::test]
    async fn register_then_login_succeeds_with_the_same_credentials() {
        let pool = test_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        let session = service
            .register(register_request("sara", "p@ss1234"))
            .await
            .unwrap();
        assert_eq!(session.user.username, "sara");
        assert_eq!(session.user.role, UserRole::Editor);
        assert!(session.refresh_token.is_some());
        assert_ne!(session.user.password_hash, "p@ss1234");

        let session = service
            .login(LoginRequest {
                username: "sara".to_string(),
                password: "p@ss1234".to_string(),
            })
            .await
            .unwrap();
        assert!(!session.access_token.is_empty());
        assert!(session.refresh_token.is_some());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_fail_identically() {
        let pool = test_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        service
            .register(register_request("sara", "p@ss1234"))
            .await
            .unwrap();

        let wrong_password = service
            .login(LoginRequest {
                username: "sara".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_user = service
            .login(LoginRequest {
                username: "nobody".to_string(),
                password: "p@ss1234".to_string(),
            })
            .await
            .unwrap_err();

        match (wrong_password, unknown_user) {
            (
                ServiceError::Unauthorized { message: a },
                ServiceError::Unauthorized { message: b },
            ) => {
                assert_eq!(a, b);
                assert_eq!(a, LOGIN_FAILED);
            }
            other => panic!("expected two unauthorized errors, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_insert_maps_to_a_conflict() {
        // Bypasses the pipeline pre-check on purpose: this is the unique
        // constraint backstop for the registration race.
        let pool = test_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        service
            .register(register_request("sara", "p@ss1234"))
            .await
            .unwrap();
        match service
            .register(register_request("sara", "other-pass"))
            .await
            .unwrap_err()
        {
            ServiceError::AlreadyExists { message } => assert_eq!(message, DUPLICATE_USERNAME),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refresh_mints_an_access_token_for_the_same_subject() {
        let pool = test_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        let session = service
            .register(register_request("sara", "p@ss1234"))
            .await
            .unwrap();
        let refresh_token = session.refresh_token.unwrap();

        let refreshed = service.refresh_access_token(&refresh_token).await.unwrap();
        assert!(refreshed.refresh_token.is_none());

        let claims = TokenService::new(&config)
            .verify(&refreshed.access_token, TokenErrorMessages::default())
            .unwrap();
        assert_eq!(claims.sub, session.user.id);
    }

    #[tokio::test]
    async fn refresh_for_a_deleted_user_is_not_found() {
        let pool = test_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        let session = service
            .register(register_request("sara", "p@ss1234"))
            .await
            .unwrap();
        sqlx::query("DELETE FROM users")
            .execute(&pool)
            .await
            .unwrap();

        match service
            .refresh_access_token(&session.refresh_token.unwrap())
            .await
            .unwrap_err()
        {
            ServiceError::NotFound { message } => assert_eq!(message, USER_NOT_FOUND),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn garbage_refresh_token_fails_with_the_fixed_message() {
        let pool = test_pool().await;
        let config = test_config();
        let service = AuthService::new(&pool, &config);

        match service.refresh_access_token("garbage").await.unwrap_err() {
            ServiceError::Unauthorized { message } => assert_eq!(message, REFRESH_TOKEN_ERROR),
            other => panic!("expected unauthorized, got {other:?}"),
        }
    }
}
