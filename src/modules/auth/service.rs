use super::dto::{AuthResponse, LoginRequest, RegisterRequest, TokenClaims, UserResponse};
use super::repository::AuthRepository;
use crate::common::error::ApiError;
use crate::common::security;
use crate::state::AppState;
use jsonwebtoken::{encode, get_current_timestamp, EncodingKey, Header};
use validator::Validate;

pub struct AuthService;

impl AuthService {
    pub async fn register(state: AppState, req: RegisterRequest) -> Result<UserResponse, ApiError> {
        req.validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        if AuthRepository::find_user_by_username(&state.db, &req.username)
            .await?
            .is_some()
        {
            return Err(ApiError::Validation("Username already registered".to_string()));
        }

        if AuthRepository::find_user_by_email(&state.db, &req.email)
            .await?
            .is_some()
        {
            return Err(ApiError::Validation("Email already registered".to_string()));
        }

        let password_hash = security::hash_password(&req.password)?;

        let user =
            AuthRepository::create_user(&state.db, &req.username, &req.email, &password_hash)
                .await?;

        Ok(UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        })
    }

    pub async fn login(state: AppState, req: LoginRequest) -> Result<AuthResponse, ApiError> {
        let user = AuthRepository::find_user_by_username(&state.db, &req.username)
            .await?
            .ok_or_else(|| ApiError::Auth("Invalid username or password".to_string()))?;

        security::verify_password(&req.password, &user.password_hash)
            .map_err(|_| ApiError::Auth("Invalid username or password".to_string()))?;

        let expires_in = state.config.access_token_expire_minutes * 60;
        let access_token = Self::create_access_token(
            &state.config.jwt_secret,
            &user.username,
            &user.role,
            expires_in,
        )?;

        Ok(AuthResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
        })
    }

    pub async fn get_me(state: AppState, username: &str) -> Result<UserResponse, ApiError> {
        let user = AuthRepository::find_user_by_username(&state.db, username)
            .await?
            .ok_or_else(|| ApiError::Auth("Could not validate credentials".to_string()))?;

        Ok(UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
        })
    }

    fn create_access_token(
        secret: &str,
        username: &str,
        role: &str,
        expires_in: u64,
    ) -> Result<String, ApiError> {
        let now = get_current_timestamp() as usize;
        let claims = TokenClaims {
            sub: username.to_string(),
            role: role.to_string(),
            exp: now + expires_in as usize,
            iat: now,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    #[test]
    fn token_carries_username_and_role() {
        let token =
            AuthService::create_access_token("test-secret", "alice", "ADMIN", 30 * 60).unwrap();

        let claims = decode::<TokenClaims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap()
        .claims;

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.role, "ADMIN");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn token_rejects_wrong_secret() {
        let token =
            AuthService::create_access_token("test-secret", "alice", "USER", 60).unwrap();

        let result = decode::<TokenClaims>(
            &token,
            &DecodingKey::from_secret(b"other-secret"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}
