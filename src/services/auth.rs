// src/services/auth.rs

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    models::auth::{Claims, User},
};

// Login de mentira: um único par usuário/senha vindo da configuração.
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
    admin_username: String,
    admin_password: String,
}

impl AuthService {
    pub fn new(jwt_secret: String, admin_username: String, admin_password: String) -> Self {
        Self {
            jwt_secret,
            admin_username,
            admin_password,
        }
    }

    pub fn login_user(&self, username: &str, password: &str) -> Result<String, AppError> {
        if username != self.admin_username || password != self.admin_password {
            tracing::warn!("Tentativa de login recusada para '{}'", username);
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(&User::admin())
    }

    pub fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let claims = token_data.claims;
        Ok(User {
            id: claims.sub,
            name: claims.name,
            role: claims.role,
        })
    }

    fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new("segredo-de-teste".into(), "admin".into(), "admin".into())
    }

    #[test]
    fn login_issues_token_for_admin() {
        let auth = service();
        let token = auth.login_user("admin", "admin").unwrap();
        let user = auth.validate_token(&token).unwrap();
        assert_eq!(user.id, "1");
        assert_eq!(user.name, "Administrador");
        assert_eq!(user.role, "admin");
    }

    #[test]
    fn wrong_credentials_are_rejected() {
        assert!(matches!(
            service().login_user("admin", "errada"),
            Err(AppError::InvalidCredentials)
        ));
    }

    #[test]
    fn token_from_other_secret_is_invalid() {
        let other = AuthService::new("outro".into(), "admin".into(), "admin".into());
        let token = other.login_user("admin", "admin").unwrap();
        assert!(matches!(service().validate_token(&token), Err(AppError::InvalidToken)));
        assert!(matches!(service().validate_token("lixo"), Err(AppError::InvalidToken)));
    }
}
