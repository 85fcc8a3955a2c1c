// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// O painel tem um único operador. Não existe tabela de usuários.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[schema(example = "1")]
    pub id: String,
    #[schema(example = "Administrador")]
    pub name: String,
    #[schema(example = "admin")]
    pub role: String,
}

impl User {
    pub fn admin() -> Self {
        Self {
            id: "1".to_string(),
            name: "Administrador".to_string(),
            role: "admin".to_string(),
        }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(length(min = 1, message = "Usuário é obrigatório"))]
    #[schema(example = "admin")]
    pub username: String,
    #[validate(length(min = 1, message = "Senha é obrigatória"))]
    #[schema(example = "admin")]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Subject (ID do usuário)
    pub name: String,
    pub role: String,
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
