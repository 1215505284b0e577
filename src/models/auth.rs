// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    #[schema(example = "admin@example.com")]
    pub email: String,
    #[schema(example = "Administrador")]
    pub name: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    // Primeiro usuário cadastrado no sistema
    pub is_first: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para registro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
    #[validate(
        required(message = "required"),
        length(min = 3, message = "too_short")
    )]
    #[schema(example = "admin@example.com")]
    pub email: Option<String>,

    #[validate(
        required(message = "required"),
        length(min = 6, message = "too_short")
    )]
    #[schema(example = "secret123")]
    pub password: Option<String>,

    #[schema(example = "Administrador")]
    pub name: Option<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(required(message = "required"))]
    pub email: Option<String>,
    #[validate(required(message = "required"))]
    pub password: Option<String>,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (ID do usuário)
    pub exp: usize,  // Expiration time (quando o token expira)
    pub iat: usize,  // Issued At (quando o token foi criado)
}

/// E-mail como chave de login: aparado e em minúsculas.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
