// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::{Acquire, Executor, Sqlite};

use crate::{
    common::error::{field_error, AppError, Resource},
    db::UserRepository,
    models::auth::{normalize_email, Claims, User},
};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    jwt_expires_days: i64,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, jwt_expires_days: i64, bcrypt_cost: u32) -> Self {
        Self { user_repo, jwt_secret, jwt_expires_days, bcrypt_cost }
    }

    pub async fn register_user<'e, A>(
        &self,
        conn: A,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<(String, User), AppError>
    where
        A: Acquire<'e, Database = Sqlite>,
    {
        let email = normalize_email(email);
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| email.clone());

        // 1. Hashing (fora da transação, não toca no banco)
        let hashed_password = self.hash_password(password).await?;

        // 2. Conta e cria na mesma transação: só o primeiro usuário recebe is_first
        let mut tx = conn.begin().await?;
        let is_first = self.user_repo.count(&mut *tx).await? == 0;
        let user = self.user_repo
            .create_user(&mut *tx, &email, &name, &hashed_password, is_first)
            .await?;
        tx.commit().await?;

        tracing::info!("👤 Usuário registrado: {} (id {})", user.email, user.id);

        let token = self.create_token(user.id)?;
        Ok((token, user))
    }

    pub async fn login_user<'e, E>(&self, executor: E, email: &str, password: &str) -> Result<(String, User), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let user = self.user_repo
            .find_by_email(executor, &normalize_email(email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(user.id)?;
        Ok((token, user))
    }

    /// Troca a senha de um usuário existente (utilitário de desenvolvimento).
    pub async fn reset_password<'e, E>(&self, executor: E, email: &str, new_password: &str) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Sqlite> + Copy,
    {
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(field_error("password", "too_short"));
        }

        let user = self.user_repo
            .find_by_email(executor, &normalize_email(email))
            .await?
            .ok_or(AppError::NotFound(Resource::User))?;

        let hashed_password = self.hash_password(new_password).await?;
        if !self.user_repo.update_password(executor, user.id, &hashed_password).await? {
            return Err(AppError::NotFound(Resource::User));
        }

        tracing::info!("🔑 Senha redefinida para {} (id {})", user.email, user.id);
        Ok(user)
    }

    // O bcrypt é caro: roda fora do runtime assíncrono
    async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    /// Resolve o usuário dono de um token; qualquer falha vira `InvalidToken`.
    pub async fn validate_token<'e, E>(&self, executor: E, token: &str) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let user_id = self.decode_token(token)?;
        self.user_repo
            .find_by_id(executor, user_id)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    pub fn decode_token(&self, token: &str) -> Result<i64, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        token_data.claims.sub.parse::<i64>().map_err(|_| AppError::InvalidToken)
    }

    pub fn create_token(&self, user_id: i64) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(self.jwt_expires_days);

        let claims = Claims {
            sub: user_id.to_string(),
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

    fn service(secret: &str) -> AuthService {
        AuthService::new(UserRepository::new(), secret.to_string(), 30, 4)
    }

    #[test]
    fn token_round_trip_keeps_user_id() {
        let auth = service("test-secret");
        let token = auth.create_token(42).unwrap();
        assert_eq!(auth.decode_token(&token).unwrap(), 42);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = service("one").create_token(7).unwrap();
        assert!(matches!(service("two").decode_token(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(service("s").decode_token("not-a-jwt"), Err(AppError::InvalidToken)));
    }
}
