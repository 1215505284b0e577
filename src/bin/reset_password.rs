// src/bin/reset_password.rs
//
// Redefine a senha de um usuário direto no banco. Somente para desenvolvimento.
//
//   cargo run --bin reset-password -- <email> <nova_senha>

use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;

use rent_backend::{
    config::{AppState, Config},
    db::MIGRATOR,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(email), Some(new_password)) = (args.next(), args.next()) else {
        bail!("Uso: reset-password <email> <nova_senha>");
    };

    let config = Config::from_env()?;
    let app_state = AppState::new(config).await?;
    MIGRATOR
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados.")?;

    let user = app_state
        .auth_service
        .reset_password(&app_state.db_pool, &email, &new_password)
        .await
        .map_err(|e| anyhow::anyhow!("Falha ao redefinir a senha de {email}: {e}"))?;

    tracing::info!("✅ Senha alterada para {} (id {})", user.email, user.id);
    tracing::warn!("⚠️ Utilitário de desenvolvimento: não use em produção.");
    Ok(())
}
